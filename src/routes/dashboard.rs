use actix_web::{Responder, get, web};
use actix_web_flash_messages::IncomingFlashMessages;
use tera::Tera;

use crate::models::auth::AuthenticatedUser;
use crate::models::config::ServerConfig;
use crate::routes::{base_context, ensure_role, render_template};
use crate::SERVICE_ADMIN_ROLE;

/// Admin dashboard shell. The charts fetch their data from
/// `/api/v1/dashboard` after the page loads.
#[get("/dashboard")]
pub async fn show_dashboard(
    user: AuthenticatedUser,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    if let Err(response) = ensure_role(&user, SERVICE_ADMIN_ROLE, Some("/na")) {
        return response;
    }

    let context = base_context(
        &flash_messages,
        &user,
        "dashboard",
        &server_config.auth_service_url,
    );

    render_template(&tera, "dashboard/index.html", &context)
}
