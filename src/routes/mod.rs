//! HTTP handlers and the helpers they share.

use actix_web::http::header;
use actix_web::HttpResponse;
use actix_web_flash_messages::{IncomingFlashMessages, Level};
use log::error;
use tera::{Context, Tera};

use crate::models::auth::AuthenticatedUser;

pub mod api;
pub mod dashboard;
pub mod enquiry;
pub mod lead;
pub mod main;
pub mod reports;

pub const DEFAULT_ITEMS_PER_PAGE: usize = 20;

/// Maps a flash message level onto the alert class used by the templates.
pub fn alert_level_to_str(level: &Level) -> &'static str {
    match level {
        Level::Error => "danger",
        Level::Warning => "warning",
        Level::Success => "success",
        _ => "info",
    }
}

/// Checks whether `role` is present in the list of granted roles.
pub fn check_role(role: &str, roles: &[String]) -> bool {
    roles.iter().any(|r| r == role)
}

/// Ensures the user carries `role`, otherwise produces the response the
/// handler should return: a redirect when `redirect_to` is given, a bare 403
/// otherwise.
pub fn ensure_role(
    user: &AuthenticatedUser,
    role: &str,
    redirect_to: Option<&str>,
) -> Result<(), HttpResponse> {
    if check_role(role, &user.roles) {
        return Ok(());
    }
    match redirect_to {
        Some(location) => Err(redirect(location)),
        None => Err(HttpResponse::Forbidden().finish()),
    }
}

/// 303 redirect to the given location.
pub fn redirect(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .finish()
}

/// Renders a template or logs the failure and returns a 500.
pub fn render_template(tera: &Tera, template: &str, context: &Context) -> HttpResponse {
    match tera.render(template, context) {
        Ok(body) => HttpResponse::Ok()
            .content_type("text/html; charset=utf-8")
            .body(body),
        Err(e) => {
            error!("Failed to render template {template}: {e}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

/// Context fields every page template expects.
pub fn base_context(
    flash_messages: &IncomingFlashMessages,
    user: &AuthenticatedUser,
    current_page: &str,
    home_url: &str,
) -> Context {
    let alerts = flash_messages
        .iter()
        .map(|f| (f.content().to_string(), alert_level_to_str(&f.level())))
        .collect::<Vec<_>>();

    let mut context = Context::new();
    context.insert("alerts", &alerts);
    context.insert("current_user", user);
    context.insert("current_page", current_page);
    context.insert("home_url", home_url);
    context
}

/// File download response with an attachment disposition.
pub fn attachment_response(
    bytes: Vec<u8>,
    content_type: &str,
    filename: &str,
) -> HttpResponse {
    HttpResponse::Ok()
        .content_type(content_type)
        .insert_header((
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{filename}\""),
        ))
        .body(bytes)
}
