use actix_cors::Cors;
use actix_files::Files;
use actix_identity::IdentityMiddleware;
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::Key;
use actix_web::{App, HttpServer, middleware as actix_middleware, web};
use actix_web_flash_messages::{FlashMessagesFramework, storage::CookieMessageStore};
use tera::Tera;

use crate::db::establish_connection_pool;
use crate::middleware::RedirectUnauthorized;
use crate::models::config::ServerConfig;
use crate::repository::DieselRepository;
use crate::routes::api::{dashboard_series, list_leads, list_notifications, mark_notifications_read};
use crate::routes::dashboard::show_dashboard;
use crate::routes::enquiry::{
    enquiry_proposal, save_enquiry_body, save_enquiry_chassis, save_enquiry_fitout, show_enquiry,
};
use crate::routes::lead::{
    delete_lead, follow_up_lead, forward_lead, lifecycle_lead, remark_lead, save_lead, show_lead,
    timer_lead,
};
use crate::routes::main::{add_lead, leads_upload, logout, not_assigned, show_index};
use crate::routes::reports::{monthly_report_pdf, show_reports, user_report_csv, user_report_pdf};

pub mod db;
pub mod domain;
pub mod dto;
pub mod forms;
pub mod middleware;
pub mod models;
pub mod pagination;
pub mod reports;
pub mod repository;
pub mod routes;
pub mod schema;

pub const SERVICE_ACCESS_ROLE: &str = "crm";
pub const SERVICE_ADMIN_ROLE: &str = "crm_admin";

/// Builds and runs the Actix-Web HTTP server using the provided configuration.
pub async fn run(server_config: ServerConfig) -> std::io::Result<()> {
    // Establish Diesel connection pool for the SQLite database.
    let pool = establish_connection_pool(&server_config.database_url).map_err(|e| {
        std::io::Error::other(format!("Failed to establish database connection: {e}"))
    })?;

    let repo = DieselRepository::new(pool);

    // Keys and stores for identity, sessions, and flash messages.
    let secret_key = Key::from(server_config.secret.as_bytes());

    let message_store = CookieMessageStore::builder(secret_key.clone()).build();
    let message_framework = FlashMessagesFramework::builder(message_store).build();

    let tera = Tera::new(&server_config.templates_dir)
        .map_err(|e| std::io::Error::other(format!("Template parsing error(s): {e}")))?;

    let bind_address = (server_config.address.clone(), server_config.port);

    // Sign-in lives on the external auth service.
    let signin_location = format!(
        "{}/auth/signin",
        server_config.auth_service_url.trim_end_matches('/')
    );

    HttpServer::new(move || {
        App::new()
            .wrap(Cors::permissive())
            .wrap(message_framework.clone())
            .wrap(IdentityMiddleware::default())
            .wrap(
                SessionMiddleware::builder(CookieSessionStore::default(), secret_key.clone())
                    .cookie_secure(false) // set to true in prod
                    .cookie_domain(Some(format!(".{}", server_config.domain)))
                    .build(),
            )
            .wrap(actix_middleware::Compress::default())
            .wrap(actix_middleware::Logger::default())
            .service(Files::new("/assets", "./assets"))
            .service(not_assigned)
            .service(
                web::scope("/api/v1")
                    .service(list_leads)
                    .service(list_notifications)
                    .service(mark_notifications_read)
                    .service(dashboard_series),
            )
            .service(
                web::scope("")
                    .wrap(RedirectUnauthorized::new(signin_location.clone()))
                    .service(show_index)
                    .service(add_lead)
                    .service(leads_upload)
                    .service(show_lead)
                    .service(save_lead)
                    .service(remark_lead)
                    .service(follow_up_lead)
                    .service(forward_lead)
                    .service(lifecycle_lead)
                    .service(delete_lead)
                    .service(timer_lead)
                    .service(show_enquiry)
                    .service(save_enquiry_body)
                    .service(save_enquiry_chassis)
                    .service(save_enquiry_fitout)
                    .service(enquiry_proposal)
                    .service(show_dashboard)
                    .service(show_reports)
                    .service(monthly_report_pdf)
                    .service(user_report_csv)
                    .service(user_report_pdf)
                    .service(logout),
            )
            .app_data(web::Data::new(tera.clone()))
            .app_data(web::Data::new(repo.clone()))
            .app_data(web::Data::new(server_config.clone()))
    })
    .bind(bind_address)?
    .run()
    .await
}
