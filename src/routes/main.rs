use actix_identity::Identity;
use actix_multipart::form::MultipartForm;
use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use log::error;
use serde::Deserialize;
use tera::Tera;
use validator::Validate;

use crate::domain::lead::{LeadStatus, Lifecycle, NewLead};
use crate::forms::main::{AddLeadForm, UploadLeadsForm};
use crate::models::auth::AuthenticatedUser;
use crate::models::config::ServerConfig;
use crate::pagination::Paginated;
use crate::repository::{DieselRepository, LeadListQuery, LeadReader, LeadWriter, UserReader};
use crate::routes::{
    DEFAULT_ITEMS_PER_PAGE, base_context, check_role, ensure_role, redirect, render_template,
};
use crate::{SERVICE_ACCESS_ROLE, SERVICE_ADMIN_ROLE};

#[derive(Deserialize)]
struct IndexQueryParams {
    q: Option<String>,
    status: Option<String>,
    lifecycle: Option<String>,
    page: Option<usize>,
}

#[get("/")]
pub async fn show_index(
    params: web::Query<IndexQueryParams>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    if let Err(response) = ensure_role(&user, SERVICE_ACCESS_ROLE, Some("/na")) {
        return response;
    }

    let page = params.page.unwrap_or(1);
    let q = params.q.as_deref().unwrap_or("").trim();

    let mut query = LeadListQuery::new().paginate(page, DEFAULT_ITEMS_PER_PAGE);

    // Reps only ever see their own leads; admins see the whole funnel.
    if !check_role(SERVICE_ADMIN_ROLE, &user.roles) {
        query = query.user(user.user_id);
    }
    if !q.is_empty() {
        query = query.search(q);
    }
    if let Some(status) = params.status.as_deref().filter(|s| !s.is_empty()) {
        query = query.status(LeadStatus::from(status));
    }
    if let Some(lifecycle) = params.lifecycle.as_deref().filter(|s| !s.is_empty()) {
        query = query.lifecycle(Lifecycle::from(lifecycle));
    }

    let leads = match repo.list_leads(query) {
        Ok((total, leads)) => {
            Paginated::new(leads, page, total.div_ceil(DEFAULT_ITEMS_PER_PAGE))
        }
        Err(e) => {
            error!("Failed to list leads: {e}");
            return HttpResponse::InternalServerError().finish();
        }
    };

    let users = match repo.list_users() {
        Ok(users) => users,
        Err(e) => {
            error!("Failed to list users: {e}");
            return HttpResponse::InternalServerError().finish();
        }
    };

    let mut context = base_context(
        &flash_messages,
        &user,
        "index",
        &server_config.auth_service_url,
    );
    context.insert("leads", &leads);
    context.insert("users", &users);
    if !q.is_empty() {
        context.insert("search_query", q);
    }
    context.insert("status_filter", &params.status);
    context.insert("lifecycle_filter", &params.lifecycle);

    render_template(&tera, "main/index.html", &context)
}

#[post("/lead/add")]
pub async fn add_lead(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<AddLeadForm>,
) -> impl Responder {
    if let Err(response) = ensure_role(&user, SERVICE_ACCESS_ROLE, Some("/na")) {
        return response;
    }

    if let Err(e) = form.validate() {
        error!("Failed to validate form: {e}");
        FlashMessage::error("Invalid lead details").send();
        return redirect("/");
    }

    let mut new_lead: NewLead = form.into();

    // Only admins may assign intake to someone else.
    if !check_role(SERVICE_ADMIN_ROLE, &user.roles) {
        new_lead.user_id = Some(user.user_id);
    } else if new_lead.user_id.is_none() {
        new_lead.user_id = Some(user.user_id);
    }

    match repo.create_leads(&[new_lead]) {
        Ok(_) => {
            FlashMessage::success("Lead added.".to_string()).send();
        }
        Err(err) => {
            error!("Failed to add a lead: {err}");
            FlashMessage::error(format!("Failed to add the lead: {err}")).send();
        }
    }
    redirect("/")
}

#[post("/leads/upload")]
pub async fn leads_upload(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    MultipartForm(form): MultipartForm<UploadLeadsForm>,
) -> impl Responder {
    if let Err(response) = ensure_role(&user, SERVICE_ADMIN_ROLE, Some("/na")) {
        return response;
    }

    let leads = match form.parse(Some(user.user_id)) {
        Ok(leads) => leads,
        Err(err) => {
            FlashMessage::error(format!("Failed to parse the lead CSV: {err}")).send();
            return redirect("/");
        }
    };

    match repo.create_leads(&leads) {
        Ok(count) => {
            FlashMessage::success(format!("{count} leads imported.")).send();
        }
        Err(err) => {
            error!("Failed to import leads: {err}");
            FlashMessage::error(format!("Failed to import leads: {err}")).send();
        }
    }

    redirect("/")
}

#[get("/na")]
pub async fn not_assigned(
    user: AuthenticatedUser,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let context = base_context(
        &flash_messages,
        &user,
        "index",
        &server_config.auth_service_url,
    );

    render_template(&tera, "main/not_assigned.html", &context)
}

#[post("/logout")]
pub async fn logout(user: Identity) -> impl Responder {
    user.logout();
    redirect("/")
}
