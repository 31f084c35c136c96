//! JSON API under `/api/v1`. Unlike the page routes these endpoints answer
//! with bare 401/403 instead of redirecting.

use actix_web::{HttpResponse, Responder, get, post, web};
use log::error;
use serde::Deserialize;

use crate::dto::api::{LeadsResponse, NotificationsResponse};
use crate::dto::dashboard::{CountEntry, DashboardSeries};
use crate::models::auth::AuthenticatedUser;
use crate::repository::{
    DieselRepository, LeadListQuery, LeadReader, NotificationReader, NotificationWriter,
};
use crate::routes::{DEFAULT_ITEMS_PER_PAGE, check_role, ensure_role};
use crate::{SERVICE_ACCESS_ROLE, SERVICE_ADMIN_ROLE};

#[derive(Deserialize)]
struct LeadsQueryParams {
    query: Option<String>,
    page: Option<usize>,
}

#[get("/leads")]
pub async fn list_leads(
    params: web::Query<LeadsQueryParams>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    if let Err(response) = ensure_role(&user, SERVICE_ACCESS_ROLE, None) {
        return response;
    }

    let page = params.page.unwrap_or(1);
    let mut query = LeadListQuery::new().paginate(page, DEFAULT_ITEMS_PER_PAGE);

    if !check_role(SERVICE_ADMIN_ROLE, &user.roles) {
        query = query.user(user.user_id);
    }
    if let Some(q) = params.query.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
        query = query.search(q);
    }

    match repo.list_leads(query) {
        Ok((total, leads)) => HttpResponse::Ok().json(LeadsResponse { total, leads }),
        Err(e) => {
            error!("Failed to list leads: {e}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/notifications")]
pub async fn list_notifications(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    if let Err(response) = ensure_role(&user, SERVICE_ACCESS_ROLE, None) {
        return response;
    }

    match repo.list_notifications(user.user_id, true) {
        Ok(notifications) => HttpResponse::Ok().json(NotificationsResponse {
            unread: notifications.len(),
            notifications,
        }),
        Err(e) => {
            error!("Failed to list notifications: {e}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[derive(Deserialize)]
struct MarkReadParams {
    /// Marks a single notification when given, everything otherwise.
    id: Option<i32>,
}

#[post("/notifications/read")]
pub async fn mark_notifications_read(
    params: web::Json<MarkReadParams>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    if let Err(response) = ensure_role(&user, SERVICE_ACCESS_ROLE, None) {
        return response;
    }

    let result = match params.id {
        Some(id) => repo.mark_notification_read(id, user.user_id),
        None => repo.mark_all_notifications_read(user.user_id),
    };

    match result {
        Ok(affected) => HttpResponse::Ok().json(serde_json::json!({ "updated": affected })),
        Err(e) => {
            error!("Failed to mark notifications read: {e}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/dashboard")]
pub async fn dashboard_series(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    if let Err(response) = ensure_role(&user, SERVICE_ADMIN_ROLE, None) {
        return response;
    }

    let status_counts = match repo.count_leads_by_status() {
        Ok(counts) => counts,
        Err(e) => {
            error!("Failed to count leads by status: {e}");
            return HttpResponse::InternalServerError().finish();
        }
    };
    let lifecycle_counts = match repo.count_leads_by_lifecycle() {
        Ok(counts) => counts,
        Err(e) => {
            error!("Failed to count leads by lifecycle: {e}");
            return HttpResponse::InternalServerError().finish();
        }
    };
    let monthly_intake = match repo.count_leads_by_month() {
        Ok(counts) => counts,
        Err(e) => {
            error!("Failed to count leads by month: {e}");
            return HttpResponse::InternalServerError().finish();
        }
    };

    HttpResponse::Ok().json(DashboardSeries {
        status_counts: status_counts.into_iter().map(CountEntry::from).collect(),
        lifecycle_counts: lifecycle_counts.into_iter().map(CountEntry::from).collect(),
        monthly_intake: monthly_intake.into_iter().map(CountEntry::from).collect(),
    })
}
