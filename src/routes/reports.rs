use actix_web::{HttpResponse, Responder, get, web};
use actix_web_flash_messages::IncomingFlashMessages;
use chrono::{Datelike, NaiveDate, NaiveDateTime, Utc};
use log::error;
use serde::Deserialize;
use tera::Tera;

use crate::models::auth::AuthenticatedUser;
use crate::models::config::ServerConfig;
use crate::repository::{DieselRepository, LeadListQuery, LeadReader, UserReader};
use crate::reports::pdf::render_lead_report;
use crate::reports::sheet::render_lead_sheet;
use crate::reports::build_lead_rows;
use crate::routes::{attachment_response, base_context, check_role, ensure_role, render_template};
use crate::{SERVICE_ACCESS_ROLE, SERVICE_ADMIN_ROLE};

#[derive(Deserialize)]
struct ReportRangeParams {
    from: Option<String>,
    to: Option<String>,
}

/// Resolves the requested date range, falling back to the current calendar
/// month. The range is inclusive on both ends.
fn resolve_range(params: &ReportRangeParams) -> Option<(NaiveDateTime, NaiveDateTime)> {
    let today = Utc::now().date_naive();

    let from = match &params.from {
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()?,
        None => today.with_day(1)?,
    };
    let to = match &params.to {
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()?,
        None => today,
    };
    if from > to {
        return None;
    }

    Some((
        from.and_hms_opt(0, 0, 0)?,
        to.and_hms_opt(23, 59, 59)?,
    ))
}

#[get("/reports")]
pub async fn show_reports(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    if let Err(response) = ensure_role(&user, SERVICE_ADMIN_ROLE, Some("/na")) {
        return response;
    }

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
        "reports",
        &server_config.auth_service_url,
    );
    context.insert("users", &users);

    render_template(&tera, "reports/index.html", &context)
}

#[get("/reports/monthly.pdf")]
pub async fn monthly_report_pdf(
    params: web::Query<ReportRangeParams>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    if let Err(response) = ensure_role(&user, SERVICE_ADMIN_ROLE, Some("/na")) {
        return response;
    }

    let Some((from, to)) = resolve_range(&params) else {
        return HttpResponse::BadRequest().body("invalid date range");
    };

    let (_, leads) = match repo.list_leads(LeadListQuery::new().edited_between(from, to)) {
        Ok(result) => result,
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

    let rows = build_lead_rows(&leads, &users);
    let subtitle = format!("{} to {}", from.format("%Y-%m-%d"), to.format("%Y-%m-%d"));

    match render_lead_report("Monthly lead report", &subtitle, &rows) {
        Ok(bytes) => attachment_response(
            bytes,
            "application/pdf",
            &format!("leads-{}.pdf", from.format("%Y-%m")),
        ),
        Err(e) => {
            error!("Failed to render report: {e}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

/// Loads a user's leads for an individual report. Reps may only pull their
/// own report; admins may pull anyone's.
fn load_user_report(
    repo: &DieselRepository,
    user: &AuthenticatedUser,
    target_user_id: i32,
) -> Result<(String, Vec<crate::reports::LeadReportRow>), HttpResponse> {
    if !check_role(SERVICE_ADMIN_ROLE, &user.roles) && target_user_id != user.user_id {
        return Err(HttpResponse::Forbidden().finish());
    }

    let target = match repo.get_user_by_id(target_user_id) {
        Ok(Some(target)) => target,
        Ok(None) => return Err(HttpResponse::NotFound().finish()),
        Err(e) => {
            error!("Failed to look up user: {e}");
            return Err(HttpResponse::InternalServerError().finish());
        }
    };

    let (_, leads) = match repo.list_leads(LeadListQuery::new().user(target.id)) {
        Ok(result) => result,
        Err(e) => {
            error!("Failed to list leads: {e}");
            return Err(HttpResponse::InternalServerError().finish());
        }
    };
    let users = match repo.list_users() {
        Ok(users) => users,
        Err(e) => {
            error!("Failed to list users: {e}");
            return Err(HttpResponse::InternalServerError().finish());
        }
    };

    Ok((target.name, build_lead_rows(&leads, &users)))
}

#[get("/reports/user/{user_id}.csv")]
pub async fn user_report_csv(
    user_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    if let Err(response) = ensure_role(&user, SERVICE_ACCESS_ROLE, Some("/na")) {
        return response;
    }

    let target_user_id = user_id.into_inner();
    let (_, rows) = match load_user_report(&repo, &user, target_user_id) {
        Ok(result) => result,
        Err(response) => return response,
    };

    match render_lead_sheet(&rows) {
        Ok(bytes) => attachment_response(
            bytes,
            "text/csv; charset=utf-8",
            &format!("leads-user-{target_user_id}.csv"),
        ),
        Err(e) => {
            error!("Failed to render sheet: {e}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/reports/user/{user_id}.pdf")]
pub async fn user_report_pdf(
    user_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    if let Err(response) = ensure_role(&user, SERVICE_ACCESS_ROLE, Some("/na")) {
        return response;
    }

    let target_user_id = user_id.into_inner();
    let (name, rows) = match load_user_report(&repo, &user, target_user_id) {
        Ok(result) => result,
        Err(response) => return response,
    };

    match render_lead_report("Lead report", &format!("Assigned to {name}"), &rows) {
        Ok(bytes) => attachment_response(
            bytes,
            "application/pdf",
            &format!("leads-user-{target_user_id}.pdf"),
        ),
        Err(e) => {
            error!("Failed to render report: {e}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_defaults_to_current_month() {
        let params = ReportRangeParams {
            from: None,
            to: None,
        };
        let (from, to) = resolve_range(&params).unwrap();
        assert_eq!(from.day(), 1);
        assert!(from <= to);
    }

    #[test]
    fn range_rejects_inverted_dates() {
        let params = ReportRangeParams {
            from: Some("2026-08-20".to_string()),
            to: Some("2026-08-10".to_string()),
        };
        assert!(resolve_range(&params).is_none());
    }

    #[test]
    fn range_rejects_garbage() {
        let params = ReportRangeParams {
            from: Some("not-a-date".to_string()),
            to: None,
        };
        assert!(resolve_range(&params).is_none());
    }

    #[test]
    fn range_is_inclusive() {
        let params = ReportRangeParams {
            from: Some("2026-08-01".to_string()),
            to: Some("2026-08-31".to_string()),
        };
        let (from, to) = resolve_range(&params).unwrap();
        assert_eq!(from.to_string(), "2026-08-01 00:00:00");
        assert_eq!(to.to_string(), "2026-08-31 23:59:59");
    }
}
