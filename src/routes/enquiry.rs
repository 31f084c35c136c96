use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use log::error;
use tera::Tera;
use validator::Validate;

use crate::domain::enquiry::EnquiryStageData;
use crate::forms::enquiry::{EnquiryBodyForm, EnquiryChassisForm, EnquiryFitOutForm};
use crate::models::auth::AuthenticatedUser;
use crate::models::config::ServerConfig;
use crate::reports::pdf::render_enquiry_proposal;
use crate::repository::{DieselRepository, EnquiryReader, EnquiryWriter, LeadReader};
use crate::routes::{
    attachment_response, base_context, check_role, ensure_role, redirect, render_template,
};
use crate::{SERVICE_ACCESS_ROLE, SERVICE_ADMIN_ROLE};

fn can_access(user: &AuthenticatedUser, lead_user_id: Option<i32>) -> bool {
    check_role(SERVICE_ADMIN_ROLE, &user.roles) || lead_user_id == Some(user.user_id)
}

#[get("/enquiry/{lead_id}")]
pub async fn show_enquiry(
    lead_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    if let Err(response) = ensure_role(&user, SERVICE_ACCESS_ROLE, Some("/na")) {
        return response;
    }

    let lead_id = lead_id.into_inner();

    let lead = match repo.get_lead_by_id(lead_id) {
        Ok(Some(lead)) if can_access(&user, lead.user_id) => lead,
        Ok(_) => {
            FlashMessage::error("Lead not found.").send();
            return redirect("/");
        }
        Err(e) => {
            error!("Failed to get lead: {e}");
            return HttpResponse::InternalServerError().finish();
        }
    };

    let enquiry = match repo.get_enquiry_by_lead(lead_id) {
        Ok(enquiry) => enquiry,
        Err(e) => {
            error!("Failed to get enquiry: {e}");
            return HttpResponse::InternalServerError().finish();
        }
    };

    let mut context = base_context(
        &flash_messages,
        &user,
        "index",
        &server_config.auth_service_url,
    );
    context.insert("lead", &lead);
    context.insert("enquiry", &enquiry);

    render_template(&tera, "enquiry/index.html", &context)
}

/// Shared tail of the three stage handlers.
fn save_stage(
    repo: &DieselRepository,
    user: &AuthenticatedUser,
    lead_id: i32,
    stage: &EnquiryStageData,
) -> HttpResponse {
    let lead = match repo.get_lead_by_id(lead_id) {
        Ok(Some(lead)) if can_access(user, lead.user_id) => lead,
        Ok(_) => {
            FlashMessage::error("Lead not found.").send();
            return redirect("/");
        }
        Err(e) => {
            error!("Failed to get lead: {e}");
            return HttpResponse::InternalServerError().finish();
        }
    };

    match repo.save_enquiry_stage(lead.id, stage) {
        Ok(enquiry) => {
            FlashMessage::success(format!("Enquiry stage {} saved.", stage.stage())).send();
            if enquiry.is_complete() {
                FlashMessage::success("Enquiry complete; proposal is ready.".to_string()).send();
            }
        }
        Err(err) => {
            error!("Failed to save enquiry stage: {err}");
            FlashMessage::error("Failed to save the enquiry").send();
        }
    }

    redirect(&format!("/enquiry/{lead_id}"))
}

#[post("/enquiry/body")]
pub async fn save_enquiry_body(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<EnquiryBodyForm>,
) -> impl Responder {
    if let Err(response) = ensure_role(&user, SERVICE_ACCESS_ROLE, Some("/na")) {
        return response;
    }

    if let Err(e) = form.validate() {
        error!("Failed to validate form: {e}");
        FlashMessage::error("Invalid enquiry details").send();
        return redirect(&format!("/enquiry/{}", form.lead_id));
    }

    let stage = EnquiryStageData::from(&form);
    save_stage(&repo, &user, form.lead_id, &stage)
}

#[post("/enquiry/chassis")]
pub async fn save_enquiry_chassis(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<EnquiryChassisForm>,
) -> impl Responder {
    if let Err(response) = ensure_role(&user, SERVICE_ACCESS_ROLE, Some("/na")) {
        return response;
    }

    if let Err(e) = form.validate() {
        error!("Failed to validate form: {e}");
        FlashMessage::error("Invalid enquiry details").send();
        return redirect(&format!("/enquiry/{}", form.lead_id));
    }

    let stage = EnquiryStageData::from(&form);
    save_stage(&repo, &user, form.lead_id, &stage)
}

#[post("/enquiry/fitout")]
pub async fn save_enquiry_fitout(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<EnquiryFitOutForm>,
) -> impl Responder {
    if let Err(response) = ensure_role(&user, SERVICE_ACCESS_ROLE, Some("/na")) {
        return response;
    }

    if let Err(e) = form.validate() {
        error!("Failed to validate form: {e}");
        FlashMessage::error("Invalid enquiry details").send();
        return redirect(&format!("/enquiry/{}", form.lead_id));
    }

    let stage = EnquiryStageData::from(&form);
    save_stage(&repo, &user, form.lead_id, &stage)
}

#[get("/enquiry/{lead_id}/proposal.pdf")]
pub async fn enquiry_proposal(
    lead_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    if let Err(response) = ensure_role(&user, SERVICE_ACCESS_ROLE, Some("/na")) {
        return response;
    }

    let lead_id = lead_id.into_inner();

    let lead = match repo.get_lead_by_id(lead_id) {
        Ok(Some(lead)) if can_access(&user, lead.user_id) => lead,
        Ok(_) => {
            FlashMessage::error("Lead not found.").send();
            return redirect("/");
        }
        Err(e) => {
            error!("Failed to get lead: {e}");
            return HttpResponse::InternalServerError().finish();
        }
    };

    let enquiry = match repo.get_enquiry_by_lead(lead_id) {
        Ok(Some(enquiry)) => enquiry,
        Ok(None) => {
            FlashMessage::error("No enquiry recorded for this lead.").send();
            return redirect(&format!("/lead/{lead_id}"));
        }
        Err(e) => {
            error!("Failed to get enquiry: {e}");
            return HttpResponse::InternalServerError().finish();
        }
    };

    match render_enquiry_proposal(&lead, &enquiry) {
        Ok(bytes) => attachment_response(
            bytes,
            "application/pdf",
            &format!("proposal-{}.pdf", enquiry.reference),
        ),
        Err(e) => {
            error!("Failed to render proposal: {e}");
            HttpResponse::InternalServerError().finish()
        }
    }
}
