use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use log::error;
use serde_json::json;
use tera::Tera;
use validator::Validate;

use crate::domain::lead::{Lead, Lifecycle, UpdateLead};
use crate::domain::lead_event::{LeadEventType, NewLeadEvent};
use crate::domain::notification::NewNotification;
use crate::domain::types::RemarkText;
use crate::forms::lead::{
    AddRemarkForm, DeleteLeadForm, FollowUpForm, ForwardLeadForm, LifecycleForm, SaveLeadForm,
    TimerLogForm,
};
use crate::models::auth::AuthenticatedUser;
use crate::models::config::ServerConfig;
use crate::repository::{
    DieselRepository, EnquiryReader, LeadEventListQuery, LeadEventReader, LeadEventWriter,
    LeadReader, LeadWriter, NotificationWriter, UserReader,
};
use crate::routes::{base_context, check_role, ensure_role, redirect, render_template};
use crate::{SERVICE_ACCESS_ROLE, SERVICE_ADMIN_ROLE};

/// Reps may only touch their own leads; admins may touch all of them.
fn can_access_lead(user: &AuthenticatedUser, lead: &Lead) -> bool {
    check_role(SERVICE_ADMIN_ROLE, &user.roles) || lead.user_id == Some(user.user_id)
}

/// Loads a lead and enforces the assignment check, or produces the response
/// the handler should bail out with.
fn load_lead(
    repo: &DieselRepository,
    user: &AuthenticatedUser,
    lead_id: i32,
) -> Result<Lead, HttpResponse> {
    match repo.get_lead_by_id(lead_id) {
        Ok(Some(lead)) if can_access_lead(user, &lead) => Ok(lead),
        Ok(Some(_)) => {
            FlashMessage::error("This lead is not available to you").send();
            Err(redirect("/"))
        }
        Ok(None) => {
            FlashMessage::error("Lead not found.").send();
            Err(redirect("/"))
        }
        Err(e) => {
            error!("Failed to get lead: {e}");
            Err(HttpResponse::InternalServerError().finish())
        }
    }
}

#[get("/lead/{lead_id}")]
pub async fn show_lead(
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

    let lead = match load_lead(&repo, &user, lead_id.into_inner()) {
        Ok(lead) => lead,
        Err(response) => return response,
    };

    let events_with_users = match repo.list_lead_events(LeadEventListQuery::new(lead.id)) {
        Ok((_total, events_with_users)) => events_with_users,
        Err(e) => {
            error!("Failed to get events: {e}");
            return HttpResponse::InternalServerError().finish();
        }
    };

    let enquiry = match repo.get_enquiry_by_lead(lead.id) {
        Ok(enquiry) => enquiry,
        Err(e) => {
            error!("Failed to get enquiry: {e}");
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
    context.insert("lead", &lead);
    context.insert("events", &events_with_users);
    context.insert("enquiry", &enquiry);
    context.insert("users", &users);

    render_template(&tera, "lead/index.html", &context)
}

#[post("/lead/save")]
pub async fn save_lead(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<SaveLeadForm>,
) -> impl Responder {
    if let Err(response) = ensure_role(&user, SERVICE_ACCESS_ROLE, Some("/na")) {
        return response;
    }

    if let Err(e) = form.validate() {
        error!("Failed to validate form: {e}");
        FlashMessage::error("Invalid lead details").send();
        return redirect(&format!("/lead/{}", form.id));
    }

    if let Err(response) = load_lead(&repo, &user, form.id) {
        return response;
    }

    let updates: UpdateLead = (&form).into();

    match repo.update_lead(form.id, &updates) {
        Ok(_) => {
            FlashMessage::success("Lead updated.".to_string()).send();
        }
        Err(err) => {
            error!("Failed to update lead: {err}");
            FlashMessage::error("Failed to update the lead").send();
        }
    }

    redirect(&format!("/lead/{}", form.id))
}

#[post("/lead/remark")]
pub async fn remark_lead(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<AddRemarkForm>,
) -> impl Responder {
    if let Err(response) = ensure_role(&user, SERVICE_ACCESS_ROLE, Some("/na")) {
        return response;
    }

    if let Err(e) = form.validate() {
        error!("Failed to validate form: {e}");
        FlashMessage::error("Invalid remark").send();
        return redirect(&format!("/lead/{}", form.id));
    }

    if let Err(response) = load_lead(&repo, &user, form.id) {
        return response;
    }

    let text = match RemarkText::new(form.text.as_str()) {
        Ok(text) => text,
        Err(e) => {
            error!("Rejected remark: {e}");
            FlashMessage::error("Invalid remark").send();
            return redirect(&format!("/lead/{}", form.id));
        }
    };

    let event_type = match LeadEventType::from(form.event_type.as_str()) {
        t @ (LeadEventType::Remark
        | LeadEventType::Note
        | LeadEventType::ActionPlan
        | LeadEventType::Activity) => t,
        _ => LeadEventType::Remark,
    };

    let event = NewLeadEvent::new(
        form.id,
        user.user_id,
        event_type,
        json!({ "text": text.as_str() }),
    );

    match repo.create_lead_event(&event) {
        Ok(_) => {
            FlashMessage::success("Remark added.".to_string()).send();
        }
        Err(err) => {
            error!("Failed to add remark: {err}");
            FlashMessage::error("Failed to add the remark").send();
        }
    }

    redirect(&format!("/lead/{}", form.id))
}

#[post("/lead/follow-up")]
pub async fn follow_up_lead(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<FollowUpForm>,
) -> impl Responder {
    if let Err(response) = ensure_role(&user, SERVICE_ACCESS_ROLE, Some("/na")) {
        return response;
    }

    if let Err(e) = form.validate() {
        error!("Failed to validate form: {e}");
        FlashMessage::error("Invalid follow-up").send();
        return redirect(&format!("/lead/{}", form.id));
    }

    let Some(due) = form.due_datetime() else {
        FlashMessage::error("Invalid follow-up date").send();
        return redirect(&format!("/lead/{}", form.id));
    };

    if let Err(response) = load_lead(&repo, &user, form.id) {
        return response;
    }

    let event = NewLeadEvent::new(
        form.id,
        user.user_id,
        LeadEventType::FollowUp,
        json!({ "text": &form.text, "due": due.format("%Y-%m-%d %H:%M").to_string() }),
    );

    let result = repo
        .set_lead_follow_up(form.id, Some(due))
        .and_then(|_| repo.create_lead_event(&event));

    match result {
        Ok(_) => {
            FlashMessage::success("Follow-up scheduled.".to_string()).send();
        }
        Err(err) => {
            error!("Failed to schedule follow-up: {err}");
            FlashMessage::error("Failed to schedule the follow-up").send();
        }
    }

    redirect(&format!("/lead/{}", form.id))
}

#[post("/lead/forward")]
pub async fn forward_lead(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<ForwardLeadForm>,
) -> impl Responder {
    if let Err(response) = ensure_role(&user, SERVICE_ACCESS_ROLE, Some("/na")) {
        return response;
    }

    let lead = match load_lead(&repo, &user, form.id) {
        Ok(lead) => lead,
        Err(response) => return response,
    };

    let recipient = match repo.get_user_by_id(form.to_user_id) {
        Ok(Some(recipient)) => recipient,
        Ok(None) => {
            FlashMessage::error("Unknown recipient").send();
            return redirect(&format!("/lead/{}", form.id));
        }
        Err(e) => {
            error!("Failed to look up recipient: {e}");
            return HttpResponse::InternalServerError().finish();
        }
    };

    let event = NewLeadEvent::new(
        form.id,
        user.user_id,
        LeadEventType::Forward,
        json!({
            "from_user_id": lead.user_id,
            "to_user_id": recipient.id,
            "note": form.note.as_deref().unwrap_or(""),
        }),
    );

    let notification = NewNotification::new(
        recipient.id,
        format!("Lead \"{}\" was forwarded to you by {}.", lead.company, user.name),
    );

    let result = repo
        .forward_lead(form.id, recipient.id)
        .and_then(|_| repo.create_lead_event(&event))
        .and_then(|_| repo.create_notifications(&[notification]));

    match result {
        Ok(_) => {
            FlashMessage::success(format!("Lead forwarded to {}.", recipient.name)).send();
        }
        Err(err) => {
            error!("Failed to forward lead: {err}");
            FlashMessage::error("Failed to forward the lead").send();
        }
    }

    redirect(&format!("/lead/{}", form.id))
}

#[post("/lead/delete")]
pub async fn delete_lead(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<DeleteLeadForm>,
) -> impl Responder {
    if let Err(response) = ensure_role(&user, SERVICE_ADMIN_ROLE, Some("/na")) {
        return response;
    }

    match repo.delete_lead(form.id) {
        Ok(()) => {
            FlashMessage::success("Lead deleted.".to_string()).send();
        }
        Err(err) => {
            error!("Failed to delete lead: {err}");
            FlashMessage::error("Failed to delete the lead").send();
        }
    }

    redirect("/")
}

#[post("/lead/lifecycle")]
pub async fn lifecycle_lead(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<LifecycleForm>,
) -> impl Responder {
    if let Err(response) = ensure_role(&user, SERVICE_ACCESS_ROLE, Some("/na")) {
        return response;
    }

    if let Err(response) = load_lead(&repo, &user, form.id) {
        return response;
    }

    let lifecycle = Lifecycle::from(form.lifecycle.as_str());

    match repo.set_lead_lifecycle(form.id, lifecycle) {
        Ok(lead) => {
            FlashMessage::success(format!("Lead marked {}.", lead.lifecycle)).send();
        }
        Err(err) => {
            error!("Failed to set lifecycle: {err}");
            FlashMessage::error("Failed to update the lead lifecycle").send();
        }
    }

    redirect(&format!("/lead/{}", form.id))
}

#[post("/lead/timer")]
pub async fn timer_lead(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<TimerLogForm>,
) -> impl Responder {
    if let Err(response) = ensure_role(&user, SERVICE_ACCESS_ROLE, Some("/na")) {
        return response;
    }

    if let Err(e) = form.validate() {
        error!("Failed to validate form: {e}");
        FlashMessage::error("Invalid timer log").send();
        return redirect(&format!("/lead/{}", form.id));
    }

    if let Err(response) = load_lead(&repo, &user, form.id) {
        return response;
    }

    let event = NewLeadEvent::new(
        form.id,
        user.user_id,
        LeadEventType::TimerLog,
        json!({
            "elapsed_seconds": form.elapsed_seconds,
            "note": form.note.as_deref().unwrap_or(""),
        }),
    );

    match repo.create_lead_event(&event) {
        Ok(_) => {
            FlashMessage::success("Timer log saved.".to_string()).send();
        }
        Err(err) => {
            error!("Failed to save timer log: {err}");
            FlashMessage::error("Failed to save the timer log").send();
        }
    }

    redirect(&format!("/lead/{}", form.id))
}
