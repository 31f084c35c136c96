use chrono::NaiveDateTime;
use serde::Deserialize;
use validator::Validate;

use crate::domain::lead::{ConnectionStatus, LeadStatus, UpdateLead};

/// Parses the value of an HTML `datetime-local` input, with or without
/// seconds.
pub fn parse_datetime_local(value: &str) -> Option<NaiveDateTime> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M"))
        .ok()
}

#[derive(Deserialize, Validate)]
/// Form data for updating an existing lead.
pub struct SaveLeadForm {
    /// Lead identifier.
    pub id: i32,
    #[validate(length(min = 1))]
    pub company: String,
    #[validate(length(min = 1))]
    pub contact_name: String,
    #[validate(email)]
    #[serde(default, deserialize_with = "crate::forms::empty_string_as_none")]
    pub email: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub source: Option<String>,
    pub status: String,
    pub connection_status: String,
    /// `datetime-local` value; empty clears the follow-up.
    pub next_follow_up: Option<String>,
}

impl From<&SaveLeadForm> for UpdateLead {
    fn from(form: &SaveLeadForm) -> Self {
        UpdateLead::new(
            form.company.clone(),
            form.contact_name.clone(),
            form.email.clone(),
            form.phone.clone(),
            form.location.clone(),
            form.source.clone(),
            LeadStatus::from(form.status.as_str()),
            ConnectionStatus::from(form.connection_status.as_str()),
            form.next_follow_up
                .as_deref()
                .and_then(parse_datetime_local),
        )
    }
}

#[derive(Deserialize, Validate)]
/// Form data for adding a remark, note, action plan or activity to a lead.
pub struct AddRemarkForm {
    pub id: i32,
    #[validate(length(min = 1))]
    pub text: String,
    /// One of the lead event type names.
    pub event_type: String,
}

#[derive(Deserialize, Validate)]
/// Form data for scheduling a follow-up on a lead.
pub struct FollowUpForm {
    pub id: i32,
    #[validate(length(min = 1))]
    pub text: String,
    /// `datetime-local` value for when the follow-up is due.
    #[validate(length(min = 1))]
    pub due: String,
}

impl FollowUpForm {
    pub fn due_datetime(&self) -> Option<NaiveDateTime> {
        parse_datetime_local(&self.due)
    }
}

#[derive(Deserialize, Validate)]
/// Form data for forwarding a lead to another user.
pub struct ForwardLeadForm {
    pub id: i32,
    pub to_user_id: i32,
    pub note: Option<String>,
}

#[derive(Deserialize)]
/// Form data for deleting a lead entirely.
pub struct DeleteLeadForm {
    pub id: i32,
}

#[derive(Deserialize)]
/// Form data for toggling the lead lifecycle.
pub struct LifecycleForm {
    pub id: i32,
    /// `Active` or `Dead`.
    pub lifecycle: String,
}

#[derive(Deserialize, Validate)]
/// Stopwatch log posted when a call timer is stopped.
pub struct TimerLogForm {
    pub id: i32,
    #[validate(range(min = 1))]
    pub elapsed_seconds: i64,
    pub note: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn datetime_local_parses_both_precisions() {
        assert!(parse_datetime_local("2026-08-30T10:15").is_some());
        assert!(parse_datetime_local("2026-08-30T10:15:30").is_some());
        assert!(parse_datetime_local("").is_none());
        assert!(parse_datetime_local("tomorrow").is_none());
    }

    #[test]
    fn save_form_clears_follow_up_when_empty() {
        let form = SaveLeadForm {
            id: 1,
            company: "Metro".to_string(),
            contact_name: "R. Rao".to_string(),
            email: None,
            phone: None,
            location: None,
            source: None,
            status: "Hot".to_string(),
            connection_status: "Connected".to_string(),
            next_follow_up: Some("".to_string()),
        };
        let updates = UpdateLead::from(&form);
        assert_eq!(updates.status, LeadStatus::Hot);
        assert!(updates.next_follow_up.is_none());
    }
}
