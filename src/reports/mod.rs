//! Server-side report generation.
//!
//! The lead table is flattened into [`LeadReportRow`]s once, then rendered
//! either as a paginated PDF (`pdf`) or a spreadsheet-compatible CSV
//! (`sheet`).

use std::collections::HashMap;

use chrono::NaiveDateTime;
use thiserror::Error;

use crate::domain::lead::Lead;
use crate::domain::user::User;

pub mod pdf;
pub mod sheet;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("PDF rendering error: {0}")]
    Pdf(String),

    #[error("CSV rendering error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Report input error: {0}")]
    InvalidInput(String),
}

pub type ReportResult<T> = Result<T, ReportError>;

impl From<printpdf::Error> for ReportError {
    fn from(err: printpdf::Error) -> Self {
        ReportError::Pdf(err.to_string())
    }
}

/// One line of a lead report, denormalized for rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct LeadReportRow {
    pub company: String,
    pub contact_name: String,
    pub phone: String,
    pub status: String,
    pub lifecycle: String,
    pub assigned_to: String,
    pub updated_at: NaiveDateTime,
}

impl LeadReportRow {
    fn from_lead(lead: &Lead, users: &HashMap<i32, User>) -> Self {
        let assigned_to = lead
            .user_id
            .and_then(|id| users.get(&id))
            .map(|user| user.name.clone())
            .unwrap_or_else(|| "Unassigned".to_string());

        Self {
            company: lead.company.clone(),
            contact_name: lead.contact_name.clone(),
            phone: lead.phone.clone().unwrap_or_default(),
            status: lead.status.to_string(),
            lifecycle: lead.lifecycle.to_string(),
            assigned_to,
            updated_at: lead.updated_at,
        }
    }
}

/// Flattens leads into report rows, resolving assignees against `users`.
pub fn build_lead_rows(leads: &[Lead], users: &[User]) -> Vec<LeadReportRow> {
    let user_map: HashMap<i32, User> = users.iter().map(|u| (u.id, u.clone())).collect();
    leads
        .iter()
        .map(|lead| LeadReportRow::from_lead(lead, &user_map))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::lead::{ConnectionStatus, LeadStatus, Lifecycle};
    use crate::domain::user::UserRole;
    use chrono::Utc;

    fn sample_lead(id: i32, user_id: Option<i32>) -> Lead {
        let now = Utc::now().naive_utc();
        Lead {
            id,
            user_id,
            company: format!("Company {id}"),
            contact_name: format!("Contact {id}"),
            email: None,
            phone: Some("+16502530000".to_string()),
            location: None,
            source: None,
            status: LeadStatus::Warm,
            connection_status: ConnectionStatus::Connected,
            lifecycle: Lifecycle::Active,
            next_follow_up: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn sample_user(id: i32, name: &str) -> User {
        User {
            id,
            name: name.to_string(),
            email: format!("{name}@example.com").to_lowercase(),
            role: UserRole::User,
            created_at: Utc::now().naive_utc(),
        }
    }

    #[test]
    fn rows_resolve_assignees() {
        let leads = vec![sample_lead(1, Some(7)), sample_lead(2, None)];
        let users = vec![sample_user(7, "Asha")];

        let rows = build_lead_rows(&leads, &users);
        assert_eq!(rows[0].assigned_to, "Asha");
        assert_eq!(rows[1].assigned_to, "Unassigned");
    }

    #[test]
    fn unknown_assignee_falls_back_to_unassigned() {
        let leads = vec![sample_lead(1, Some(99))];
        let rows = build_lead_rows(&leads, &[]);
        assert_eq!(rows[0].assigned_to, "Unassigned");
    }
}
