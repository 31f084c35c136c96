use std::fmt::Display;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{EmailAddress, PhoneNumber};

fn normalize_email(email: Option<String>) -> Option<String> {
    email.and_then(|s| EmailAddress::new(s).ok()).map(String::from)
}

fn normalize_phone(phone: Option<String>) -> Option<String> {
    phone
        .map(|s| {
            PhoneNumber::new(s.as_str())
                .map(PhoneNumber::into_inner)
                .unwrap_or_else(|_| s.trim().to_string())
        })
        .filter(|s| !s.is_empty())
}

/// Sales temperature of a lead.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum LeadStatus {
    Hot,
    Warm,
    Cold,
}

impl Display for LeadStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LeadStatus::Hot => write!(f, "Hot"),
            LeadStatus::Warm => write!(f, "Warm"),
            LeadStatus::Cold => write!(f, "Cold"),
        }
    }
}

impl From<&str> for LeadStatus {
    fn from(s: &str) -> Self {
        match s {
            "Hot" => LeadStatus::Hot,
            "Warm" => LeadStatus::Warm,
            _ => LeadStatus::Cold,
        }
    }
}

impl From<String> for LeadStatus {
    fn from(s: String) -> Self {
        s.as_str().into()
    }
}

/// Outcome of the latest contact attempt.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ConnectionStatus {
    Connected,
    NotConnected,
    Busy,
    SwitchedOff,
    Other(String),
}

impl Display for ConnectionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConnectionStatus::Connected => write!(f, "Connected"),
            ConnectionStatus::NotConnected => write!(f, "NotConnected"),
            ConnectionStatus::Busy => write!(f, "Busy"),
            ConnectionStatus::SwitchedOff => write!(f, "SwitchedOff"),
            ConnectionStatus::Other(s) => write!(f, "{s}"),
        }
    }
}

impl From<&str> for ConnectionStatus {
    fn from(s: &str) -> Self {
        match s {
            "Connected" => ConnectionStatus::Connected,
            "NotConnected" => ConnectionStatus::NotConnected,
            "Busy" => ConnectionStatus::Busy,
            "SwitchedOff" => ConnectionStatus::SwitchedOff,
            _ => ConnectionStatus::Other(s.to_string()),
        }
    }
}

impl From<String> for ConnectionStatus {
    fn from(s: String) -> Self {
        s.as_str().into()
    }
}

/// Active/dead classification of a lead.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Lifecycle {
    Active,
    Dead,
}

impl Lifecycle {
    /// Returns the opposite lifecycle state.
    pub fn toggled(self) -> Self {
        match self {
            Lifecycle::Active => Lifecycle::Dead,
            Lifecycle::Dead => Lifecycle::Active,
        }
    }
}

impl Display for Lifecycle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Lifecycle::Active => write!(f, "Active"),
            Lifecycle::Dead => write!(f, "Dead"),
        }
    }
}

impl From<&str> for Lifecycle {
    fn from(s: &str) -> Self {
        match s {
            "Dead" => Lifecycle::Dead,
            _ => Lifecycle::Active,
        }
    }
}

impl From<String> for Lifecycle {
    fn from(s: String) -> Self {
        s.as_str().into()
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Lead {
    pub id: i32,
    /// Assigned sales user, if any.
    pub user_id: Option<i32>,
    pub company: String,
    pub contact_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub source: Option<String>,
    pub status: LeadStatus,
    pub connection_status: ConnectionStatus,
    pub lifecycle: Lifecycle,
    pub next_follow_up: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Clone, Debug, Deserialize)]
pub struct NewLead {
    pub user_id: Option<i32>,
    pub company: String,
    pub contact_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub source: Option<String>,
    pub status: LeadStatus,
}

impl NewLead {
    #[must_use]
    pub fn new(
        user_id: Option<i32>,
        company: String,
        contact_name: String,
        email: Option<String>,
        phone: Option<String>,
        location: Option<String>,
        source: Option<String>,
        status: LeadStatus,
    ) -> Self {
        Self {
            user_id,
            company: company.trim().to_string(),
            contact_name: contact_name.trim().to_string(),
            email: normalize_email(email),
            phone: normalize_phone(phone),
            location: location
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
            source: source
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
            status,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct UpdateLead {
    pub company: String,
    pub contact_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub source: Option<String>,
    pub status: LeadStatus,
    pub connection_status: ConnectionStatus,
    pub next_follow_up: Option<NaiveDateTime>,
}

impl UpdateLead {
    #[must_use]
    pub fn new(
        company: String,
        contact_name: String,
        email: Option<String>,
        phone: Option<String>,
        location: Option<String>,
        source: Option<String>,
        status: LeadStatus,
        connection_status: ConnectionStatus,
        next_follow_up: Option<NaiveDateTime>,
    ) -> Self {
        Self {
            company: company.trim().to_string(),
            contact_name: contact_name.trim().to_string(),
            email: normalize_email(email),
            phone: normalize_phone(phone),
            location: location
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
            source: source
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
            status,
            connection_status,
            next_follow_up,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_lead_normalizes_contact_fields() {
        let lead = NewLead::new(
            None,
            " Metro Transit ".to_string(),
            " R. Rao ".to_string(),
            Some(" Fleet@Metro.example ".to_string()),
            Some("".to_string()),
            Some("  ".to_string()),
            None,
            LeadStatus::Warm,
        );
        assert_eq!(lead.company, "Metro Transit");
        assert_eq!(lead.contact_name, "R. Rao");
        assert_eq!(lead.email.as_deref(), Some("fleet@metro.example"));
        assert_eq!(lead.phone, None);
        assert_eq!(lead.location, None);
    }

    #[test]
    fn lifecycle_toggles_both_ways() {
        assert_eq!(Lifecycle::Active.toggled(), Lifecycle::Dead);
        assert_eq!(Lifecycle::Dead.toggled(), Lifecycle::Active);
    }

    #[test]
    fn status_parses_unknown_as_cold() {
        assert_eq!(LeadStatus::from("Hot"), LeadStatus::Hot);
        assert_eq!(LeadStatus::from("whatever"), LeadStatus::Cold);
    }
}
