use std::fmt::Display;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Typed audit-trail entry attached to a lead.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct LeadEvent {
    pub id: i32,
    pub lead_id: i32,
    pub user_id: i32,
    pub event_type: LeadEventType,
    pub event_data: Value,
    pub created_at: NaiveDateTime,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub enum LeadEventType {
    FollowUp,
    Note,
    Remark,
    ActionPlan,
    Activity,
    TimerLog,
    Forward,
    Other(String),
}

#[derive(Clone, Debug, Deserialize)]
pub struct NewLeadEvent {
    pub lead_id: i32,
    pub user_id: i32,
    pub event_type: LeadEventType,
    pub event_data: Value,
    pub created_at: NaiveDateTime,
}

impl NewLeadEvent {
    pub fn new(lead_id: i32, user_id: i32, event_type: LeadEventType, event_data: Value) -> Self {
        Self {
            lead_id,
            user_id,
            event_type,
            event_data,
            created_at: chrono::Utc::now().naive_utc(),
        }
    }
}

impl Display for LeadEventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LeadEventType::FollowUp => write!(f, "FollowUp"),
            LeadEventType::Note => write!(f, "Note"),
            LeadEventType::Remark => write!(f, "Remark"),
            LeadEventType::ActionPlan => write!(f, "ActionPlan"),
            LeadEventType::Activity => write!(f, "Activity"),
            LeadEventType::TimerLog => write!(f, "TimerLog"),
            LeadEventType::Forward => write!(f, "Forward"),
            LeadEventType::Other(s) => write!(f, "{s}"),
        }
    }
}

impl From<&str> for LeadEventType {
    fn from(s: &str) -> Self {
        match s {
            "FollowUp" => LeadEventType::FollowUp,
            "Note" => LeadEventType::Note,
            "Remark" => LeadEventType::Remark,
            "ActionPlan" => LeadEventType::ActionPlan,
            "Activity" => LeadEventType::Activity,
            "TimerLog" => LeadEventType::TimerLog,
            "Forward" => LeadEventType::Forward,
            _ => LeadEventType::Other(s.to_string()),
        }
    }
}

impl From<String> for LeadEventType {
    fn from(s: String) -> Self {
        s.as_str().into()
    }
}
