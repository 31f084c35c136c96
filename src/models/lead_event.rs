//! Diesel models for the lead audit trail.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::lead_event::{
    LeadEvent as DomainLeadEvent, NewLeadEvent as DomainNewLeadEvent,
};
use crate::models::lead::Lead;
use crate::models::user::User;

#[derive(Debug, Clone, Identifiable, Queryable, Associations)]
#[diesel(belongs_to(Lead, foreign_key = lead_id))]
#[diesel(belongs_to(User, foreign_key = user_id))]
#[diesel(table_name = crate::schema::lead_events)]
pub struct LeadEvent {
    pub id: i32,
    pub lead_id: i32,
    pub user_id: i32,
    pub event_type: String,
    pub event_data: String, // JSON text in the DB
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::lead_events)]
pub struct NewLeadEvent {
    pub lead_id: i32,
    pub user_id: i32,
    pub event_type: String,
    pub event_data: String,
    pub created_at: NaiveDateTime,
}

impl From<LeadEvent> for DomainLeadEvent {
    fn from(event: LeadEvent) -> Self {
        let event_data = serde_json::from_str(&event.event_data).unwrap_or_default();

        Self {
            id: event.id,
            lead_id: event.lead_id,
            user_id: event.user_id,
            event_type: event.event_type.into(),
            event_data,
            created_at: event.created_at,
        }
    }
}

impl<'a> From<&'a DomainNewLeadEvent> for NewLeadEvent {
    fn from(event: &'a DomainNewLeadEvent) -> Self {
        Self {
            lead_id: event.lead_id,
            user_id: event.user_id,
            event_type: event.event_type.to_string(),
            event_data: event.event_data.to_string(),
            created_at: event.created_at,
        }
    }
}

impl From<DomainNewLeadEvent> for NewLeadEvent {
    fn from(event: DomainNewLeadEvent) -> Self {
        Self::from(&event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::lead_event::LeadEventType;
    use serde_json::json;

    #[test]
    fn event_data_survives_the_db_round_trip() {
        let domain = DomainNewLeadEvent::new(
            1,
            2,
            LeadEventType::TimerLog,
            json!({"elapsed_seconds": 95}),
        );
        let db: NewLeadEvent = (&domain).into();
        assert_eq!(db.event_type, "TimerLog");

        let loaded = LeadEvent {
            id: 1,
            lead_id: db.lead_id,
            user_id: db.user_id,
            event_type: db.event_type,
            event_data: db.event_data,
            created_at: db.created_at,
        };
        let back: DomainLeadEvent = loaded.into();
        assert_eq!(back.event_type, LeadEventType::TimerLog);
        assert_eq!(back.event_data["elapsed_seconds"], 95);
    }

    #[test]
    fn malformed_event_data_defaults_to_null() {
        let loaded = LeadEvent {
            id: 1,
            lead_id: 1,
            user_id: 1,
            event_type: "Note".to_string(),
            event_data: "{not json".to_string(),
            created_at: chrono::Utc::now().naive_utc(),
        };
        let back: DomainLeadEvent = loaded.into();
        assert!(back.event_data.is_null());
    }
}
