use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::lead::{
    Lead as DomainLead, NewLead as DomainNewLead, UpdateLead as DomainUpdateLead,
};
use crate::models::user::User;

#[derive(Debug, Clone, Identifiable, Queryable, QueryableByName, Associations)]
#[diesel(table_name = crate::schema::leads)]
#[diesel(belongs_to(User, foreign_key = user_id))]
/// Diesel model for [`crate::domain::lead::Lead`].
pub struct Lead {
    pub id: i32,
    pub user_id: Option<i32>,
    pub company: String,
    pub contact_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub source: Option<String>,
    pub status: String,
    pub connection_status: String,
    pub lifecycle: String,
    pub next_follow_up: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::leads)]
/// Insertable form of [`Lead`].
pub struct NewLead<'a> {
    pub user_id: Option<i32>,
    pub company: &'a str,
    pub contact_name: &'a str,
    pub email: Option<&'a str>,
    pub phone: Option<&'a str>,
    pub location: Option<&'a str>,
    pub source: Option<&'a str>,
    pub status: String,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::leads)]
/// Data used when updating a [`Lead`] record.
pub struct UpdateLead<'a> {
    pub company: &'a str,
    pub contact_name: &'a str,
    pub email: Option<&'a str>,
    pub phone: Option<&'a str>,
    pub location: Option<&'a str>,
    pub source: Option<&'a str>,
    pub status: String,
    pub connection_status: String,
    pub next_follow_up: Option<NaiveDateTime>,
    pub updated_at: NaiveDateTime,
}

/// Row returned by the month-by-month intake aggregation.
#[derive(QueryableByName)]
pub struct MonthlyLeadCount {
    #[diesel(sql_type = diesel::sql_types::Text)]
    pub month: String,
    #[diesel(sql_type = diesel::sql_types::BigInt)]
    pub count: i64,
}

impl From<Lead> for DomainLead {
    fn from(lead: Lead) -> Self {
        Self {
            id: lead.id,
            user_id: lead.user_id,
            company: lead.company,
            contact_name: lead.contact_name,
            email: lead.email,
            phone: lead.phone,
            location: lead.location,
            source: lead.source,
            status: lead.status.into(),
            connection_status: lead.connection_status.into(),
            lifecycle: lead.lifecycle.into(),
            next_follow_up: lead.next_follow_up,
            created_at: lead.created_at,
            updated_at: lead.updated_at,
        }
    }
}

impl<'a> From<&'a DomainNewLead> for NewLead<'a> {
    fn from(lead: &'a DomainNewLead) -> Self {
        Self {
            user_id: lead.user_id,
            company: lead.company.as_str(),
            contact_name: lead.contact_name.as_str(),
            email: lead.email.as_deref(),
            phone: lead.phone.as_deref(),
            location: lead.location.as_deref(),
            source: lead.source.as_deref(),
            status: lead.status.to_string(),
        }
    }
}

impl<'a> From<&'a DomainUpdateLead> for UpdateLead<'a> {
    fn from(lead: &'a DomainUpdateLead) -> Self {
        Self {
            company: lead.company.as_str(),
            contact_name: lead.contact_name.as_str(),
            email: lead.email.as_deref(),
            phone: lead.phone.as_deref(),
            location: lead.location.as_deref(),
            source: lead.source.as_deref(),
            status: lead.status.to_string(),
            connection_status: lead.connection_status.to_string(),
            next_follow_up: lead.next_follow_up,
            updated_at: chrono::Utc::now().naive_utc(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::lead::{ConnectionStatus, LeadStatus, Lifecycle};
    use chrono::Utc;

    #[test]
    fn from_domain_new_creates_newlead() {
        let domain = DomainNewLead::new(
            Some(3),
            "Metro Transit".to_string(),
            "R. Rao".to_string(),
            Some("fleet@metro.example".to_string()),
            None,
            Some("Pune".to_string()),
            Some("trade fair".to_string()),
            LeadStatus::Hot,
        );
        let new: NewLead = (&domain).into();
        assert_eq!(new.user_id, Some(3));
        assert_eq!(new.company, "Metro Transit");
        assert_eq!(new.email, Some("fleet@metro.example"));
        assert_eq!(new.status, "Hot");
    }

    #[test]
    fn lead_into_domain() {
        let now: NaiveDateTime = Utc::now().naive_utc();
        let db_lead = Lead {
            id: 1,
            user_id: None,
            company: "c".to_string(),
            contact_name: "n".to_string(),
            email: None,
            phone: Some("+16502530000".to_string()),
            location: None,
            source: None,
            status: "Warm".to_string(),
            connection_status: "Busy".to_string(),
            lifecycle: "Dead".to_string(),
            next_follow_up: None,
            created_at: now,
            updated_at: now,
        };
        let domain: DomainLead = db_lead.into();
        assert_eq!(domain.status, LeadStatus::Warm);
        assert_eq!(domain.connection_status, ConnectionStatus::Busy);
        assert_eq!(domain.lifecycle, Lifecycle::Dead);
        assert_eq!(domain.phone.as_deref(), Some("+16502530000"));
    }
}
