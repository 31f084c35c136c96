//! Persistence traits and the Diesel-backed implementation.
//!
//! Routes and binaries depend on the reader/writer traits only; the
//! [`DieselRepository`] implements all of them over one shared pool.

use chrono::NaiveDateTime;

use crate::db::{DbConnection, DbPool, establish_connection_pool, get_connection};
use crate::domain::enquiry::{Enquiry, EnquiryStageData};
use crate::domain::lead::{Lead, LeadStatus, Lifecycle, NewLead, UpdateLead};
use crate::domain::lead_event::{LeadEvent, LeadEventType, NewLeadEvent};
use crate::domain::notification::{NewNotification, Notification};
use crate::domain::user::{NewUser, User};
use crate::repository::errors::RepositoryResult;

pub mod enquiry;
pub mod errors;
pub mod lead;
pub mod lead_event;
#[cfg(feature = "test-mocks")]
pub mod mock;
pub mod notification;
pub mod user;

#[derive(Debug, Clone)]
pub struct Pagination {
    pub page: usize,
    pub per_page: usize,
}

#[derive(Debug, Clone, Default)]
pub struct LeadListQuery {
    /// Restrict to leads assigned to this user.
    pub user_id: Option<i32>,
    pub status: Option<LeadStatus>,
    pub lifecycle: Option<Lifecycle>,
    /// Free-text match against company, contact, email, phone and location.
    pub search: Option<String>,
    /// Restrict to leads updated within the inclusive range.
    pub edited_between: Option<(NaiveDateTime, NaiveDateTime)>,
    pub pagination: Option<Pagination>,
}

impl LeadListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn user(mut self, user_id: i32) -> Self {
        self.user_id = Some(user_id);
        self
    }

    pub fn status(mut self, status: LeadStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn lifecycle(mut self, lifecycle: Lifecycle) -> Self {
        self.lifecycle = Some(lifecycle);
        self
    }

    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn edited_between(mut self, from: NaiveDateTime, to: NaiveDateTime) -> Self {
        self.edited_between = Some((from, to));
        self
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}

#[derive(Debug, Clone)]
pub struct LeadEventListQuery {
    pub lead_id: i32,
    pub event_type: Option<LeadEventType>,
    pub pagination: Option<Pagination>,
}

impl LeadEventListQuery {
    pub fn new(lead_id: i32) -> Self {
        Self {
            lead_id,
            event_type: None,
            pagination: None,
        }
    }

    pub fn event_type(mut self, event_type: LeadEventType) -> Self {
        self.event_type = Some(event_type);
        self
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}

pub trait LeadReader {
    fn get_lead_by_id(&self, id: i32) -> RepositoryResult<Option<Lead>>;
    fn list_leads(&self, query: LeadListQuery) -> RepositoryResult<(usize, Vec<Lead>)>;
    /// Active leads whose follow-up is due at or before `now`.
    fn list_due_followups(&self, now: NaiveDateTime) -> RepositoryResult<Vec<Lead>>;
    fn count_leads_by_status(&self) -> RepositoryResult<Vec<(String, i64)>>;
    fn count_leads_by_lifecycle(&self) -> RepositoryResult<Vec<(String, i64)>>;
    /// Lead intake per calendar month, oldest first, as `("YYYY-MM", count)`.
    fn count_leads_by_month(&self) -> RepositoryResult<Vec<(String, i64)>>;
}

pub trait LeadWriter {
    fn create_leads(&self, new_leads: &[NewLead]) -> RepositoryResult<usize>;
    fn update_lead(&self, lead_id: i32, updates: &UpdateLead) -> RepositoryResult<Lead>;
    fn set_lead_lifecycle(&self, lead_id: i32, lifecycle: Lifecycle) -> RepositoryResult<Lead>;
    /// Reassign a lead to another user; the forwarding event is recorded
    /// separately by the caller.
    fn forward_lead(&self, lead_id: i32, to_user_id: i32) -> RepositoryResult<Lead>;
    fn set_lead_follow_up(
        &self,
        lead_id: i32,
        due: Option<NaiveDateTime>,
    ) -> RepositoryResult<Lead>;
    fn delete_lead(&self, lead_id: i32) -> RepositoryResult<()>;
}

pub trait LeadEventReader {
    fn list_lead_events(
        &self,
        query: LeadEventListQuery,
    ) -> RepositoryResult<(usize, Vec<(LeadEvent, User)>)>;
}

pub trait LeadEventWriter {
    fn create_lead_event(&self, event: &NewLeadEvent) -> RepositoryResult<LeadEvent>;
}

pub trait UserReader {
    fn get_user_by_id(&self, id: i32) -> RepositoryResult<Option<User>>;
    fn get_user_by_email(&self, email: &str) -> RepositoryResult<Option<User>>;
    fn list_users(&self) -> RepositoryResult<Vec<User>>;
}

pub trait UserWriter {
    /// Upsert keyed on the (unique) email address.
    fn create_or_update_user(&self, new_user: &NewUser) -> RepositoryResult<User>;
}

pub trait NotificationReader {
    fn list_notifications(
        &self,
        user_id: i32,
        unread_only: bool,
    ) -> RepositoryResult<Vec<Notification>>;
}

pub trait NotificationWriter {
    fn create_notifications(&self, notifications: &[NewNotification]) -> RepositoryResult<usize>;
    fn mark_notification_read(&self, id: i32, user_id: i32) -> RepositoryResult<usize>;
    fn mark_all_notifications_read(&self, user_id: i32) -> RepositoryResult<usize>;
}

pub trait EnquiryReader {
    fn get_enquiry_by_lead(&self, lead_id: i32) -> RepositoryResult<Option<Enquiry>>;
}

pub trait EnquiryWriter {
    /// Creates the enquiry row on first save, then applies the stage columns.
    /// The `stage` column is a high-water mark and never decreases.
    fn save_enquiry_stage(
        &self,
        lead_id: i32,
        stage: &EnquiryStageData,
    ) -> RepositoryResult<Enquiry>;
}

/// Diesel/SQLite implementation of every repository trait.
#[derive(Clone)]
pub struct DieselRepository {
    pool: DbPool,
}

impl DieselRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Convenience constructor building the pool from a database URL.
    pub fn connect(database_url: &str) -> RepositoryResult<Self> {
        let pool = establish_connection_pool(database_url)?;
        Ok(Self::new(pool))
    }

    pub(crate) fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(get_connection(&self.pool)?)
    }
}
