//! Mock repository implementations for isolating handlers in tests.

use mockall::mock;

use crate::domain::enquiry::{Enquiry, EnquiryStageData};
use crate::domain::lead::{Lead, Lifecycle, NewLead, UpdateLead};
use crate::domain::lead_event::{LeadEvent, NewLeadEvent};
use crate::domain::notification::{NewNotification, Notification};
use crate::domain::user::{NewUser, User};
use crate::repository::errors::RepositoryResult;
use crate::repository::{
    EnquiryReader, EnquiryWriter, LeadEventListQuery, LeadEventReader, LeadEventWriter,
    LeadListQuery, LeadReader, LeadWriter, NotificationReader, NotificationWriter, UserReader,
    UserWriter,
};

mock! {
    pub Repository {}

    impl LeadReader for Repository {
        fn get_lead_by_id(&self, id: i32) -> RepositoryResult<Option<Lead>>;
        fn list_leads(&self, query: LeadListQuery) -> RepositoryResult<(usize, Vec<Lead>)>;
        fn list_due_followups(
            &self,
            now: chrono::NaiveDateTime,
        ) -> RepositoryResult<Vec<Lead>>;
        fn count_leads_by_status(&self) -> RepositoryResult<Vec<(String, i64)>>;
        fn count_leads_by_lifecycle(&self) -> RepositoryResult<Vec<(String, i64)>>;
        fn count_leads_by_month(&self) -> RepositoryResult<Vec<(String, i64)>>;
    }

    impl LeadWriter for Repository {
        fn create_leads(&self, new_leads: &[NewLead]) -> RepositoryResult<usize>;
        fn update_lead(&self, lead_id: i32, updates: &UpdateLead) -> RepositoryResult<Lead>;
        fn set_lead_lifecycle(&self, lead_id: i32, lifecycle: Lifecycle) -> RepositoryResult<Lead>;
        fn forward_lead(&self, lead_id: i32, to_user_id: i32) -> RepositoryResult<Lead>;
        fn set_lead_follow_up(
            &self,
            lead_id: i32,
            due: Option<chrono::NaiveDateTime>,
        ) -> RepositoryResult<Lead>;
        fn delete_lead(&self, lead_id: i32) -> RepositoryResult<()>;
    }

    impl LeadEventReader for Repository {
        fn list_lead_events(
            &self,
            query: LeadEventListQuery,
        ) -> RepositoryResult<(usize, Vec<(LeadEvent, User)>)>;
    }

    impl LeadEventWriter for Repository {
        fn create_lead_event(&self, event: &NewLeadEvent) -> RepositoryResult<LeadEvent>;
    }

    impl UserReader for Repository {
        fn get_user_by_id(&self, id: i32) -> RepositoryResult<Option<User>>;
        fn get_user_by_email(&self, email: &str) -> RepositoryResult<Option<User>>;
        fn list_users(&self) -> RepositoryResult<Vec<User>>;
    }

    impl UserWriter for Repository {
        fn create_or_update_user(&self, new_user: &NewUser) -> RepositoryResult<User>;
    }

    impl NotificationReader for Repository {
        fn list_notifications(
            &self,
            user_id: i32,
            unread_only: bool,
        ) -> RepositoryResult<Vec<Notification>>;
    }

    impl NotificationWriter for Repository {
        fn create_notifications(
            &self,
            notifications: &[NewNotification],
        ) -> RepositoryResult<usize>;
        fn mark_notification_read(&self, id: i32, user_id: i32) -> RepositoryResult<usize>;
        fn mark_all_notifications_read(&self, user_id: i32) -> RepositoryResult<usize>;
    }

    impl EnquiryReader for Repository {
        fn get_enquiry_by_lead(&self, lead_id: i32) -> RepositoryResult<Option<Enquiry>>;
    }

    impl EnquiryWriter for Repository {
        fn save_enquiry_stage(
            &self,
            lead_id: i32,
            stage: &EnquiryStageData,
        ) -> RepositoryResult<Enquiry>;
    }
}
