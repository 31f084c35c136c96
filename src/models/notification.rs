use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::notification::{
    NewNotification as DomainNewNotification, Notification as DomainNotification,
};
use crate::models::user::User;

#[derive(Debug, Clone, Identifiable, Queryable, Associations)]
#[diesel(belongs_to(User, foreign_key = user_id))]
#[diesel(table_name = crate::schema::notifications)]
pub struct Notification {
    pub id: i32,
    pub user_id: i32,
    pub message: String,
    pub is_read: bool,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::notifications)]
pub struct NewNotification<'a> {
    pub user_id: i32,
    pub message: &'a str,
}

impl<'a> From<&'a DomainNewNotification> for NewNotification<'a> {
    fn from(notification: &'a DomainNewNotification) -> Self {
        Self {
            user_id: notification.user_id,
            message: notification.message.as_str(),
        }
    }
}

impl From<Notification> for DomainNotification {
    fn from(notification: Notification) -> Self {
        Self {
            id: notification.id,
            user_id: notification.user_id,
            message: notification.message,
            is_read: notification.is_read,
            created_at: notification.created_at,
        }
    }
}
