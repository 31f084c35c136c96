//! Repository implementation for user notifications.

use diesel::prelude::*;

use crate::domain::notification::{NewNotification, Notification};
use crate::models::notification::{
    NewNotification as DbNewNotification, Notification as DbNotification,
};
use crate::repository::errors::RepositoryResult;
use crate::repository::{DieselRepository, NotificationReader, NotificationWriter};

impl NotificationReader for DieselRepository {
    fn list_notifications(
        &self,
        user_id: i32,
        unread_only: bool,
    ) -> RepositoryResult<Vec<Notification>> {
        use crate::schema::notifications;

        let mut conn = self.conn()?;

        let mut query = notifications::table
            .filter(notifications::user_id.eq(user_id))
            .into_boxed::<diesel::sqlite::Sqlite>();

        if unread_only {
            query = query.filter(notifications::is_read.eq(false));
        }

        let items = query
            .order(notifications::created_at.desc())
            .load::<DbNotification>(&mut conn)?
            .into_iter()
            .map(Into::into)
            .collect();

        Ok(items)
    }
}

impl NotificationWriter for DieselRepository {
    fn create_notifications(&self, notifications: &[NewNotification]) -> RepositoryResult<usize> {
        use crate::schema::notifications;

        let mut conn = self.conn()?;
        let insertables: Vec<DbNewNotification> = notifications.iter().map(Into::into).collect();
        let affected = diesel::insert_into(notifications::table)
            .values(&insertables)
            .execute(&mut conn)?;

        Ok(affected)
    }

    fn mark_notification_read(&self, id: i32, user_id: i32) -> RepositoryResult<usize> {
        use crate::schema::notifications;

        let mut conn = self.conn()?;
        // Scoped to the owner so one user cannot ack another's notifications.
        let affected = diesel::update(
            notifications::table
                .find(id)
                .filter(notifications::user_id.eq(user_id)),
        )
        .set(notifications::is_read.eq(true))
        .execute(&mut conn)?;

        Ok(affected)
    }

    fn mark_all_notifications_read(&self, user_id: i32) -> RepositoryResult<usize> {
        use crate::schema::notifications;

        let mut conn = self.conn()?;
        let affected = diesel::update(
            notifications::table
                .filter(notifications::user_id.eq(user_id))
                .filter(notifications::is_read.eq(false)),
        )
        .set(notifications::is_read.eq(true))
        .execute(&mut conn)?;

        Ok(affected)
    }
}
