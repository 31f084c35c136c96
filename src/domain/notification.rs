use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Notification {
    pub id: i32,
    pub user_id: i32,
    pub message: String,
    pub is_read: bool,
    pub created_at: NaiveDateTime,
}

#[derive(Clone, Debug, Deserialize)]
pub struct NewNotification {
    pub user_id: i32,
    pub message: String,
}

impl NewNotification {
    #[must_use]
    pub fn new(user_id: i32, message: String) -> Self {
        Self {
            user_id,
            message: message.trim().to_string(),
        }
    }
}
