//! DTOs exposed by the JSON API endpoints.

use serde::Serialize;

use crate::domain::lead::Lead;
use crate::domain::notification::Notification;

/// Result payload returned by `/api/v1/leads`.
#[derive(Debug, Serialize)]
pub struct LeadsResponse {
    /// Total number of leads matching the filter.
    pub total: usize,
    /// Page of leads requested by the caller.
    pub leads: Vec<Lead>,
}

/// Result payload returned by `/api/v1/notifications`, polled by the UI.
#[derive(Debug, Serialize)]
pub struct NotificationsResponse {
    pub unread: usize,
    pub notifications: Vec<Notification>,
}
