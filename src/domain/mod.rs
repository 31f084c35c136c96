//! Domain aggregates exposed by the CRM service layer.

pub mod enquiry;
pub mod lead;
pub mod lead_event;
pub mod notification;
pub mod types;
pub mod user;
