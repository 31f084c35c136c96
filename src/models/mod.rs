//! Database models shared across the CRM repository.

pub mod auth;
pub mod config;
pub mod enquiry;
pub mod lead;
pub mod lead_event;
pub mod notification;
pub mod user;
