//! Data shapes handed to templates and API consumers.

pub mod api;
pub mod dashboard;
