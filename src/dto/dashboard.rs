//! Chart-ready aggregates for the admin dashboard.

use serde::Serialize;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CountEntry {
    pub label: String,
    pub count: i64,
}

impl From<(String, i64)> for CountEntry {
    fn from((label, count): (String, i64)) -> Self {
        Self { label, count }
    }
}

/// Payload behind `/api/v1/dashboard`, consumed by the dashboard charts.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSeries {
    pub status_counts: Vec<CountEntry>,
    pub lifecycle_counts: Vec<CountEntry>,
    /// Lead intake per `YYYY-MM` month, oldest first.
    pub monthly_intake: Vec<CountEntry>,
}
