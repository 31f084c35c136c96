//! Spreadsheet-compatible CSV rendering of lead reports.

use crate::reports::{LeadReportRow, ReportError, ReportResult};

const HEADERS: &[&str] = &[
    "Company",
    "Contact",
    "Phone",
    "Status",
    "Lifecycle",
    "Assigned to",
    "Updated",
];

/// Renders rows as a UTF-8 CSV document. Empty input yields a header-only
/// file, which spreadsheet applications open as an empty table.
pub fn render_lead_sheet(rows: &[LeadReportRow]) -> ReportResult<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(vec![]);

    writer.write_record(HEADERS)?;

    for row in rows {
        writer.write_record([
            row.company.as_str(),
            row.contact_name.as_str(),
            row.phone.as_str(),
            row.status.as_str(),
            row.lifecycle.as_str(),
            row.assigned_to.as_str(),
            &row.updated_at.format("%Y-%m-%d %H:%M").to_string(),
        ])?;
    }

    writer
        .into_inner()
        .map_err(|e| ReportError::InvalidInput(format!("CSV buffer error: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn empty_sheet_has_header_only() {
        let bytes = render_lead_sheet(&[]).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert_eq!(text.lines().count(), 1);
        assert!(text.starts_with("Company,Contact,Phone"));
    }

    #[test]
    fn fields_with_commas_are_quoted() {
        let row = LeadReportRow {
            company: "Wheels, Ltd".to_string(),
            contact_name: "A. B".to_string(),
            phone: String::new(),
            status: "Hot".to_string(),
            lifecycle: "Active".to_string(),
            assigned_to: "Asha".to_string(),
            updated_at: NaiveDate::from_ymd_opt(2026, 8, 1)
                .unwrap()
                .and_hms_opt(9, 30, 0)
                .unwrap(),
        };
        let text = String::from_utf8(render_lead_sheet(&[row]).unwrap()).unwrap();
        assert!(text.contains("\"Wheels, Ltd\""));
        assert!(text.contains("2026-08-01 09:30"));
    }
}
