//! PDF rendering for lead reports and enquiry proposals.
//!
//! Uses the built-in Helvetica face so no font files have to ship with the
//! binary. Tables are laid out manually: fixed column widths, clipped cell
//! text and a page break when the cursor reaches the bottom margin.

use printpdf::{
    BuiltinFont, IndirectFontRef, Line, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference,
    Point,
};

use crate::domain::enquiry::Enquiry;
use crate::domain::lead::Lead;
use crate::reports::{LeadReportRow, ReportResult};

const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const MARGIN_MM: f32 = 14.0;
const ROW_HEIGHT_MM: f32 = 6.5;
const BODY_FONT_PT: f32 = 9.0;
const HEADER_FONT_PT: f32 = 10.0;
const TITLE_FONT_PT: f32 = 16.0;

/// Column layout for the lead table: label, width in mm.
const COLUMNS: &[(&str, f32)] = &[
    ("Company", 40.0),
    ("Contact", 32.0),
    ("Phone", 28.0),
    ("Status", 16.0),
    ("Lifecycle", 18.0),
    ("Assigned to", 28.0),
    ("Updated", 24.0),
];

/// Rough character budget for a column; Helvetica averages about half the
/// point size per glyph.
fn max_chars(width_mm: f32, font_pt: f32) -> usize {
    let glyph_mm = font_pt * 0.5 * 0.3528;
    ((width_mm / glyph_mm).floor() as usize).max(1)
}

/// Clips text to the column budget, appending an ellipsis when truncated.
fn clip(text: &str, budget: usize) -> String {
    if text.chars().count() <= budget {
        return text.to_string();
    }
    let kept: String = text.chars().take(budget.saturating_sub(1)).collect();
    format!("{kept}\u{2026}")
}

struct TableWriter<'a> {
    doc: &'a PdfDocumentReference,
    font: &'a IndirectFontRef,
    font_bold: &'a IndirectFontRef,
    layer: PdfLayerReference,
    cursor_mm: f32,
}

impl<'a> TableWriter<'a> {
    fn rule(&self, y: f32) {
        let line = Line {
            points: vec![
                (Point::new(Mm(MARGIN_MM), Mm(y)), false),
                (Point::new(Mm(PAGE_WIDTH_MM - MARGIN_MM), Mm(y)), false),
            ],
            is_closed: false,
        };
        self.layer.add_line(line);
    }

    fn header_row(&mut self) {
        let mut x = MARGIN_MM;
        for (label, width) in COLUMNS {
            self.layer.use_text(
                *label,
                HEADER_FONT_PT,
                Mm(x),
                Mm(self.cursor_mm),
                self.font_bold,
            );
            x += width;
        }
        self.rule(self.cursor_mm - 1.5);
        self.cursor_mm -= ROW_HEIGHT_MM;
    }

    fn break_page(&mut self) {
        let (page, layer) = self
            .doc
            .add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "table");
        self.layer = self.doc.get_page(page).get_layer(layer);
        self.cursor_mm = PAGE_HEIGHT_MM - MARGIN_MM - ROW_HEIGHT_MM;
        self.header_row();
    }

    fn data_row(&mut self, row: &LeadReportRow) {
        if self.cursor_mm < MARGIN_MM + ROW_HEIGHT_MM {
            self.break_page();
        }

        let cells = [
            row.company.as_str(),
            row.contact_name.as_str(),
            row.phone.as_str(),
            row.status.as_str(),
            row.lifecycle.as_str(),
            row.assigned_to.as_str(),
        ];

        let mut x = MARGIN_MM;
        for (cell, (_, width)) in cells.iter().zip(COLUMNS) {
            let budget = max_chars(*width - 2.0, BODY_FONT_PT);
            self.layer.use_text(
                clip(cell, budget),
                BODY_FONT_PT,
                Mm(x),
                Mm(self.cursor_mm),
                self.font,
            );
            x += width;
        }

        let updated = row.updated_at.format("%Y-%m-%d").to_string();
        self.layer
            .use_text(updated, BODY_FONT_PT, Mm(x), Mm(self.cursor_mm), self.font);

        self.cursor_mm -= ROW_HEIGHT_MM;
    }
}

/// Renders a lead table report with a title and subtitle line.
///
/// An empty `rows` slice still produces a valid single-page document with the
/// table header and a note.
pub fn render_lead_report(
    title: &str,
    subtitle: &str,
    rows: &[LeadReportRow],
) -> ReportResult<Vec<u8>> {
    let (doc, page, layer) =
        PdfDocument::new(title, Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "table");
    let font = doc.add_builtin_font(BuiltinFont::Helvetica)?;
    let font_bold = doc.add_builtin_font(BuiltinFont::HelveticaBold)?;
    let first_layer = doc.get_page(page).get_layer(layer);

    let mut cursor = PAGE_HEIGHT_MM - MARGIN_MM - 6.0;
    first_layer.use_text(title, TITLE_FONT_PT, Mm(MARGIN_MM), Mm(cursor), &font_bold);
    cursor -= 7.0;
    first_layer.use_text(subtitle, BODY_FONT_PT, Mm(MARGIN_MM), Mm(cursor), &font);
    cursor -= ROW_HEIGHT_MM * 1.5;

    let mut writer = TableWriter {
        doc: &doc,
        font: &font,
        font_bold: &font_bold,
        layer: first_layer,
        cursor_mm: cursor,
    };
    writer.header_row();

    if rows.is_empty() {
        writer.layer.use_text(
            "No leads in the selected range.",
            BODY_FONT_PT,
            Mm(MARGIN_MM),
            Mm(writer.cursor_mm),
            &font,
        );
    } else {
        for row in rows {
            writer.data_row(row);
        }
    }

    Ok(doc.save_to_bytes()?)
}

fn labeled_line(
    layer: &PdfLayerReference,
    font: &IndirectFontRef,
    font_bold: &IndirectFontRef,
    label: &str,
    value: &str,
    y: f32,
) {
    layer.use_text(label, BODY_FONT_PT, Mm(MARGIN_MM), Mm(y), font_bold);
    layer.use_text(value, BODY_FONT_PT, Mm(MARGIN_MM + 55.0), Mm(y), font);
}

/// Renders the bus-specification proposal sheet for a lead's enquiry.
pub fn render_enquiry_proposal(lead: &Lead, enquiry: &Enquiry) -> ReportResult<Vec<u8>> {
    let title = format!("Proposal {}", enquiry.reference);
    let (doc, page, layer) =
        PdfDocument::new(&title, Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "proposal");
    let font = doc.add_builtin_font(BuiltinFont::Helvetica)?;
    let font_bold = doc.add_builtin_font(BuiltinFont::HelveticaBold)?;
    let layer = doc.get_page(page).get_layer(layer);

    let mut y = PAGE_HEIGHT_MM - MARGIN_MM - 6.0;
    layer.use_text(
        "Bus Body Proposal",
        TITLE_FONT_PT,
        Mm(MARGIN_MM),
        Mm(y),
        &font_bold,
    );
    y -= 7.0;
    layer.use_text(
        format!("Reference: {}", enquiry.reference),
        BODY_FONT_PT,
        Mm(MARGIN_MM),
        Mm(y),
        &font,
    );
    y -= 12.0;

    let not_specified = || "Not specified".to_string();
    let yes_no = |flag: bool| if flag { "Yes" } else { "No" };

    let lines: Vec<(&str, String)> = vec![
        ("Customer", lead.company.clone()),
        ("Contact", lead.contact_name.clone()),
        ("Bus type", enquiry.bus_type.clone().unwrap_or_else(not_specified)),
        (
            "Seating capacity",
            enquiry
                .seating_capacity
                .map(|n| n.to_string())
                .unwrap_or_else(not_specified),
        ),
        (
            "Application",
            enquiry.application.clone().unwrap_or_else(not_specified),
        ),
        (
            "Chassis model",
            enquiry.chassis_model.clone().unwrap_or_else(not_specified),
        ),
        (
            "Body length",
            enquiry
                .body_length_mm
                .map(|n| format!("{n} mm"))
                .unwrap_or_else(not_specified),
        ),
        (
            "Body width",
            enquiry
                .body_width_mm
                .map(|n| format!("{n} mm"))
                .unwrap_or_else(not_specified),
        ),
        (
            "Seat type",
            enquiry.seat_type.clone().unwrap_or_else(not_specified),
        ),
        ("Air conditioning", yes_no(enquiry.air_conditioning).to_string()),
        ("Luggage carrier", yes_no(enquiry.luggage_carrier).to_string()),
        (
            "Special requirements",
            enquiry
                .special_requirements
                .clone()
                .unwrap_or_else(|| "None".to_string()),
        ),
    ];

    for (label, value) in lines {
        labeled_line(&layer, &font, &font_bold, label, &value, y);
        y -= ROW_HEIGHT_MM;
    }

    Ok(doc.save_to_bytes()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn sample_row(n: usize) -> LeadReportRow {
        LeadReportRow {
            company: format!("Company with quite a long name {n}"),
            contact_name: format!("Contact {n}"),
            phone: "+16502530000".to_string(),
            status: "Warm".to_string(),
            lifecycle: "Active".to_string(),
            assigned_to: "Asha".to_string(),
            updated_at: Utc::now().naive_utc(),
        }
    }

    #[test]
    fn clip_keeps_short_text_intact() {
        assert_eq!(clip("short", 10), "short");
        let clipped = clip("a very long cell value", 8);
        assert_eq!(clipped.chars().count(), 8);
        assert!(clipped.ends_with('\u{2026}'));
    }

    #[test]
    fn empty_report_is_a_valid_pdf() {
        let bytes = render_lead_report("Monthly Lead Report", "No data", &[]).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn long_report_spans_pages() {
        let rows: Vec<LeadReportRow> = (0..120).map(sample_row).collect();
        let bytes = render_lead_report("Monthly Lead Report", "120 leads", &rows).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
        // A 120-row table cannot fit one A4 page at 6.5mm per row.
        let text = String::from_utf8_lossy(&bytes);
        assert!(text.matches("/Type/Page").count() > 2);
    }
}
