use actix_multipart::form::{MultipartForm, tempfile::TempFile};
use serde::Deserialize;
use validator::Validate;

use crate::domain::lead::{LeadStatus, NewLead};

#[derive(Deserialize, Validate)]
/// Form data for registering a new lead.
pub struct AddLeadForm {
    #[validate(length(min = 1))]
    pub company: String,
    #[validate(length(min = 1))]
    pub contact_name: String,
    #[validate(email)]
    #[serde(default, deserialize_with = "crate::forms::empty_string_as_none")]
    pub email: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub source: Option<String>,
    pub status: String,
    /// Assign to this user right away; admins may pick someone else.
    pub user_id: Option<i32>,
}

impl From<AddLeadForm> for NewLead {
    fn from(form: AddLeadForm) -> Self {
        NewLead::new(
            form.user_id,
            form.company,
            form.contact_name,
            form.email,
            form.phone,
            form.location,
            form.source,
            LeadStatus::from(form.status.as_str()),
        )
    }
}

#[derive(MultipartForm)]
pub struct UploadLeadsForm {
    #[multipart(limit = "10MB")]
    pub csv: TempFile,
}

#[derive(Debug, Deserialize)]
struct LeadCsvRecord {
    company: String,
    contact_name: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    phone: Option<String>,
    #[serde(default)]
    location: Option<String>,
    #[serde(default)]
    source: Option<String>,
    #[serde(default)]
    status: Option<String>,
}

impl UploadLeadsForm {
    /// Parses the uploaded CSV into lead payloads assigned to `user_id`.
    ///
    /// Rows without a company name are skipped; contact fields go through the
    /// same normalization as the single-lead form.
    pub fn parse(&self, user_id: Option<i32>) -> Result<Vec<NewLead>, csv::Error> {
        let mut reader = csv::Reader::from_path(self.csv.file.path())?;
        let mut leads = Vec::new();

        for result in reader.deserialize::<LeadCsvRecord>() {
            let record = result?;
            if record.company.trim().is_empty() {
                continue;
            }

            leads.push(NewLead::new(
                user_id,
                record.company,
                record.contact_name,
                record.email,
                record.phone,
                record.location,
                record.source,
                record
                    .status
                    .as_deref()
                    .map(LeadStatus::from)
                    .unwrap_or(LeadStatus::Cold),
            ));
        }

        Ok(leads)
    }
}
