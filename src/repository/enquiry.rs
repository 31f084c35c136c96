//! Repository implementation for staged bus-specification enquiries.

use diesel::prelude::*;

use crate::domain::enquiry::{Enquiry, EnquiryStageData};
use crate::domain::types::EnquiryReference;
use crate::models::enquiry::{Enquiry as DbEnquiry, NewEnquiry as DbNewEnquiry, StageChangeset};
use crate::repository::errors::RepositoryResult;
use crate::repository::{DieselRepository, EnquiryReader, EnquiryWriter};

impl EnquiryReader for DieselRepository {
    fn get_enquiry_by_lead(&self, lead_id: i32) -> RepositoryResult<Option<Enquiry>> {
        use crate::schema::enquiries;

        let mut conn = self.conn()?;
        let enquiry = enquiries::table
            .filter(enquiries::lead_id.eq(lead_id))
            .first::<DbEnquiry>(&mut conn)
            .optional()?;

        Ok(enquiry.map(Into::into))
    }
}

impl EnquiryWriter for DieselRepository {
    fn save_enquiry_stage(
        &self,
        lead_id: i32,
        stage: &EnquiryStageData,
    ) -> RepositoryResult<Enquiry> {
        use crate::schema::enquiries;

        let mut conn = self.conn()?;
        let stage_number = stage.stage();

        let saved = conn.transaction::<DbEnquiry, diesel::result::Error, _>(|conn| {
            let existing = enquiries::table
                .filter(enquiries::lead_id.eq(lead_id))
                .first::<DbEnquiry>(conn)
                .optional()?;

            let enquiry_id = match existing {
                Some(enquiry) => {
                    if stage_number > enquiry.stage {
                        diesel::update(enquiries::table.find(enquiry.id))
                            .set(enquiries::stage.eq(stage_number))
                            .execute(conn)?;
                    }
                    enquiry.id
                }
                None => {
                    let reference = EnquiryReference::new().to_string();
                    let new_enquiry = DbNewEnquiry {
                        lead_id,
                        reference: &reference,
                        stage: stage_number,
                    };
                    diesel::insert_into(enquiries::table)
                        .values(&new_enquiry)
                        .get_result::<DbEnquiry>(conn)?
                        .id
                }
            };

            match StageChangeset::from(stage) {
                StageChangeset::Body(changeset) => {
                    diesel::update(enquiries::table.find(enquiry_id))
                        .set(&changeset)
                        .execute(conn)?;
                }
                StageChangeset::Chassis(changeset) => {
                    diesel::update(enquiries::table.find(enquiry_id))
                        .set(&changeset)
                        .execute(conn)?;
                }
                StageChangeset::FitOut(changeset) => {
                    diesel::update(enquiries::table.find(enquiry_id))
                        .set(&changeset)
                        .execute(conn)?;
                }
            }

            enquiries::table.find(enquiry_id).first::<DbEnquiry>(conn)
        })?;

        Ok(saved.into())
    }
}
