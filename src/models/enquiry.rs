use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::enquiry::{Enquiry as DomainEnquiry, EnquiryStageData};
use crate::models::lead::Lead;

#[derive(Debug, Clone, Identifiable, Queryable, Associations)]
#[diesel(belongs_to(Lead, foreign_key = lead_id))]
#[diesel(table_name = crate::schema::enquiries)]
/// Diesel model for [`crate::domain::enquiry::Enquiry`].
pub struct Enquiry {
    pub id: i32,
    pub lead_id: i32,
    pub reference: String,
    pub stage: i32,
    pub bus_type: Option<String>,
    pub seating_capacity: Option<i32>,
    pub chassis_model: Option<String>,
    pub body_length_mm: Option<i32>,
    pub body_width_mm: Option<i32>,
    pub seat_type: Option<String>,
    pub air_conditioning: bool,
    pub luggage_carrier: bool,
    pub application: Option<String>,
    pub special_requirements: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::enquiries)]
/// Row created the first time any stage of a lead's enquiry is saved.
pub struct NewEnquiry<'a> {
    pub lead_id: i32,
    pub reference: &'a str,
    pub stage: i32,
}

/// Per-stage changesets. Only the columns belonging to the saved stage are
/// touched, so earlier answers survive later saves.
#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::enquiries)]
pub struct BodyStageChangeset<'a> {
    pub bus_type: &'a str,
    pub seating_capacity: i32,
    pub application: Option<&'a str>,
    pub updated_at: NaiveDateTime,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::enquiries)]
pub struct ChassisStageChangeset<'a> {
    pub chassis_model: &'a str,
    pub body_length_mm: Option<i32>,
    pub body_width_mm: Option<i32>,
    pub updated_at: NaiveDateTime,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::enquiries)]
pub struct FitOutStageChangeset<'a> {
    pub seat_type: Option<&'a str>,
    pub air_conditioning: bool,
    pub luggage_carrier: bool,
    pub special_requirements: Option<&'a str>,
    pub updated_at: NaiveDateTime,
}

/// View over [`EnquiryStageData`] borrowed as a Diesel changeset.
pub enum StageChangeset<'a> {
    Body(BodyStageChangeset<'a>),
    Chassis(ChassisStageChangeset<'a>),
    FitOut(FitOutStageChangeset<'a>),
}

impl<'a> From<&'a EnquiryStageData> for StageChangeset<'a> {
    fn from(stage: &'a EnquiryStageData) -> Self {
        let updated_at = chrono::Utc::now().naive_utc();
        match stage {
            EnquiryStageData::Body {
                bus_type,
                seating_capacity,
                application,
            } => StageChangeset::Body(BodyStageChangeset {
                bus_type: bus_type.as_str(),
                seating_capacity: *seating_capacity,
                application: application.as_deref(),
                updated_at,
            }),
            EnquiryStageData::Chassis {
                chassis_model,
                body_length_mm,
                body_width_mm,
            } => StageChangeset::Chassis(ChassisStageChangeset {
                chassis_model: chassis_model.as_str(),
                body_length_mm: *body_length_mm,
                body_width_mm: *body_width_mm,
                updated_at,
            }),
            EnquiryStageData::FitOut {
                seat_type,
                air_conditioning,
                luggage_carrier,
                special_requirements,
            } => StageChangeset::FitOut(FitOutStageChangeset {
                seat_type: seat_type.as_deref(),
                air_conditioning: *air_conditioning,
                luggage_carrier: *luggage_carrier,
                special_requirements: special_requirements.as_deref(),
                updated_at,
            }),
        }
    }
}

impl From<Enquiry> for DomainEnquiry {
    fn from(enquiry: Enquiry) -> Self {
        Self {
            id: enquiry.id,
            lead_id: enquiry.lead_id,
            reference: enquiry.reference,
            stage: enquiry.stage,
            bus_type: enquiry.bus_type,
            seating_capacity: enquiry.seating_capacity,
            chassis_model: enquiry.chassis_model,
            body_length_mm: enquiry.body_length_mm,
            body_width_mm: enquiry.body_width_mm,
            seat_type: enquiry.seat_type,
            air_conditioning: enquiry.air_conditioning,
            luggage_carrier: enquiry.luggage_carrier,
            application: enquiry.application,
            special_requirements: enquiry.special_requirements,
            created_at: enquiry.created_at,
            updated_at: enquiry.updated_at,
        }
    }
}
