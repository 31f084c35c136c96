use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Bus-specification record linked to a lead, filled in over three stages.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Enquiry {
    pub id: i32,
    pub lead_id: i32,
    /// Reference printed on the proposal PDF.
    pub reference: String,
    /// Highest stage saved so far (1..=3).
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

/// One saved stage of the enquiry questionnaire.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub enum EnquiryStageData {
    /// Stage 1: what the customer wants to run.
    Body {
        bus_type: String,
        seating_capacity: i32,
        application: Option<String>,
    },
    /// Stage 2: chassis and body dimensions.
    Chassis {
        chassis_model: String,
        body_length_mm: Option<i32>,
        body_width_mm: Option<i32>,
    },
    /// Stage 3: interior fit-out.
    FitOut {
        seat_type: Option<String>,
        air_conditioning: bool,
        luggage_carrier: bool,
        special_requirements: Option<String>,
    },
}

impl EnquiryStageData {
    /// Stage number this payload belongs to.
    pub fn stage(&self) -> i32 {
        match self {
            EnquiryStageData::Body { .. } => 1,
            EnquiryStageData::Chassis { .. } => 2,
            EnquiryStageData::FitOut { .. } => 3,
        }
    }
}

pub const ENQUIRY_FINAL_STAGE: i32 = 3;

impl Enquiry {
    /// An enquiry can be turned into a proposal once every stage is saved.
    pub fn is_complete(&self) -> bool {
        self.stage >= ENQUIRY_FINAL_STAGE
    }
}
