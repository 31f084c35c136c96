use serde::Deserialize;
use validator::Validate;

use crate::domain::enquiry::EnquiryStageData;

/// Checkbox fields arrive as `"on"` when ticked and are absent otherwise.
fn checkbox(value: &Option<String>) -> bool {
    value.is_some()
}

#[derive(Deserialize, Validate)]
/// Stage 1 of the questionnaire: what the customer wants to run.
pub struct EnquiryBodyForm {
    pub lead_id: i32,
    #[validate(length(min = 1))]
    pub bus_type: String,
    #[validate(range(min = 1, max = 120))]
    pub seating_capacity: i32,
    pub application: Option<String>,
}

impl From<&EnquiryBodyForm> for EnquiryStageData {
    fn from(form: &EnquiryBodyForm) -> Self {
        EnquiryStageData::Body {
            bus_type: form.bus_type.trim().to_string(),
            seating_capacity: form.seating_capacity,
            application: form
                .application
                .clone()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
        }
    }
}

#[derive(Deserialize, Validate)]
/// Stage 2: chassis and body dimensions.
pub struct EnquiryChassisForm {
    pub lead_id: i32,
    #[validate(length(min = 1))]
    pub chassis_model: String,
    #[validate(range(min = 4000, max = 18000))]
    #[serde(default, deserialize_with = "crate::forms::empty_string_as_none_i32")]
    pub body_length_mm: Option<i32>,
    #[validate(range(min = 1800, max = 2800))]
    #[serde(default, deserialize_with = "crate::forms::empty_string_as_none_i32")]
    pub body_width_mm: Option<i32>,
}

impl From<&EnquiryChassisForm> for EnquiryStageData {
    fn from(form: &EnquiryChassisForm) -> Self {
        EnquiryStageData::Chassis {
            chassis_model: form.chassis_model.trim().to_string(),
            body_length_mm: form.body_length_mm,
            body_width_mm: form.body_width_mm,
        }
    }
}

#[derive(Deserialize, Validate)]
/// Stage 3: interior fit-out.
pub struct EnquiryFitOutForm {
    pub lead_id: i32,
    pub seat_type: Option<String>,
    pub air_conditioning: Option<String>,
    pub luggage_carrier: Option<String>,
    pub special_requirements: Option<String>,
}

impl From<&EnquiryFitOutForm> for EnquiryStageData {
    fn from(form: &EnquiryFitOutForm) -> Self {
        EnquiryStageData::FitOut {
            seat_type: form
                .seat_type
                .clone()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
            air_conditioning: checkbox(&form.air_conditioning),
            luggage_carrier: checkbox(&form.luggage_carrier),
            special_requirements: form
                .special_requirements
                .clone()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fitout_checkboxes_map_to_bools() {
        let form = EnquiryFitOutForm {
            lead_id: 1,
            seat_type: Some(" 2x2 semi-sleeper ".to_string()),
            air_conditioning: Some("on".to_string()),
            luggage_carrier: None,
            special_requirements: Some("  ".to_string()),
        };
        let stage = EnquiryStageData::from(&form);
        match stage {
            EnquiryStageData::FitOut {
                seat_type,
                air_conditioning,
                luggage_carrier,
                special_requirements,
            } => {
                assert_eq!(seat_type.as_deref(), Some("2x2 semi-sleeper"));
                assert!(air_conditioning);
                assert!(!luggage_carrier);
                assert!(special_requirements.is_none());
            }
            _ => panic!("expected fit-out stage"),
        }
    }

    #[test]
    fn body_form_maps_to_stage_one() {
        let form = EnquiryBodyForm {
            lead_id: 1,
            bus_type: "Intercity coach".to_string(),
            seating_capacity: 49,
            application: None,
        };
        let stage = EnquiryStageData::from(&form);
        assert_eq!(stage.stage(), 1);
    }
}
