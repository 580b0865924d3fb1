use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::features::technician_training::models::TechnicianTraining;

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[validate(schema(function = "validate_create_dates"))]
pub struct CreateTrainingDto {
    #[validate(length(min = 1, max = 100, message = "Technician name must be 1-100 characters"))]
    pub technician_name: String,

    #[validate(length(min = 1, max = 200, message = "Course name must be 1-200 characters"))]
    pub course_name: String,

    #[validate(length(max = 200))]
    pub provider: Option<String>,

    pub completion_date: NaiveDate,

    /// Omit for courses that do not lapse
    pub expiry_date: Option<NaiveDate>,

    #[validate(length(max = 100))]
    pub certificate_no: Option<String>,

    #[validate(length(max = 2000))]
    pub remarks: Option<String>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[validate(schema(function = "validate_update_dates"))]
pub struct UpdateTrainingDto {
    #[validate(length(min = 1, max = 100))]
    pub technician_name: Option<String>,

    #[validate(length(min = 1, max = 200))]
    pub course_name: Option<String>,

    #[validate(length(max = 200))]
    pub provider: Option<String>,

    pub completion_date: Option<NaiveDate>,

    pub expiry_date: Option<NaiveDate>,

    #[validate(length(max = 100))]
    pub certificate_no: Option<String>,

    #[validate(length(max = 2000))]
    pub remarks: Option<String>,
}

fn expiry_before_completion() -> ValidationError {
    let mut error = ValidationError::new("expiry_before_completion");
    error.message = Some("Expiry date cannot be before completion date".into());
    error
}

fn validate_create_dates(dto: &CreateTrainingDto) -> Result<(), ValidationError> {
    match dto.expiry_date {
        Some(expiry) if expiry < dto.completion_date => Err(expiry_before_completion()),
        _ => Ok(()),
    }
}

// Only checkable when both dates arrive together; the service re-checks the merged row.
fn validate_update_dates(dto: &UpdateTrainingDto) -> Result<(), ValidationError> {
    match (dto.completion_date, dto.expiry_date) {
        (Some(completion), Some(expiry)) if expiry < completion => Err(expiry_before_completion()),
        _ => Ok(()),
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct TrainingQueryParams {
    pub technician_name: Option<String>,
    pub course_name: Option<String>,
    pub certificate_no: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TrainingResponseDto {
    pub id: Uuid,
    pub technician_name: String,
    pub course_name: String,
    pub provider: Option<String>,
    pub completion_date: NaiveDate,
    pub expiry_date: Option<NaiveDate>,
    pub certificate_no: Option<String>,
    pub remarks: Option<String>,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<TechnicianTraining> for TrainingResponseDto {
    fn from(t: TechnicianTraining) -> Self {
        Self {
            id: t.id,
            technician_name: t.technician_name,
            course_name: t.course_name,
            provider: t.provider,
            completion_date: t.completion_date,
            expiry_date: t.expiry_date,
            certificate_no: t.certificate_no,
            remarks: t.remarks,
            created_by: t.created_by,
            created_at: t.created_at,
            updated_at: t.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fake::faker::name::en::Name;
    use fake::Fake;

    fn create_dto(completion: &str, expiry: Option<&str>) -> CreateTrainingDto {
        CreateTrainingDto {
            technician_name: Name().fake(),
            course_name: "Human Factors Recurrent".to_string(),
            provider: None,
            completion_date: completion.parse().unwrap(),
            expiry_date: expiry.map(|e| e.parse().unwrap()),
            certificate_no: Some("HF-0421".to_string()),
            remarks: None,
        }
    }

    #[test]
    fn test_create_accepts_open_ended_course() {
        assert!(create_dto("2024-01-15", None).validate().is_ok());
        assert!(create_dto("2024-01-15", Some("2024-01-15")).validate().is_ok());
    }

    #[test]
    fn test_create_rejects_expiry_before_completion() {
        let result = create_dto("2024-01-15", Some("2023-12-31")).validate();
        assert!(result.is_err());
    }

    #[test]
    fn test_update_checks_dates_only_when_both_present() {
        let partial = UpdateTrainingDto {
            expiry_date: Some("2020-01-01".parse().unwrap()),
            ..Default::default()
        };
        assert!(partial.validate().is_ok());

        let both = UpdateTrainingDto {
            completion_date: Some("2024-03-01".parse().unwrap()),
            expiry_date: Some("2024-02-01".parse().unwrap()),
            ..Default::default()
        };
        assert!(both.validate().is_err());
    }
}
