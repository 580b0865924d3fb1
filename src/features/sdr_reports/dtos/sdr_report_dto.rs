use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::features::sdr_reports::models::SdrReport;
use crate::shared::validation::{
    validate_sdr_status, AIRCRAFT_REGISTRATION_REGEX, ATA_CHAPTER_REGEX,
};

fn default_status() -> String {
    "draft".to_string()
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateSdrReportDto {
    /// Operator-assigned number, unique across reports
    #[validate(length(min = 1, max = 50, message = "Report number must be 1-50 characters"))]
    pub report_number: String,

    #[validate(regex(path = *AIRCRAFT_REGISTRATION_REGEX, message = "Invalid aircraft registration"))]
    pub aircraft_registration: String,

    pub occurrence_date: NaiveDate,

    #[validate(regex(path = *ATA_CHAPTER_REGEX, message = "Invalid ATA chapter"))]
    pub ata_chapter: Option<String>,

    #[validate(length(min = 1, max = 100))]
    pub part_no: Option<String>,

    #[validate(length(min = 1, max = 5000, message = "Description is required"))]
    pub description: String,

    #[validate(length(max = 5000))]
    pub corrective_action: Option<String>,

    /// draft, submitted or closed
    #[serde(default = "default_status")]
    #[validate(custom(function = "validate_sdr_status"))]
    pub status: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateSdrReportDto {
    #[validate(length(min = 1, max = 50))]
    pub report_number: Option<String>,

    #[validate(regex(path = *AIRCRAFT_REGISTRATION_REGEX, message = "Invalid aircraft registration"))]
    pub aircraft_registration: Option<String>,

    pub occurrence_date: Option<NaiveDate>,

    #[validate(regex(path = *ATA_CHAPTER_REGEX, message = "Invalid ATA chapter"))]
    pub ata_chapter: Option<String>,

    #[validate(length(min = 1, max = 100))]
    pub part_no: Option<String>,

    #[validate(length(min = 1, max = 5000))]
    pub description: Option<String>,

    #[validate(length(max = 5000))]
    pub corrective_action: Option<String>,

    #[validate(custom(function = "validate_sdr_status"))]
    pub status: Option<String>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct SdrReportQueryParams {
    pub report_number: Option<String>,
    pub aircraft_registration: Option<String>,
    pub part_no: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SdrReportResponseDto {
    pub id: Uuid,
    pub report_number: String,
    pub aircraft_registration: String,
    pub occurrence_date: NaiveDate,
    pub ata_chapter: Option<String>,
    pub part_no: Option<String>,
    pub description: String,
    pub corrective_action: Option<String>,
    pub status: String,
    pub submitted_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<SdrReport> for SdrReportResponseDto {
    fn from(r: SdrReport) -> Self {
        Self {
            id: r.id,
            report_number: r.report_number,
            aircraft_registration: r.aircraft_registration,
            occurrence_date: r.occurrence_date,
            ata_chapter: r.ata_chapter,
            part_no: r.part_no,
            description: r.description,
            corrective_action: r.corrective_action,
            status: r.status,
            submitted_by: r.submitted_by,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_dto() -> CreateSdrReportDto {
        serde_json::from_value(serde_json::json!({
            "report_number": "SDR-2024-001",
            "aircraft_registration": "PK-LQJ",
            "occurrence_date": "2024-05-02",
            "ata_chapter": "32-41",
            "description": "Brake wear indicator flush on #2 wheel at transit check"
        }))
        .unwrap()
    }

    #[test]
    fn test_status_defaults_to_draft() {
        let dto = create_dto();
        assert_eq!(dto.status, "draft");
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn test_rejects_malformed_ata_chapter() {
        let mut dto = create_dto();
        dto.ata_chapter = Some("landing gear".to_string());
        let errors = dto.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("ata_chapter"));
    }

    #[test]
    fn test_rejects_unknown_status_on_update() {
        let dto = UpdateSdrReportDto {
            report_number: None,
            aircraft_registration: None,
            occurrence_date: None,
            ata_chapter: None,
            part_no: None,
            description: None,
            corrective_action: None,
            status: Some("archived".to_string()),
        };
        assert!(dto.validate().is_err());
    }
}
