use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::features::sms_reports::models::SmsReport;
use crate::shared::constants::{SMS_LIKELIHOODS, SMS_SEVERITIES};
use crate::shared::validation::{
    validate_sms_likelihood, validate_sms_severity, validate_sms_status,
};

fn default_status() -> String {
    "open".to_string()
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateSmsReportDto {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,

    #[validate(length(min = 1, max = 5000, message = "Hazard description is required"))]
    pub hazard_description: String,

    #[validate(length(max = 200))]
    pub location: Option<String>,

    /// negligible, minor, major, hazardous or catastrophic
    #[validate(custom(function = "validate_sms_severity"))]
    pub severity: String,

    /// extremely_improbable, improbable, remote, occasional or frequent
    #[validate(custom(function = "validate_sms_likelihood"))]
    pub likelihood: String,

    #[serde(default = "default_status")]
    #[validate(custom(function = "validate_sms_status"))]
    pub status: String,

    pub occurred_at: NaiveDate,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateSmsReportDto {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,

    #[validate(length(min = 1, max = 5000))]
    pub hazard_description: Option<String>,

    #[validate(length(max = 200))]
    pub location: Option<String>,

    #[validate(custom(function = "validate_sms_severity"))]
    pub severity: Option<String>,

    #[validate(custom(function = "validate_sms_likelihood"))]
    pub likelihood: Option<String>,

    #[validate(custom(function = "validate_sms_status"))]
    pub status: Option<String>,

    pub occurred_at: Option<NaiveDate>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct SmsReportQueryParams {
    pub title: Option<String>,
    pub severity: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SmsReportResponseDto {
    pub id: Uuid,
    pub title: String,
    pub hazard_description: String,
    pub location: Option<String>,
    pub severity: String,
    pub likelihood: String,
    /// Severity rank times likelihood rank, 1 (lowest) to 25 (highest)
    pub risk_score: Option<i32>,
    pub status: String,
    pub occurred_at: NaiveDate,
    pub reported_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 1-based position in an ordered scale
fn rank(scale: &[&str], value: &str) -> Option<i32> {
    scale
        .iter()
        .position(|v| *v == value)
        .map(|i| i as i32 + 1)
}

pub fn risk_score(severity: &str, likelihood: &str) -> Option<i32> {
    Some(rank(SMS_SEVERITIES, severity)? * rank(SMS_LIKELIHOODS, likelihood)?)
}

impl From<SmsReport> for SmsReportResponseDto {
    fn from(r: SmsReport) -> Self {
        Self {
            risk_score: risk_score(&r.severity, &r.likelihood),
            id: r.id,
            title: r.title,
            hazard_description: r.hazard_description,
            location: r.location,
            severity: r.severity,
            likelihood: r.likelihood,
            status: r.status,
            occurred_at: r.occurred_at,
            reported_by: r.reported_by,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_risk_score_spans_matrix() {
        assert_eq!(risk_score("negligible", "extremely_improbable"), Some(1));
        assert_eq!(risk_score("major", "remote"), Some(9));
        assert_eq!(risk_score("catastrophic", "frequent"), Some(25));
        assert_eq!(risk_score("severe", "frequent"), None);
    }

    #[test]
    fn test_create_defaults_status_open() {
        let dto: CreateSmsReportDto = serde_json::from_value(serde_json::json!({
            "title": "FOD on apron stand 4",
            "hazard_description": "Loose fasteners found near the nose gear of a parked aircraft",
            "severity": "major",
            "likelihood": "occasional",
            "occurred_at": "2024-06-11"
        }))
        .unwrap();

        assert_eq!(dto.status, "open");
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn test_update_rejects_unknown_likelihood() {
        let dto = UpdateSmsReportDto {
            likelihood: Some("often".to_string()),
            ..Default::default()
        };
        let errors = dto.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("likelihood"));
    }
}
