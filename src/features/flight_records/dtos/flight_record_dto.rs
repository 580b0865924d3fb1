use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::features::flight_records::models::FlightRecord;
use crate::shared::validation::{
    validate_non_negative, AIRCRAFT_REGISTRATION_REGEX, AIRPORT_CODE_REGEX,
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateFlightRecordDto {
    pub flight_date: NaiveDate,

    #[validate(regex(path = *AIRCRAFT_REGISTRATION_REGEX, message = "Invalid aircraft registration"))]
    pub aircraft_registration: String,

    #[validate(length(min = 1, max = 20, message = "Flight number must be 1-20 characters"))]
    pub flight_number: String,

    #[validate(length(min = 1, max = 100, message = "Pilot name must be 1-100 characters"))]
    pub pilot_name: String,

    #[validate(regex(path = *AIRPORT_CODE_REGEX, message = "Invalid origin airport code"))]
    pub origin: String,

    #[validate(regex(path = *AIRPORT_CODE_REGEX, message = "Invalid destination airport code"))]
    pub destination: String,

    #[validate(custom(function = "validate_non_negative"))]
    #[schema(value_type = String, example = "1.75")]
    pub block_hours: Decimal,

    #[validate(range(min = 0, message = "Cycles must not be negative"))]
    pub cycles: i32,

    #[validate(length(max = 2000))]
    pub remarks: Option<String>,
}

impl CreateFlightRecordDto {
    /// Uppercase the registration and airport codes before validation
    pub fn normalized(mut self) -> Self {
        self.aircraft_registration = self.aircraft_registration.trim().to_uppercase();
        self.origin = self.origin.trim().to_uppercase();
        self.destination = self.destination.trim().to_uppercase();
        self
    }
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateFlightRecordDto {
    pub flight_date: Option<NaiveDate>,

    #[validate(regex(path = *AIRCRAFT_REGISTRATION_REGEX, message = "Invalid aircraft registration"))]
    pub aircraft_registration: Option<String>,

    #[validate(length(min = 1, max = 20))]
    pub flight_number: Option<String>,

    #[validate(length(min = 1, max = 100))]
    pub pilot_name: Option<String>,

    #[validate(regex(path = *AIRPORT_CODE_REGEX, message = "Invalid origin airport code"))]
    pub origin: Option<String>,

    #[validate(regex(path = *AIRPORT_CODE_REGEX, message = "Invalid destination airport code"))]
    pub destination: Option<String>,

    #[validate(custom(function = "validate_non_negative"))]
    #[schema(value_type = Option<String>)]
    pub block_hours: Option<Decimal>,

    #[validate(range(min = 0))]
    pub cycles: Option<i32>,

    #[validate(length(max = 2000))]
    pub remarks: Option<String>,
}

impl UpdateFlightRecordDto {
    pub fn normalized(mut self) -> Self {
        let upper = |v: Option<String>| v.map(|s| s.trim().to_uppercase());
        self.aircraft_registration = upper(self.aircraft_registration);
        self.origin = upper(self.origin);
        self.destination = upper(self.destination);
        self
    }
}

/// Case-insensitive substring filters
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct FlightRecordQueryParams {
    pub aircraft_registration: Option<String>,
    pub flight_number: Option<String>,
    pub pilot_name: Option<String>,
    pub origin: Option<String>,
    pub destination: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct FlightRecordResponseDto {
    pub id: Uuid,
    pub flight_date: NaiveDate,
    pub aircraft_registration: String,
    pub flight_number: String,
    pub pilot_name: String,
    pub origin: String,
    pub destination: String,
    #[schema(value_type = String)]
    pub block_hours: Decimal,
    pub cycles: i32,
    pub remarks: Option<String>,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<FlightRecord> for FlightRecordResponseDto {
    fn from(r: FlightRecord) -> Self {
        Self {
            id: r.id,
            flight_date: r.flight_date,
            aircraft_registration: r.aircraft_registration,
            flight_number: r.flight_number,
            pilot_name: r.pilot_name,
            origin: r.origin,
            destination: r.destination,
            block_hours: r.block_hours,
            cycles: r.cycles,
            remarks: r.remarks,
            created_by: r.created_by,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_dto() -> CreateFlightRecordDto {
        CreateFlightRecordDto {
            flight_date: NaiveDate::from_ymd_opt(2024, 5, 2).unwrap(),
            aircraft_registration: " pk-gma ".to_string(),
            flight_number: "GA404".to_string(),
            pilot_name: "R. Hartono".to_string(),
            origin: "cgk".to_string(),
            destination: "dps".to_string(),
            block_hours: Decimal::new(175, 2),
            cycles: 1,
            remarks: None,
        }
    }

    #[test]
    fn test_normalized_dto_passes_validation() {
        let dto = create_dto();
        assert!(dto.validate().is_err());

        let dto = create_dto().normalized();
        assert_eq!(dto.aircraft_registration, "PK-GMA");
        assert_eq!(dto.origin, "CGK");
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn test_negative_block_hours_rejected() {
        let mut dto = create_dto().normalized();
        dto.block_hours = Decimal::new(-5, 1);
        let errors = dto.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("block_hours"));
    }
}
