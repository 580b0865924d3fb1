use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::features::airports::models::Airport;
use crate::shared::validation::AIRPORT_CODE_REGEX;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateAirportDto {
    /// IATA or ICAO code, stored uppercase
    #[validate(regex(path = *AIRPORT_CODE_REGEX, message = "Airport code must be 3-4 uppercase letters or digits"))]
    #[schema(example = "WADD")]
    pub code: String,

    #[validate(length(min = 1, max = 150, message = "Name must be 1-150 characters"))]
    pub name: String,

    #[validate(length(max = 100))]
    pub city: Option<String>,

    #[validate(length(max = 100))]
    pub country: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateAirportDto {
    #[validate(regex(path = *AIRPORT_CODE_REGEX, message = "Airport code must be 3-4 uppercase letters or digits"))]
    pub code: Option<String>,

    #[validate(length(min = 1, max = 150))]
    pub name: Option<String>,

    #[validate(length(max = 100))]
    pub city: Option<String>,

    #[validate(length(max = 100))]
    pub country: Option<String>,
}

pub fn normalize_code(code: &str) -> String {
    code.trim().to_uppercase()
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct AirportQueryParams {
    pub code: Option<String>,
    pub name: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AirportResponseDto {
    pub id: Uuid,
    pub code: String,
    pub name: String,
    pub city: Option<String>,
    pub country: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Airport> for AirportResponseDto {
    fn from(a: Airport) -> Self {
        Self {
            id: a.id,
            code: a.code,
            name: a.name,
            city: a.city,
            country: a.country,
            created_at: a.created_at,
            updated_at: a.updated_at,
        }
    }
}
