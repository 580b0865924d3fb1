use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow)]
pub struct FlightRecord {
    pub id: Uuid,
    pub flight_date: NaiveDate,
    pub aircraft_registration: String,
    pub flight_number: String,
    pub pilot_name: String,
    pub origin: String,
    pub destination: String,
    pub block_hours: Decimal,
    pub cycles: i32,
    pub remarks: Option<String>,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
