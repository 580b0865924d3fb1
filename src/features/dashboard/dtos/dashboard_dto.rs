use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// Row counts per record family
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, FromRow)]
pub struct RecordTotalsDto {
    pub flight_records: i64,
    pub airports: i64,
    pub stock_items: i64,
    pub incoming_inspections: i64,
    pub sdr_reports: i64,
    pub sms_reports: i64,
    pub technician_trainings: i64,
    pub document_files: i64,
    pub technical_queries: i64,
    /// Trainings whose expiry date has already passed
    pub expired_trainings: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema, FromRow)]
pub struct GroupCountDto {
    pub key: String,
    pub count: i64,
}

/// Flight activity per aircraft
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, FromRow)]
pub struct AircraftUtilizationDto {
    pub aircraft_registration: String,
    pub flights: i64,
    pub block_hours: Decimal,
    pub cycles: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, FromRow)]
pub struct ExpiringTrainingDto {
    pub id: Uuid,
    pub technician_name: String,
    pub course_name: String,
    pub expiry_date: NaiveDate,
    pub days_left: i32,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DashboardSummaryDto {
    pub totals: RecordTotalsDto,
    pub stock_by_status: Vec<GroupCountDto>,
    pub inspections_by_result: Vec<GroupCountDto>,
    pub sdr_by_status: Vec<GroupCountDto>,
    pub sms_by_severity: Vec<GroupCountDto>,
    pub utilization_by_aircraft: Vec<AircraftUtilizationDto>,
    pub expiring_trainings: Vec<ExpiringTrainingDto>,
    /// Look-ahead used for `expiring_trainings`
    pub expiry_window_days: i64,
}
