use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::features::incoming_inspections::models::IncomingInspection;
use crate::shared::validation::validate_inspection_result;

fn default_result() -> String {
    "pending".to_string()
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateIncomingInspectionDto {
    /// Stock record being inspected. Its part identity is copied onto the inspection.
    pub stock_inventory_id: Option<Uuid>,

    /// Required when `stock_inventory_id` is absent
    #[validate(length(min = 1, max = 100))]
    pub part_no: Option<String>,

    #[validate(length(min = 1, max = 100))]
    pub serial_no: Option<String>,

    #[validate(length(max = 500))]
    pub description: Option<String>,

    pub inspection_date: NaiveDate,

    #[validate(length(min = 1, max = 100, message = "Inspector must be 1-100 characters"))]
    pub inspector: String,

    /// pending, accepted or rejected
    #[serde(default = "default_result")]
    #[validate(custom(function = "validate_inspection_result"))]
    pub result: String,

    #[validate(length(max = 2000))]
    pub remarks: Option<String>,
}

/// Part identity fields only apply to inspections without a live stock link
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateIncomingInspectionDto {
    pub inspection_date: Option<NaiveDate>,

    #[validate(length(min = 1, max = 100))]
    pub inspector: Option<String>,

    #[validate(custom(function = "validate_inspection_result"))]
    pub result: Option<String>,

    #[validate(length(max = 2000))]
    pub remarks: Option<String>,

    #[validate(length(min = 1, max = 100))]
    pub part_no: Option<String>,

    #[validate(length(min = 1, max = 100))]
    pub serial_no: Option<String>,

    #[validate(length(max = 500))]
    pub description: Option<String>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct IncomingInspectionQueryParams {
    pub part_no: Option<String>,
    pub serial_no: Option<String>,
    pub inspector: Option<String>,
    pub result: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct IncomingInspectionResponseDto {
    pub id: Uuid,
    pub stock_inventory_id: Option<Uuid>,
    pub stock_inventory_deleted: bool,
    pub part_no: String,
    pub serial_no: Option<String>,
    pub description: Option<String>,
    pub inspection_date: NaiveDate,
    pub inspector: String,
    pub result: String,
    pub remarks: Option<String>,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<IncomingInspection> for IncomingInspectionResponseDto {
    fn from(i: IncomingInspection) -> Self {
        Self {
            id: i.id,
            stock_inventory_id: i.stock_inventory_id,
            stock_inventory_deleted: i.stock_inventory_deleted,
            part_no: i.part_no,
            serial_no: i.serial_no,
            description: i.description,
            inspection_date: i.inspection_date,
            inspector: i.inspector,
            result: i.result,
            remarks: i.remarks,
            created_by: i.created_by,
            created_at: i.created_at,
            updated_at: i.updated_at,
        }
    }
}
