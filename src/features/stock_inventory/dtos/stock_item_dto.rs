use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::features::stock_inventory::models::StockItem;
use crate::shared::validation::validate_stock_status;

fn default_unit() -> String {
    "ea".to_string()
}

fn default_status() -> String {
    "serviceable".to_string()
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateStockItemDto {
    #[validate(length(min = 1, max = 100, message = "Part number must be 1-100 characters"))]
    pub part_no: String,

    #[validate(length(min = 1, max = 100))]
    pub serial_no: Option<String>,

    #[validate(length(min = 1, max = 500, message = "Description must be 1-500 characters"))]
    pub description: String,

    #[validate(range(min = 0, message = "Quantity must not be negative"))]
    pub quantity: i32,

    #[serde(default = "default_unit")]
    #[validate(length(min = 1, max = 20))]
    pub unit: String,

    #[validate(length(max = 100))]
    pub location: Option<String>,

    /// serviceable, unserviceable, quarantine or scrapped
    #[serde(default = "default_status")]
    #[validate(custom(function = "validate_stock_status"))]
    pub status: String,

    pub received_date: Option<NaiveDate>,

    #[validate(length(max = 2000))]
    pub remarks: Option<String>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateStockItemDto {
    #[validate(length(min = 1, max = 100))]
    pub part_no: Option<String>,

    #[validate(length(min = 1, max = 100))]
    pub serial_no: Option<String>,

    #[validate(length(min = 1, max = 500))]
    pub description: Option<String>,

    #[validate(range(min = 0))]
    pub quantity: Option<i32>,

    #[validate(length(min = 1, max = 20))]
    pub unit: Option<String>,

    #[validate(length(max = 100))]
    pub location: Option<String>,

    #[validate(custom(function = "validate_stock_status"))]
    pub status: Option<String>,

    pub received_date: Option<NaiveDate>,

    #[validate(length(max = 2000))]
    pub remarks: Option<String>,
}

impl UpdateStockItemDto {
    /// Whether the update changes fields mirrored onto linked inspections
    pub fn touches_part_identity(&self) -> bool {
        self.part_no.is_some() || self.serial_no.is_some() || self.description.is_some()
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct StockItemQueryParams {
    pub part_no: Option<String>,
    pub serial_no: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StockItemResponseDto {
    pub id: Uuid,
    pub part_no: String,
    pub serial_no: Option<String>,
    pub description: String,
    pub quantity: i32,
    pub unit: String,
    pub location: Option<String>,
    pub status: String,
    pub received_date: Option<NaiveDate>,
    pub remarks: Option<String>,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<StockItem> for StockItemResponseDto {
    fn from(s: StockItem) -> Self {
        Self {
            id: s.id,
            part_no: s.part_no,
            serial_no: s.serial_no,
            description: s.description,
            quantity: s.quantity,
            unit: s.unit,
            location: s.location,
            status: s.status,
            received_date: s.received_date,
            remarks: s.remarks,
            created_by: s.created_by,
            created_at: s.created_at,
            updated_at: s.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_defaults_and_status_check() {
        let dto: CreateStockItemDto = serde_json::from_value(serde_json::json!({
            "part_no": "065-50000-0101",
            "description": "Starter generator",
            "quantity": 2
        }))
        .unwrap();
        assert_eq!(dto.unit, "ea");
        assert_eq!(dto.status, "serviceable");
        assert!(dto.validate().is_ok());

        let dto: CreateStockItemDto = serde_json::from_value(serde_json::json!({
            "part_no": "065-50000-0101",
            "description": "Starter generator",
            "quantity": 2,
            "status": "lost"
        }))
        .unwrap();
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_touches_part_identity() {
        let quantity_only = UpdateStockItemDto {
            quantity: Some(3),
            ..Default::default()
        };
        assert!(!quantity_only.touches_part_identity());

        let renamed = UpdateStockItemDto {
            description: Some("Starter generator, overhauled".to_string()),
            ..Default::default()
        };
        assert!(renamed.touches_part_identity());
    }
}
