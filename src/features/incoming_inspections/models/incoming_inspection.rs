use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use crate::core::error::AppError;
use crate::features::stock_inventory::models::OrphanSnapshot;

#[derive(Debug, Clone, FromRow)]
pub struct IncomingInspection {
    pub id: Uuid,
    pub stock_inventory_id: Option<Uuid>,
    /// Set once the referenced stock record has been deleted
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

/// Part identity stored on an inspection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartIdentity {
    pub part_no: String,
    pub serial_no: Option<String>,
    pub description: Option<String>,
}

impl PartIdentity {
    /// Identity for a new inspection. A linked stock record wins over the
    /// values supplied by the client.
    pub fn resolve(
        stock: Option<&OrphanSnapshot>,
        part_no: Option<&str>,
        serial_no: Option<&str>,
        description: Option<&str>,
    ) -> Result<Self, AppError> {
        if let Some(stock) = stock {
            return Ok(Self {
                part_no: stock.part_no.clone(),
                serial_no: stock.serial_no.clone(),
                description: Some(stock.description.clone()),
            });
        }

        let part_no = part_no
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .ok_or_else(|| {
                AppError::Validation(
                    "part_no is required when no stock record is referenced".to_string(),
                )
            })?;

        Ok(Self {
            part_no: part_no.to_string(),
            serial_no: serial_no.map(str::to_string),
            description: description.map(str::to_string),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stock() -> OrphanSnapshot {
        OrphanSnapshot {
            stock_inventory_id: Uuid::from_u128(7),
            part_no: "2117-04".to_string(),
            serial_no: Some("SN-88".to_string()),
            description: "Fuel pump".to_string(),
        }
    }

    #[test]
    fn test_stock_record_overrides_client_values() {
        let identity =
            PartIdentity::resolve(Some(&stock()), Some("WRONG"), None, Some("other")).unwrap();
        assert_eq!(identity.part_no, "2117-04");
        assert_eq!(identity.serial_no.as_deref(), Some("SN-88"));
        assert_eq!(identity.description.as_deref(), Some("Fuel pump"));
    }

    #[test]
    fn test_standalone_inspection_needs_part_no() {
        assert!(matches!(
            PartIdentity::resolve(None, Some("  "), None, None),
            Err(AppError::Validation(_))
        ));

        let identity = PartIdentity::resolve(None, Some(" 3214-A "), Some("S1"), None).unwrap();
        assert_eq!(identity.part_no, "3214-A");
        assert_eq!(identity.serial_no.as_deref(), Some("S1"));
    }
}
