use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Row of `stock_inventory`
#[derive(Debug, Clone, FromRow)]
pub struct StockItem {
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

/// Part identity copied onto inspections that reference a stock record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrphanSnapshot {
    pub stock_inventory_id: Uuid,
    pub part_no: String,
    pub serial_no: Option<String>,
    pub description: String,
}

impl From<&StockItem> for OrphanSnapshot {
    fn from(item: &StockItem) -> Self {
        Self {
            stock_inventory_id: item.id,
            part_no: item.part_no.clone(),
            serial_no: item.serial_no.clone(),
            description: item.description.clone(),
        }
    }
}
