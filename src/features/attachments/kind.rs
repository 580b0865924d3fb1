use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::shared::constants::{
    ENTITY_FLIGHT_RECORD, ENTITY_INCOMING_INSPECTION, ENTITY_SDR_REPORT, ENTITY_SMS_REPORT,
    ENTITY_STOCK_INVENTORY, ENTITY_TECHNICIAN_TRAINING,
};

/// Record family an attachment belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum AttachmentKind {
    FlightRecords,
    StockInventory,
    IncomingInspections,
    SdrReports,
    SmsReports,
    TechnicianTrainings,
}

impl AttachmentKind {
    pub const ALL: [AttachmentKind; 6] = [
        AttachmentKind::FlightRecords,
        AttachmentKind::StockInventory,
        AttachmentKind::IncomingInspections,
        AttachmentKind::SdrReports,
        AttachmentKind::SmsReports,
        AttachmentKind::TechnicianTrainings,
    ];

    /// URL segment and storage namespace
    pub fn slug(self) -> &'static str {
        match self {
            AttachmentKind::FlightRecords => "flight-records",
            AttachmentKind::StockInventory => "stock-inventory",
            AttachmentKind::IncomingInspections => "incoming-inspections",
            AttachmentKind::SdrReports => "sdr-reports",
            AttachmentKind::SmsReports => "sms-reports",
            AttachmentKind::TechnicianTrainings => "technician-trainings",
        }
    }

    pub fn parent_table(self) -> &'static str {
        match self {
            AttachmentKind::FlightRecords => "flight_records",
            AttachmentKind::StockInventory => "stock_inventory",
            AttachmentKind::IncomingInspections => "incoming_inspections",
            AttachmentKind::SdrReports => "sdr_reports",
            AttachmentKind::SmsReports => "sms_reports",
            AttachmentKind::TechnicianTrainings => "technician_trainings",
        }
    }

    pub fn attachment_table(self) -> &'static str {
        match self {
            AttachmentKind::FlightRecords => "flight_record_attachments",
            AttachmentKind::StockInventory => "stock_inventory_attachments",
            AttachmentKind::IncomingInspections => "incoming_inspection_attachments",
            AttachmentKind::SdrReports => "sdr_report_attachments",
            AttachmentKind::SmsReports => "sms_report_attachments",
            AttachmentKind::TechnicianTrainings => "technician_training_attachments",
        }
    }

    /// Entity type recorded in the activity log for the owning record
    pub fn entity_type(self) -> &'static str {
        match self {
            AttachmentKind::FlightRecords => ENTITY_FLIGHT_RECORD,
            AttachmentKind::StockInventory => ENTITY_STOCK_INVENTORY,
            AttachmentKind::IncomingInspections => ENTITY_INCOMING_INSPECTION,
            AttachmentKind::SdrReports => ENTITY_SDR_REPORT,
            AttachmentKind::SmsReports => ENTITY_SMS_REPORT,
            AttachmentKind::TechnicianTrainings => ENTITY_TECHNICIAN_TRAINING,
        }
    }

    /// Storage key for a new object owned by `owner_id`
    pub fn object_key(self, owner_id: Uuid, object_id: Uuid, extension: &str) -> String {
        format!("{}/{}/{}.{}", self.slug(), owner_id, object_id, extension)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug_matches_serde_name() {
        for kind in AttachmentKind::ALL {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.slug()));
            let parsed: AttachmentKind = serde_json::from_str(&json).unwrap();
            assert_eq!(parsed, kind);
        }
    }

    #[test]
    fn test_unknown_kind_rejected() {
        assert!(serde_json::from_str::<AttachmentKind>("\"work-orders\"").is_err());
    }

    #[test]
    fn test_object_key_is_namespaced_per_family() {
        let owner = Uuid::nil();
        let object = Uuid::from_u128(1);
        assert_eq!(
            AttachmentKind::SdrReports.object_key(owner, object, "pdf"),
            format!("sdr-reports/{}/{}.pdf", owner, object)
        );
    }
}
