/// Verification PIN length (digits)
pub const PIN_LENGTH: usize = 6;

/// Verification PIN lifetime in minutes
pub const PIN_TTL_MINUTES: i64 = 5;

/// Maximum upload size for attachments and documents (25MB)
pub const MAX_UPLOAD_SIZE: usize = 25 * 1024 * 1024;

/// Window used by the dashboard for "training expiring soon"
pub const TRAINING_EXPIRY_WINDOW_DAYS: i64 = 30;

/// Maximum number of ids accepted by a bulk delete request
pub const MAX_BULK_DELETE_IDS: u64 = 500;

// =============================================================================
// RECORD STATES
// =============================================================================

pub const STOCK_STATUSES: &[&str] = &["serviceable", "unserviceable", "quarantine", "scrapped"];
pub const INSPECTION_RESULTS: &[&str] = &["pending", "accepted", "rejected"];
pub const SDR_STATUSES: &[&str] = &["draft", "submitted", "closed"];
pub const SMS_SEVERITIES: &[&str] = &["negligible", "minor", "major", "hazardous", "catastrophic"];
pub const SMS_LIKELIHOODS: &[&str] = &[
    "extremely_improbable",
    "improbable",
    "remote",
    "occasional",
    "frequent",
];
pub const SMS_STATUSES: &[&str] = &["open", "under_review", "mitigated", "closed"];

// =============================================================================
// ACTIVITY ACTIONS
// =============================================================================

pub const ACTION_CREATE: &str = "create";
pub const ACTION_UPDATE: &str = "update";
pub const ACTION_DELETE: &str = "delete";
pub const ACTION_BULK_DELETE: &str = "bulk_delete";
pub const ACTION_UPLOAD: &str = "upload";
pub const ACTION_DOWNLOAD: &str = "download";
pub const ACTION_VOTE: &str = "vote";
pub const ACTION_LOGIN: &str = "login";
pub const ACTION_VERIFY_EMAIL: &str = "verify_email";
pub const ACTION_REGISTER: &str = "register";

// =============================================================================
// ACTIVITY ENTITY TYPES
// =============================================================================

pub const ENTITY_USER: &str = "user";
pub const ENTITY_FLIGHT_RECORD: &str = "flight_record";
pub const ENTITY_AIRPORT: &str = "airport";
pub const ENTITY_STOCK_INVENTORY: &str = "stock_inventory";
pub const ENTITY_INCOMING_INSPECTION: &str = "incoming_inspection";
pub const ENTITY_SDR_REPORT: &str = "sdr_report";
pub const ENTITY_SMS_REPORT: &str = "sms_report";
pub const ENTITY_TECHNICIAN_TRAINING: &str = "technician_training";
pub const ENTITY_DOCUMENT_FOLDER: &str = "document_folder";
pub const ENTITY_DOCUMENT_FILE: &str = "document_file";
pub const ENTITY_TECHNICAL_QUERY: &str = "technical_query";
pub const ENTITY_TECHNICAL_RESPONSE: &str = "technical_response";
