mod sms_report_dto;

pub use sms_report_dto::*;
