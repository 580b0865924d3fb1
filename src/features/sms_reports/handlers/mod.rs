mod sms_report_handler;

pub use sms_report_handler::*;
