mod sms_report;

pub use sms_report::SmsReport;
