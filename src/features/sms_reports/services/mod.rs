mod sms_report_service;

pub use sms_report_service::SmsReportService;
