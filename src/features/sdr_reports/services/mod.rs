mod sdr_report_service;

pub use sdr_report_service::SdrReportService;
