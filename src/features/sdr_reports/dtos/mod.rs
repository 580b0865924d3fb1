mod sdr_report_dto;

pub use sdr_report_dto::*;
