mod sdr_report_handler;

pub use sdr_report_handler::*;
