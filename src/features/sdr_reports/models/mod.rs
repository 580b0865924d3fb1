mod sdr_report;

pub use sdr_report::SdrReport;
