pub mod activity;
pub mod airports;
pub mod attachments;
pub mod auth;
pub mod dashboard;
pub mod documents;
pub mod flight_records;
pub mod incoming_inspections;
pub mod sdr_reports;
pub mod sms_reports;
pub mod stock_inventory;
pub mod technical_queries;
pub mod technician_training;
