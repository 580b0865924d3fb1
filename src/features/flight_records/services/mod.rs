mod flight_record_service;

pub use flight_record_service::FlightRecordService;
