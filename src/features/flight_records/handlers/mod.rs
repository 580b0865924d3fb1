mod flight_record_handler;

pub use flight_record_handler::*;
