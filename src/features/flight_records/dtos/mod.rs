mod flight_record_dto;

pub use flight_record_dto::*;
