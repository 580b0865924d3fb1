mod flight_record;

pub use flight_record::FlightRecord;
