mod incoming_inspection_handler;

pub use incoming_inspection_handler::*;
