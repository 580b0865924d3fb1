mod incoming_inspection_dto;

pub use incoming_inspection_dto::*;
