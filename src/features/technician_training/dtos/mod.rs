mod training_dto;

pub use training_dto::*;
