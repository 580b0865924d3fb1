mod airport_dto;

pub use airport_dto::*;
