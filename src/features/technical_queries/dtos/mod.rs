mod technical_query_dto;
mod vote_dto;

pub use technical_query_dto::*;
pub use vote_dto::*;
