mod technical_query;
mod technical_response;

pub use technical_query::TechnicalQuery;
pub use technical_response::TechnicalResponse;
