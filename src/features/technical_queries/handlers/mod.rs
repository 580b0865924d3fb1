mod technical_query_handler;
mod technical_response_handler;

pub use technical_query_handler::*;
pub use technical_response_handler::*;
