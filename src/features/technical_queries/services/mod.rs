mod technical_query_service;
mod technical_response_service;
mod votes;

pub use technical_query_service::TechnicalQueryService;
pub use technical_response_service::TechnicalResponseService;
