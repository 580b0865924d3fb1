mod stock_item_dto;

pub use stock_item_dto::*;
