mod cascade;
mod stock_item_service;

pub use stock_item_service::StockItemService;
