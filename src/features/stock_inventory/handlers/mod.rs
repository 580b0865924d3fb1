mod stock_item_handler;

pub use stock_item_handler::*;
