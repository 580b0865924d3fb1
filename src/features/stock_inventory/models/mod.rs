mod stock_item;

pub use stock_item::{OrphanSnapshot, StockItem};
