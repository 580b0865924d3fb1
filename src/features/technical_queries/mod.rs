//! Technical queries raised by engineers, with responses and up/down votes

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;
