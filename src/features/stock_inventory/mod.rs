//! Parts stock. Deleting a stock record keeps its incoming inspections,
//! detached and carrying a copy of the part identity.

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;
