//! Document library: a folder tree with stored files.
//!
//! Folder names are unique among siblings. Deleting a folder removes its whole
//! subtree; stored objects are purged first, best effort.

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;
pub mod tree;
