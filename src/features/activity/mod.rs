//! Append-only user activity log.
//!
//! Every mutating operation records who did what to which record. Writes are
//! best-effort: a failed insert is logged and never fails the caller.

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::{ActivityEntry, ActivityService};
