//! Modules layer - Infrastructure components for external integrations
//!
//! Contains clients and adapters for object storage and outbound mail.

pub mod mail;
pub mod storage;
