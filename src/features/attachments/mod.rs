//! File attachments for record families.
//!
//! Every family has its own attachment table keyed by `owner_id`. Objects are
//! stored under `{kind}/{owner_id}/{uuid}.{ext}`.

pub mod dtos;
pub mod handlers;
pub mod kind;
pub mod models;
pub mod routes;
pub mod services;

pub use kind::AttachmentKind;
pub use services::AttachmentService;
