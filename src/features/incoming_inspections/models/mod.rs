mod incoming_inspection;

pub use incoming_inspection::{IncomingInspection, PartIdentity};
