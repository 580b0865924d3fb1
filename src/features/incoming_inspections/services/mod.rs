mod incoming_inspection_service;

pub use incoming_inspection_service::IncomingInspectionService;
