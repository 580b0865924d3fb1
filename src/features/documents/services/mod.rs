mod document_file_service;
mod folder_service;

pub use document_file_service::DocumentFileService;
pub use folder_service::FolderService;
