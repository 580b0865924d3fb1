mod document_file_handler;
mod folder_handler;

pub use document_file_handler::*;
pub use folder_handler::*;
