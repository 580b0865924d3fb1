mod document_file;
mod document_folder;

pub use document_file::DocumentFile;
pub use document_folder::DocumentFolder;
