use axum::extract::Multipart;
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::core::error::{AppError, Result};
use crate::shared::constants::MAX_UPLOAD_SIZE;

/// Allowed MIME types for attachments and documents
pub const ALLOWED_MIME_TYPES: &[&str] = &[
    "image/jpeg",
    "image/png",
    "image/gif",
    "image/webp",
    "application/pdf",
    "text/plain",
    "text/csv",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    "application/vnd.ms-excel",
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
];

/// A file read from a multipart form, already size and type checked
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub data: Vec<u8>,
    pub file_name: String,
    pub content_type: String,
    /// Remaining text fields of the form, in arrival order
    pub fields: Vec<(String, String)>,
}

impl UploadedFile {
    pub fn size(&self) -> i64 {
        self.data.len() as i64
    }

    pub fn checksum(&self) -> String {
        sha256_hex(&self.data)
    }

    pub fn extension(&self) -> &str {
        extension_for(&self.content_type, &self.file_name)
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Check size and MIME type against the upload policy.
    pub fn validate(&self) -> Result<()> {
        if self.data.is_empty() {
            return Err(AppError::BadRequest("File is empty".to_string()));
        }

        if self.data.len() > MAX_UPLOAD_SIZE {
            return Err(AppError::BadRequest(format!(
                "File too large. Maximum size is {} bytes ({} MB)",
                MAX_UPLOAD_SIZE,
                MAX_UPLOAD_SIZE / 1024 / 1024
            )));
        }

        if !is_mime_type_allowed(&self.content_type) {
            return Err(AppError::BadRequest(format!(
                "File type '{}' is not allowed. Allowed types: {}",
                self.content_type,
                ALLOWED_MIME_TYPES.join(", ")
            )));
        }

        Ok(())
    }
}

/// Read a multipart form carrying one `file` part plus optional text fields.
pub async fn read_upload(mut multipart: Multipart) -> Result<UploadedFile> {
    let mut file: Option<(Vec<u8>, String, String)> = None;
    let mut fields = Vec::new();

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        debug!("Failed to read multipart field: {}", e);
        AppError::BadRequest(format!("Failed to read multipart data: {}", e))
    })? {
        let field_name = field.name().unwrap_or("").to_string();

        if field_name == "file" {
            let content_type = field
                .content_type()
                .map(|s| s.to_string())
                .unwrap_or_else(|| "application/octet-stream".to_string());
            let file_name = field
                .file_name()
                .map(sanitize_file_name)
                .unwrap_or_else(|| "unnamed".to_string());

            let data = field.bytes().await.map_err(|e| {
                debug!("Failed to read file bytes: {}", e);
                AppError::BadRequest(format!("Failed to read file data: {}", e))
            })?;

            file = Some((data.to_vec(), file_name, content_type));
        } else {
            let text = field.text().await.map_err(|e| {
                AppError::BadRequest(format!("Failed to read field '{}': {}", field_name, e))
            })?;
            fields.push((field_name, text));
        }
    }

    let (data, file_name, content_type) =
        file.ok_or_else(|| AppError::BadRequest("File is required".to_string()))?;

    let upload = UploadedFile {
        data,
        file_name,
        content_type,
        fields,
    };
    upload.validate()?;
    Ok(upload)
}

pub fn is_mime_type_allowed(content_type: &str) -> bool {
    ALLOWED_MIME_TYPES.contains(&content_type)
}

/// File extension for the storage key, from the MIME type or the original name
pub fn extension_for<'a>(content_type: &str, file_name: &'a str) -> &'a str {
    let from_type = match content_type {
        "image/jpeg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/gif" => Some("gif"),
        "image/webp" => Some("webp"),
        "application/pdf" => Some("pdf"),
        "text/plain" => Some("txt"),
        "text/csv" => Some("csv"),
        "application/msword" => Some("doc"),
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document" => Some("docx"),
        "application/vnd.ms-excel" => Some("xls"),
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet" => Some("xlsx"),
        _ => None,
    };

    if let Some(ext) = from_type {
        return ext;
    }

    match file_name.rsplit_once('.') {
        Some((_, ext)) if !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()) => {
            ext
        }
        _ => "bin",
    }
}

/// Strip any path components a client may send along with the name.
pub fn sanitize_file_name(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or("").trim();
    let cleaned: String = base.chars().filter(|c| !c.is_control()).collect();
    if cleaned.is_empty() {
        "unnamed".to_string()
    } else {
        cleaned
    }
}

pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upload(data: &[u8], content_type: &str) -> UploadedFile {
        UploadedFile {
            data: data.to_vec(),
            file_name: "report.pdf".to_string(),
            content_type: content_type.to_string(),
            fields: vec![("folder_id".to_string(), "abc".to_string())],
        }
    }

    #[test]
    fn test_validate_rejects_disallowed_type() {
        let err = upload(b"MZ", "application/x-msdownload")
            .validate()
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[test]
    fn test_validate_rejects_empty_and_oversized() {
        assert!(upload(b"", "application/pdf").validate().is_err());

        let big = vec![0u8; MAX_UPLOAD_SIZE + 1];
        assert!(upload(&big, "application/pdf").validate().is_err());

        assert!(upload(b"%PDF-1.7", "application/pdf").validate().is_ok());
    }

    #[test]
    fn test_extension_for() {
        assert_eq!(extension_for("application/pdf", "x.bin"), "pdf");
        assert_eq!(extension_for("application/octet-stream", "log.TXT"), "TXT");
        assert_eq!(extension_for("application/octet-stream", "noext"), "bin");
        assert_eq!(extension_for("application/octet-stream", "bad.e x"), "bin");
    }

    #[test]
    fn test_sanitize_file_name() {
        assert_eq!(sanitize_file_name("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_file_name("C:\\Users\\me\\wo.pdf"), "wo.pdf");
        assert_eq!(sanitize_file_name("   "), "unnamed");
    }

    #[test]
    fn test_fields_and_checksum() {
        let file = upload(b"abc", "text/plain");
        assert_eq!(file.field("folder_id"), Some("abc"));
        assert_eq!(file.field("missing"), None);
        assert_eq!(
            file.checksum(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }
}
