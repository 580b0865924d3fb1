use axum::{
    body::Body,
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};

use crate::core::error::AppError;

/// A stored file ready to be sent back to the client
#[derive(Debug)]
pub struct FileDownload {
    pub data: Vec<u8>,
    pub file_name: String,
    pub content_type: String,
    pub checksum: Option<String>,
}

impl FileDownload {
    /// `Content-Disposition` value with an ASCII fallback and an RFC 5987 UTF-8 name
    pub fn content_disposition(&self) -> String {
        let ascii: String = self
            .file_name
            .chars()
            .map(|c| {
                if c.is_ascii() && !c.is_ascii_control() && c != '"' && c != '\\' {
                    c
                } else {
                    '_'
                }
            })
            .collect();

        format!(
            "attachment; filename=\"{}\"; filename*=UTF-8''{}",
            ascii,
            urlencoding::encode(&self.file_name)
        )
    }
}

impl IntoResponse for FileDownload {
    fn into_response(self) -> Response {
        let content_type = HeaderValue::from_str(&self.content_type)
            .unwrap_or_else(|_| HeaderValue::from_static("application/octet-stream"));
        let disposition = match HeaderValue::from_str(&self.content_disposition()) {
            Ok(v) => v,
            Err(e) => {
                return AppError::Internal(format!("Invalid Content-Disposition: {}", e))
                    .into_response()
            }
        };
        let etag = self
            .checksum
            .as_deref()
            .and_then(|c| HeaderValue::from_str(&format!("\"{}\"", c)).ok());
        let length = self.data.len();

        let mut response = Response::new(Body::from(self.data));
        *response.status_mut() = StatusCode::OK;

        let headers = response.headers_mut();
        headers.insert(header::CONTENT_TYPE, content_type);
        headers.insert(header::CONTENT_LENGTH, HeaderValue::from(length));
        headers.insert(header::CONTENT_DISPOSITION, disposition);
        headers.insert(
            header::CACHE_CONTROL,
            HeaderValue::from_static("private, no-store"),
        );
        headers.insert(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        );
        if let Some(etag) = etag {
            headers.insert(header::ETAG, etag);
        }

        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn download(name: &str) -> FileDownload {
        FileDownload {
            data: b"hello".to_vec(),
            file_name: name.to_string(),
            content_type: "text/plain".to_string(),
            checksum: Some("abc123".to_string()),
        }
    }

    #[test]
    fn test_content_disposition_encodes_non_ascii() {
        let value = download("laporan \"final\" é.txt").content_disposition();
        assert_eq!(
            value,
            "attachment; filename=\"laporan _final_ _.txt\"; filename*=UTF-8''laporan%20%22final%22%20%C3%A9.txt"
        );
    }

    #[test]
    fn test_response_carries_fixed_headers() {
        let response = download("wo-1234.txt").into_response();
        assert_eq!(response.status(), StatusCode::OK);

        let headers = response.headers();
        assert_eq!(headers[header::CONTENT_TYPE], "text/plain");
        assert_eq!(headers[header::CONTENT_LENGTH], "5");
        assert_eq!(headers[header::CACHE_CONTROL], "private, no-store");
        assert_eq!(headers[header::X_CONTENT_TYPE_OPTIONS], "nosniff");
        assert_eq!(headers[header::ETAG], "\"abc123\"");
        assert!(headers[header::CONTENT_DISPOSITION]
            .to_str()
            .unwrap()
            .starts_with("attachment; filename=\"wo-1234.txt\""));
    }
}
