use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, error};

use super::{MailMessage, MailSender};
use crate::core::config::MailConfig;
use crate::core::error::AppError;

/// Request body understood by the mail API
#[derive(Debug, Serialize)]
struct SendMailRequest<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    text: &'a str,
    html: &'a str,
}

/// Mail sender backed by an HTTP transactional mail API
pub struct HttpMailer {
    http_client: reqwest::Client,
    api_url: String,
    api_key: String,
    from: String,
}

impl HttpMailer {
    pub fn new(config: MailConfig) -> Result<Self, AppError> {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AppError::Mail(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            api_url: config.api_url,
            api_key: config.api_key,
            from: config.from,
        })
    }
}

#[async_trait]
impl MailSender for HttpMailer {
    async fn send(&self, message: MailMessage) -> Result<(), AppError> {
        let request_body = SendMailRequest {
            from: &self.from,
            to: [&message.to],
            subject: &message.subject,
            text: &message.text,
            html: &message.html,
        };

        debug!("Sending mail '{}' to {}", message.subject, message.to);

        let response = self
            .http_client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| {
                error!("Failed to reach mail API: {}", e);
                AppError::Mail(format!("Failed to reach mail API: {}", e))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!("Mail API error: HTTP {} - {}", status, body);
            return Err(AppError::Mail(format!("Mail API returned HTTP {}", status)));
        }

        debug!("Mail '{}' accepted for {}", message.subject, message.to);
        Ok(())
    }
}
