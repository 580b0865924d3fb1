//! Outbound transactional mail
//!
//! Only verification PINs are mailed. Services depend on `MailSender`;
//! `HttpMailer` posts to a JSON mail API.

mod http_mailer;

use async_trait::async_trait;
use serde::Serialize;

use crate::core::error::AppError;

pub use http_mailer::HttpMailer;

/// A rendered message with plain-text and HTML bodies
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MailMessage {
    pub to: String,
    pub subject: String,
    pub text: String,
    pub html: String,
}

#[async_trait]
pub trait MailSender: Send + Sync {
    async fn send(&self, message: MailMessage) -> Result<(), AppError>;
}
