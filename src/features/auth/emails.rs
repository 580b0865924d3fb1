//! Outbound auth emails rendered with minijinja.

use minijinja::{context, Environment};
use std::sync::OnceLock;

use crate::core::error::AppError;
use crate::modules::mail::{MailMessage, MailSender};
use crate::shared::constants::PIN_TTL_MINUTES;

static EMAIL_ENV: OnceLock<Environment<'static>> = OnceLock::new();

const PIN_SUBJECT: &str = "Your verification PIN";

fn environment() -> &'static Environment<'static> {
    EMAIL_ENV.get_or_init(|| {
        let mut env = Environment::new();
        for (name, source) in [
            ("pin.txt", include_str!("../../../templates/emails/pin.txt")),
            ("pin.html", include_str!("../../../templates/emails/pin.html")),
        ] {
            if let Err(e) = env.add_template(name, source) {
                tracing::warn!("Failed to load email template {}: {}", name, e);
            }
        }
        env
    })
}

fn render(template_name: &str, ctx: minijinja::Value) -> Result<String, AppError> {
    environment()
        .get_template(template_name)
        .and_then(|t| t.render(ctx))
        .map_err(|e| AppError::Internal(format!("Failed to render {}: {}", template_name, e)))
}

/// Build the message carrying a verification PIN
pub fn pin_email(to: &str, name: &str, pin: &str) -> Result<MailMessage, AppError> {
    let ctx = context! { name => name, pin => pin, ttl_minutes => PIN_TTL_MINUTES };

    Ok(MailMessage {
        to: to.to_string(),
        subject: PIN_SUBJECT.to_string(),
        text: render("pin.txt", ctx.clone())?,
        html: render("pin.html", ctx)?,
    })
}

/// Render and deliver a verification PIN
pub async fn send_pin(
    mailer: &dyn MailSender,
    to: &str,
    name: &str,
    pin: &str,
) -> Result<(), AppError> {
    let message = pin_email(to, name, pin)?;
    mailer.send(message).await?;
    tracing::debug!("Verification PIN mailed to {}", to);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::RecordingMailer;

    #[test]
    fn test_pin_email_contains_pin_in_both_bodies() {
        let message = pin_email("tech@example.com", "Ayu", "004217").unwrap();
        assert_eq!(message.to, "tech@example.com");
        assert_eq!(message.subject, PIN_SUBJECT);
        assert!(message.text.contains("004217"));
        assert!(message.html.contains("004217"));
        assert!(message.text.contains("5 minutes"));
    }

    #[test]
    fn test_html_body_escapes_name() {
        let message = pin_email("x@example.com", "<b>Ayu</b>", "123456").unwrap();
        assert!(message.html.contains("&lt;b&gt;Ayu"));
        assert!(!message.html.contains("<b>"));
        assert!(message.text.contains("<b>Ayu</b>"));
    }

    #[tokio::test]
    async fn test_send_pin_hands_one_message_to_mailer() {
        let mailer = RecordingMailer::default();
        send_pin(&mailer, "qa@example.com", "Budi", "918273").await.unwrap();

        let sent = mailer.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "qa@example.com");
        assert!(sent[0].text.contains("918273"));
    }
}
