//! Outbound mail
//!
//! The send-email endpoint accepts `{subject, text, html}` and hands it to a
//! [`Mailer`]: either a mail-provider HTTP relay or, when no provider is
//! configured, a mailer that only logs.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tracing::{error, info};

use crate::config::MailConfig;
use crate::error::{SiteError, SiteResult};

/// A message ready for delivery, in both plain-text and HTML form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmailMessage {
    pub subject: String,
    pub text: String,
    pub html: String,
}

impl EmailMessage {
    /// Every part must be non-blank.
    pub fn validate(&self) -> SiteResult<()> {
        let missing: Vec<&str> = [
            ("subject", &self.subject),
            ("text", &self.text),
            ("html", &self.html),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(SiteError::missing_fields(&missing))
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendEmailResponse {
    pub success: bool,
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, message: &EmailMessage) -> SiteResult<()>;
}

/// Forwards messages to a mail provider's JSON API.
pub struct HttpMailer {
    url: String,
    api_key: Option<String>,
    from: String,
    to: String,
    http: Client,
}

impl HttpMailer {
    pub fn new(
        url: impl Into<String>,
        api_key: Option<String>,
        from: impl Into<String>,
        to: impl Into<String>,
        http: Client,
    ) -> Self {
        Self {
            url: url.into(),
            api_key,
            from: from.into(),
            to: to.into(),
            http,
        }
    }
}

#[async_trait]
impl Mailer for HttpMailer {
    async fn send(&self, message: &EmailMessage) -> SiteResult<()> {
        let mut request = self.http.post(&self.url).json(&json!({
            "from": self.from,
            "to": [self.to],
            "subject": message.subject,
            "text": message.text,
            "html": message.html,
        }));
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await.map_err(|e| {
            error!("Mail provider request failed: {}", e);
            SiteError::DeliveryError(format!("mail provider unreachable: {}", e))
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("Mail provider rejected message: {} {}", status, body);
            return Err(SiteError::DeliveryError(format!(
                "mail provider returned {}",
                status.as_u16()
            )));
        }

        info!("Relayed message '{}' to {}", message.subject, self.to);
        Ok(())
    }
}

/// Development mailer: records the message in the log and reports success.
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, message: &EmailMessage) -> SiteResult<()> {
        info!(
            "No mail provider configured; message '{}' not sent:\n{}",
            message.subject, message.text
        );
        Ok(())
    }
}

pub fn mailer_from_config(config: &MailConfig, http: Client) -> Arc<dyn Mailer> {
    match &config.provider {
        Some(provider) => Arc::new(HttpMailer::new(
            provider.url.clone(),
            provider.api_key.clone(),
            config.from.clone(),
            config.recipient.clone(),
            http,
        )),
        None => Arc::new(LogMailer),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_parts_are_reported() {
        let message = EmailMessage {
            subject: "Booking request".to_string(),
            text: "  ".to_string(),
            html: String::new(),
        };
        let err = message.validate().unwrap_err();
        assert!(matches!(err, SiteError::ValidationError(_)));
        assert!(err.to_string().contains("text, html"));
    }

    #[tokio::test]
    async fn test_log_mailer_always_succeeds() {
        let message = EmailMessage {
            subject: "Hello".to_string(),
            text: "Body".to_string(),
            html: "<p>Body</p>".to_string(),
        };
        assert!(LogMailer.send(&message).await.is_ok());
    }
}
