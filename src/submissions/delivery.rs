//! Delivery of a rendered submission, by relay or `mailto:` link.

use reqwest::{Client, StatusCode};
use serde::Serialize;
use tracing::{error, info};
use url::form_urlencoded::byte_serialize;

use crate::config::{AppConfig, DeliveryMode};
use crate::error::{SiteError, SiteResult};
use crate::mail::EmailMessage;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "method", rename_all = "lowercase")]
pub enum DeliveryReceipt {
    /// The send-email endpoint accepted the message.
    Relay,
    /// The visitor's mail program has to send it; success is assumed.
    Mailto { url: String },
}

pub struct SubmissionDelivery {
    mode: DeliveryMode,
    recipient: String,
    send_email_url: String,
    http: Client,
}

impl SubmissionDelivery {
    pub fn new(
        mode: DeliveryMode,
        recipient: impl Into<String>,
        send_email_url: impl Into<String>,
        http: Client,
    ) -> Self {
        Self {
            mode,
            recipient: recipient.into(),
            send_email_url: send_email_url.into(),
            http,
        }
    }

    pub fn from_config(config: &AppConfig, http: Client) -> Self {
        Self::new(
            config.mail.delivery,
            config.mail.recipient.clone(),
            config.send_email_url(),
            http,
        )
    }

    pub fn mode(&self) -> DeliveryMode {
        self.mode
    }

    pub async fn deliver(&self, message: &EmailMessage) -> SiteResult<DeliveryReceipt> {
        match self.mode {
            DeliveryMode::Relay => {
                self.relay(message).await?;
                Ok(DeliveryReceipt::Relay)
            }
            DeliveryMode::Mailto => Ok(DeliveryReceipt::Mailto {
                url: mailto_url(&self.recipient, message),
            }),
        }
    }

    /// POST `{subject, text, html}` to the send-email endpoint. Only a 200
    /// counts as delivered.
    pub async fn relay(&self, message: &EmailMessage) -> SiteResult<()> {
        let response = self
            .http
            .post(&self.send_email_url)
            .json(message)
            .send()
            .await
            .map_err(|e| {
                error!("Send-email endpoint unreachable: {}", e);
                SiteError::DeliveryError(format!("send-email endpoint unreachable: {}", e))
            })?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            error!("Send-email endpoint answered {}: {}", status, body);
            return Err(SiteError::DeliveryError(format!(
                "send-email endpoint returned {}",
                status.as_u16()
            )));
        }

        info!("Delivered '{}' through the send-email endpoint", message.subject);
        Ok(())
    }
}

/// `mailto:` URL with percent-encoded subject and body. Line breaks are
/// sent as CRLF.
pub fn mailto_url(recipient: &str, message: &EmailMessage) -> String {
    let body = message.text.replace("\r\n", "\n").replace('\n', "\r\n");
    format!(
        "mailto:{}?subject={}&body={}",
        recipient,
        percent_encode(&message.subject),
        percent_encode(&body)
    )
}

fn percent_encode(value: &str) -> String {
    // form encoding writes spaces as '+', which mail clients show literally
    byte_serialize(value.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}
