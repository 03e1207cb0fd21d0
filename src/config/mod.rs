//! Application configuration
//!
//! Typed settings for the server, the content backends, the admin console
//! and the submission mail path. Loaded by [`loader`] from an optional TOML
//! file layered under `SITE__*` environment variables.

pub mod loader;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

use crate::content::BackendKind;
use crate::sections::SectionKind;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default = "default_database_url")]
    pub database_url: String,
    #[serde(default)]
    pub content: ContentConfig,
    #[serde(default)]
    pub backends: BackendsConfig,
    #[serde(default)]
    pub admin: AdminConfig,
    #[serde(default)]
    pub mail: MailConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContentConfig {
    /// Backend used by every section without an explicit override.
    #[serde(default)]
    pub default_backend: BackendKind,
    /// Applied to the shared HTTP client; unset keeps the client default.
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
    #[serde(default)]
    pub sections: HashMap<SectionKind, BackendKind>,
    #[serde(default)]
    pub collections: HashMap<SectionKind, String>,
    /// Per-section override for sending the visibility filter and sort
    /// column to the backend. Off by default for Strapi and Appwrite.
    #[serde(default)]
    pub remote_constraints: HashMap<SectionKind, bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BackendsConfig {
    pub supabase: Option<SupabaseConfig>,
    pub strapi: Option<StrapiConfig>,
    pub wordpress: Option<WordPressConfig>,
    pub appwrite: Option<AppwriteConfig>,
    pub decap: Option<DecapConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupabaseConfig {
    pub url: String,
    pub anon_key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrapiConfig {
    pub base_url: String,
    #[serde(default)]
    pub api_token: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WordPressConfig {
    pub base_url: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub app_password: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppwriteConfig {
    pub endpoint: String,
    pub project_id: String,
    pub database_id: String,
    #[serde(default)]
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecapConfig {
    pub content_dir: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminConfig {
    #[serde(default = "default_admin_username")]
    pub username: String,
    /// Hex-encoded SHA-256 digest of the admin password.
    #[serde(default)]
    pub password_sha256: String,
    #[serde(default)]
    pub jwt_secret: String,
    #[serde(default = "default_token_ttl_minutes")]
    pub token_ttl_minutes: i64,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            username: default_admin_username(),
            password_sha256: String::new(),
            jwt_secret: String::new(),
            token_ttl_minutes: default_token_ttl_minutes(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryMode {
    /// POST the serialized message to the send-email endpoint.
    #[default]
    Relay,
    /// Hand a `mailto:` URL back to the visitor's mail program.
    Mailto,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailConfig {
    #[serde(default)]
    pub recipient: String,
    #[serde(default = "default_mail_from")]
    pub from: String,
    #[serde(default)]
    pub delivery: DeliveryMode,
    /// Relay endpoint for submissions. Unset means this server's own
    /// `/api/send-email`, see [`AppConfig::send_email_url`].
    #[serde(default)]
    pub send_email_url: Option<String>,
    /// Mail provider the send-email endpoint forwards to. Without one,
    /// messages are only logged.
    #[serde(default)]
    pub provider: Option<MailProviderConfig>,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            recipient: String::new(),
            from: default_mail_from(),
            delivery: DeliveryMode::default(),
            send_email_url: None,
            provider: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailProviderConfig {
    pub url: String,
    #[serde(default)]
    pub api_key: Option<String>,
}

impl AppConfig {
    /// Backend serving a section, falling back to the content default.
    pub fn backend_for(&self, section: SectionKind) -> BackendKind {
        self.content
            .sections
            .get(&section)
            .copied()
            .unwrap_or(self.content.default_backend)
    }

    /// Collection or table name a section reads from.
    pub fn collection_for(&self, section: SectionKind) -> String {
        self.content
            .collections
            .get(&section)
            .cloned()
            .unwrap_or_else(|| section.default_collection().to_string())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Send-email endpoint used by relay delivery. Defaults to the route
    /// served by this process on the configured port.
    pub fn send_email_url(&self) -> String {
        if let Some(url) = &self.mail.send_email_url {
            return url.clone();
        }
        let host = match self.server.host.as_str() {
            "0.0.0.0" | "" => "127.0.0.1",
            "::" => "[::1]",
            other => other,
        };
        format!("http://{}:{}/api/send-email", host, self.server.port)
    }
}

fn default_database_url() -> String {
    "sqlite://site.db".to_string()
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_admin_username() -> String {
    "admin".to_string()
}

fn default_token_ttl_minutes() -> i64 {
    480
}

fn default_mail_from() -> String {
    "website@localhost".to_string()
}

