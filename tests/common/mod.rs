#![allow(dead_code)]

use async_trait::async_trait;
use logistics_site::admin::password_digest;
use logistics_site::config::AppConfig;
use logistics_site::content::{BackendKind, ContentRecord, ContentSource, QueryDescriptor};
use logistics_site::database::Database;
use logistics_site::error::{SiteError, SiteResult};
use logistics_site::submissions::BookingRequest;
use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};

pub const ADMIN_PASSWORD: &str = "correct horse battery";

/// Setup an in-memory SQLite database for testing
pub async fn setup_test_db() -> Database {
    Database::new_in_memory().await.expect("Failed to create test database")
}

/// A valid configuration whose relay endpoint is `send_email_url`.
pub fn test_config(send_email_url: &str) -> AppConfig {
    let toml = format!(
        r#"
        database_url = "sqlite::memory:"

        [admin]
        username = "admin"
        password_sha256 = "{}"
        jwt_secret = "test-jwt-secret-0123456789"
        token_ttl_minutes = 30

        [mail]
        recipient = "ops@example.com"
        send_email_url = "{}"
        "#,
        password_digest(ADMIN_PASSWORD),
        send_email_url
    );

    let config = AppConfig::from_toml_str(&toml).expect("Failed to parse test config");
    config.validate().expect("Test config should be valid");
    config
}

/// Booking with every field filled in.
pub fn sample_booking() -> BookingRequest {
    BookingRequest {
        name: "Ava Tan".to_string(),
        email: "ava@example.com".to_string(),
        phone: "+65 5550 1234".to_string(),
        company: Some("Tan Trading".to_string()),
        pickup_address: "12 Marina Blvd".to_string(),
        delivery_address: "8 Jurong Port Rd".to_string(),
        pickup_date: "2026-11-02".to_string(),
        cargo_type: "Palletised electronics".to_string(),
        weight: Some("420 kg".to_string()),
        notes: Some("Loading bay closes at 5pm".to_string()),
    }
}

/// In-process content source returning canned rows or a canned error.
pub struct StubSource {
    backend: BackendKind,
    response: Result<Vec<Value>, String>,
    calls: AtomicUsize,
}

impl StubSource {
    pub fn rows(backend: BackendKind, rows: Vec<Value>) -> Self {
        Self {
            backend,
            response: Ok(rows),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(backend: BackendKind, message: &str) -> Self {
        Self {
            backend,
            response: Err(message.to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ContentSource for StubSource {
    fn backend(&self) -> BackendKind {
        self.backend
    }

    async fn fetch_many(&self, _descriptor: &QueryDescriptor) -> SiteResult<Vec<ContentRecord>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.response {
            Ok(rows) => Ok(rows.iter().cloned().filter_map(ContentRecord::from_value).collect()),
            Err(message) => Err(SiteError::backend(self.backend.as_str(), message.clone())),
        }
    }
}
