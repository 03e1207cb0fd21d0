//! Content Source Adapters
//!
//! One [`ContentSource`] per backend, each speaking that backend's native
//! query dialect and normalizing rows into [`ContentRecord`]s.

pub mod appwrite;
pub mod decap;
pub mod local;
pub mod strapi;
pub mod supabase;
pub mod wordpress;

pub use appwrite::AppwriteSource;
pub use decap::DecapSource;
pub use local::LocalSource;
pub use strapi::StrapiSource;
pub use supabase::SupabaseSource;
pub use wordpress::WordPressSource;

use reqwest::{Client, RequestBuilder};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use super::record::ContentRecord;
use super::source::{BackendKind, ContentSources};
use crate::config::AppConfig;
use crate::database::Database;
use crate::error::{SiteError, SiteResult};

const ERROR_BODY_LIMIT: usize = 200;

/// Shared HTTP client for every adapter, honoring the optional timeout.
pub fn http_client(config: &AppConfig) -> SiteResult<Client> {
    let mut builder = Client::builder().user_agent(concat!(
        env!("CARGO_PKG_NAME"),
        "/",
        env!("CARGO_PKG_VERSION")
    ));
    if let Some(secs) = config.content.request_timeout_secs {
        builder = builder.timeout(Duration::from_secs(secs));
    }
    builder
        .build()
        .map_err(|e| SiteError::ConfigError(format!("Failed to build HTTP client: {}", e)))
}

impl ContentSources {
    /// Construct the local source and every configured remote backend.
    pub fn from_config(config: &AppConfig, database: &Database, http: Client) -> Self {
        let mut sources =
            ContentSources::new().with_source(Arc::new(LocalSource::new(database.clone())));

        if let Some(cfg) = &config.backends.supabase {
            sources.register(Arc::new(SupabaseSource::new(cfg, http.clone())));
        }
        if let Some(cfg) = &config.backends.strapi {
            sources.register(Arc::new(StrapiSource::new(cfg, http.clone())));
        }
        if let Some(cfg) = &config.backends.wordpress {
            sources.register(Arc::new(WordPressSource::new(cfg, http.clone())));
        }
        if let Some(cfg) = &config.backends.appwrite {
            sources.register(Arc::new(AppwriteSource::new(cfg, http.clone())));
        }
        if let Some(cfg) = &config.backends.decap {
            sources.register(Arc::new(DecapSource::new(cfg.content_dir.clone())));
        }

        info!("Content sources ready: {:?}", sources.backends());
        sources
    }
}

/// Send a request and decode a JSON body, mapping every failure to a
/// backend error.
pub(crate) async fn get_json(backend: BackendKind, request: RequestBuilder) -> SiteResult<Value> {
    let response = request
        .send()
        .await
        .map_err(|e| SiteError::backend(backend.as_str(), format!("request failed: {}", e)))?;

    let status = response.status();
    debug!("{} responded with {}", backend, status);

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        let snippet: String = body.chars().take(ERROR_BODY_LIMIT).collect();
        return Err(SiteError::backend(
            backend.as_str(),
            format!("HTTP {}: {}", status.as_u16(), snippet),
        ));
    }

    response
        .json::<Value>()
        .await
        .map_err(|e| SiteError::backend(backend.as_str(), format!("invalid JSON: {}", e)))
}

/// Records from a JSON array of objects; anything else is a backend error.
pub(crate) fn records_from_array(backend: BackendKind, value: Value) -> SiteResult<Vec<ContentRecord>> {
    match value {
        Value::Array(items) => Ok(items.into_iter().filter_map(ContentRecord::from_value).collect()),
        other => Err(SiteError::backend(
            backend.as_str(),
            format!("expected a JSON array, got {}", json_kind(&other)),
        )),
    }
}

pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

pub(crate) fn trim_base(url: &str) -> &str {
    url.trim_end_matches('/')
}
