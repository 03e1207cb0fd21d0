//! Appwrite Databases adapter

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};

use super::{get_json, json_kind, trim_base};
use crate::config::AppwriteConfig;
use crate::content::query::QueryDescriptor;
use crate::content::record::ContentRecord;
use crate::content::source::{BackendKind, ContentSource};
use crate::error::{SiteError, SiteResult};

pub struct AppwriteSource {
    endpoint: String,
    project_id: String,
    database_id: String,
    api_key: Option<String>,
    http: Client,
}

impl AppwriteSource {
    pub fn new(config: &AppwriteConfig, http: Client) -> Self {
        Self {
            endpoint: trim_base(&config.endpoint).to_string(),
            project_id: config.project_id.clone(),
            database_id: config.database_id.clone(),
            api_key: config.api_key.clone().filter(|k| !k.is_empty()),
            http,
        }
    }

    pub fn documents_url(&self, collection: &str) -> String {
        format!(
            "{}/databases/{}/collections/{}/documents",
            self.endpoint, self.database_id, collection
        )
    }

    /// JSON query strings, one per `queries[]` parameter.
    pub fn queries(descriptor: &QueryDescriptor) -> Vec<String> {
        let mut queries: Vec<String> = descriptor
            .effective_filters()
            .into_iter()
            .map(|(column, value)| {
                json!({"method": "equal", "attribute": column, "values": [value.to_json()]})
                    .to_string()
            })
            .collect();

        if let Some(column) = &descriptor.order_by {
            queries.push(json!({"method": "orderAsc", "attribute": column}).to_string());
        }

        if descriptor.is_single() && descriptor.visibility.is_some() {
            queries.push(json!({"method": "limit", "values": [1]}).to_string());
        }

        queries
    }

    /// `$id` becomes `id`; other `$`-prefixed system attributes are dropped.
    pub fn normalize(body: Value) -> SiteResult<Vec<ContentRecord>> {
        let documents = match body {
            Value::Object(mut map) => map.remove("documents").unwrap_or(Value::Null),
            other => {
                return Err(SiteError::backend(
                    "appwrite",
                    format!("expected a JSON object, got {}", json_kind(&other)),
                ))
            }
        };

        let Value::Array(documents) = documents else {
            return Err(SiteError::backend(
                "appwrite",
                "response has no documents array",
            ));
        };

        Ok(documents
            .into_iter()
            .filter_map(ContentRecord::from_value)
            .map(|mut record| {
                if let Some(id) = record.remove("$id") {
                    record.insert("id", id);
                }
                record.retain(|key, _| !key.starts_with('$'));
                record
            })
            .collect())
    }
}

#[async_trait]
impl ContentSource for AppwriteSource {
    fn backend(&self) -> BackendKind {
        BackendKind::Appwrite
    }

    async fn fetch_many(&self, descriptor: &QueryDescriptor) -> SiteResult<Vec<ContentRecord>> {
        let params: Vec<(&str, String)> = Self::queries(descriptor)
            .into_iter()
            .map(|query| ("queries[]", query))
            .collect();

        let mut request = self
            .http
            .get(self.documents_url(&descriptor.collection))
            .query(&params)
            .header("X-Appwrite-Project", &self.project_id);

        if let Some(key) = &self.api_key {
            request = request.header("X-Appwrite-Key", key);
        }

        let body = get_json(BackendKind::Appwrite, request).await?;
        Self::normalize(body)
    }
}
