//! Strapi REST adapter
//!
//! Accepts both v4 responses (`{id, attributes: {...}}` entries, relations
//! wrapped in `{data: ...}`) and v5 flat documents, plus single types where
//! `data` is one object.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Map, Value};

use super::{get_json, json_kind, trim_base};
use crate::config::StrapiConfig;
use crate::content::query::QueryDescriptor;
use crate::content::record::ContentRecord;
use crate::content::source::{BackendKind, ContentSource};
use crate::error::{SiteError, SiteResult};

pub struct StrapiSource {
    base_url: String,
    api_token: Option<String>,
    http: Client,
}

impl StrapiSource {
    pub fn new(config: &StrapiConfig, http: Client) -> Self {
        Self {
            base_url: trim_base(&config.base_url).to_string(),
            api_token: config.api_token.clone().filter(|t| !t.is_empty()),
            http,
        }
    }

    pub fn collection_url(&self, collection: &str) -> String {
        format!("{}/api/{}", self.base_url, collection)
    }

    pub fn query_params(descriptor: &QueryDescriptor) -> Vec<(String, String)> {
        let mut params = vec![("populate".to_string(), "*".to_string())];

        for (column, value) in descriptor.effective_filters() {
            params.push((format!("filters[{}][$eq]", column), value.to_string()));
        }

        if let Some(column) = &descriptor.order_by {
            params.push(("sort".to_string(), format!("{}:asc", column)));
        }

        // Without a remote visibility filter a hidden entry could fill the
        // single slot, so the whole collection is read instead.
        if descriptor.is_single() && descriptor.visibility.is_some() {
            params.push(("pagination[pageSize]".to_string(), "1".to_string()));
        }

        params
    }

    /// Records from a Strapi `{data: ...}` envelope.
    pub fn normalize(body: Value) -> SiteResult<Vec<ContentRecord>> {
        let data = match body {
            Value::Object(mut map) => map.remove("data").unwrap_or(Value::Null),
            other => {
                return Err(SiteError::backend(
                    "strapi",
                    format!("expected a JSON object, got {}", json_kind(&other)),
                ))
            }
        };

        let records = match data {
            Value::Array(items) => items
                .into_iter()
                .filter_map(|item| ContentRecord::from_value(flatten_entity(item)))
                .collect(),
            entity @ Value::Object(_) => ContentRecord::from_value(flatten_entity(entity))
                .into_iter()
                .collect(),
            Value::Null => Vec::new(),
            other => {
                return Err(SiteError::backend(
                    "strapi",
                    format!("unexpected data field of type {}", json_kind(&other)),
                ))
            }
        };

        Ok(records)
    }
}

/// Lift `attributes` into the entity and unwrap nested `{data: ...}`
/// relation and media wrappers.
fn flatten_entity(entity: Value) -> Value {
    let Value::Object(mut map) = entity else {
        return entity;
    };

    let mut flat = Map::new();
    if let Some(id) = map.remove("id") {
        flat.insert("id".to_string(), id);
    }

    if let Some(Value::Object(attributes)) = map.remove("attributes") {
        for (key, value) in attributes {
            flat.insert(key, unwrap_relation(value));
        }
    }

    // v5 documents carry their fields at the top level.
    for (key, value) in map {
        if !flat.contains_key(&key) {
            flat.insert(key, unwrap_relation(value));
        }
    }

    Value::Object(flat)
}

fn unwrap_relation(value: Value) -> Value {
    match value {
        Value::Object(mut map) if map.len() <= 2 && map.contains_key("data") => {
            match map.remove("data").unwrap_or(Value::Null) {
                Value::Array(items) => Value::Array(items.into_iter().map(flatten_entity).collect()),
                Value::Null => Value::Null,
                single => flatten_entity(single),
            }
        }
        other => other,
    }
}

#[async_trait]
impl ContentSource for StrapiSource {
    fn backend(&self) -> BackendKind {
        BackendKind::Strapi
    }

    async fn fetch_many(&self, descriptor: &QueryDescriptor) -> SiteResult<Vec<ContentRecord>> {
        let mut request = self
            .http
            .get(self.collection_url(&descriptor.collection))
            .query(&Self::query_params(descriptor));

        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token);
        }

        let body = get_json(BackendKind::Strapi, request).await?;
        Self::normalize(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_query_params() {
        let descriptor = QueryDescriptor::list("services")
            .visible_when("is_active")
            .order_by("order");

        let params = StrapiSource::query_params(&descriptor);
        assert!(params.contains(&("populate".to_string(), "*".to_string())));
        assert!(params.contains(&("filters[is_active][$eq]".to_string(), "true".to_string())));
        assert!(params.contains(&("sort".to_string(), "order:asc".to_string())));
        assert!(!params.iter().any(|(k, _)| k.starts_with("pagination")));
    }

    #[test]
    fn test_unconstrained_query_params() {
        let params = StrapiSource::query_params(&QueryDescriptor::single("about"));
        assert_eq!(params, vec![("populate".to_string(), "*".to_string())]);

        let params = StrapiSource::query_params(&QueryDescriptor::single("about").visible_when("is_active"));
        assert!(params.contains(&("pagination[pageSize]".to_string(), "1".to_string())));
    }

    #[test]
    fn test_normalize_v4_collection() {
        let body = json!({
            "data": [{
                "id": 4,
                "attributes": {
                    "title": "Warehousing",
                    "order": 2,
                    "image": {"data": {"id": 9, "attributes": {"url": "/uploads/wh.jpg"}}}
                }
            }],
            "meta": {"pagination": {"total": 1}}
        });

        let records = StrapiSource::normalize(body).unwrap();
        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.id().as_deref(), Some("4"));
        assert_eq!(record.get_str("title"), Some("Warehousing"));
        assert_eq!(record.get("image").unwrap()["url"], json!("/uploads/wh.jpg"));
    }

    #[test]
    fn test_normalize_v5_single_type() {
        let body = json!({"data": {"id": 1, "documentId": "abc", "title": "About us"}});
        let records = StrapiSource::normalize(body).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].get_str("documentId"), Some("abc"));
        assert_eq!(records[0].get_str("title"), Some("About us"));
    }

    #[test]
    fn test_normalize_null_data_is_empty() {
        assert!(StrapiSource::normalize(json!({"data": null})).unwrap().is_empty());
        assert!(StrapiSource::normalize(json!([1])).is_err());
    }
}
