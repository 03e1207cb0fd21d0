//! WordPress REST adapter (`/wp-json/wp/v2/...`)

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use super::{get_json, records_from_array, trim_base};
use crate::config::WordPressConfig;
use crate::content::query::QueryDescriptor;
use crate::content::record::ContentRecord;
use crate::content::source::{BackendKind, ContentSource};
use crate::error::SiteResult;

/// Core fields WordPress wraps as `{rendered: "..."}`.
const RENDERED_FIELDS: [&str; 4] = ["title", "content", "excerpt", "guid"];

pub struct WordPressSource {
    base_url: String,
    credentials: Option<(String, String)>,
    http: Client,
}

impl WordPressSource {
    pub fn new(config: &WordPressConfig, http: Client) -> Self {
        let credentials = match (&config.username, &config.app_password) {
            (Some(user), Some(password)) if !user.is_empty() => {
                Some((user.clone(), password.clone()))
            }
            _ => None,
        };

        Self {
            base_url: trim_base(&config.base_url).to_string(),
            credentials,
            http,
        }
    }

    pub fn route_url(&self, collection: &str) -> String {
        format!("{}/wp-json/wp/v2/{}", self.base_url, collection)
    }

    /// Filters pass through as plain query parameters. The visibility
    /// column is not sent: the public API only returns published entries.
    /// Ordering always uses `menu_order`, the only editor-controlled sort
    /// WordPress exposes.
    pub fn query_params(descriptor: &QueryDescriptor) -> Vec<(String, String)> {
        let mut params: Vec<(String, String)> = descriptor
            .filters
            .iter()
            .map(|(column, value)| (column.clone(), value.to_string()))
            .collect();

        if descriptor.order_by.is_some() {
            params.push(("orderby".to_string(), "menu_order".to_string()));
            params.push(("order".to_string(), "asc".to_string()));
        }

        if descriptor.is_single() {
            params.push(("per_page".to_string(), "1".to_string()));
        }

        params
    }

    /// Flatten `{rendered}` wrappers, lift ACF custom fields, expose
    /// `menu_order` as `display_order`, and drop `_links`.
    pub fn normalize(mut record: ContentRecord) -> ContentRecord {
        for field in RENDERED_FIELDS {
            let rendered = record
                .get(field)
                .and_then(|v| v.get("rendered"))
                .and_then(Value::as_str)
                .map(str::to_string);
            if let Some(text) = rendered {
                record.insert(field, text);
            }
        }

        if let Some(Value::Object(acf)) = record.remove("acf") {
            for (key, value) in acf {
                if key != "id" {
                    record.insert(key, value);
                }
            }
        }

        if !record.contains("display_order") {
            if let Some(order) = record.get_i64("menu_order") {
                record.insert("display_order", order);
            }
        }

        record.remove("_links");
        record
    }
}

#[async_trait]
impl ContentSource for WordPressSource {
    fn backend(&self) -> BackendKind {
        BackendKind::WordPress
    }

    async fn fetch_many(&self, descriptor: &QueryDescriptor) -> SiteResult<Vec<ContentRecord>> {
        let mut request = self
            .http
            .get(self.route_url(&descriptor.collection))
            .query(&Self::query_params(descriptor));

        if let Some((user, password)) = &self.credentials {
            request = request.basic_auth(user, Some(password));
        }

        let body = get_json(BackendKind::WordPress, request).await?;
        Ok(records_from_array(BackendKind::WordPress, body)?
            .into_iter()
            .map(Self::normalize)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_normalize_post() {
        let raw = ContentRecord::from_value(json!({
            "id": 12,
            "slug": "about",
            "menu_order": 4,
            "title": {"rendered": "About Us"},
            "content": {"rendered": "<p>Family owned.</p>", "protected": false},
            "acf": {"mission": "Deliver on time", "id": "ignored"},
            "_links": {"self": []}
        }))
        .unwrap();

        let record = WordPressSource::normalize(raw);
        assert_eq!(record.id().as_deref(), Some("12"));
        assert_eq!(record.get_str("title"), Some("About Us"));
        assert_eq!(record.get_str("content"), Some("<p>Family owned.</p>"));
        assert_eq!(record.get_str("mission"), Some("Deliver on time"));
        assert_eq!(record.get_i64("display_order"), Some(4));
        assert!(!record.contains("_links"));
        assert!(!record.contains("acf"));
    }

    #[test]
    fn test_query_params_skip_visibility() {
        let descriptor = QueryDescriptor::single("pages")
            .filter("slug", "home")
            .visible_when("is_active")
            .order_by("display_order");

        let params = WordPressSource::query_params(&descriptor);
        assert_eq!(
            params,
            vec![
                ("slug".to_string(), "home".to_string()),
                ("orderby".to_string(), "menu_order".to_string()),
                ("order".to_string(), "asc".to_string()),
                ("per_page".to_string(), "1".to_string()),
            ]
        );
    }
}
