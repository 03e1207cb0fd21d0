//! Supabase (PostgREST) adapter

use async_trait::async_trait;
use reqwest::Client;

use super::{get_json, records_from_array, trim_base};
use crate::config::SupabaseConfig;
use crate::content::query::QueryDescriptor;
use crate::content::record::ContentRecord;
use crate::content::source::{BackendKind, ContentSource};
use crate::error::SiteResult;

pub struct SupabaseSource {
    base_url: String,
    anon_key: String,
    http: Client,
}

impl SupabaseSource {
    pub fn new(config: &SupabaseConfig, http: Client) -> Self {
        Self {
            base_url: trim_base(&config.url).to_string(),
            anon_key: config.anon_key.clone(),
            http,
        }
    }

    pub fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    /// `select=*`, `col=eq.value` per filter, `order=col.asc`, `limit=1` for
    /// single reads.
    pub fn query_params(descriptor: &QueryDescriptor) -> Vec<(String, String)> {
        let mut params = vec![("select".to_string(), "*".to_string())];

        for (column, value) in descriptor.effective_filters() {
            params.push((column, format!("eq.{}", value)));
        }

        if let Some(column) = &descriptor.order_by {
            params.push(("order".to_string(), format!("{}.asc", column)));
        }

        if descriptor.is_single() {
            params.push(("limit".to_string(), "1".to_string()));
        }

        params
    }
}

#[async_trait]
impl ContentSource for SupabaseSource {
    fn backend(&self) -> BackendKind {
        BackendKind::Supabase
    }

    async fn fetch_many(&self, descriptor: &QueryDescriptor) -> SiteResult<Vec<ContentRecord>> {
        let request = self
            .http
            .get(self.table_url(&descriptor.collection))
            .query(&Self::query_params(descriptor))
            .header("apikey", &self.anon_key)
            .bearer_auth(&self.anon_key)
            .header("Accept", "application/json");

        let body = get_json(BackendKind::Supabase, request).await?;
        records_from_array(BackendKind::Supabase, body)
    }
}
