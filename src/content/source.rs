use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use super::query::QueryDescriptor;
use super::record::ContentRecord;
use crate::error::{SiteError, SiteResult};

/// Content backends the site can read from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// The site's own database, edited through the admin console.
    #[default]
    Local,
    Supabase,
    Strapi,
    WordPress,
    Appwrite,
    Decap,
}

impl BackendKind {
    pub const ALL: [BackendKind; 6] = [
        BackendKind::Local,
        BackendKind::Supabase,
        BackendKind::Strapi,
        BackendKind::WordPress,
        BackendKind::Appwrite,
        BackendKind::Decap,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::Local => "local",
            BackendKind::Supabase => "supabase",
            BackendKind::Strapi => "strapi",
            BackendKind::WordPress => "wordpress",
            BackendKind::Appwrite => "appwrite",
            BackendKind::Decap => "decap",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for BackendKind {
    type Err = SiteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BackendKind::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| SiteError::ConfigError(format!("Unknown content backend: {}", s)))
    }
}

/// A backend that can supply structured content for page sections.
#[async_trait]
pub trait ContentSource: Send + Sync {
    fn backend(&self) -> BackendKind;

    /// Read every row the descriptor selects, in backend order.
    async fn fetch_many(&self, descriptor: &QueryDescriptor) -> SiteResult<Vec<ContentRecord>>;

    /// Read the first row the descriptor selects.
    async fn fetch_one(&self, descriptor: &QueryDescriptor) -> SiteResult<Option<ContentRecord>> {
        Ok(self.fetch_many(descriptor).await?.into_iter().next())
    }
}

/// Content sources constructed at startup, keyed by backend.
#[derive(Clone, Default)]
pub struct ContentSources {
    sources: HashMap<BackendKind, Arc<dyn ContentSource>>,
}

impl ContentSources {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_source(mut self, source: Arc<dyn ContentSource>) -> Self {
        self.register(source);
        self
    }

    pub fn register(&mut self, source: Arc<dyn ContentSource>) {
        self.sources.insert(source.backend(), source);
    }

    pub fn get(&self, backend: BackendKind) -> SiteResult<Arc<dyn ContentSource>> {
        self.sources.get(&backend).cloned().ok_or_else(|| {
            SiteError::ConfigError(format!("No content source configured for {}", backend))
        })
    }

    pub fn backends(&self) -> Vec<BackendKind> {
        let mut kinds: Vec<_> = self.sources.keys().copied().collect();
        kinds.sort_by_key(|k| k.as_str());
        kinds
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_kind_round_trip_names() {
        for kind in BackendKind::ALL {
            assert_eq!(kind.as_str().parse::<BackendKind>().unwrap(), kind);
        }
        assert_eq!("WordPress".parse::<BackendKind>().unwrap(), BackendKind::WordPress);
        assert!("drupal".parse::<BackendKind>().is_err());
    }

    #[test]
    fn test_missing_source_is_config_error() {
        let sources = ContentSources::new();
        assert!(matches!(
            sources.get(BackendKind::Strapi),
            Err(SiteError::ConfigError(_))
        ));
    }
}
