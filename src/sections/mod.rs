//! Page Sections
//!
//! Binds each landing-page section to a backend, a query descriptor and a
//! fallback, and resolves it into a view the front end renders without
//! knowing where the content came from.

pub mod fallbacks;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use tracing::{debug, warn};

use crate::config::AppConfig;
use crate::content::{
    fetch_state, resolve_list, resolve_single, BackendKind, ContentRecord, ContentSources,
    FetchState, FilterValue, QueryDescriptor, ResolutionOrigin, SinglePolicy,
};
use crate::error::SiteError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionKind {
    Hero,
    About,
    Services,
    Testimonials,
    Team,
    Jobs,
}

impl SectionKind {
    pub const ALL: [SectionKind; 6] = [
        SectionKind::Hero,
        SectionKind::About,
        SectionKind::Services,
        SectionKind::Testimonials,
        SectionKind::Team,
        SectionKind::Jobs,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SectionKind::Hero => "hero",
            SectionKind::About => "about",
            SectionKind::Services => "services",
            SectionKind::Testimonials => "testimonials",
            SectionKind::Team => "team",
            SectionKind::Jobs => "jobs",
        }
    }

    pub fn is_single(&self) -> bool {
        matches!(self, SectionKind::Hero | SectionKind::About)
    }

    pub fn default_collection(&self) -> &'static str {
        match self {
            SectionKind::Hero => "hero_content",
            SectionKind::About => "about_content",
            SectionKind::Services => "services",
            SectionKind::Testimonials => "testimonials",
            SectionKind::Team => "team_members",
            SectionKind::Jobs => "job_listings",
        }
    }

    pub fn visibility_column(&self) -> &'static str {
        match self {
            SectionKind::Jobs => "is_published",
            _ => "is_active",
        }
    }
}

impl fmt::Display for SectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SectionKind {
    type Err = SiteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SectionKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| SiteError::NotFound(format!("section {}", s)))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SectionFallback {
    Single(ContentRecord),
    List(Vec<ContentRecord>),
}

/// Everything needed to resolve one section; fixed at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct SectionDefinition {
    pub kind: SectionKind,
    pub backend: BackendKind,
    pub descriptor: QueryDescriptor,
    pub fallback: SectionFallback,
    pub single_policy: SinglePolicy,
}

impl SectionDefinition {
    /// Build a definition for a section served by `backend` from
    /// `collection`. A collection may carry equality filters as a query
    /// string, e.g. `pages?slug=home`.
    pub fn new(kind: SectionKind, backend: BackendKind, collection: &str) -> Self {
        let (name, filters) = match collection.split_once('?') {
            Some((name, query)) => (name, query),
            None => (collection, ""),
        };

        let mut descriptor = if kind.is_single() {
            QueryDescriptor::single(name)
        } else {
            QueryDescriptor::list(name)
        };

        for (column, value) in url::form_urlencoded::parse(filters.as_bytes()) {
            descriptor = descriptor.filter(column.into_owned(), FilterValue::Text(value.into_owned()));
        }

        if sends_remote_constraints(backend) {
            descriptor = descriptor
                .visible_when(kind.visibility_column())
                .order_by(order_column(backend));
        }

        let fallback = if kind.is_single() {
            SectionFallback::Single(fallbacks::fallback_record(kind))
        } else {
            SectionFallback::List(fallbacks::fallback_list(kind))
        };

        // The Supabase-backed hero/about show an explicit error instead of
        // fallback copy; every other backend falls back silently.
        let single_policy = match backend {
            BackendKind::Supabase => SinglePolicy::ExplicitError,
            _ => SinglePolicy::Fallback,
        };

        Self {
            kind,
            backend,
            descriptor,
            fallback,
            single_policy,
        }
    }

    pub fn with_policy(mut self, policy: SinglePolicy) -> Self {
        self.single_policy = policy;
        self
    }

    /// Send or omit the visibility filter and sort column in the backend
    /// query. Resolution hides and orders rows locally either way.
    pub fn with_remote_constraints(mut self, enabled: bool) -> Self {
        if enabled {
            self.descriptor.visibility = Some(self.kind.visibility_column().to_string());
            self.descriptor.order_by = Some(order_column(self.backend).to_string());
        } else {
            self.descriptor.visibility = None;
            self.descriptor.order_by = None;
        }
        self
    }
}

/// Strapi and Appwrite reject filter or sort keys missing from the content
/// type, so they only get them when a section opts in.
fn sends_remote_constraints(backend: BackendKind) -> bool {
    !matches!(backend, BackendKind::Strapi | BackendKind::Appwrite)
}

fn order_column(backend: BackendKind) -> &'static str {
    match backend {
        BackendKind::Strapi | BackendKind::Decap => "order",
        _ => "display_order",
    }
}

/// A resolved section as sent to the front end. `data` is an object for
/// single-record sections (null when unavailable) and an array for lists.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionView {
    pub section: SectionKind,
    pub backend: BackendKind,
    pub origin: ResolutionOrigin,
    pub data: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct HomePage {
    pub hero: SectionView,
    pub about: SectionView,
    pub services: SectionView,
    pub testimonials: SectionView,
}

/// Section definitions plus the sources that serve them.
#[derive(Clone)]
pub struct SiteContent {
    sources: ContentSources,
    sections: HashMap<SectionKind, SectionDefinition>,
}

impl SiteContent {
    pub fn new(sources: ContentSources, definitions: impl IntoIterator<Item = SectionDefinition>) -> Self {
        let mut sections: HashMap<_, _> = SectionKind::ALL
            .into_iter()
            .map(|kind| {
                (
                    kind,
                    SectionDefinition::new(kind, BackendKind::Local, kind.default_collection()),
                )
            })
            .collect();

        for definition in definitions {
            sections.insert(definition.kind, definition);
        }

        Self { sources, sections }
    }

    pub fn from_config(config: &AppConfig, sources: ContentSources) -> Self {
        let definitions = SectionKind::ALL.into_iter().map(|kind| {
            let definition =
                SectionDefinition::new(kind, config.backend_for(kind), &config.collection_for(kind));
            match config.content.remote_constraints.get(&kind) {
                Some(&enabled) => definition.with_remote_constraints(enabled),
                None => definition,
            }
        });
        Self::new(sources, definitions)
    }

    pub fn definition(&self, kind: SectionKind) -> Option<&SectionDefinition> {
        self.sections.get(&kind)
    }

    /// One read for the section, with no fallback applied.
    pub async fn fetch(&self, kind: SectionKind) -> FetchState<Vec<ContentRecord>> {
        let Some(definition) = self.sections.get(&kind) else {
            return FetchState::Failed(format!("section {} is not defined", kind));
        };

        match self.sources.get(definition.backend) {
            Ok(source) => fetch_state(source.as_ref(), &definition.descriptor).await,
            Err(e) => {
                warn!("Section {} has no source: {}", kind, e);
                FetchState::Failed(e.to_string())
            }
        }
    }

    pub async fn section(&self, kind: SectionKind) -> SectionView {
        let state = self.fetch(kind).await;
        let backend = self
            .sections
            .get(&kind)
            .map(|d| d.backend)
            .unwrap_or_default();

        let view = match self.sections.get(&kind).map(|d| (&d.fallback, d.single_policy)) {
            Some((SectionFallback::Single(fallback), policy)) => {
                let resolved = resolve_single(state, fallback, policy);
                SectionView {
                    section: kind,
                    backend,
                    origin: resolved.origin,
                    data: resolved.record.map(ContentRecord::into_value).unwrap_or(Value::Null),
                    notice: resolved.notice,
                }
            }
            Some((SectionFallback::List(fallback), _)) => {
                let resolved = resolve_list(state, fallback);
                SectionView {
                    section: kind,
                    backend,
                    origin: resolved.origin,
                    data: Value::Array(
                        resolved.items.into_iter().map(ContentRecord::into_value).collect(),
                    ),
                    notice: resolved.notice,
                }
            }
            None => SectionView {
                section: kind,
                backend,
                origin: ResolutionOrigin::Unavailable,
                data: Value::Null,
                notice: Some(format!("section {} is not defined", kind)),
            },
        };

        debug!("Section {} resolved from {:?}", kind, view.origin);
        view
    }

    /// Hero, about, services and testimonials, resolved concurrently and
    /// independently.
    pub async fn home_page(&self) -> HomePage {
        let (hero, about, services, testimonials) = tokio::join!(
            self.section(SectionKind::Hero),
            self.section(SectionKind::About),
            self.section(SectionKind::Services),
            self.section(SectionKind::Testimonials),
        );

        HomePage {
            hero,
            about,
            services,
            testimonials,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_definition_parses_collection_filters() {
        let definition = SectionDefinition::new(SectionKind::Hero, BackendKind::WordPress, "pages?slug=home");
        assert_eq!(definition.descriptor.collection, "pages");
        assert_eq!(
            definition.descriptor.filters,
            vec![("slug".to_string(), FilterValue::Text("home".to_string()))]
        );
        assert!(definition.descriptor.is_single());
        assert_eq!(definition.single_policy, SinglePolicy::Fallback);
    }

    #[test]
    fn test_supabase_single_sections_show_errors() {
        let definition = SectionDefinition::new(SectionKind::About, BackendKind::Supabase, "about_content");
        assert_eq!(definition.single_policy, SinglePolicy::ExplicitError);
        assert_eq!(definition.descriptor.visibility.as_deref(), Some("is_active"));
    }

    #[test]
    fn test_jobs_use_published_flag() {
        let definition = SectionDefinition::new(SectionKind::Jobs, BackendKind::Supabase, "job_listings");
        assert_eq!(definition.descriptor.visibility.as_deref(), Some("is_published"));
        assert_eq!(definition.descriptor.order_by.as_deref(), Some("display_order"));
    }

    #[test]
    fn test_schema_strict_backends_skip_remote_constraints() {
        for backend in [BackendKind::Strapi, BackendKind::Appwrite] {
            let definition = SectionDefinition::new(SectionKind::Team, backend, "team-members");
            assert_eq!(definition.descriptor.visibility, None);
            assert_eq!(definition.descriptor.order_by, None);
        }

        let definition = SectionDefinition::new(SectionKind::Jobs, BackendKind::Strapi, "job-listings")
            .with_remote_constraints(true);
        assert_eq!(definition.descriptor.visibility.as_deref(), Some("is_published"));
        assert_eq!(definition.descriptor.order_by.as_deref(), Some("order"));

        let definition = SectionDefinition::new(SectionKind::Services, BackendKind::Supabase, "services")
            .with_remote_constraints(false);
        assert_eq!(definition.descriptor.visibility, None);
    }

    #[tokio::test]
    async fn test_missing_source_falls_back() {
        let content = SiteContent::new(
            ContentSources::new(),
            [SectionDefinition::new(SectionKind::Services, BackendKind::Strapi, "services")],
        );

        let view = content.section(SectionKind::Services).await;
        assert_eq!(view.origin, ResolutionOrigin::Fallback);
        assert!(view.notice.is_some());
        assert_eq!(
            view.data.as_array().map(Vec::len),
            Some(fallbacks::fallback_list(SectionKind::Services).len())
        );
    }
}
