use serde::Serialize;
use tracing::{debug, warn};

use super::query::QueryDescriptor;
use super::record::ContentRecord;
use super::source::ContentSource;
use crate::error::SiteResult;

/// Lifecycle of one content read: `Loading` until the request settles, then
/// `Loaded` or `Failed`. Never substitutes fallback content itself.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchState<T> {
    Loading,
    Loaded(T),
    Failed(String),
}

/// Wire form of a fetch state: `{data, loading, error}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FetchSnapshot<T> {
    pub data: Option<T>,
    pub loading: bool,
    pub error: Option<String>,
}

impl<T> FetchState<T> {
    pub fn from_result(result: SiteResult<T>) -> Self {
        match result {
            Ok(data) => FetchState::Loaded(data),
            Err(e) => FetchState::Failed(e.to_string()),
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, FetchState::Loading)
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            FetchState::Loaded(data) => Some(data),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            FetchState::Failed(message) => Some(message),
            _ => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> FetchState<U> {
        match self {
            FetchState::Loading => FetchState::Loading,
            FetchState::Loaded(data) => FetchState::Loaded(f(data)),
            FetchState::Failed(message) => FetchState::Failed(message),
        }
    }

    pub fn into_snapshot(self) -> FetchSnapshot<T> {
        match self {
            FetchState::Loading => FetchSnapshot {
                data: None,
                loading: true,
                error: None,
            },
            FetchState::Loaded(data) => FetchSnapshot {
                data: Some(data),
                loading: false,
                error: None,
            },
            FetchState::Failed(message) => FetchSnapshot {
                data: None,
                loading: false,
                error: Some(message),
            },
        }
    }
}

/// Issue exactly one read for the descriptor and settle its state.
///
/// Single-mode descriptors go through `fetch_one` and yield zero or one rows.
pub async fn fetch_state(
    source: &dyn ContentSource,
    descriptor: &QueryDescriptor,
) -> FetchState<Vec<ContentRecord>> {
    debug!(
        "Fetching {} from {} ({:?})",
        descriptor.collection,
        source.backend(),
        descriptor.mode
    );

    let result = if descriptor.is_single() {
        source
            .fetch_one(descriptor)
            .await
            .map(|row| row.into_iter().collect::<Vec<_>>())
    } else {
        source.fetch_many(descriptor).await
    };

    if let Err(e) = &result {
        warn!(
            "Fetch of {} from {} failed: {}",
            descriptor.collection,
            source.backend(),
            e
        );
    }

    FetchState::from_result(result)
}
