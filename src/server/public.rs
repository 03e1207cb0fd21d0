use axum::{
    extract::{Path, State},
    response::Json,
};
use serde_json::Value;
use tracing::debug;

use super::AppState;
use crate::content::{ContentRecord, FetchSnapshot};
use crate::error::SiteResult;
use crate::sections::{HomePage, SectionKind, SectionView};

pub async fn home_page(State(state): State<AppState>) -> Json<HomePage> {
    debug!("Resolving home page");
    Json(state.content.home_page().await)
}

pub async fn section(
    State(state): State<AppState>,
    Path(section): Path<String>,
) -> SiteResult<Json<SectionView>> {
    let kind: SectionKind = section.parse()?;
    Ok(Json(state.content.section(kind).await))
}

/// The raw read for a section, before any fallback is applied.
pub async fn content_snapshot(
    State(state): State<AppState>,
    Path(section): Path<String>,
) -> SiteResult<Json<FetchSnapshot<Vec<Value>>>> {
    let kind: SectionKind = section.parse()?;
    let state = state.content.fetch(kind).await;
    Ok(Json(
        state
            .map(|rows| rows.into_iter().map(ContentRecord::into_value).collect())
            .into_snapshot(),
    ))
}
