//! Admin API. Every route except login requires a bearer token.

use axum::{
    async_trait,
    extract::{FromRequestParts, Path, Query, State},
    http::{header::AUTHORIZATION, request::Parts, StatusCode},
    response::{IntoResponse, Json, Response},
};
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use super::AppState;
use crate::admin::{AdminClaims, AdminToken, SaveOutcome};
use crate::database::models::{
    AdminTable, ContentRow, ContentRowInput, Submission, SubmissionKind, SubmissionStatus,
};
use crate::error::{SiteError, SiteResult};

/// A verified admin bearer token.
pub struct AdminSession {
    pub claims: AdminClaims,
}

#[async_trait]
impl FromRequestParts<AppState> for AdminSession {
    type Rejection = SiteError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| SiteError::Unauthorized("missing bearer token".to_string()))?;

        let claims = state.auth.verify(token)?;
        Ok(AdminSession { claims })
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> SiteResult<Json<AdminToken>> {
    state
        .auth
        .login(&request.username, &request.password)
        .map(Json)
}

pub async fn list_rows(
    _session: AdminSession,
    State(state): State<AppState>,
    Path(table): Path<String>,
) -> SiteResult<Json<Vec<ContentRow>>> {
    let table: AdminTable = table.parse()?;
    Ok(Json(state.admin.list(table).await?))
}

pub async fn get_row(
    _session: AdminSession,
    State(state): State<AppState>,
    Path((table, id)): Path<(String, String)>,
) -> SiteResult<Json<ContentRow>> {
    let table: AdminTable = table.parse()?;
    Ok(Json(state.admin.get(table, &id).await?))
}

/// Insert when the body has no id, otherwise update. `201` on insert.
pub async fn save_row(
    session: AdminSession,
    State(state): State<AppState>,
    Path(table): Path<String>,
    Json(input): Json<ContentRowInput>,
) -> SiteResult<(StatusCode, Json<SaveOutcome>)> {
    let table: AdminTable = table.parse()?;
    let outcome = state.admin.save(table, &input).await?;
    info!(
        "{} saved {} row {}",
        session.claims.sub, table, outcome.row.id
    );

    let status = if outcome.created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(outcome)))
}

#[derive(Debug, Default, Deserialize)]
pub struct DeleteParams {
    #[serde(default)]
    pub confirm: bool,
}

/// Without `?confirm=true` nothing is deleted: the response is `409` with
/// the row that would be removed.
pub async fn delete_row(
    session: AdminSession,
    State(state): State<AppState>,
    Path((table, id)): Path<(String, String)>,
    Query(params): Query<DeleteParams>,
) -> SiteResult<Response> {
    let table: AdminTable = table.parse()?;
    let pending = state.admin.request_delete(table, &id).await?;

    if !params.confirm {
        let err = SiteError::ConfirmationRequired(format!(
            "deleting {} row {} requires ?confirm=true",
            table, id
        ));
        let body = json!({
            "error": err.kind(),
            "details": err.to_string(),
            "row": pending.row(),
        });
        return Ok((err.status_code(), Json(body)).into_response());
    }

    let row = pending.confirm().await?;
    info!("{} deleted {} row {}", session.claims.sub, table, row.id);
    Ok(Json(json!({ "deleted": row })).into_response())
}

#[derive(Debug, Deserialize)]
pub struct VisibilityRequest {
    pub visible: bool,
}

pub async fn set_visibility(
    _session: AdminSession,
    State(state): State<AppState>,
    Path((table, id)): Path<(String, String)>,
    Json(request): Json<VisibilityRequest>,
) -> SiteResult<Json<ContentRow>> {
    let table: AdminTable = table.parse()?;
    state.admin.set_visibility(table, &id, request.visible).await?;
    Ok(Json(state.admin.get(table, &id).await?))
}

#[derive(Debug, Default, Deserialize)]
pub struct SubmissionFilter {
    pub kind: Option<SubmissionKind>,
}

pub async fn list_submissions(
    _session: AdminSession,
    State(state): State<AppState>,
    Query(filter): Query<SubmissionFilter>,
) -> SiteResult<Json<Vec<Submission>>> {
    Ok(Json(state.admin.submissions(filter.kind).await?))
}

#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    pub status: SubmissionStatus,
}

pub async fn update_submission_status(
    _session: AdminSession,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<StatusRequest>,
) -> SiteResult<Json<Submission>> {
    Ok(Json(
        state
            .admin
            .update_submission_status(&id, request.status)
            .await?,
    ))
}
