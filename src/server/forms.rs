use axum::{extract::State, http::StatusCode, response::Json};
use serde_json::{json, Value};
use tracing::{error, info};

use super::AppState;
use crate::error::SiteResult;
use crate::mail::{EmailMessage, SendEmailResponse};
use crate::submissions::{
    submit, BookingRequest, ContactEnquiry, JobApplication, SubmissionForm, SubmissionReceipt,
};

/// Relay endpoint: `200 {success: true}`, `400` for blank parts, `500`
/// when the mailer fails.
pub async fn send_email(
    State(state): State<AppState>,
    Json(message): Json<EmailMessage>,
) -> Result<Json<SendEmailResponse>, (StatusCode, Json<Value>)> {
    if let Err(e) = message.validate() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Missing required fields", "details": e.to_string() })),
        ));
    }

    match state.mailer.send(&message).await {
        Ok(()) => {
            info!("Sent email '{}'", message.subject);
            Ok(Json(SendEmailResponse { success: true }))
        }
        Err(e) => {
            error!("Failed to send email '{}': {}", message.subject, e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Failed to send email", "details": e.to_string() })),
            ))
        }
    }
}

pub async fn submit_booking(
    State(state): State<AppState>,
    Json(form): Json<BookingRequest>,
) -> SiteResult<Json<SubmissionReceipt>> {
    accept(&state, &form).await
}

pub async fn submit_enquiry(
    State(state): State<AppState>,
    Json(form): Json<ContactEnquiry>,
) -> SiteResult<Json<SubmissionReceipt>> {
    accept(&state, &form).await
}

pub async fn submit_application(
    State(state): State<AppState>,
    Json(form): Json<JobApplication>,
) -> SiteResult<Json<SubmissionReceipt>> {
    accept(&state, &form).await
}

async fn accept<F: SubmissionForm>(state: &AppState, form: &F) -> SiteResult<Json<SubmissionReceipt>> {
    let receipt = submit(&state.database, &state.delivery, form).await?;
    info!("{} {} accepted", F::KIND.label(), receipt.id);
    Ok(Json(receipt))
}
