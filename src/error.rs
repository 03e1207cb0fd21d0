use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use thiserror::Error;

impl From<serde_json::Error> for SiteError {
    fn from(err: serde_json::Error) -> Self {
        Self::ValidationError(format!("JSON serialization error: {}", err))
    }
}

impl From<sqlx::Error> for SiteError {
    fn from(err: sqlx::Error) -> Self {
        Self::DatabaseError(format!("Database error: {}", err))
    }
}

impl From<reqwest::Error> for SiteError {
    fn from(err: reqwest::Error) -> Self {
        Self::BackendError {
            backend: "http".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<config::ConfigError> for SiteError {
    fn from(err: config::ConfigError) -> Self {
        Self::ConfigError(err.to_string())
    }
}

#[derive(Error, Debug)]
pub enum SiteError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("{backend} backend error: {message}")]
    BackendError { backend: String, message: String },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Confirmation required: {0}")]
    ConfirmationRequired(String),

    #[error("Delivery error: {0}")]
    DeliveryError(String),
}

impl SiteError {
    pub fn backend(backend: impl Into<String>, message: impl Into<String>) -> Self {
        Self::BackendError {
            backend: backend.into(),
            message: message.into(),
        }
    }

    pub fn missing_fields(fields: &[&str]) -> Self {
        Self::ValidationError(format!("Missing or invalid fields: {}", fields.join(", ")))
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::ConfigError(_) | Self::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::BackendError { .. } | Self::DeliveryError(_) => StatusCode::BAD_GATEWAY,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::ValidationError(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::ConfirmationRequired(_) => StatusCode::CONFLICT,
        }
    }

    /// Short machine-facing label used as the `error` field of JSON bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ConfigError(_) => "configuration",
            Self::DatabaseError(_) => "database",
            Self::BackendError { .. } => "backend",
            Self::NotFound(_) => "not_found",
            Self::ValidationError(_) => "validation",
            Self::Unauthorized(_) => "unauthorized",
            Self::ConfirmationRequired(_) => "confirmation_required",
            Self::DeliveryError(_) => "delivery",
        }
    }
}

impl IntoResponse for SiteError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        }
        let body = Json(serde_json::json!({
            "error": self.kind(),
            "details": self.to_string(),
        }));
        (status, body).into_response()
    }
}

pub type SiteResult<T> = Result<T, SiteError>;
