//! HTTP surface: public content, form intake and the admin API.

pub mod admin;
pub mod forms;
pub mod public;

use axum::{
    response::Json,
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::admin::{AdminAuth, AdminManager};
use crate::config::AppConfig;
use crate::content::sources::http_client;
use crate::content::ContentSources;
use crate::database::Database;
use crate::error::SiteResult;
use crate::mail::{mailer_from_config, Mailer};
use crate::sections::SiteContent;
use crate::submissions::SubmissionDelivery;

/// Shared, immutable state built once at startup.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub database: Database,
    pub content: Arc<SiteContent>,
    pub mailer: Arc<dyn Mailer>,
    pub delivery: Arc<SubmissionDelivery>,
    pub admin: AdminManager,
    pub auth: AdminAuth,
}

impl AppState {
    pub fn from_config(config: AppConfig, database: Database) -> SiteResult<Self> {
        let http = http_client(&config)?;
        let sources = ContentSources::from_config(&config, &database, http.clone());
        let content = SiteContent::from_config(&config, sources);

        Ok(Self {
            mailer: mailer_from_config(&config.mail, http.clone()),
            delivery: Arc::new(SubmissionDelivery::from_config(&config, http)),
            admin: AdminManager::new(database.clone()),
            auth: AdminAuth::from_config(&config.admin)?,
            content: Arc::new(content),
            config: Arc::new(config),
            database,
        })
    }

    pub fn with_content(mut self, content: SiteContent) -> Self {
        self.content = Arc::new(content);
        self
    }

    pub fn with_mailer(mut self, mailer: Arc<dyn Mailer>) -> Self {
        self.mailer = mailer;
        self
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/pages/home", get(public::home_page))
        .route("/api/sections/:section", get(public::section))
        .route("/api/content/:section", get(public::content_snapshot))
        .route("/api/send-email", post(forms::send_email))
        .route("/api/bookings", post(forms::submit_booking))
        .route("/api/enquiries", post(forms::submit_enquiry))
        .route("/api/applications", post(forms::submit_application))
        .route("/admin/login", post(admin::login))
        .route("/admin/tables/:table", get(admin::list_rows).post(admin::save_row))
        .route(
            "/admin/tables/:table/:id",
            get(admin::get_row).delete(admin::delete_row),
        )
        .route("/admin/tables/:table/:id/visibility", put(admin::set_visibility))
        .route("/admin/submissions", get(admin::list_submissions))
        .route("/admin/submissions/:id/status", put(admin::update_submission_status))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .into_inner(),
        )
        .with_state(state)
}

async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "service": env!("CARGO_PKG_NAME"),
        "timestamp": chrono::Utc::now()
    }))
}
