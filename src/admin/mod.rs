//! Admin console: authentication and CRUD over the content tables and
//! submissions.

pub mod auth;
pub mod manager;

pub use auth::{password_digest, AdminAuth, AdminClaims, AdminToken};
pub use manager::{AdminManager, PendingDelete, SaveOutcome};
