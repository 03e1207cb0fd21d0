pub mod admin;
pub mod config;
pub mod content;
pub mod database;
pub mod error;
pub mod mail;
pub mod sections;
pub mod server;
pub mod submissions;

pub use error::{SiteError, SiteResult};
