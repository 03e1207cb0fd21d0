//! Configuration loader
//! Layers an optional TOML file under `SITE__*` environment variables

use config::{Config, Environment, File, FileFormat};
use std::path::Path;
use tracing::info;

use super::AppConfig;
use crate::content::BackendKind;
use crate::error::SiteError;
use crate::sections::SectionKind;

const DEFAULT_CONFIG_PATH: &str = "site.toml";

impl AppConfig {
    /// Load configuration from `$SITE_CONFIG` (default `site.toml`, optional)
    /// and the environment, then validate it.
    pub fn load() -> Result<Self, SiteError> {
        let path = std::env::var("SITE_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        let config = Self::load_from(Path::new(&path))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a specific file plus environment overrides, without validating.
    pub fn load_from(path: &Path) -> Result<Self, SiteError> {
        info!("Loading site configuration from: {:?}", path);

        let settings = Config::builder()
            .add_source(File::from(path).format(FileFormat::Toml).required(false))
            .add_source(
                Environment::with_prefix("SITE")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// Parse configuration from TOML text only.
    pub fn from_toml_str(contents: &str) -> Result<Self, SiteError> {
        let settings = Config::builder()
            .add_source(File::from_str(contents, FileFormat::Toml))
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// Validate the loaded configuration
    pub fn validate(&self) -> Result<(), SiteError> {
        self.validate_admin()?;
        self.validate_backends()?;

        if self.mail.recipient.trim().is_empty() {
            return Err(SiteError::ConfigError(
                "mail.recipient must be set".to_string(),
            ));
        }

        info!("Configuration validation completed successfully");
        Ok(())
    }

    fn validate_admin(&self) -> Result<(), SiteError> {
        if self.admin.jwt_secret.len() < 16 {
            return Err(SiteError::ConfigError(
                "admin.jwt_secret must be at least 16 characters".to_string(),
            ));
        }

        let digest = &self.admin.password_sha256;
        if digest.len() != 64 || !digest.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(SiteError::ConfigError(
                "admin.password_sha256 must be a 64-character hex SHA-256 digest".to_string(),
            ));
        }

        if self.admin.token_ttl_minutes <= 0 {
            return Err(SiteError::ConfigError(format!(
                "admin.token_ttl_minutes ({}) must be positive",
                self.admin.token_ttl_minutes
            )));
        }

        Ok(())
    }

    fn validate_backends(&self) -> Result<(), SiteError> {
        for section in SectionKind::ALL {
            let backend = self.backend_for(section);
            let configured = match backend {
                BackendKind::Local => true,
                BackendKind::Supabase => self.backends.supabase.is_some(),
                BackendKind::Strapi => self.backends.strapi.is_some(),
                BackendKind::WordPress => self.backends.wordpress.is_some(),
                BackendKind::Appwrite => self.backends.appwrite.is_some(),
                BackendKind::Decap => self.backends.decap.is_some(),
            };

            if !configured {
                return Err(SiteError::ConfigError(format!(
                    "Section {} uses backend {} but backends.{} is not configured",
                    section, backend, backend
                )));
            }
        }

        Ok(())
    }
}
