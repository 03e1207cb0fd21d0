//! Admin login and bearer tokens.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use tracing::{info, warn};

use crate::config::AdminConfig;
use crate::error::{SiteError, SiteResult};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminClaims {
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct AdminToken {
    pub token: String,
    pub token_type: &'static str,
    pub expires_at: i64,
}

/// Hex SHA-256 of a password, the form `admin.password_sha256` is stored in.
pub fn password_digest(password: &str) -> String {
    hex::encode(Sha256::digest(password.as_bytes()))
}

#[derive(Clone)]
pub struct AdminAuth {
    username: String,
    password_digest: Vec<u8>,
    secret: Vec<u8>,
    ttl: Duration,
}

impl AdminAuth {
    pub fn from_config(config: &AdminConfig) -> SiteResult<Self> {
        let password_digest = hex::decode(config.password_sha256.trim()).map_err(|e| {
            SiteError::ConfigError(format!("admin.password_sha256 is not valid hex: {}", e))
        })?;

        Ok(Self {
            username: config.username.clone(),
            password_digest,
            secret: config.jwt_secret.as_bytes().to_vec(),
            ttl: Duration::minutes(config.token_ttl_minutes),
        })
    }

    /// Constant-time check of both username and password.
    pub fn check_credentials(&self, username: &str, password: &str) -> bool {
        let supplied = Sha256::digest(password.as_bytes());
        let user_ok = username.as_bytes().ct_eq(self.username.as_bytes());
        let password_ok = supplied.as_slice().ct_eq(&self.password_digest);
        (user_ok & password_ok).into()
    }

    pub fn login(&self, username: &str, password: &str) -> SiteResult<AdminToken> {
        if !self.check_credentials(username, password) {
            warn!("Rejected admin login for '{}'", username);
            return Err(SiteError::Unauthorized("invalid credentials".to_string()));
        }

        let token = self.issue(username)?;
        info!("Admin '{}' logged in", username);
        Ok(token)
    }

    pub fn issue(&self, subject: &str) -> SiteResult<AdminToken> {
        let now = Utc::now();
        let claims = AdminClaims {
            sub: subject.to_string(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };

        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(&self.secret),
        )
        .map_err(|e| SiteError::ConfigError(format!("Failed to sign admin token: {}", e)))?;

        Ok(AdminToken {
            token,
            token_type: "Bearer",
            expires_at: claims.exp,
        })
    }

    pub fn verify(&self, token: &str) -> SiteResult<AdminClaims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        decode::<AdminClaims>(token, &DecodingKey::from_secret(&self.secret), &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => SiteError::Unauthorized("token expired".to_string()),
                _ => SiteError::Unauthorized(format!("invalid token: {}", e)),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn auth(ttl_minutes: i64) -> AdminAuth {
        AdminAuth::from_config(&AdminConfig {
            username: "admin".to_string(),
            password_sha256: password_digest("correct horse"),
            jwt_secret: "0123456789abcdef0123".to_string(),
            token_ttl_minutes: ttl_minutes,
        })
        .unwrap()
    }

    #[test]
    fn test_password_digest_is_hex_sha256() {
        assert_eq!(
            password_digest("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_login_and_verify() {
        let auth = auth(30);
        assert!(auth.login("admin", "wrong").is_err());
        assert!(auth.login("root", "correct horse").is_err());

        let token = auth.login("admin", "correct horse").unwrap();
        let claims = auth.verify(&token.token).unwrap();
        assert_eq!(claims.sub, "admin");
        assert_eq!(claims.exp, token.expires_at);
    }

    #[test]
    fn test_expired_and_foreign_tokens_rejected() {
        let expired = auth(-5).issue("admin").unwrap();
        assert!(matches!(
            auth(30).verify(&expired.token),
            Err(SiteError::Unauthorized(msg)) if msg == "token expired"
        ));

        let other = AdminAuth::from_config(&AdminConfig {
            username: "admin".to_string(),
            password_sha256: password_digest("x"),
            jwt_secret: "a-completely-different-secret".to_string(),
            token_ttl_minutes: 30,
        })
        .unwrap();
        let foreign = other.issue("admin").unwrap();
        assert!(auth(30).verify(&foreign.token).is_err());
    }
}
