use sha2::{Digest, Sha256};
use std::fmt;

use crate::utils::gen_random_string;

use super::errors::ConfigError;

/// Identity of a route, compared by value.
///
/// The axum integration uses the pattern a handler was registered under
/// (for example `/oauth_callback/github` or `/health`), so the whitelist can
/// name handlers without holding references to them.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RouteTag(String);

impl RouteTag {
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RouteTag {
    fn from(tag: &str) -> Self {
        Self::new(tag)
    }
}

impl From<String> for RouteTag {
    fn from(tag: String) -> Self {
        Self(tag)
    }
}

impl fmt::Display for RouteTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Symmetric key for sealing session cookies.
///
/// The AES-256-GCM key is the SHA-256 digest of the configured secret, so any
/// non-empty secret string is accepted.
#[derive(Clone)]
pub struct CookieKey {
    key: [u8; 32],
}

impl CookieKey {
    pub fn from_secret(secret: &str) -> Result<Self, ConfigError> {
        if secret.is_empty() {
            return Err(ConfigError::invalid("cookie_key", "secret must not be empty"));
        }
        let digest = Sha256::digest(secret.as_bytes());
        let mut key = [0u8; 32];
        key.copy_from_slice(&digest);
        Ok(Self { key })
    }

    /// Create a random key that lives as long as the process.
    ///
    /// Sessions sealed with it do not survive a restart.
    pub fn generate() -> Result<Self, ConfigError> {
        tracing::info!("No cookie key configured, creating new cookie secret");
        let secret = gen_random_string(32)?;
        Self::from_secret(&secret)
    }

    pub(crate) fn as_bytes(&self) -> &[u8; 32] {
        &self.key
    }
}

impl fmt::Debug for CookieKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CookieKey([redacted])")
    }
}
