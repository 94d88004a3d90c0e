use async_trait::async_trait;
use chrono::Utc;
use ring::aead::{AES_256_GCM, Aad, LessSafeKey, NONCE_LEN, Nonce, UnboundKey};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::config::{AuthConfig, CookieKey};
use crate::utils::{base64url_decode, base64url_encode, fill_random};

use super::errors::SessionError;
use super::store::SessionStore;

/// Session whose whole content travels in one encrypted cookie.
///
/// Mutations are tracked so the caller only re-issues the cookie when
/// something changed.
#[derive(Debug, Clone, Default)]
pub struct CookieSession {
    fields: BTreeMap<String, String>,
    created: Option<i64>,
    changed: bool,
}

impl CookieSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_changed(&self) -> bool {
        self.changed
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn fields(&self) -> &BTreeMap<String, String> {
        &self.fields
    }
}

#[async_trait]
impl SessionStore for CookieSession {
    async fn get(&self, key: &str) -> Result<Option<String>, SessionError> {
        Ok(self.fields.get(key).cloned())
    }

    async fn set(&mut self, key: &str, value: String) -> Result<(), SessionError> {
        self.fields.insert(key.to_string(), value);
        self.changed = true;
        Ok(())
    }

    async fn pop(&mut self, key: &str) -> Result<Option<String>, SessionError> {
        let value = self.fields.remove(key);
        if value.is_some() {
            self.changed = true;
        }
        Ok(value)
    }
}

#[derive(Serialize, Deserialize)]
struct SealedPayload {
    created: i64,
    fields: BTreeMap<String, String>,
}

/// Seals sessions into cookie values and opens them again.
///
/// Wire format: base64url(nonce || AES-256-GCM ciphertext || tag), with the
/// cookie name bound as associated data.
#[derive(Debug, Clone)]
pub struct CookieCodec {
    key: CookieKey,
    cookie_name: String,
    max_age: u64,
}

impl CookieCodec {
    pub fn new(key: CookieKey, cookie_name: impl Into<String>, max_age: u64) -> Self {
        Self {
            key,
            cookie_name: cookie_name.into(),
            max_age,
        }
    }

    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(
            config.cookie_key().clone(),
            config.cookie_name(),
            config.cookie_max_age(),
        )
    }

    pub fn cookie_name(&self) -> &str {
        &self.cookie_name
    }

    pub fn max_age(&self) -> u64 {
        self.max_age
    }

    fn aead_key(&self) -> Result<LessSafeKey, SessionError> {
        let unbound = UnboundKey::new(&AES_256_GCM, self.key.as_bytes())
            .map_err(|_| SessionError::Crypto("Failed to create cookie key".to_string()))?;
        Ok(LessSafeKey::new(unbound))
    }

    pub fn seal(&self, session: &CookieSession) -> Result<String, SessionError> {
        let payload = SealedPayload {
            created: session.created.unwrap_or_else(|| Utc::now().timestamp()),
            fields: session.fields.clone(),
        };
        let mut in_out =
            serde_json::to_vec(&payload).map_err(|e| SessionError::Serde(e.to_string()))?;

        let mut nonce_bytes = [0u8; NONCE_LEN];
        fill_random(&mut nonce_bytes)?;

        self.aead_key()?
            .seal_in_place_append_tag(
                Nonce::assume_unique_for_key(nonce_bytes),
                Aad::from(self.cookie_name.as_bytes()),
                &mut in_out,
            )
            .map_err(|_| SessionError::Crypto("Failed to seal session".to_string()))?;

        let mut sealed = nonce_bytes.to_vec();
        sealed.extend_from_slice(&in_out);
        Ok(base64url_encode(sealed)?)
    }

    /// Open a cookie value, falling back to a fresh session.
    ///
    /// A cookie that cannot be decoded, was sealed with another key or name,
    /// or is older than the max age starts a new session rather than failing
    /// the request.
    pub fn open(&self, value: &str) -> CookieSession {
        match self.try_open(value, Utc::now().timestamp()) {
            Ok(session) => session,
            Err(SessionError::Expired) => {
                tracing::debug!("Session cookie expired, starting a new session");
                CookieSession::new()
            }
            Err(e) => {
                tracing::warn!("Discarding unreadable session cookie: {}", e);
                CookieSession::new()
            }
        }
    }

    pub(crate) fn try_open(&self, value: &str, now: i64) -> Result<CookieSession, SessionError> {
        let mut sealed = base64url_decode(value)?;
        if sealed.len() < NONCE_LEN {
            return Err(SessionError::Crypto("Session cookie too short".to_string()));
        }
        let mut in_out = sealed.split_off(NONCE_LEN);
        let nonce = Nonce::try_assume_unique_for_key(&sealed)
            .map_err(|_| SessionError::Crypto("Invalid nonce".to_string()))?;

        let plaintext = self
            .aead_key()?
            .open_in_place(nonce, Aad::from(self.cookie_name.as_bytes()), &mut in_out)
            .map_err(|_| SessionError::Crypto("Failed to open session cookie".to_string()))?;

        let payload: SealedPayload =
            serde_json::from_slice(plaintext).map_err(|e| SessionError::Serde(e.to_string()))?;

        if payload.created.saturating_add(self.max_age as i64) < now {
            return Err(SessionError::Expired);
        }

        Ok(CookieSession {
            fields: payload.fields,
            created: Some(payload.created),
            changed: false,
        })
    }
}
