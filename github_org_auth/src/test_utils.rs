//! Test doubles shared by the unit tests of this crate.
//!
//! `MemorySession` stands in for the cookie-backed session and
//! `MockProvider` for GitHub. The mock records every call so tests can
//! assert that no token exchange happened.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use url::Url;

use crate::config::{AuthConfig, CookieKey};
use crate::provider::{AccessToken, GithubOrganization, GithubProvider, GithubUser, ProviderError};
use crate::session::{SessionError, SessionStore};

pub(crate) const TEST_AUTHORIZE_URL: &str = "https://github.test/login/oauth/authorize";

pub(crate) fn test_config() -> AuthConfig {
    AuthConfig::builder("test-client-id", "test-client-secret", "acme")
        .cookie_key(CookieKey::from_secret("test-cookie-secret").expect("cookie key"))
        .whitelist(["/health"])
        .build()
        .expect("test config")
}

pub(crate) fn api_config() -> AuthConfig {
    AuthConfig::builder("test-client-id", "test-client-secret", "acme")
        .cookie_key(CookieKey::from_secret("test-cookie-secret").expect("cookie key"))
        .api_unauthorized(true)
        .build()
        .expect("test config")
}

#[derive(Debug, Default)]
pub(crate) struct MemorySession {
    fields: HashMap<String, String>,
    writes: usize,
}

impl MemorySession {
    pub(crate) fn with(pairs: &[(&str, &str)]) -> Self {
        Self {
            fields: pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            writes: 0,
        }
    }

    pub(crate) fn value(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Number of `set`/`pop` calls that changed something.
    pub(crate) fn writes(&self) -> usize {
        self.writes
    }
}

#[async_trait]
impl SessionStore for MemorySession {
    async fn get(&self, key: &str) -> Result<Option<String>, SessionError> {
        Ok(self.fields.get(key).cloned())
    }

    async fn set(&mut self, key: &str, value: String) -> Result<(), SessionError> {
        self.writes += 1;
        self.fields.insert(key.to_string(), value);
        Ok(())
    }

    async fn pop(&mut self, key: &str) -> Result<Option<String>, SessionError> {
        let value = self.fields.remove(key);
        if value.is_some() {
            self.writes += 1;
        }
        Ok(value)
    }
}

#[derive(Debug)]
pub(crate) struct MockProvider {
    login: String,
    orgs: Vec<String>,
    fail_exchange: bool,
    exchange_calls: AtomicUsize,
    exchanged_codes: Mutex<Vec<String>>,
}

impl MockProvider {
    pub(crate) fn member_of(login: &str, orgs: &[&str]) -> Self {
        Self {
            login: login.to_string(),
            orgs: orgs.iter().map(|o| o.to_string()).collect(),
            fail_exchange: false,
            exchange_calls: AtomicUsize::new(0),
            exchanged_codes: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn failing_exchange() -> Self {
        Self {
            fail_exchange: true,
            ..Self::member_of("octocat", &["acme"])
        }
    }

    pub(crate) fn exchange_calls(&self) -> usize {
        self.exchange_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn exchanged_codes(&self) -> Vec<String> {
        self.exchanged_codes
            .lock()
            .expect("codes lock")
            .clone()
    }
}

#[async_trait]
impl GithubProvider for MockProvider {
    fn authorize_url(&self, scope: &str, state: &str) -> Result<String, ProviderError> {
        Url::parse_with_params(
            TEST_AUTHORIZE_URL,
            &[
                ("client_id", "test-client-id"),
                ("scope", scope),
                ("state", state),
            ],
        )
        .map(String::from)
        .map_err(|e| ProviderError::AuthorizeUrl(e.to_string()))
    }

    async fn exchange_code(&self, code: &str) -> Result<AccessToken, ProviderError> {
        self.exchange_calls.fetch_add(1, Ordering::SeqCst);
        self.exchanged_codes
            .lock()
            .expect("codes lock")
            .push(code.to_string());
        if self.fail_exchange {
            return Err(ProviderError::TokenExchange(
                "bad_verification_code".to_string(),
            ));
        }
        Ok(AccessToken::new(format!("token-for-{code}")))
    }

    async fn get_authenticated_user(
        &self,
        _token: &AccessToken,
    ) -> Result<GithubUser, ProviderError> {
        Ok(GithubUser {
            login: self.login.clone(),
            id: 1,
            name: None,
            email: None,
        })
    }

    async fn get_user_organizations(
        &self,
        _token: &AccessToken,
    ) -> Result<Vec<GithubOrganization>, ProviderError> {
        Ok(self
            .orgs
            .iter()
            .enumerate()
            .map(|(i, login)| GithubOrganization {
                login: login.clone(),
                id: i as u64 + 1,
                description: None,
            })
            .collect())
    }
}
