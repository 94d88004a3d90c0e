use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::errors::ProviderError;

/// OAuth access token returned by the code exchange.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn secret(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken([redacted])")
    }
}

/// The subset of `GET /user` we rely on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GithubUser {
    pub login: String,
    pub id: u64,
    pub name: Option<String>,
    pub email: Option<String>,
}

/// One entry of `GET /user/orgs`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GithubOrganization {
    pub login: String,
    pub id: u64,
    pub description: Option<String>,
}

/// Body of the token endpoint. GitHub answers 200 both on success and on
/// failure, so every field is optional.
#[derive(Debug, Deserialize)]
pub(super) struct TokenResponse {
    pub(super) access_token: Option<String>,
    #[allow(dead_code)]
    pub(super) token_type: Option<String>,
    pub(super) scope: Option<String>,
    pub(super) error: Option<String>,
    pub(super) error_description: Option<String>,
}

/// What the gate needs from the identity provider.
#[async_trait]
pub trait GithubProvider: Send + Sync {
    /// Build the URL the browser is sent to. Performs no I/O.
    fn authorize_url(&self, scope: &str, state: &str) -> Result<String, ProviderError>;

    async fn exchange_code(&self, code: &str) -> Result<AccessToken, ProviderError>;

    async fn get_authenticated_user(&self, token: &AccessToken)
    -> Result<GithubUser, ProviderError>;

    async fn get_user_organizations(
        &self,
        token: &AccessToken,
    ) -> Result<Vec<GithubOrganization>, ProviderError>;
}
