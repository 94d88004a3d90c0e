use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::fmt;
use std::time::Duration;
use url::Url;

use crate::config::AuthConfig;

use super::config::GithubEndpoints;
use super::errors::ProviderError;
use super::types::{AccessToken, GithubOrganization, GithubProvider, GithubUser, TokenResponse};

const GITHUB_API_VERSION: &str = "2022-11-28";

fn get_client() -> Result<reqwest::Client, ProviderError> {
    reqwest::Client::builder()
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .pool_idle_timeout(Duration::from_secs(90))
        .pool_max_idle_per_host(32)
        .build()
        .map_err(|e| ProviderError::HttpClient(e.to_string()))
}

/// [`GithubProvider`] talking to github.com (or a GitHub Enterprise host) over HTTPS.
///
/// Requests have no timeout and are never retried; a failure surfaces to
/// the caller as it is.
#[derive(Clone)]
pub struct GithubClient {
    client_id: String,
    client_secret: String,
    endpoints: GithubEndpoints,
    redirect_uri: Option<String>,
    http: reqwest::Client,
}

impl GithubClient {
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        endpoints: GithubEndpoints,
    ) -> Result<Self, ProviderError> {
        Ok(Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            endpoints,
            redirect_uri: None,
            http: get_client()?,
        })
    }

    pub fn from_config(config: &AuthConfig) -> Result<Self, ProviderError> {
        let client = Self::new(
            config.client_id(),
            config.client_secret(),
            config.endpoints().clone(),
        )?;
        Ok(match config.redirect_uri() {
            Some(uri) => client.with_redirect_uri(uri),
            None => client,
        })
    }

    pub fn with_redirect_uri(mut self, redirect_uri: impl Into<String>) -> Self {
        self.redirect_uri = Some(redirect_uri.into());
        self
    }

    async fn api_get<T>(
        &self,
        path: &str,
        token: &AccessToken,
        to_error: fn(String) -> ProviderError,
    ) -> Result<T, ProviderError>
    where
        T: DeserializeOwned,
    {
        let url = format!("{}/{}", self.endpoints.api_base_url, path);
        let response = self
            .http
            .get(&url)
            .bearer_auth(token.secret())
            .header(reqwest::header::ACCEPT, "application/vnd.github+json")
            .header("X-GitHub-Api-Version", GITHUB_API_VERSION)
            .send()
            .await
            .map_err(|e| to_error(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            tracing::debug!("GET {} returned {}", url, status);
            return Err(to_error(status.to_string()));
        }

        let response_body = response.text().await.map_err(|e| to_error(e.to_string()))?;
        serde_json::from_str(&response_body)
            .map_err(|e| ProviderError::Serde(format!("Failed to deserialize response body: {e}")))
    }
}

impl fmt::Debug for GithubClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GithubClient")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[redacted]")
            .field("endpoints", &self.endpoints)
            .field("redirect_uri", &self.redirect_uri)
            .finish()
    }
}

#[async_trait]
impl GithubProvider for GithubClient {
    fn authorize_url(&self, scope: &str, state: &str) -> Result<String, ProviderError> {
        let mut params = vec![
            ("client_id", self.client_id.as_str()),
            ("scope", scope),
            ("state", state),
        ];
        if let Some(redirect_uri) = &self.redirect_uri {
            params.push(("redirect_uri", redirect_uri.as_str()));
        }

        let url = Url::parse_with_params(&self.endpoints.authorize_url, &params)
            .map_err(|e| ProviderError::AuthorizeUrl(e.to_string()))?;
        Ok(url.into())
    }

    async fn exchange_code(&self, code: &str) -> Result<AccessToken, ProviderError> {
        let mut form = vec![
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("code", code),
        ];
        if let Some(redirect_uri) = &self.redirect_uri {
            form.push(("redirect_uri", redirect_uri.as_str()));
        }

        let response = self
            .http
            .post(&self.endpoints.token_url)
            .header(reqwest::header::ACCEPT, "application/json")
            .form(&form)
            .send()
            .await
            .map_err(|e| ProviderError::TokenExchange(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            tracing::debug!("Token Exchange Response: {:#?}", response);
            return Err(ProviderError::TokenExchange(status.to_string()));
        }

        let response_body = response
            .text()
            .await
            .map_err(|e| ProviderError::TokenExchange(e.to_string()))?;
        let token_response: TokenResponse = serde_json::from_str(&response_body)
            .map_err(|e| ProviderError::TokenExchange(e.to_string()))?;

        if let Some(error) = token_response.error {
            let description = token_response.error_description.unwrap_or_default();
            return Err(ProviderError::TokenExchange(format!("{error}: {description}")));
        }

        tracing::debug!("Token granted with scope {:?}", token_response.scope);
        token_response
            .access_token
            .map(AccessToken::new)
            .ok_or_else(|| {
                ProviderError::TokenExchange("Access token not present in response".to_string())
            })
    }

    async fn get_authenticated_user(
        &self,
        token: &AccessToken,
    ) -> Result<GithubUser, ProviderError> {
        self.api_get("user", token, ProviderError::FetchUserInfo)
            .await
    }

    async fn get_user_organizations(
        &self,
        token: &AccessToken,
    ) -> Result<Vec<GithubOrganization>, ProviderError> {
        self.api_get("user/orgs?per_page=100", token, ProviderError::FetchOrganizations)
            .await
    }
}
