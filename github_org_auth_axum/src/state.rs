use std::sync::Arc;

use github_org_auth::{AuthConfig, CookieCodec, GithubClient, GithubProvider, ProviderError};

/// Everything the middleware and the auth routes share.
///
/// Cheap to clone; all parts are behind `Arc` and never mutated after
/// construction.
#[derive(Clone)]
pub struct GithubAuthState {
    pub(crate) config: Arc<AuthConfig>,
    pub(crate) provider: Arc<dyn GithubProvider>,
    pub(crate) codec: Arc<CookieCodec>,
}

impl GithubAuthState {
    /// Gate backed by the real GitHub API.
    pub fn new(config: AuthConfig) -> Result<Self, ProviderError> {
        let client = GithubClient::from_config(&config)?;
        Ok(Self::with_provider(config, client))
    }

    /// Gate backed by any [`GithubProvider`], e.g. a test double.
    pub fn with_provider<P>(config: AuthConfig, provider: P) -> Self
    where
        P: GithubProvider + 'static,
    {
        let codec = CookieCodec::from_config(&config);
        Self {
            config: Arc::new(config),
            provider: Arc::new(provider),
            codec: Arc::new(codec),
        }
    }

    pub fn config(&self) -> &AuthConfig {
        &self.config
    }
}

impl std::fmt::Debug for GithubAuthState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GithubAuthState")
            .field("config", &self.config)
            .field("codec", &self.codec)
            .finish_non_exhaustive()
    }
}
