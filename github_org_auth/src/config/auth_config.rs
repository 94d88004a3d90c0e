use std::collections::HashSet;
use std::fmt;

use url::Url;

use crate::provider::GithubEndpoints;

use super::errors::ConfigError;
use super::types::{CookieKey, RouteTag};

pub const DEFAULT_COOKIE_NAME: &str = "aiogithubauth";
/// Two hours.
pub const SESSION_MAX_AGE: u64 = 7200;
pub const DEFAULT_API_PREFIX: &str = "/api/";
pub const CALLBACK_PATH: &str = "/oauth_callback/github";
pub const LOGOUT_PATH: &str = "/oauth_logout/github";

/// Process-wide configuration of the gate.
///
/// Built once before the first request and shared read-only afterwards
/// (typically behind an `Arc`). There are no setters on a built value.
#[derive(Clone)]
pub struct AuthConfig {
    client_id: String,
    client_secret: String,
    organization: String,
    cookie_key: CookieKey,
    cookie_name: String,
    cookie_max_age: u64,
    cookie_secure: bool,
    whitelist: HashSet<RouteTag>,
    api_unauthorized: bool,
    api_prefix: String,
    callback_tag: RouteTag,
    logout_tag: RouteTag,
    endpoints: GithubEndpoints,
    redirect_uri: Option<String>,
}

impl AuthConfig {
    pub fn builder(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        organization: impl Into<String>,
    ) -> AuthConfigBuilder {
        AuthConfigBuilder::new(client_id.into(), client_secret.into(), organization.into())
    }

    /// Load the configuration from the process environment (and `.env`, if present).
    ///
    /// | Variable | Meaning |
    /// |---|---|
    /// | `GITHUB_CLIENT_ID` | OAuth app client id (required) |
    /// | `GITHUB_CLIENT_SECRET` | OAuth app client secret (required) |
    /// | `GITHUB_ORG` | organization whose members are let in (required) |
    /// | `GITHUB_AUTH_COOKIE_KEY` | cookie encryption secret, generated when unset |
    /// | `GITHUB_AUTH_COOKIE_NAME` | session cookie name, default `aiogithubauth` |
    /// | `GITHUB_AUTH_COOKIE_SECURE` | mark the cookie `Secure` |
    /// | `GITHUB_AUTH_WHITELIST` | comma separated route tags exempt from the gate |
    /// | `GITHUB_AUTH_API_UNAUTHORIZED` | answer 401 under `/api/` instead of redirecting |
    /// | `GITHUB_AUTH_REDIRECT_URI` | `redirect_uri` sent to GitHub |
    /// | `GITHUB_AUTH_WEB_URL` / `GITHUB_AUTH_API_URL` | GitHub Enterprise endpoints |
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.is_empty())
                .ok_or_else(|| ConfigError::Missing(key.to_string()))
        };

        let mut builder = Self::builder(
            required("GITHUB_CLIENT_ID")?,
            required("GITHUB_CLIENT_SECRET")?,
            required("GITHUB_ORG")?,
        )
        .api_unauthorized(parse_flag(lookup("GITHUB_AUTH_API_UNAUTHORIZED").as_deref()))
        .cookie_secure(parse_flag(lookup("GITHUB_AUTH_COOKIE_SECURE").as_deref()))
        .whitelist(parse_whitelist(lookup("GITHUB_AUTH_WHITELIST").as_deref()));

        if let Some(secret) = lookup("GITHUB_AUTH_COOKIE_KEY") {
            builder = builder.cookie_key(CookieKey::from_secret(&secret)?);
        }
        if let Some(name) = lookup("GITHUB_AUTH_COOKIE_NAME") {
            builder = builder.cookie_name(name);
        }
        if let Some(uri) = lookup("GITHUB_AUTH_REDIRECT_URI") {
            builder = builder.redirect_uri(uri);
        }
        match (lookup("GITHUB_AUTH_WEB_URL"), lookup("GITHUB_AUTH_API_URL")) {
            (Some(web), Some(api)) => {
                builder = builder.endpoints(GithubEndpoints::with_base(&web, &api));
            }
            (None, None) => {}
            (Some(_), None) => return Err(ConfigError::Missing("GITHUB_AUTH_API_URL".into())),
            (None, Some(_)) => return Err(ConfigError::Missing("GITHUB_AUTH_WEB_URL".into())),
        }

        builder.build()
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn client_secret(&self) -> &str {
        &self.client_secret
    }

    pub fn organization(&self) -> &str {
        &self.organization
    }

    pub fn cookie_key(&self) -> &CookieKey {
        &self.cookie_key
    }

    pub fn cookie_name(&self) -> &str {
        &self.cookie_name
    }

    pub fn cookie_max_age(&self) -> u64 {
        self.cookie_max_age
    }

    pub fn cookie_secure(&self) -> bool {
        self.cookie_secure
    }

    pub fn api_unauthorized(&self) -> bool {
        self.api_unauthorized
    }

    pub fn api_prefix(&self) -> &str {
        &self.api_prefix
    }

    pub fn callback_path(&self) -> &str {
        self.callback_tag.as_str()
    }

    pub fn callback_tag(&self) -> &RouteTag {
        &self.callback_tag
    }

    pub fn logout_path(&self) -> &str {
        self.logout_tag.as_str()
    }

    pub fn endpoints(&self) -> &GithubEndpoints {
        &self.endpoints
    }

    pub fn redirect_uri(&self) -> Option<&str> {
        self.redirect_uri.as_deref()
    }

    /// Whether requests routed to `route` skip authentication.
    ///
    /// The logout route is always exempt.
    pub fn is_whitelisted(&self, route: &RouteTag) -> bool {
        *route == self.logout_tag || self.whitelist.contains(route)
    }

    pub fn is_callback(&self, route: &RouteTag) -> bool {
        *route == self.callback_tag
    }

    pub fn is_api_path(&self, path: &str) -> bool {
        path.starts_with(&self.api_prefix)
    }
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[redacted]")
            .field("organization", &self.organization)
            .field("cookie_key", &self.cookie_key)
            .field("cookie_name", &self.cookie_name)
            .field("cookie_max_age", &self.cookie_max_age)
            .field("cookie_secure", &self.cookie_secure)
            .field("whitelist", &self.whitelist)
            .field("api_unauthorized", &self.api_unauthorized)
            .field("api_prefix", &self.api_prefix)
            .field("callback_tag", &self.callback_tag)
            .field("logout_tag", &self.logout_tag)
            .field("endpoints", &self.endpoints)
            .field("redirect_uri", &self.redirect_uri)
            .finish()
    }
}

#[derive(Debug)]
pub struct AuthConfigBuilder {
    client_id: String,
    client_secret: String,
    organization: String,
    cookie_key: Option<CookieKey>,
    cookie_name: String,
    cookie_secure: bool,
    whitelist: HashSet<RouteTag>,
    api_unauthorized: bool,
    api_prefix: String,
    callback_path: String,
    logout_path: String,
    endpoints: GithubEndpoints,
    redirect_uri: Option<String>,
}

impl AuthConfigBuilder {
    fn new(client_id: String, client_secret: String, organization: String) -> Self {
        Self {
            client_id,
            client_secret,
            organization,
            cookie_key: None,
            cookie_name: DEFAULT_COOKIE_NAME.to_string(),
            cookie_secure: false,
            whitelist: HashSet::new(),
            api_unauthorized: false,
            api_prefix: DEFAULT_API_PREFIX.to_string(),
            callback_path: CALLBACK_PATH.to_string(),
            logout_path: LOGOUT_PATH.to_string(),
            endpoints: GithubEndpoints::default(),
            redirect_uri: None,
        }
    }

    pub fn cookie_key(mut self, key: CookieKey) -> Self {
        self.cookie_key = Some(key);
        self
    }

    pub fn cookie_name(mut self, name: impl Into<String>) -> Self {
        self.cookie_name = name.into();
        self
    }

    pub fn cookie_secure(mut self, secure: bool) -> Self {
        self.cookie_secure = secure;
        self
    }

    /// Exempt every route in `routes` from authentication.
    pub fn whitelist<I, T>(mut self, routes: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<RouteTag>,
    {
        self.whitelist.extend(routes.into_iter().map(Into::into));
        self
    }

    pub fn api_unauthorized(mut self, enabled: bool) -> Self {
        self.api_unauthorized = enabled;
        self
    }

    pub fn api_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.api_prefix = prefix.into();
        self
    }

    pub fn callback_path(mut self, path: impl Into<String>) -> Self {
        self.callback_path = path.into();
        self
    }

    pub fn logout_path(mut self, path: impl Into<String>) -> Self {
        self.logout_path = path.into();
        self
    }

    pub fn endpoints(mut self, endpoints: GithubEndpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    pub fn redirect_uri(mut self, uri: impl Into<String>) -> Self {
        self.redirect_uri = Some(uri.into());
        self
    }

    pub fn build(self) -> Result<AuthConfig, ConfigError> {
        for (name, value) in [
            ("client_id", &self.client_id),
            ("client_secret", &self.client_secret),
            ("organization", &self.organization),
            ("cookie_name", &self.cookie_name),
        ] {
            if value.is_empty() {
                return Err(ConfigError::Missing(name.to_string()));
            }
        }

        if !is_cookie_token(&self.cookie_name) {
            return Err(ConfigError::invalid(
                "cookie_name",
                "must be a cookie token without separators or whitespace",
            ));
        }

        for (name, value) in [
            ("api_prefix", &self.api_prefix),
            ("callback_path", &self.callback_path),
            ("logout_path", &self.logout_path),
        ] {
            if !value.starts_with('/') {
                return Err(ConfigError::invalid(name, "must start with '/'"));
            }
        }

        for (name, value) in [
            ("authorize_url", &self.endpoints.authorize_url),
            ("token_url", &self.endpoints.token_url),
            ("api_base_url", &self.endpoints.api_base_url),
        ] {
            Url::parse(value).map_err(|e| ConfigError::invalid(name, e.to_string()))?;
        }

        let cookie_key = match self.cookie_key {
            Some(key) => key,
            None => CookieKey::generate()?,
        };

        Ok(AuthConfig {
            client_id: self.client_id,
            client_secret: self.client_secret,
            organization: self.organization,
            cookie_key,
            cookie_name: self.cookie_name,
            cookie_max_age: SESSION_MAX_AGE,
            cookie_secure: self.cookie_secure,
            whitelist: self.whitelist,
            api_unauthorized: self.api_unauthorized,
            api_prefix: self.api_prefix,
            callback_tag: RouteTag::new(self.callback_path),
            logout_tag: RouteTag::new(self.logout_path),
            endpoints: self.endpoints,
            redirect_uri: self.redirect_uri,
        })
    }
}

/// RFC 6265 cookie-name: visible ASCII except separators.
fn is_cookie_token(name: &str) -> bool {
    name.bytes()
        .all(|b| b.is_ascii_graphic() && !br#"()<>@,;:\"/[]?={}"#.contains(&b))
}

fn parse_flag(value: Option<&str>) -> bool {
    value
        .map(|v| matches!(v.trim().to_lowercase().as_str(), "true" | "1" | "yes" | "on"))
        .unwrap_or(false)
}

fn parse_whitelist(value: Option<&str>) -> Vec<RouteTag> {
    value
        .map(|v| {
            v.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(RouteTag::from)
                .collect()
        })
        .unwrap_or_default()
}
