/// Scope requested on every authorization redirect.
pub const GITHUB_SCOPE: &str = "user:email read:org";

const GITHUB_WEB_URL: &str = "https://github.com";
const GITHUB_API_URL: &str = "https://api.github.com";

/// Endpoints of the GitHub deployment to authenticate against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GithubEndpoints {
    pub authorize_url: String,
    pub token_url: String,
    pub api_base_url: String,
}

impl GithubEndpoints {
    /// Build endpoints for a GitHub deployment (GitHub Enterprise or a test double).
    ///
    /// `web_base` hosts the OAuth pages, `api_base` the REST API.
    pub fn with_base(web_base: &str, api_base: &str) -> Self {
        let web_base = web_base.trim_end_matches('/');
        Self {
            authorize_url: format!("{web_base}/login/oauth/authorize"),
            token_url: format!("{web_base}/login/oauth/access_token"),
            api_base_url: api_base.trim_end_matches('/').to_string(),
        }
    }
}

impl Default for GithubEndpoints {
    fn default() -> Self {
        Self::with_base(GITHUB_WEB_URL, GITHUB_API_URL)
    }
}
