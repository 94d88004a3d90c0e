use thiserror::Error;

#[derive(Debug, Error, Clone)]
pub enum ProviderError {
    #[error("Invalid authorize URL: {0}")]
    AuthorizeUrl(String),

    #[error("Http client error: {0}")]
    HttpClient(String),

    #[error("Token exchange error: {0}")]
    TokenExchange(String),

    #[error("Fetch user info error: {0}")]
    FetchUserInfo(String),

    #[error("Fetch organizations error: {0}")]
    FetchOrganizations(String),

    #[error("Serde error: {0}")]
    Serde(String),
}
