//! Error types for the gate and the callback

use http::StatusCode;
use thiserror::Error;

use crate::provider::ProviderError;
use crate::session::SessionError;
use crate::utils::UtilError;

/// Errors that end a request during authentication
#[derive(Error, Debug)]
pub enum AuthError {
    /// The returned `state` is not the nonce this session issued
    #[error("State does not match the handshake of this session")]
    CsrfMismatch,

    /// GitHub redirected back without an authorization code
    #[error("Page not found. It's possible the session timed out while authenticating.")]
    MissingCode,

    /// Authenticated with GitHub but outside the required organization
    #[error("{login} is not a member of {organization}")]
    NotOrgMember { login: String, organization: String },

    /// Error from the identity provider
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Error from session operations
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    /// Error from utils operations
    #[error("Utils error: {0}")]
    Utils(#[from] UtilError),
}

impl AuthError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::CsrfMismatch | Self::NotOrgMember { .. } => StatusCode::FORBIDDEN,
            Self::MissingCode => StatusCode::NOT_FOUND,
            Self::Provider(_) | Self::Session(_) | Self::Utils(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Log the error and return self
    pub fn log(self) -> Self {
        match &self {
            Self::CsrfMismatch => tracing::warn!("Bad state returned from GitHub"),
            Self::MissingCode => tracing::warn!("GitHub callback without authorization code"),
            Self::NotOrgMember {
                login,
                organization,
            } => tracing::warn!("{} is not a member of {}", login, organization),
            Self::Provider(err) => tracing::error!("Provider error: {}", err),
            Self::Session(err) => tracing::error!("Session error: {}", err),
            Self::Utils(err) => tracing::error!("Utils error: {}", err),
        }
        self
    }
}
