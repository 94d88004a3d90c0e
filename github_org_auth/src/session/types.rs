use serde::{Deserialize, Serialize};
use std::fmt;

/// Session field holding the authenticated login.
pub const USER_KEY: &str = "User";
/// Session field holding the nonce of the handshake in flight.
pub const GITHUB_STATE_KEY: &str = "github_state";
/// Session field holding the path to return to once the handshake completes.
pub const DESIRED_LOCATION_KEY: &str = "desired_location";

/// The authenticated GitHub login.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Principal(String);

impl Principal {
    pub fn new(login: impl Into<String>) -> Self {
        Self(login.into())
    }

    pub fn login(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Where a browser session stands in the login handshake.
///
/// Derived from the session fields by [`HandshakeState::load`]; `User` takes
/// precedence over a pending `github_state`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandshakeState {
    Unauthenticated,
    PendingHandshake {
        nonce: String,
        return_path: Option<String>,
    },
    Authenticated {
        principal: Principal,
    },
}

impl HandshakeState {
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::PendingHandshake { .. })
    }

    pub fn principal(&self) -> Option<&Principal> {
        match self {
            Self::Authenticated { principal } => Some(principal),
            Self::Unauthenticated | Self::PendingHandshake { .. } => None,
        }
    }
}
