//! github_org_auth - GitHub organization membership gate
//!
//! Every request either carries a session proving that a GitHub user in the
//! configured organization signed in, or gets sent through GitHub's OAuth
//! handshake. The session lives entirely in an encrypted cookie.
//!
//! This crate is framework agnostic. `github-org-auth-axum` wires it into
//! an axum application.

mod config;
mod coordination;
mod provider;
mod session;
mod utils;

#[cfg(test)]
mod test_utils;

pub use config::{
    AuthConfig, AuthConfigBuilder, CALLBACK_PATH, ConfigError, CookieKey, DEFAULT_API_PREFIX,
    DEFAULT_COOKIE_NAME, LOGOUT_PATH, RouteTag, SESSION_MAX_AGE,
};

pub use coordination::{
    AuthError, CallbackOutcome, CallbackQuery, GateDecision, authorize_request, complete_callback,
};

pub use provider::{
    AccessToken, GITHUB_SCOPE, GithubClient, GithubEndpoints, GithubOrganization, GithubProvider,
    GithubUser, ProviderError,
};

pub use session::{
    CookieCodec, CookieSession, DESIRED_LOCATION_KEY, GITHUB_STATE_KEY, HandshakeState, Principal,
    SessionError, SessionStore, USER_KEY, end_session,
};

pub use utils::{UtilError, gen_random_string};
