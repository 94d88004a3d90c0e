//! github_org_auth_axum - Axum integration for the GitHub organization gate
//!
//! ```no_run
//! use axum::{Router, routing::get};
//! use github_org_auth_axum::{AuthConfig, AuthUser, GithubAuthState, add_github_auth};
//!
//! async fn index(user: AuthUser) -> String {
//!     format!("Hello, {}!", user.login)
//! }
//!
//! # fn build() -> Result<Router, Box<dyn std::error::Error>> {
//! let state = GithubAuthState::new(AuthConfig::from_env()?)?;
//! let app = add_github_auth(Router::new().route("/", get(index)), state);
//! # Ok(app)
//! # }
//! ```

mod callback;
mod error;
mod middleware;
mod router;
mod session;
mod state;


pub use error::IntoResponseError;
pub use middleware::github_auth_middleware;
pub use router::{add_github_auth, github_auth_router};
pub use session::{AuthRejection, AuthUser, GithubSession};
pub use state::GithubAuthState;

// Re-export what applications need from the core crate
pub use github_org_auth::{
    AuthConfig, AuthConfigBuilder, AuthError, ConfigError, CookieKey, GithubEndpoints,
    GithubProvider, Principal, ProviderError, RouteTag,
};
