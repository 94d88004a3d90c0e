//! Routes owned by the gate and the helper that installs it

use axum::{Router, middleware, routing::get};
use tower_http::LatencyUnit;
use tower_http::trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;

use super::callback::{github_callback, github_logout};
use super::middleware::github_auth_middleware;
use super::state::GithubAuthState;

/// Router serving the OAuth callback and the logout route
///
/// The paths come from the configuration (`/oauth_callback/github` and
/// `/oauth_logout/github` by default). The router does not gate anything by
/// itself; see [`add_github_auth`].
pub fn github_auth_router(state: GithubAuthState) -> Router {
    let callback_path = state.config.callback_path().to_string();
    let logout_path = state.config.logout_path().to_string();

    Router::new()
        .route(&callback_path, get(github_callback))
        .route(&logout_path, get(github_logout))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_request(DefaultOnRequest::new().level(Level::DEBUG))
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .latency_unit(LatencyUnit::Millis),
                ),
        )
        .with_state(state)
}

/// Put every route of `app` behind the gate
///
/// Merges [`github_auth_router`] into `app` and layers
/// [`github_auth_middleware`] over the result. Routes registered on `app`
/// after this call are not gated.
pub fn add_github_auth(app: Router, state: GithubAuthState) -> Router {
    app.merge(github_auth_router(state.clone()))
        .layer(middleware::from_fn_with_state(state, github_auth_middleware))
}
