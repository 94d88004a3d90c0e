use axum::{
    extract::{MatchedPath, Request, State},
    http::{StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};

use github_org_auth::{CookieSession, GateDecision, RouteTag, authorize_request};

use super::error::error_response;
use super::session::{GithubSession, load_session, session_cookie};
use super::state::GithubAuthState;

/// `302 Found` to `location`.
pub(crate) fn found(location: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location.to_string())]).into_response()
}

/// Add `Set-Cookie` for `session` if it changed.
pub(crate) fn with_session_cookie(
    state: &GithubAuthState,
    session: &CookieSession,
    mut response: Response,
) -> Response {
    match session_cookie(&state.config, &state.codec, session) {
        Ok(Some(cookie)) => {
            response.headers_mut().append(header::SET_COOKIE, cookie);
            response
        }
        Ok(None) => response,
        Err(e) => error_response(e.into()),
    }
}

/// Gate every request on a GitHub organization membership.
///
/// Install with `axum::middleware::from_fn_with_state` through
/// `Router::layer`, so that the matched route is known when this runs.
/// Requests that pass carry a [`GithubSession`] and, when signed in, the
/// [`github_org_auth::Principal`] in their extensions.
pub async fn github_auth_middleware(
    State(state): State<GithubAuthState>,
    mut req: Request,
    next: Next,
) -> Response {
    let route = req
        .extensions()
        .get::<MatchedPath>()
        .map(|matched| RouteTag::from(matched.as_str()))
        .unwrap_or_else(|| RouteTag::from(req.uri().path()));
    let path = req.uri().path().to_string();

    let mut session = load_session(req.headers(), &state.codec);
    let decision = match authorize_request(
        &state.config,
        &*state.provider,
        &mut session,
        &route,
        &path,
    )
    .await
    {
        Ok(decision) => decision,
        Err(e) => return error_response(e),
    };

    match decision {
        GateDecision::Unauthorized => StatusCode::UNAUTHORIZED.into_response(),
        GateDecision::RedirectToProvider { authorize_url } => {
            with_session_cookie(&state, &session, found(&authorize_url))
        }
        GateDecision::Authenticated(principal) => {
            req.extensions_mut().insert(principal);
            pass_through(&state, session, req, next).await
        }
        GateDecision::Whitelisted | GateDecision::CallbackPending => {
            pass_through(&state, session, req, next).await
        }
    }
}

async fn pass_through(
    state: &GithubAuthState,
    session: CookieSession,
    mut req: Request,
    next: Next,
) -> Response {
    let handle = GithubSession::new(session);
    req.extensions_mut().insert(handle.clone());

    let response = next.run(req).await;

    let session = handle.lock().await.clone();
    with_session_cookie(state, &session, response)
}
