use axum::{
    extract::{RawQuery, State},
    http::StatusCode,
    response::Response,
};

use github_org_auth::{AuthError, CallbackQuery, complete_callback, end_session};

use super::error::IntoResponseError;
use super::middleware::found;
use super::session::GithubSession;
use super::state::GithubAuthState;

/// Where GitHub sends the browser back to after consent.
///
/// The query is read raw so that repeated parameters are answered by the
/// state check instead of a 400 from the extractor.
pub(crate) async fn github_callback(
    State(state): State<GithubAuthState>,
    session: GithubSession,
    RawQuery(raw): RawQuery,
) -> Result<Response, (StatusCode, String)> {
    let query = CallbackQuery::from_query(raw.as_deref());
    let mut session = session.lock().await;
    let outcome = complete_callback(&state.config, &*state.provider, &mut *session, &query)
        .await
        .into_response_error()?;

    Ok(found(&outcome.redirect_to))
}

pub(crate) async fn github_logout(
    session: GithubSession,
) -> Result<Response, (StatusCode, String)> {
    let principal = end_session(&mut *session.lock().await)
        .await
        .map_err(AuthError::from)
        .into_response_error()?;

    if let Some(principal) = principal {
        tracing::info!("{} signed out", principal);
    }
    Ok(found("/"))
}
