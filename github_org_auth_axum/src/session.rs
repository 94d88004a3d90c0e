use axum::{
    extract::{FromRequestParts, OptionalFromRequestParts},
    response::{IntoResponse, Response},
};
use axum_extra::headers::{self, HeaderMapExt};
use http::{HeaderMap, HeaderValue, StatusCode, request::Parts};
use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard};

use github_org_auth::{AuthConfig, CookieCodec, CookieSession, Principal, SessionError};

/// Session of the current request.
///
/// The middleware puts one into the request extensions before calling the
/// handler and writes it back to the cookie once the handler has returned.
/// Handlers extract it to read or change session fields.
#[derive(Clone, Debug)]
pub struct GithubSession(Arc<Mutex<CookieSession>>);

impl GithubSession {
    pub(crate) fn new(session: CookieSession) -> Self {
        Self(Arc::new(Mutex::new(session)))
    }

    pub async fn lock(&self) -> MutexGuard<'_, CookieSession> {
        self.0.lock().await
    }
}

impl<S> FromRequestParts<S> for GithubSession
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, _: &S) -> Result<Self, Self::Rejection> {
        parts.extensions.get::<Self>().cloned().ok_or_else(|| {
            tracing::error!("GithubSession requested on a route without the auth middleware");
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
        })
    }
}

/// Read the session cookie, falling back to an empty session.
pub(crate) fn load_session(headers: &HeaderMap, codec: &CookieCodec) -> CookieSession {
    headers
        .typed_get::<headers::Cookie>()
        .and_then(|cookies| cookies.get(codec.cookie_name()).map(|value| codec.open(value)))
        .unwrap_or_default()
}

/// `Set-Cookie` value for `session`, or `None` if nothing changed.
///
/// An emptied session expires the cookie instead of sealing an empty payload.
pub(crate) fn session_cookie(
    config: &AuthConfig,
    codec: &CookieCodec,
    session: &CookieSession,
) -> Result<Option<HeaderValue>, SessionError> {
    if !session.is_changed() {
        return Ok(None);
    }

    let (value, max_age) = if session.is_empty() {
        (String::new(), 0)
    } else {
        (codec.seal(session)?, codec.max_age())
    };

    let mut cookie = format!(
        "{}={value}; HttpOnly; SameSite=Lax; Path=/; Max-Age={max_age}",
        codec.cookie_name()
    );
    if config.cookie_secure() {
        cookie.push_str("; Secure");
    }

    cookie
        .parse()
        .map(Some)
        .map_err(|_| SessionError::Storage("Failed to build session cookie header".to_string()))
}

/// Rejection of [`AuthUser`] on a request without a signed-in user: `401`.
pub struct AuthRejection;

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        (StatusCode::UNAUTHORIZED, "Unauthorized").into_response()
    }
}

/// GitHub user let in by the gate, available as an Axum extractor
///
/// Present on every request whose session is authenticated. Whitelisted
/// routes are reached without one, so use `Option<AuthUser>` there.
///
/// # Example
///
/// ```no_run
/// use axum::{routing::get, Router};
/// use github_org_auth_axum::AuthUser;
///
/// async fn protected_handler(user: AuthUser) -> String {
///     format!("Hello, {}!", user.login)
/// }
///
/// let app: Router = Router::new()
///     .route("/protected", get(protected_handler));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthUser {
    /// GitHub login
    pub login: String,
}

impl From<Principal> for AuthUser {
    fn from(principal: Principal) -> Self {
        Self {
            login: principal.into_inner(),
        }
    }
}

impl<B> FromRequestParts<B> for AuthUser
where
    B: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _: &B) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Principal>()
            .cloned()
            .map(AuthUser::from)
            .ok_or_else(|| {
                tracing::debug!("No authenticated GitHub user on request");
                AuthRejection
            })
    }
}

impl<B> OptionalFromRequestParts<B> for AuthUser
where
    B: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &B,
    ) -> Result<Option<Self>, Self::Rejection> {
        let result: Result<Self, Self::Rejection> =
            <AuthUser as FromRequestParts<B>>::from_request_parts(parts, state).await;
        Ok(result.ok())
    }
}
