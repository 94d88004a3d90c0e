use crate::config::{AuthConfig, RouteTag};
use crate::provider::{GITHUB_SCOPE, GithubProvider};
use crate::session::{HandshakeState, Principal, SessionStore, begin_handshake};
use crate::utils::gen_random_string;

use super::errors::AuthError;

/// Random bytes in a handshake nonce.
const NONCE_BYTES: usize = 30;

/// What to do with a request before it reaches the application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    /// The session carries a principal; pass through with it attached.
    Authenticated(Principal),
    /// The target route is exempt; pass through without identity.
    Whitelisted,
    /// The request is the provider's redirect back for a handshake in flight.
    CallbackPending,
    /// API request without a session; answer 401.
    Unauthorized,
    /// A new handshake was recorded in the session; send the browser here.
    RedirectToProvider { authorize_url: String },
}

impl GateDecision {
    pub fn passes_through(&self) -> bool {
        matches!(
            self,
            Self::Authenticated(_) | Self::Whitelisted | Self::CallbackPending
        )
    }

    pub fn principal(&self) -> Option<&Principal> {
        match self {
            Self::Authenticated(principal) => Some(principal),
            _ => None,
        }
    }
}

/// Decide the disposition of one request.
///
/// `route` identifies the handler the request was routed to and `path` is
/// the request path. The first matching rule wins:
///
/// 1. authenticated session
/// 2. whitelisted route
/// 3. callback route with a handshake in flight
/// 4. API path while API-401 mode is on
/// 5. otherwise start a handshake
///
/// Only the last rule writes to the session. Building the authorize URL does
/// no network I/O.
pub async fn authorize_request<S, P>(
    config: &AuthConfig,
    provider: &P,
    session: &mut S,
    route: &RouteTag,
    path: &str,
) -> Result<GateDecision, AuthError>
where
    S: SessionStore + ?Sized,
    P: GithubProvider + ?Sized,
{
    let handshake_pending = match HandshakeState::load(&*session).await? {
        HandshakeState::Authenticated { principal } => {
            tracing::trace!("Authenticated as {} for {}", principal, path);
            return Ok(GateDecision::Authenticated(principal));
        }
        HandshakeState::PendingHandshake { .. } => true,
        HandshakeState::Unauthenticated => false,
    };

    if config.is_whitelisted(route) {
        tracing::trace!("Route {} is whitelisted", route);
        return Ok(GateDecision::Whitelisted);
    }

    if handshake_pending && config.is_callback(route) {
        tracing::debug!("Letting GitHub callback through for pending handshake");
        return Ok(GateDecision::CallbackPending);
    }

    if config.api_unauthorized() && config.is_api_path(path) {
        tracing::debug!("Unauthenticated API request to {}", path);
        return Ok(GateDecision::Unauthorized);
    }

    let nonce = gen_random_string(NONCE_BYTES)?;
    let authorize_url = provider.authorize_url(GITHUB_SCOPE, &nonce)?;
    begin_handshake(session, &nonce, path).await?;

    tracing::debug!("Starting GitHub handshake for {}", path);
    Ok(GateDecision::RedirectToProvider { authorize_url })
}
