use super::errors::SessionError;
use super::store::SessionStore;
use super::types::{DESIRED_LOCATION_KEY, GITHUB_STATE_KEY, HandshakeState, Principal, USER_KEY};

impl HandshakeState {
    /// Read the handshake state out of `session` without modifying it.
    pub async fn load<S>(session: &S) -> Result<Self, SessionError>
    where
        S: SessionStore + ?Sized,
    {
        if let Some(login) = non_empty(session.get(USER_KEY).await?) {
            return Ok(Self::Authenticated {
                principal: Principal::new(login),
            });
        }

        match non_empty(session.get(GITHUB_STATE_KEY).await?) {
            Some(nonce) => Ok(Self::PendingHandshake {
                nonce,
                return_path: session.get(DESIRED_LOCATION_KEY).await?,
            }),
            None => Ok(Self::Unauthenticated),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Record a new handshake; any previous nonce is replaced.
pub(crate) async fn begin_handshake<S>(
    session: &mut S,
    nonce: &str,
    return_path: &str,
) -> Result<(), SessionError>
where
    S: SessionStore + ?Sized,
{
    session.set(GITHUB_STATE_KEY, nonce.to_string()).await?;
    session
        .set(DESIRED_LOCATION_KEY, return_path.to_string())
        .await?;
    Ok(())
}

/// Swap the pending nonce for `principal` and hand back the stored return path.
pub(crate) async fn complete_handshake<S>(
    session: &mut S,
    principal: &Principal,
) -> Result<Option<String>, SessionError>
where
    S: SessionStore + ?Sized,
{
    session.pop(GITHUB_STATE_KEY).await?;
    session
        .set(USER_KEY, principal.login().to_string())
        .await?;
    session.pop(DESIRED_LOCATION_KEY).await
}

/// Forget the principal and any handshake in flight.
pub async fn end_session<S>(session: &mut S) -> Result<Option<Principal>, SessionError>
where
    S: SessionStore + ?Sized,
{
    let user = session.pop(USER_KEY).await?;
    session.pop(GITHUB_STATE_KEY).await?;
    session.pop(DESIRED_LOCATION_KEY).await?;
    Ok(non_empty(user).map(Principal::new))
}
