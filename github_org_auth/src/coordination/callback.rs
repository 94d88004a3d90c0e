use serde::Deserialize;
use subtle::ConstantTimeEq;
use url::form_urlencoded;

use crate::config::AuthConfig;
use crate::provider::GithubProvider;
use crate::session::{GITHUB_STATE_KEY, Principal, SessionStore, complete_handshake};

use super::errors::AuthError;

/// Query parameters GitHub appends when redirecting back.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CallbackQuery {
    pub state: Option<String>,
    pub code: Option<String>,
}

impl CallbackQuery {
    /// Parse a raw query string, keeping the first `state` and the first
    /// `code` when a parameter is repeated.
    pub fn from_query(raw: Option<&str>) -> Self {
        let mut query = Self::default();
        for (key, value) in form_urlencoded::parse(raw.unwrap_or_default().as_bytes()) {
            match key.as_ref() {
                "state" if query.state.is_none() => query.state = Some(value.into_owned()),
                "code" if query.code.is_none() => query.code = Some(value.into_owned()),
                _ => {}
            }
        }
        query
    }
}

/// Result of a completed handshake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallbackOutcome {
    pub principal: Principal,
    /// Path the browser asked for before the handshake started.
    pub redirect_to: String,
}

/// Complete the handshake this session started.
///
/// Nothing is sent to GitHub unless `query.state` equals the nonce stored in
/// the session. On a missing code or a failed membership check the session
/// is left as it was, so the pending handshake survives.
pub async fn complete_callback<S, P>(
    config: &AuthConfig,
    provider: &P,
    session: &mut S,
    query: &CallbackQuery,
) -> Result<CallbackOutcome, AuthError>
where
    S: SessionStore + ?Sized,
    P: GithubProvider + ?Sized,
{
    verify_state(&*session, query.state.as_deref()).await?;

    let code = query
        .code
        .as_deref()
        .filter(|code| !code.is_empty())
        .ok_or(AuthError::MissingCode)?;

    let token = provider.exchange_code(code).await?;
    let user = provider.get_authenticated_user(&token).await?;
    let organizations = provider.get_user_organizations(&token).await?;

    if !organizations
        .iter()
        .any(|org| org.login == config.organization())
    {
        return Err(AuthError::NotOrgMember {
            login: user.login,
            organization: config.organization().to_string(),
        });
    }

    let principal = Principal::new(user.login);
    let redirect_to = complete_handshake(session, &principal)
        .await?
        .unwrap_or_else(|| {
            tracing::warn!("No desired location stored for handshake, redirecting to /");
            "/".to_string()
        });

    tracing::info!("{} signed in as a member of {}", principal, config.organization());
    Ok(CallbackOutcome {
        principal,
        redirect_to,
    })
}

async fn verify_state<S>(session: &S, returned: Option<&str>) -> Result<(), AuthError>
where
    S: SessionStore + ?Sized,
{
    let expected = session.get(GITHUB_STATE_KEY).await?;

    match (expected.as_deref(), returned) {
        (Some(expected), Some(returned))
            if !expected.is_empty() && bool::from(expected.as_bytes().ct_eq(returned.as_bytes())) =>
        {
            Ok(())
        }
        _ => Err(AuthError::CsrfMismatch),
    }
}
