use axum::response::{IntoResponse, Response};
use http::StatusCode;

use github_org_auth::AuthError;

/// Helper trait for converting errors to a standard response error format
pub trait IntoResponseError<T> {
    fn into_response_error(self) -> Result<T, (StatusCode, String)>;
}

/// Every error is logged. Only the missing-code explanation reaches the
/// browser verbatim; other failures answer with the status reason so that
/// upstream details stay in the logs.
impl<T> IntoResponseError<T> for Result<T, AuthError> {
    fn into_response_error(self) -> Result<T, (StatusCode, String)> {
        self.map_err(rejection)
    }
}

fn rejection(err: AuthError) -> (StatusCode, String) {
    let err = err.log();
    let status = err.status_code();
    let body = match &err {
        AuthError::MissingCode => err.to_string(),
        _ => status.canonical_reason().unwrap_or_default().to_string(),
    };
    (status, body)
}

pub(crate) fn error_response(err: AuthError) -> Response {
    rejection(err).into_response()
}
