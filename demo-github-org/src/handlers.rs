use axum::{Json, response::Html};
use github_org_auth_axum::AuthUser;
use serde_json::{Value, json};

pub(crate) async fn index(user: AuthUser) -> Html<String> {
    Html(format!(
        r#"<!DOCTYPE html>
<html>
<body>
  <h1>Hey {}!</h1>
  <p>You are a member of the organization.</p>
  <p><a href="/oauth_logout/github">Logout</a></p>
</body>
</html>"#,
        user.login
    ))
}

/// Reachable without signing in; add `/public` to `GITHUB_AUTH_WHITELIST`.
pub(crate) async fn public(user: Option<AuthUser>) -> Html<String> {
    let greeting = match user {
        Some(user) => format!("Signed in as {}.", user.login),
        None => "Not signed in. <a href=\"/\">Sign in with GitHub</a>".to_string(),
    };
    Html(format!("<p>This page is public. {greeting}</p>"))
}

pub(crate) async fn widgets(user: AuthUser) -> Json<Value> {
    Json(json!({ "owner": user.login, "widgets": [] }))
}
