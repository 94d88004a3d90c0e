//! Axum-based mock of the GitHub endpoints the gate talks to
//!
//! Each test starts its own server on an ephemeral port, so tests never
//! share codes or call counters.

use axum::{
    Form, Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Deserialize;
use serde_json::json;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use github_org_auth::GithubEndpoints;

pub const MOCK_CLIENT_ID: &str = "mock-client-id";
pub const MOCK_CLIENT_SECRET: &str = "mock-client-secret";

/// A GitHub account known to the mock.
#[derive(Clone, Debug)]
pub struct MockUser {
    pub login: String,
    pub id: u64,
    pub orgs: Vec<String>,
}

impl MockUser {
    pub fn new(login: &str, id: u64, orgs: &[&str]) -> Self {
        Self {
            login: login.to_string(),
            id,
            orgs: orgs.iter().map(|o| o.to_string()).collect(),
        }
    }
}

#[derive(Default)]
struct MockState {
    /// Authorization code -> account it was issued for
    codes: Mutex<HashMap<String, MockUser>>,
    /// Access token -> account
    tokens: Mutex<HashMap<String, MockUser>>,
    issued: AtomicUsize,
    token_requests: AtomicUsize,
    api_requests: AtomicUsize,
    broken_api: Mutex<bool>,
}

pub struct MockGithub {
    base_url: String,
    state: Arc<MockState>,
}

impl MockGithub {
    pub async fn start() -> Self {
        let state = Arc::new(MockState::default());
        let app = Router::new()
            .route("/login/oauth/access_token", post(access_token))
            .route("/api/user", get(user))
            .route("/api/user/orgs", get(user_orgs))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind mock GitHub");
        let addr = listener.local_addr().expect("local addr");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("mock GitHub server");
        });

        Self {
            base_url: format!("http://{addr}"),
            state,
        }
    }

    pub fn endpoints(&self) -> GithubEndpoints {
        GithubEndpoints::with_base(&self.base_url, &format!("{}/api", self.base_url))
    }

    /// Issue an authorization code for `user`, as GitHub would after consent.
    pub fn issue_code(&self, user: &MockUser) -> String {
        let n = self.state.issued.fetch_add(1, Ordering::SeqCst);
        let code = format!("code-{}-{n}", user.login);
        self.state
            .codes
            .lock()
            .expect("codes lock")
            .insert(code.clone(), user.clone());
        code
    }

    /// Make every REST API call answer 502.
    pub fn break_api(&self) {
        *self.state.broken_api.lock().expect("flag lock") = true;
    }

    pub fn token_requests(&self) -> usize {
        self.state.token_requests.load(Ordering::SeqCst)
    }

    pub fn api_requests(&self) -> usize {
        self.state.api_requests.load(Ordering::SeqCst)
    }
}

#[derive(Deserialize)]
struct TokenForm {
    client_id: String,
    client_secret: String,
    code: String,
}

async fn access_token(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Form(form): Form<TokenForm>,
) -> Response {
    state.token_requests.fetch_add(1, Ordering::SeqCst);

    if headers.get(header::ACCEPT).and_then(|v| v.to_str().ok()) != Some("application/json") {
        return (StatusCode::NOT_ACCEPTABLE, "expected Accept: application/json").into_response();
    }

    // GitHub reports token errors with a 200 status.
    if form.client_id != MOCK_CLIENT_ID || form.client_secret != MOCK_CLIENT_SECRET {
        return Json(json!({
            "error": "incorrect_client_credentials",
            "error_description": "The client_id and/or client_secret passed are incorrect."
        }))
        .into_response();
    }

    let Some(user) = state.codes.lock().expect("codes lock").remove(&form.code) else {
        return Json(json!({
            "error": "bad_verification_code",
            "error_description": "The code passed is incorrect or expired."
        }))
        .into_response();
    };

    let token = format!("gho_{}", form.code);
    state
        .tokens
        .lock()
        .expect("tokens lock")
        .insert(token.clone(), user);

    Json(json!({
        "access_token": token,
        "token_type": "bearer",
        "scope": "read:org,user:email"
    }))
    .into_response()
}

fn authenticate(state: &MockState, headers: &HeaderMap) -> Result<MockUser, Response> {
    state.api_requests.fetch_add(1, Ordering::SeqCst);

    if *state.broken_api.lock().expect("flag lock") {
        return Err((StatusCode::BAD_GATEWAY, "upstream unavailable").into_response());
    }

    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .unwrap_or_default();

    state
        .tokens
        .lock()
        .expect("tokens lock")
        .get(token)
        .cloned()
        .ok_or_else(|| {
            (
                StatusCode::UNAUTHORIZED,
                Json(json!({"message": "Bad credentials"})),
            )
                .into_response()
        })
}

async fn user(State(state): State<Arc<MockState>>, headers: HeaderMap) -> Response {
    match authenticate(&state, &headers) {
        Ok(user) => Json(json!({
            "login": user.login,
            "id": user.id,
            "node_id": "MDQ6VXNlcjE=",
            "type": "User",
            "name": null,
            "email": null
        }))
        .into_response(),
        Err(response) => response,
    }
}

async fn user_orgs(State(state): State<Arc<MockState>>, headers: HeaderMap) -> Response {
    match authenticate(&state, &headers) {
        Ok(user) => {
            let orgs: Vec<_> = user
                .orgs
                .iter()
                .enumerate()
                .map(|(i, login)| {
                    json!({
                        "login": login,
                        "id": 1000 + i as u64,
                        "url": format!("https://api.github.com/orgs/{login}"),
                        "description": null
                    })
                })
                .collect();
            Json(orgs).into_response()
        }
        Err(response) => response,
    }
}
