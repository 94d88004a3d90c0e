use axum::{Router, routing::get};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use github_org_auth_axum::{AuthConfig, GithubAuthState, add_github_auth};

mod handlers;
mod server;

use crate::{
    handlers::{index, public, widgets},
    server::spawn_http_server,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("{}=debug,github_org_auth=debug", env!("CARGO_CRATE_NAME")).into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AuthConfig::from_env()?;
    tracing::info!(
        "Gating on membership of {} (whitelist: /public)",
        config.organization()
    );
    let state = GithubAuthState::new(config)?;

    let app = Router::new()
        .route("/", get(index))
        .route("/public", get(public))
        .route("/api/widgets", get(widgets));
    let app = add_github_auth(app, state);

    spawn_http_server(3001, app).await??;
    Ok(())
}
