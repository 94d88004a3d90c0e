mod client;
mod config;
mod errors;
mod types;

pub use client::GithubClient;
pub use config::{GITHUB_SCOPE, GithubEndpoints};
pub use errors::ProviderError;
pub use types::{AccessToken, GithubOrganization, GithubProvider, GithubUser};
