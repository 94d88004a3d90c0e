mod auth_config;
mod errors;
mod types;

pub use auth_config::{
    AuthConfig, AuthConfigBuilder, CALLBACK_PATH, DEFAULT_API_PREFIX, DEFAULT_COOKIE_NAME,
    LOGOUT_PATH, SESSION_MAX_AGE,
};
pub use errors::ConfigError;
pub use types::{CookieKey, RouteTag};
