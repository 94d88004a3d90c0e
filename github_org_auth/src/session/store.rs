use async_trait::async_trait;

use super::errors::SessionError;

/// Per-browser key-value session.
///
/// This is the only view the gate and the callback have of session storage.
/// Implementations must give read-your-writes consistency within one request.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, SessionError>;

    async fn set(&mut self, key: &str, value: String) -> Result<(), SessionError>;

    /// Remove `key` and return the value it held.
    async fn pop(&mut self, key: &str) -> Result<Option<String>, SessionError>;
}
