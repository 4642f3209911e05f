use async_trait::async_trait;

use super::error::HeraldError;

/// Trait for chat messengers that weather reports are delivered through.
///
/// # Notes
/// - `name()` returns `&str` so registries can key on it without allocating
/// - `send_message` reports delivery as `Ok(false)` when the remote API
///   answered but refused the message, and `Err` when the call itself failed
#[async_trait]
pub trait Messenger: Send + Sync {
    /// Returns the messenger name (lowercase, unique within a registry)
    fn name(&self) -> &str;

    /// Send a plain text message to the given receiver
    async fn send_message(&self, receiver: &str, text: &str) -> Result<bool, HeraldError>;
}
