//! Command handler seam.

use std::sync::Arc;

use async_trait::async_trait;
use lamgr_core::{MessageIn, MessageSink};
use serde_json::Value;
use thiserror::Error;

/// Failure while handling one inbound command.
///
/// The channel logs these and sends no response.
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("Handler failed: {0}")]
    Failed(String),
}

/// Application logic behind a message channel.
///
/// `surface` is the sink of the channel the message arrived on. Handlers
/// that answer later, or keep pushing notifications, hold on to it.
#[async_trait]
pub trait MessageHandler: Send + Sync {
    /// Handle `message`, returning the response payload if there is one.
    async fn handle(
        &self,
        surface: &Arc<dyn MessageSink>,
        message: &MessageIn,
    ) -> Result<Option<Value>, HandlerError>;
}
