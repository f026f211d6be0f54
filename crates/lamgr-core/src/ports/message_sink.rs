//! Outbound side of a UI surface connection.

use super::ChannelError;
use crate::message::MessageOut;

/// Port for pushing messages to one UI surface.
///
/// Implementations should hand the message off without blocking (queue it
/// for a writer task). An `Err` means the surface can no longer be reached;
/// periodic pushers treat it as their cancellation signal.
pub trait MessageSink: Send + Sync {
    fn send(&self, message: MessageOut) -> Result<(), ChannelError>;
}
