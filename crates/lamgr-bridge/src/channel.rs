//! Duplex request/response channel with a UI surface.
//!
//! Inbound lines are JSON `MessageIn` envelopes. A handler's payload is sent
//! back only when the request carried a `callbackId`; everything else the
//! handler wants to say goes out as notifications through the same sink.

use std::sync::Arc;

use lamgr_core::{ChannelError, MessageIn, MessageOut, MessageSink};
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::handler::MessageHandler;

/// One channel to one UI surface.
#[derive(Clone)]
pub struct MessageChannel {
    handler: Arc<dyn MessageHandler>,
    sink: Arc<dyn MessageSink>,
}

impl MessageChannel {
    pub fn new(handler: Arc<dyn MessageHandler>, sink: Arc<dyn MessageSink>) -> Self {
        Self { handler, sink }
    }

    /// The outbound side of this channel.
    pub fn sink(&self) -> &Arc<dyn MessageSink> {
        &self.sink
    }

    /// Parse and dispatch one raw inbound line.
    pub async fn dispatch_raw(&self, raw: &str) -> Result<(), ChannelError> {
        let message: MessageIn =
            serde_json::from_str(raw).map_err(|e| ChannelError::Malformed(e.to_string()))?;
        self.dispatch(message).await;
        Ok(())
    }

    /// Run the handler and route its response.
    ///
    /// Handler errors and send failures are logged; neither reaches the
    /// surface.
    pub async fn dispatch(&self, message: MessageIn) {
        debug!(name = %message.name, callback_id = ?message.callback_id, "Dispatching message");

        let payload = match self.handler.handle(&self.sink, &message).await {
            Ok(payload) => payload,
            Err(e) => {
                warn!(name = %message.name, error = %e, "Message handler failed");
                return;
            }
        };

        let Some(response) = payload.and_then(|payload| MessageOut::response_to(&message, payload))
        else {
            return;
        };

        if let Err(e) = self.sink.send(response) {
            warn!(name = %message.name, error = %e, "Failed to send response");
        }
    }

    /// Read newline-delimited messages from `reader` until EOF or `cancel`.
    ///
    /// Blank lines are skipped; malformed lines (including invalid UTF-8) are
    /// logged and skipped. Only a transport read error ends the loop early.
    pub async fn run<R>(&self, reader: R, cancel: CancellationToken) -> Result<(), ChannelError>
    where
        R: AsyncRead + Unpin,
    {
        let mut reader = BufReader::new(reader);
        let mut buf: Vec<u8> = Vec::with_capacity(1024);

        loop {
            buf.clear();
            let read = tokio::select! {
                read = reader.read_until(b'\n', &mut buf) => read?,
                () = cancel.cancelled() => {
                    debug!("Message channel cancelled");
                    return Ok(());
                }
            };

            if read == 0 {
                info!("Message channel reached end of input");
                return Ok(());
            }

            let line = match std::str::from_utf8(&buf) {
                Ok(line) => line.trim(),
                Err(e) => {
                    warn!(error = %e, "Dropping inbound message that is not valid UTF-8");
                    continue;
                }
            };
            if line.is_empty() {
                continue;
            }

            if let Err(e) = self.dispatch_raw(line).await {
                warn!(error = %e, "Dropping inbound message");
            }
        }
    }
}
