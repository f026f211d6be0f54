//! Newline-delimited JSON transport.
//!
//! `ChannelSink` is the non-blocking outbound half handed to handlers and
//! background pushers. A single writer task owns the actual output stream
//! and serializes messages onto it in send order.

use lamgr_core::{ChannelError, MessageOut, MessageSink};
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Outbound queue in front of a writer task.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<MessageOut>,
}

impl ChannelSink {
    /// Create a sink and the receiving end its writer drains.
    pub fn pair() -> (Self, mpsc::UnboundedReceiver<MessageOut>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// Create a sink wired to a writer task on `writer`.
    pub fn spawn<W>(writer: W) -> (Self, JoinHandle<()>)
    where
        W: AsyncWrite + Unpin + Send + 'static,
    {
        let (sink, rx) = Self::pair();
        (sink, spawn_writer(writer, rx))
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

impl MessageSink for ChannelSink {
    fn send(&self, message: MessageOut) -> Result<(), ChannelError> {
        self.tx.send(message).map_err(|_| ChannelError::Closed)
    }
}

/// Encode one message as a JSON line.
pub fn encode_line(message: &MessageOut) -> Result<Vec<u8>, ChannelError> {
    let mut line =
        serde_json::to_vec(message).map_err(|e| ChannelError::Serialization(e.to_string()))?;
    line.push(b'\n');
    Ok(line)
}

/// Drain `rx` onto `writer` until every sink is dropped or a write fails.
///
/// A write failure closes the queue, so later sends report `Closed`.
pub fn spawn_writer<W>(mut writer: W, mut rx: mpsc::UnboundedReceiver<MessageOut>) -> JoinHandle<()>
where
    W: AsyncWrite + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        while let Some(message) = rx.recv().await {
            let line = match encode_line(&message) {
                Ok(line) => line,
                Err(e) => {
                    warn!(name = %message.name, error = %e, "Skipping unencodable message");
                    continue;
                }
            };

            let result = async {
                writer.write_all(&line).await?;
                writer.flush().await
            }
            .await;

            if let Err(e) = result {
                warn!(error = %e, "Surface went away, closing outbound channel");
                break;
            }
        }

        rx.close();
        debug!("Outbound writer task exiting");
    })
}
