//! Periodic log pushes to the UI surface.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use lamgr_core::{AdapterControl, MessageOut, MessageSink, names};
use serde_json::Value;
use tracing::{debug, info};

use crate::guard::FlagGuard;

/// Time between two log pushes.
pub const DEFAULT_STREAM_INTERVAL: Duration = Duration::from_secs(1);

/// What a call to [`LogStreamer::start_streaming`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamOutcome {
    /// A stream was already active; nothing was started.
    Coalesced,
    /// The stream ran until the sink failed, after `pushes` notifications.
    Ended { pushes: usize },
}

/// Pushes the full log snapshot to a single subscriber at a fixed interval.
pub struct LogStreamer {
    control: Arc<dyn AdapterControl>,
    interval: Duration,
    streaming: AtomicBool,
}

impl LogStreamer {
    pub fn new(control: Arc<dyn AdapterControl>) -> Self {
        Self::with_interval(control, DEFAULT_STREAM_INTERVAL)
    }

    pub fn with_interval(control: Arc<dyn AdapterControl>, interval: Duration) -> Self {
        Self {
            control,
            interval,
            streaming: AtomicBool::new(false),
        }
    }

    pub fn is_streaming(&self) -> bool {
        self.streaming.load(Ordering::SeqCst)
    }

    /// Stream `log.all` notifications to `sink` until sending fails.
    ///
    /// Each push waits one interval first, then sends the snapshot joined by
    /// `\n`. A second call while a stream is active returns immediately.
    pub async fn start_streaming(&self, sink: Arc<dyn MessageSink>) -> StreamOutcome {
        let Some(_guard) = FlagGuard::try_acquire(&self.streaming) else {
            debug!("Log stream already active, ignoring request");
            return StreamOutcome::Coalesced;
        };

        info!(interval_ms = self.interval.as_millis(), "Log stream started");
        let mut pushes = 0;

        loop {
            tokio::time::sleep(self.interval).await;

            let joined = self.control.get_log().join("\n");
            let message = MessageOut::notification(names::LOG_ALL, Value::String(joined));
            if let Err(e) = sink.send(message) {
                info!(error = %e, pushes, "Log stream ended");
                break;
            }
            pushes += 1;
        }

        StreamOutcome::Ended { pushes }
    }
}
