//! Running-state change notifications.
//!
//! Polls the liveness flag and emits only on changes, so the UI surface
//! sees one `set.running` per transition.

use std::sync::Arc;
use std::time::Duration;

use async_stream::stream;
use futures_util::{Stream, StreamExt};
use lamgr_core::{AdapterControl, MessageOut, MessageSink, names};
use serde_json::Value;
use tokio::time::{MissedTickBehavior, interval};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// How often the liveness flag is sampled.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(200);

/// Stream of liveness transitions.
///
/// The baseline is "not running", so an adapter that is already live when
/// polling begins yields `true` on the first tick. Completes when `cancel`
/// is triggered.
pub fn running_transitions(
    control: Arc<dyn AdapterControl>,
    poll: Duration,
    cancel: CancellationToken,
) -> impl Stream<Item = bool> {
    stream! {
        let mut ticker = interval(poll);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let mut last = false;

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let running = control.is_running();
                    if running != last {
                        debug!(running, "Adapter running state changed");
                        yield running;
                        last = running;
                    }
                }
                () = cancel.cancelled() => break,
            }
        }
    }
}

/// Forward liveness transitions to `sink` as `set.running` notifications.
///
/// Returns the number of notifications delivered once the sink fails or
/// `cancel` is triggered.
pub async fn relay_running_state(
    control: Arc<dyn AdapterControl>,
    sink: Arc<dyn MessageSink>,
    poll: Duration,
    cancel: CancellationToken,
) -> usize {
    let mut transitions = Box::pin(running_transitions(control, poll, cancel));
    let mut sent = 0;

    while let Some(running) = transitions.next().await {
        let message = MessageOut::notification(names::SET_RUNNING, Value::Bool(running));
        if let Err(e) = sink.send(message) {
            info!(error = %e, "Running-state relay ended");
            break;
        }
        sent += 1;
    }

    sent
}
