//! Adapter commands exposed to UI surfaces.
//!
//! | Command      | Effect                               | Response                     |
//! |--------------|--------------------------------------|------------------------------|
//! | `la.restart` | serialized restart in the background | none                         |
//! | `log.show`   | open the log view                    | none                         |
//! | `log.start`  | start pushing `log.all` to caller    | none                         |
//! | `la.status`  | -                                    | `{running, status, pid}`     |
//! | `log.get`    | -                                    | captured log joined by `\n`  |

use std::sync::Arc;

use async_trait::async_trait;
use lamgr_core::{AdapterControl, MessageIn, MessageSink, WindowHost, names};
use lamgr_runtime::{LogStreamer, RestartCoordinator};
use serde_json::{Value, json};
use tracing::{debug, warn};

use crate::handler::{HandlerError, MessageHandler};

/// Routes inbound commands to the adapter runtime.
pub struct AdapterCommands {
    control: Arc<dyn AdapterControl>,
    restart: Arc<RestartCoordinator>,
    streamer: Arc<LogStreamer>,
    host: Arc<dyn WindowHost>,
}

impl AdapterCommands {
    pub fn new(
        control: Arc<dyn AdapterControl>,
        restart: Arc<RestartCoordinator>,
        streamer: Arc<LogStreamer>,
        host: Arc<dyn WindowHost>,
    ) -> Self {
        Self {
            control,
            restart,
            streamer,
            host,
        }
    }

    fn spawn_restart(&self) {
        let restart = Arc::clone(&self.restart);
        tokio::spawn(async move {
            restart.restart().await;
        });
    }

    fn spawn_show_log(&self) {
        let host = Arc::clone(&self.host);
        tokio::spawn(async move {
            if let Err(e) = host.show_log_view() {
                warn!(error = %e, "Could not show log view");
            }
        });
    }

    fn spawn_log_stream(&self, surface: &Arc<dyn MessageSink>) {
        let streamer = Arc::clone(&self.streamer);
        let surface = Arc::clone(surface);
        tokio::spawn(async move {
            streamer.start_streaming(surface).await;
        });
    }

    fn status(&self) -> Value {
        let info = self.control.process_info();
        json!({
            "running": self.control.is_running(),
            "status": self.control.status(),
            "pid": info.map(|info| info.pid),
        })
    }
}

#[async_trait]
impl MessageHandler for AdapterCommands {
    async fn handle(
        &self,
        surface: &Arc<dyn MessageSink>,
        message: &MessageIn,
    ) -> Result<Option<Value>, HandlerError> {
        match message.name.as_str() {
            names::LA_RESTART => {
                self.spawn_restart();
                Ok(None)
            }
            names::LOG_SHOW => {
                self.spawn_show_log();
                Ok(None)
            }
            names::LOG_START => {
                self.spawn_log_stream(surface);
                Ok(None)
            }
            names::LA_STATUS => Ok(Some(self.status())),
            names::LOG_GET => Ok(Some(Value::String(self.control.get_log().join("\n")))),
            other => {
                debug!(name = %other, "Ignoring unknown command");
                Ok(None)
            }
        }
    }
}
