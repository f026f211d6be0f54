//! CLI bootstrap - the composition root.
//!
//! This module is the ONLY place where the runtime, the bridge and the
//! terminal host are wired together.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use lamgr_bridge::{AdapterCommands, ChannelSink, MessageChannel};
use lamgr_core::paths::ADAPTER_LOG_FILE;
use lamgr_core::{AdapterControl, MessageSink, WindowHost, resolve_adapter_path};
use lamgr_runtime::{
    AdapterSupervisor, ConsoleMirror, DEFAULT_POLL_INTERVAL, LogStreamer, RestartCoordinator,
    SupervisorConfig, relay_running_state,
};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::host::TerminalLogView;

/// How long queued outbound messages get to flush when a session ends.
const WRITER_DRAIN: Duration = Duration::from_millis(200);

/// Bootstrap configuration for the CLI.
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// Path to the adapter executable.
    pub adapter_path: PathBuf,
    /// Durable log file, relative to the working directory.
    pub log_file: Option<PathBuf>,
}

impl CliConfig {
    /// Create config with default paths.
    pub fn with_defaults() -> Result<Self> {
        Ok(Self {
            adapter_path: resolve_adapter_path()?,
            log_file: Some(PathBuf::from(ADAPTER_LOG_FILE)),
        })
    }

    fn supervisor_config(&self) -> SupervisorConfig {
        // stdout carries the message protocol
        SupervisorConfig::new(&self.adapter_path)
            .with_log_file(self.log_file.clone())
            .with_console(ConsoleMirror::Stderr)
    }
}

/// Fully composed application.
pub struct AppContext {
    pub supervisor: Arc<AdapterSupervisor>,
    pub restart: Arc<RestartCoordinator>,
    pub streamer: Arc<LogStreamer>,
    pub host: Arc<dyn WindowHost>,
}

impl AppContext {
    pub fn control(&self) -> Arc<dyn AdapterControl> {
        self.supervisor.clone()
    }

    fn commands(&self) -> AdapterCommands {
        AdapterCommands::new(
            self.control(),
            Arc::clone(&self.restart),
            Arc::clone(&self.streamer),
            Arc::clone(&self.host),
        )
    }
}

/// Build the application from `config`. Nothing is started yet.
pub fn bootstrap(config: &CliConfig) -> AppContext {
    let supervisor = Arc::new(AdapterSupervisor::new(config.supervisor_config()));
    let control: Arc<dyn AdapterControl> = supervisor.clone();

    AppContext {
        restart: Arc::new(RestartCoordinator::new(Arc::clone(&control))),
        streamer: Arc::new(LogStreamer::new(Arc::clone(&control))),
        host: Arc::new(TerminalLogView::new(control)),
        supervisor,
    }
}

/// Serve one UI surface until its input ends or `cancel` fires.
///
/// Inbound JSON lines are read from `reader`; responses and notifications
/// are written to `writer`. Running-state changes are relayed for as long as
/// the surface is served.
pub async fn serve<R, W>(
    ctx: &AppContext,
    reader: R,
    writer: W,
    cancel: CancellationToken,
) -> Result<()>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin + Send + 'static,
{
    let (sink, mut writer_task) = ChannelSink::spawn(writer);
    let sink: Arc<dyn MessageSink> = Arc::new(sink);

    let relay_cancel = cancel.child_token();
    let relay = tokio::spawn(relay_running_state(
        ctx.control(),
        Arc::clone(&sink),
        DEFAULT_POLL_INTERVAL,
        relay_cancel.clone(),
    ));

    info!("Serving UI surface");
    let channel = MessageChannel::new(Arc::new(ctx.commands()), sink);
    let result = channel.run(reader, cancel).await;

    relay_cancel.cancel();
    if let Ok(sent) = relay.await {
        debug!(sent, "Running-state relay finished");
    }
    // Background pushers may still hold the sink
    drop(channel);
    if tokio::time::timeout(WRITER_DRAIN, &mut writer_task)
        .await
        .is_err()
    {
        writer_task.abort();
    }

    result.map_err(Into::into)
}
