//! Adapter process lifecycle.
//!
//! `AdapterSupervisor` owns the single adapter process: it launches it with
//! piped output, captures both streams into the ring buffer, waits on exit
//! in a background task, and delivers forceful kills on request.
//!
//! The child is owned by its exit waiter. Stop requests reach the waiter over
//! a channel, so a kill can never race the reaping of the process.

use std::io;
use std::path::PathBuf;
use std::process::Stdio;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use lamgr_core::paths::ADAPTER_LOG_FILE;
use lamgr_core::{AdapterControl, AdapterStatus, ProcessError, ProcessInfo};
use tokio::process::{Child, Command};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, info, warn};

use super::logs::{DEFAULT_LOG_CAPACITY, RingLogBuffer};
use super::state::Liveness;
use super::stream::{ConsoleMirror, LineMirror, StreamKind, open_durable_log, spawn_stream_reader};

/// Reply slot for a kill request: the outcome of delivering the signal.
type KillReply = oneshot::Sender<io::Result<()>>;

/// Launch configuration for the adapter.
#[derive(Debug, Clone)]
pub struct SupervisorConfig {
    /// Path to the adapter executable.
    pub executable: PathBuf,
    /// Arguments passed to the executable (none for the real adapter).
    pub args: Vec<String>,
    /// Durable log file; `None` disables durable mirroring.
    pub log_file: Option<PathBuf>,
    /// Number of lines kept in memory.
    pub log_capacity: usize,
    /// Console echo of captured lines.
    pub console: ConsoleMirror,
}

impl SupervisorConfig {
    /// Create a config with default log settings.
    pub fn new(executable: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
            args: Vec::new(),
            log_file: Some(PathBuf::from(ADAPTER_LOG_FILE)),
            log_capacity: DEFAULT_LOG_CAPACITY,
            console: ConsoleMirror::default(),
        }
    }

    #[must_use]
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_log_file(mut self, log_file: Option<PathBuf>) -> Self {
        self.log_file = log_file;
        self
    }

    #[must_use]
    pub const fn with_log_capacity(mut self, capacity: usize) -> Self {
        self.log_capacity = capacity;
        self
    }

    #[must_use]
    pub const fn with_console(mut self, console: ConsoleMirror) -> Self {
        self.console = console;
        self
    }
}

/// Handle to one run. Replaced, never reused, on every start.
struct RunHandle {
    info: ProcessInfo,
    kill_tx: mpsc::Sender<KillReply>,
}

/// Supervisor for the single adapter process.
///
/// Construct one per application and share it behind an `Arc`.
pub struct AdapterSupervisor {
    config: SupervisorConfig,
    buffer: Arc<RingLogBuffer>,
    liveness: Arc<Liveness>,
    current: Mutex<Option<RunHandle>>,
}

impl AdapterSupervisor {
    pub fn new(config: SupervisorConfig) -> Self {
        let buffer = Arc::new(RingLogBuffer::new(config.log_capacity));
        Self {
            config,
            buffer,
            liveness: Arc::new(Liveness::new()),
            current: Mutex::new(None),
        }
    }

    /// Launch the adapter and return its PID.
    ///
    /// Returns as soon as the process is confirmed launched; exit is awaited
    /// in a background task which clears the liveness flag.
    pub async fn start(&self) -> Result<u32, ProcessError> {
        self.liveness
            .begin_start()
            .map_err(ProcessError::AlreadyActive)?;

        let executable = &self.config.executable;
        let durable = open_durable_log(self.config.log_file.as_deref()).await;

        info!(path = %executable.display(), "Starting adapter");
        let mut child = match self.spawn_child() {
            Ok(child) => child,
            Err(e) => {
                self.liveness.abort_start();
                error!(path = %executable.display(), error = %e, "Failed to launch adapter");
                return Err(ProcessError::SpawnFailed {
                    path: executable.display().to_string(),
                    reason: e.to_string(),
                });
            }
        };

        let Some(pid) = child.id() else {
            self.liveness.abort_start();
            return Err(ProcessError::Internal(
                "adapter exited before its PID could be read".to_string(),
            ));
        };

        self.spawn_log_readers(&mut child, &LineMirror::new(self.config.console, durable));

        // The handle and the running state are published together, so a
        // concurrent stop sees either the previous run or this one, never a mix
        let (kill_tx, kill_rx) = mpsc::channel(1);
        {
            let mut current = self.lock_current();
            *current = Some(RunHandle {
                info: ProcessInfo::new(pid, executable.clone()),
                kill_tx,
            });
            self.liveness.mark_running();
        }
        tokio::spawn(supervise_exit(child, kill_rx, Arc::clone(&self.liveness), pid));

        info!(pid = %pid, "Adapter started");
        Ok(pid)
    }

    fn spawn_child(&self) -> io::Result<Child> {
        Command::new(&self.config.executable)
            .args(&self.config.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            // Dropping the waiter (runtime shutdown) kills the adapter
            .kill_on_drop(true)
            .spawn()
    }

    fn spawn_log_readers(&self, child: &mut Child, mirror: &LineMirror) {
        match child.stdout.take() {
            Some(stdout) => {
                spawn_stream_reader(
                    stdout,
                    StreamKind::Stdout,
                    Arc::clone(&self.buffer),
                    mirror.clone(),
                );
            }
            None => warn!("Could not hook to stdout of adapter"),
        }

        match child.stderr.take() {
            Some(stderr) => {
                spawn_stream_reader(
                    stderr,
                    StreamKind::Stderr,
                    Arc::clone(&self.buffer),
                    mirror.clone(),
                );
            }
            None => warn!("Could not hook to stderr of adapter"),
        }
    }

    /// Forcefully kill the current process.
    ///
    /// Succeeds as a no-op when no process was ever started or the last one
    /// has already exited.
    pub async fn stop(&self) -> Result<(), ProcessError> {
        let Some((pid, kill_tx)) = self.claim_stop() else {
            debug!("No adapter process to stop");
            return Ok(());
        };

        let (reply_tx, reply_rx) = oneshot::channel();
        if kill_tx.send(reply_tx).await.is_err() {
            debug!(pid = %pid, "Adapter already exited");
            return Ok(());
        }

        match reply_rx.await {
            Ok(Ok(())) => {
                info!(pid = %pid, "Kill signal delivered to adapter");
                Ok(())
            }
            Ok(Err(e)) => {
                warn!(pid = %pid, error = %e, "Failed to kill adapter");
                Err(ProcessError::KillFailed {
                    pid,
                    reason: e.to_string(),
                })
            }
            // The waiter reaped the process before handling the request
            Err(_) => Ok(()),
        }
    }

    pub fn is_running(&self) -> bool {
        self.liveness.is_running()
    }

    pub fn status(&self) -> AdapterStatus {
        self.liveness.status()
    }

    pub fn get_log(&self) -> Vec<String> {
        self.buffer.snapshot()
    }

    /// PID of the current (or last) run.
    pub fn pid(&self) -> Option<u32> {
        self.lock_current().as_ref().map(|run| run.info.pid)
    }

    pub fn process_info(&self) -> Option<ProcessInfo> {
        self.lock_current().as_ref().map(|run| run.info.clone())
    }

    /// Kill target of the current run, marking it as stopping.
    fn claim_stop(&self) -> Option<(u32, mpsc::Sender<KillReply>)> {
        let current = self.lock_current();
        let run = current.as_ref()?;
        self.liveness.mark_stopping();
        Some((run.info.pid, run.kill_tx.clone()))
    }

    fn lock_current(&self) -> MutexGuard<'_, Option<RunHandle>> {
        self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Wait for the adapter to exit, serving kill requests in the meantime.
async fn supervise_exit(
    mut child: Child,
    mut kill_rx: mpsc::Receiver<KillReply>,
    liveness: Arc<Liveness>,
    pid: u32,
) {
    let mut stop_requested = false;

    let exit = loop {
        tokio::select! {
            result = child.wait() => break result,
            Some(reply) = kill_rx.recv() => {
                stop_requested = true;
                let _ = reply.send(child.start_kill());
            }
        }
    };

    match exit {
        Ok(status) if stop_requested => info!(pid = %pid, %status, "Adapter stopped"),
        Ok(status) => warn!(pid = %pid, %status, "Adapter exited on its own"),
        Err(e) => warn!(pid = %pid, error = %e, "Waiting on adapter failed"),
    }

    liveness.mark_exited(stop_requested);
}

#[async_trait]
impl AdapterControl for AdapterSupervisor {
    async fn start(&self) -> Result<u32, ProcessError> {
        Self::start(self).await
    }

    async fn stop(&self) -> Result<(), ProcessError> {
        Self::stop(self).await
    }

    fn is_running(&self) -> bool {
        Self::is_running(self)
    }

    fn get_log(&self) -> Vec<String> {
        Self::get_log(self)
    }

    fn status(&self) -> AdapterStatus {
        Self::status(self)
    }

    fn process_info(&self) -> Option<ProcessInfo> {
        Self::process_info(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = SupervisorConfig::new("/opt/la/adapter/LocalAdapter");
        assert!(config.args.is_empty());
        assert_eq!(config.log_file, Some(PathBuf::from(ADAPTER_LOG_FILE)));
        assert_eq!(config.log_capacity, DEFAULT_LOG_CAPACITY);
        assert_eq!(config.console, ConsoleMirror::Split);
    }

    #[test]
    fn test_supervisor_creation() {
        let supervisor = AdapterSupervisor::new(SupervisorConfig::new("LocalAdapter"));
        assert!(!supervisor.is_running());
        assert_eq!(supervisor.status(), AdapterStatus::Stopped);
        assert!(supervisor.pid().is_none());
        assert!(supervisor.get_log().is_empty());
    }

    #[tokio::test]
    async fn test_stop_without_process_is_noop() {
        let supervisor = AdapterSupervisor::new(SupervisorConfig::new("LocalAdapter"));
        assert!(supervisor.stop().await.is_ok());
        assert_eq!(supervisor.status(), AdapterStatus::Stopped);
    }

    #[tokio::test]
    async fn test_missing_executable_is_launch_failure() {
        let dir = tempfile::tempdir().unwrap();
        let config = SupervisorConfig::new(dir.path().join("does-not-exist"))
            .with_log_file(None)
            .with_console(ConsoleMirror::Off);
        let supervisor = AdapterSupervisor::new(config);

        let err = supervisor.start().await.unwrap_err();
        assert!(matches!(err, ProcessError::SpawnFailed { .. }));
        assert!(!supervisor.is_running());
        assert_eq!(supervisor.status(), AdapterStatus::Stopped);
        assert!(supervisor.process_info().is_none());
    }
}
