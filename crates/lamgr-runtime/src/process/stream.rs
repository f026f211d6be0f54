//! Async stream log readers (non-UTF8-safe).
//!
//! The adapter can emit non-UTF8 bytes on stdout/stderr. Using
//! `BufReader::lines()` would terminate the reader task on invalid UTF-8,
//! so lines are read as bytes and kept raw in the ring buffer.
//!
//! Every line is also mirrored to the console and to the durable log file.
//! A failed mirror write is reported and skipped; reading continues.

use std::fmt;
use std::io;
use std::path::Path;
use std::sync::Arc;

use tokio::fs::{File, OpenOptions};
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, trace, warn};

use super::logs::{LogLine, RingLogBuffer};

/// Where captured lines are echoed on the manager's own console.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConsoleMirror {
    /// stdout to stdout, stderr to stderr.
    #[default]
    Split,
    /// Both streams to stderr (stdout is reserved for something else).
    Stderr,
    /// No console echo.
    Off,
}

/// Which output stream of the adapter a reader is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamKind {
    Stdout,
    Stderr,
}

impl StreamKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Stdout => "stdout",
            Self::Stderr => "stderr",
        }
    }
}

impl fmt::Display for StreamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Append-only log file shared by both readers of one run.
pub(crate) type DurableLog = Arc<Mutex<File>>;

/// Open the durable log in append mode.
///
/// Failure is not fatal: it is reported and the run continues without
/// durable mirroring.
pub(crate) async fn open_durable_log(path: Option<&Path>) -> Option<DurableLog> {
    let path = path?;
    match OpenOptions::new().append(true).create(true).open(path).await {
        Ok(file) => Some(Arc::new(Mutex::new(file))),
        Err(e) => {
            warn!(
                path = %path.display(),
                error = %e,
                "Could not open durable log; mirroring disabled for this run"
            );
            None
        }
    }
}

/// Secondary destinations for every captured line.
#[derive(Clone, Default)]
pub(crate) struct LineMirror {
    console: ConsoleMirror,
    durable: Option<DurableLog>,
}

impl LineMirror {
    pub(crate) const fn new(console: ConsoleMirror, durable: Option<DurableLog>) -> Self {
        Self { console, durable }
    }

    /// Write `framed` (line plus trailing newline) to every destination.
    async fn write(&self, kind: StreamKind, framed: &[u8]) {
        let console = match (self.console, kind) {
            (ConsoleMirror::Off, _) => None,
            (ConsoleMirror::Split, StreamKind::Stdout) => Some(StreamKind::Stdout),
            (ConsoleMirror::Split | ConsoleMirror::Stderr, _) => Some(StreamKind::Stderr),
        };

        let result = match console {
            Some(StreamKind::Stdout) => write_framed(&mut tokio::io::stdout(), framed).await,
            Some(StreamKind::Stderr) => write_framed(&mut tokio::io::stderr(), framed).await,
            None => Ok(()),
        };
        if let Err(e) = result {
            warn!(stream = %kind, error = %e, "Could not mirror line to console");
        }

        if let Some(ref durable) = self.durable {
            let mut file = durable.lock().await;
            if let Err(e) = write_framed(&mut *file, framed).await {
                warn!(stream = %kind, error = %e, "Could not write line to durable log");
            }
        }
    }
}

async fn write_framed<W: AsyncWrite + Unpin>(writer: &mut W, framed: &[u8]) -> io::Result<()> {
    writer.write_all(framed).await?;
    writer.flush().await
}

/// Spawn a task that captures `stream` line by line until EOF.
pub(crate) fn spawn_stream_reader(
    stream: impl AsyncRead + Unpin + Send + 'static,
    kind: StreamKind,
    buffer: Arc<RingLogBuffer>,
    mirror: LineMirror,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut reader = BufReader::new(stream);
        let mut buf: Vec<u8> = Vec::with_capacity(1024);

        loop {
            buf.clear();
            match reader.read_until(b'\n', &mut buf).await {
                Ok(0) => break, // EOF
                Ok(_) => {
                    // Trim trailing newline(s)
                    if buf.last() == Some(&b'\n') {
                        buf.pop();
                        if buf.last() == Some(&b'\r') {
                            buf.pop();
                        }
                    }

                    buffer.append(LogLine::new(buf.as_slice()));
                    trace!(stream = %kind, "{}", String::from_utf8_lossy(&buf));

                    buf.push(b'\n');
                    mirror.write(kind, &buf).await;
                }
                Err(e) => {
                    debug!(stream = %kind, error = %e, "log stream reader exiting due to read error");
                    break;
                }
            }
        }

        debug!(stream = %kind, "log stream reader task exiting");
    })
}
