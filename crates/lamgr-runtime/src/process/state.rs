//! Lock-free liveness and status shared between the supervisor and the
//! exit waiter of the current run.

use lamgr_core::AdapterStatus;
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};

const fn encode(status: AdapterStatus) -> u8 {
    match status {
        AdapterStatus::Stopped => 0,
        AdapterStatus::Starting => 1,
        AdapterStatus::Running => 2,
        AdapterStatus::Stopping => 3,
        AdapterStatus::Crashed => 4,
    }
}

const fn decode(raw: u8) -> AdapterStatus {
    match raw {
        1 => AdapterStatus::Starting,
        2 => AdapterStatus::Running,
        3 => AdapterStatus::Stopping,
        4 => AdapterStatus::Crashed,
        _ => AdapterStatus::Stopped,
    }
}

#[derive(Debug)]
pub(crate) struct Liveness {
    running: AtomicBool,
    status: AtomicU8,
}

impl Liveness {
    pub(crate) const fn new() -> Self {
        Self {
            running: AtomicBool::new(false),
            status: AtomicU8::new(encode(AdapterStatus::Stopped)),
        }
    }

    pub(crate) fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    pub(crate) fn status(&self) -> AdapterStatus {
        decode(self.status.load(Ordering::SeqCst))
    }

    /// Claim the right to launch: Stopped/Crashed -> Starting.
    ///
    /// Returns the blocking status when another run is starting or live.
    pub(crate) fn begin_start(&self) -> Result<(), AdapterStatus> {
        let mut current = self.status.load(Ordering::SeqCst);
        loop {
            let status = decode(current);
            if !status.is_idle() {
                return Err(status);
            }
            match self.status.compare_exchange(
                current,
                encode(AdapterStatus::Starting),
                Ordering::SeqCst,
                Ordering::SeqCst,
            ) {
                Ok(_) => return Ok(()),
                Err(actual) => current = actual,
            }
        }
    }

    /// Launch failed: Starting -> Stopped.
    pub(crate) fn abort_start(&self) {
        self.status
            .store(encode(AdapterStatus::Stopped), Ordering::SeqCst);
    }

    /// Process confirmed launched.
    pub(crate) fn mark_running(&self) {
        self.running.store(true, Ordering::SeqCst);
        self.status
            .store(encode(AdapterStatus::Running), Ordering::SeqCst);
    }

    /// Running -> Stopping. No-op in any other state.
    pub(crate) fn mark_stopping(&self) -> bool {
        self.status
            .compare_exchange(
                encode(AdapterStatus::Running),
                encode(AdapterStatus::Stopping),
                Ordering::SeqCst,
                Ordering::SeqCst,
            )
            .is_ok()
    }

    /// Wait on the process returned.
    ///
    /// The flag is cleared before the terminal status is published: once the
    /// status allows a new start, this run no longer touches either field.
    pub(crate) fn mark_exited(&self, stop_requested: bool) {
        let status = if stop_requested {
            AdapterStatus::Stopped
        } else {
            AdapterStatus::Crashed
        };
        self.running.store(false, Ordering::SeqCst);
        self.status.store(encode(status), Ordering::SeqCst);
    }
}
