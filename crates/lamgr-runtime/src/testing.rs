//! In-memory `AdapterControl` used by unit tests.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use lamgr_core::{AdapterControl, AdapterStatus, ProcessError, ProcessInfo};

pub(crate) struct FakeAdapter {
    running: AtomicBool,
    fail_start: bool,
    starts: AtomicUsize,
    stops: AtomicUsize,
    log: Mutex<Vec<String>>,
}

impl FakeAdapter {
    pub(crate) fn new(running: bool, fail_start: bool) -> Self {
        Self {
            running: AtomicBool::new(running),
            fail_start,
            starts: AtomicUsize::new(0),
            stops: AtomicUsize::new(0),
            log: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn running() -> Self {
        Self::new(true, false)
    }

    pub(crate) fn stopped() -> Self {
        Self::new(false, false)
    }

    pub(crate) fn failing_start() -> Self {
        Self::new(true, true)
    }

    pub(crate) fn starts(&self) -> usize {
        self.starts.load(Ordering::SeqCst)
    }

    pub(crate) fn stops(&self) -> usize {
        self.stops.load(Ordering::SeqCst)
    }

    pub(crate) fn set_running(&self, running: bool) {
        self.running.store(running, Ordering::SeqCst);
    }

    pub(crate) fn push_log(&self, line: &str) {
        self.log
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(line.to_string());
    }
}

#[async_trait]
impl AdapterControl for FakeAdapter {
    async fn start(&self) -> Result<u32, ProcessError> {
        let count = self.starts.fetch_add(1, Ordering::SeqCst);
        if self.fail_start {
            return Err(ProcessError::SpawnFailed {
                path: "LocalAdapter".to_string(),
                reason: "not found".to_string(),
            });
        }
        self.running.store(true, Ordering::SeqCst);
        Ok(1000 + u32::try_from(count).unwrap_or(0))
    }

    async fn stop(&self) -> Result<(), ProcessError> {
        self.stops.fetch_add(1, Ordering::SeqCst);
        self.running.store(false, Ordering::SeqCst);
        Ok(())
    }

    fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    fn get_log(&self) -> Vec<String> {
        self.log
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn status(&self) -> AdapterStatus {
        if self.is_running() {
            AdapterStatus::Running
        } else {
            AdapterStatus::Stopped
        }
    }

    fn process_info(&self) -> Option<ProcessInfo> {
        None
    }
}
