//! Serialized adapter restarts.
//!
//! A restart is stop, settle, start, settle. Only one restart runs at a
//! time; requests arriving while one is in flight are coalesced into it.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use lamgr_core::AdapterControl;
use tracing::{debug, error, info, warn};

use crate::guard::FlagGuard;

/// Pause after the kill before launching again.
pub const DEFAULT_STOP_SETTLE: Duration = Duration::from_secs(2);
/// Pause after launching before accepting another restart.
pub const DEFAULT_START_SETTLE: Duration = Duration::from_secs(2);

/// Settle delays around a restart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RestartPolicy {
    pub stop_settle: Duration,
    pub start_settle: Duration,
}

impl Default for RestartPolicy {
    fn default() -> Self {
        Self {
            stop_settle: DEFAULT_STOP_SETTLE,
            start_settle: DEFAULT_START_SETTLE,
        }
    }
}

/// What a call to [`RestartCoordinator::restart`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestartOutcome {
    /// Another restart was in flight; this request had no effect.
    Coalesced,
    /// This call performed the full stop/start sequence.
    Completed,
}

pub struct RestartCoordinator {
    control: Arc<dyn AdapterControl>,
    policy: RestartPolicy,
    restarting: AtomicBool,
}

impl RestartCoordinator {
    pub fn new(control: Arc<dyn AdapterControl>) -> Self {
        Self::with_policy(control, RestartPolicy::default())
    }

    pub fn with_policy(control: Arc<dyn AdapterControl>, policy: RestartPolicy) -> Self {
        Self {
            control,
            policy,
            restarting: AtomicBool::new(false),
        }
    }

    pub fn is_restarting(&self) -> bool {
        self.restarting.load(Ordering::SeqCst)
    }

    /// Restart the adapter unless a restart is already in progress.
    ///
    /// Stop and start failures are logged and never abort the sequence; the
    /// in-progress flag is cleared on every path.
    pub async fn restart(&self) -> RestartOutcome {
        let Some(_guard) = FlagGuard::try_acquire(&self.restarting) else {
            debug!("Restart already in progress, ignoring request");
            return RestartOutcome::Coalesced;
        };

        info!("Restarting adapter");

        if let Err(e) = self.control.stop().await {
            warn!(error = %e, "Failed to stop adapter, continuing with restart");
        }
        tokio::time::sleep(self.policy.stop_settle).await;

        match self.control.start().await {
            Ok(pid) => info!(pid = %pid, "Adapter restarted"),
            Err(e) => error!(error = %e, "Failed to start adapter during restart"),
        }
        tokio::time::sleep(self.policy.start_settle).await;

        RestartOutcome::Completed
    }
}
