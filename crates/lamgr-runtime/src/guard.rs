//! Single-flight flag guard.

use std::sync::atomic::{AtomicBool, Ordering};

/// Holds a claimed `AtomicBool` and clears it on drop.
///
/// Clearing on drop covers every exit path, including early returns and
/// cancellation of the owning future.
#[derive(Debug)]
pub(crate) struct FlagGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> FlagGuard<'a> {
    /// Claim `flag` if it is clear. Returns `None` when already held.
    pub(crate) fn try_acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .ok()
            .map(|_| Self { flag })
    }
}

impl Drop for FlagGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}
