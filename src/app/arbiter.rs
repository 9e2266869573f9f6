//! Mode arbitration between the scan and write paths.
//!
//! One mutex guards the two cross-task fields: the operating mode and the
//! payload queued for the next write. Task loops take a [`snapshot`] with a
//! bounded (non-blocking) acquisition and treat contention as "unavailable
//! this cycle"; the command dispatcher mutates with a blocking lock since
//! its critical sections are a field copy. The lock is never held across a
//! UART call — the arbiter has no access to the radio at all.
//!
//! [`snapshot`]: ModeArbiter::snapshot

use std::sync::{Mutex, MutexGuard, PoisonError};

/// Device operating mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Trigger-gated tag inventory.
    #[default]
    Scan,
    /// Armed for EPC programming.
    Write,
}

/// Copy of the shared fields, taken under lock and released immediately.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModeSnapshot {
    pub mode: Mode,
    pub pending: Option<String>,
}

#[derive(Default)]
struct Shared {
    mode: Mode,
    pending: Option<String>,
}

/// Mutex-guarded mode + pending-payload state.
#[derive(Default)]
pub struct ModeArbiter {
    inner: Mutex<Shared>,
}

impl ModeArbiter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Switch modes. Any queued payload is cleared on every mode change,
    /// in both directions.
    pub fn set_mode(&self, mode: Mode) {
        let mut s = self.lock();
        s.mode = mode;
        s.pending = None;
    }

    /// Queue a payload for the next write.
    ///
    /// Accepted only while in [`Mode::Write`]; otherwise the payload is
    /// ignored and `false` is returned so the caller can surface feedback
    /// (the arbiter itself stays quiet).
    pub fn set_payload(&self, data: &str) -> bool {
        let mut s = self.lock();
        if s.mode != Mode::Write {
            return false;
        }
        s.pending = Some(data.to_owned());
        true
    }

    /// Drop the queued payload (after every write attempt).
    pub fn clear_payload(&self) {
        self.lock().pending = None;
    }

    /// Bounded-acquisition copy of both fields.
    ///
    /// `None` means the lock was contended this instant — callers retry
    /// next cycle, never block, never fail.
    pub fn snapshot(&self) -> Option<ModeSnapshot> {
        let s = self.inner.try_lock().ok()?;
        Some(ModeSnapshot {
            mode: s.mode,
            pending: s.pending.clone(),
        })
    }

    fn lock(&self) -> MutexGuard<'_, Shared> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
