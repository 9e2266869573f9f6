//! Beep signal adapter.
//!
//! The task state machines raise a fire-and-forget beep through
//! [`FeedbackPort`]; this adapter latches it into a static signal that the
//! (external) buzzer task consumes at its own pace. Re-signalling before
//! consumption coalesces into a single beep, which is the behaviour the
//! original hardware had with its binary semaphore.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;

use crate::app::ports::FeedbackPort;

/// Latched beep request, consumed by the buzzer collaborator.
pub static BEEP_SIGNAL: Signal<CriticalSectionRawMutex, ()> = Signal::new();

/// [`FeedbackPort`] adapter over [`BEEP_SIGNAL`].
pub struct BeepRequester;

impl FeedbackPort for BeepRequester {
    fn beep(&mut self) {
        BEEP_SIGNAL.signal(());
    }
}
