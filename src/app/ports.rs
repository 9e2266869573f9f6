//! Port traits — the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ ScanTask / WriteTask (domain)
//! ```
//!
//! Driven adapters (clock, trigger button, buzzer signal, result channel,
//! client link) implement these traits.  The task state machines consume
//! them via generics, so the domain core never touches hardware directly.

use super::messages::ResultMessage;

// ───────────────────────────────────────────────────────────────
// Time port (driven adapter: monotonic clock → domain)
// ───────────────────────────────────────────────────────────────

/// Monotonic millisecond clock plus the cooperative yield primitive.
///
/// Every deadline in the firmware (poll window, write reply window,
/// backoff) is measured against `now_ms`; every task loop yields through
/// `sleep_ms` — there is no unbounded spinning anywhere.
pub trait TimePort {
    /// Milliseconds since boot (monotonic).
    fn now_ms(&self) -> u64;

    /// Block the calling task for `ms` milliseconds.
    fn sleep_ms(&self, ms: u32);
}

// ───────────────────────────────────────────────────────────────
// Trigger port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// The physical trigger button, sampled once per task cycle.
pub trait TriggerPort {
    /// Debounced "trigger is held" state.
    fn is_held(&mut self) -> bool;
}

// ───────────────────────────────────────────────────────────────
// Feedback port (domain → buzzer/LED collaborator)
// ───────────────────────────────────────────────────────────────

/// Fire-and-forget feedback signal.  The domain raises a beep on a
/// successful read or write and never waits for consumption; the buzzer
/// task on the other side is free to ignore or coalesce signals.
pub trait FeedbackPort {
    fn beep(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Result sink (domain → notification channel)
// ───────────────────────────────────────────────────────────────

/// Where task results go.  The production implementation is a bounded
/// non-blocking channel send that drops on overflow; tests collect into
/// a plain vector.
pub trait ResultSink {
    fn publish(&mut self, msg: ResultMessage);
}

// ───────────────────────────────────────────────────────────────
// Client link (notification pump → wireless transport)
// ───────────────────────────────────────────────────────────────

/// Outbound text channel to the connected wireless client.
///
/// The BLE GATT adapter implements this with a notify characteristic;
/// messages sent while no client is connected are discarded by the pump.
pub trait ClientLink {
    fn is_connected(&self) -> bool;

    fn send_text(&mut self, text: &str);
}
