//! Debounced trigger button sampling.
//!
//! Active-low momentary switch with external pull-up. The radio task
//! samples the debounced level once per cycle; both task state machines
//! see the same sample. A level change must hold for the debounce window
//! before it is believed — contact bounce on the trigger must never look
//! like a release, because a release clears the scan dedup key and the
//! write fired latch.

const DEBOUNCE_MS: u64 = 30;

/// Debounce state over raw level samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DebounceState {
    Released,
    Closing { since_ms: u64 },
    Held,
    Opening { since_ms: u64 },
}

/// Pure debounce logic, fed `(raw_level, now_ms)` samples.
pub struct TriggerButton {
    state: DebounceState,
}

impl TriggerButton {
    pub fn new() -> Self {
        Self {
            state: DebounceState::Released,
        }
    }

    /// Feed one raw sample; returns the debounced "held" state.
    pub fn update(&mut self, raw_pressed: bool, now_ms: u64) -> bool {
        self.state = match self.state {
            DebounceState::Released => {
                if raw_pressed {
                    DebounceState::Closing { since_ms: now_ms }
                } else {
                    DebounceState::Released
                }
            }
            DebounceState::Closing { since_ms } => {
                if !raw_pressed {
                    DebounceState::Released
                } else if now_ms.wrapping_sub(since_ms) >= DEBOUNCE_MS {
                    DebounceState::Held
                } else {
                    DebounceState::Closing { since_ms }
                }
            }
            DebounceState::Held => {
                if raw_pressed {
                    DebounceState::Held
                } else {
                    DebounceState::Opening { since_ms: now_ms }
                }
            }
            DebounceState::Opening { since_ms } => {
                if raw_pressed {
                    DebounceState::Held
                } else if now_ms.wrapping_sub(since_ms) >= DEBOUNCE_MS {
                    DebounceState::Released
                } else {
                    DebounceState::Opening { since_ms }
                }
            }
        };

        matches!(
            self.state,
            DebounceState::Held | DebounceState::Opening { .. }
        )
    }
}

impl Default for TriggerButton {
    fn default() -> Self {
        Self::new()
    }
}

// ── GPIO-backed trigger (production) ─────────────────────────

#[cfg(target_os = "espidf")]
pub use esp_impl::GpioTrigger;

#[cfg(target_os = "espidf")]
mod esp_impl {
    use esp_idf_hal::gpio::{AnyIOPin, Input, PinDriver};

    use super::TriggerButton;
    use crate::adapters::time::MonotonicClock;
    use crate::app::ports::{TimePort, TriggerPort};

    /// Trigger button on a GPIO with the pure debouncer behind it.
    pub struct GpioTrigger {
        pin: PinDriver<'static, AnyIOPin, Input>,
        debounce: TriggerButton,
        clock: MonotonicClock,
    }

    impl GpioTrigger {
        pub fn new(pin: PinDriver<'static, AnyIOPin, Input>) -> Self {
            Self {
                pin,
                debounce: TriggerButton::new(),
                clock: MonotonicClock::new(),
            }
        }
    }

    impl TriggerPort for GpioTrigger {
        fn is_held(&mut self) -> bool {
            // Active low: pressed pulls the line to ground.
            let raw = self.pin.is_low();
            self.debounce.update(raw, self.clock.now_ms())
        }
    }
}

// ── Tests ────────────────────────────────────────────────────
