//! Bounded-retry EPC write state machine.
//!
//! States: Idle → Armed (write mode, payload queued, trigger held, not yet
//! fired this press) → Attempting → Idle. The fired latch means one press
//! fires at most one write burst — holding the trigger does not retry, a
//! deliberate release and re-press does. That latch is the write-collision
//! safety interlock: it keeps a held trigger from reprogramming every tag
//! that wanders into the field.
//!
//! Each burst makes up to `write_attempts` attempts. One attempt = reset
//! the outcome, send the write command, then drain replies until the
//! outcome changes or the per-attempt window expires; failed attempts are
//! separated by a fixed backoff. The queued payload is consumed by the
//! burst whatever the outcome.

use log::{info, warn};

use crate::config::SystemConfig;
use crate::protocol::epc::text_to_hex;
use crate::radio::r200::{TransceiverDriver, WriteOutcome};
use crate::radio::transport::Transport;

use super::arbiter::{Mode, ModeArbiter};
use super::messages::{ResultMessage, Status};
use super::ports::{FeedbackPort, ResultSink, TimePort};

/// Sleep between reply-drain iterations while waiting for a write ack.
const ACK_DRAIN_INTERVAL_MS: u32 = 5;

/// Terminal outcome of one write burst.
enum BurstOutcome {
    Acked,
    Device(u8),
    Timeout,
}

/// Write-side state machine. One instance lives on the radio task.
pub struct WriteTask {
    /// Set when this trigger press has already fired a burst.
    fired: bool,
}

impl WriteTask {
    pub fn new() -> Self {
        Self { fired: false }
    }

    /// Run one task cycle. Sampling rules match [`ScanTask`]: the caller
    /// samples the trigger once per cycle and the mode is re-read fresh
    /// through the arbiter before anything touches the UART.
    ///
    /// [`ScanTask`]: super::scan::ScanTask
    pub fn run_cycle<T: Transport>(
        &mut self,
        trigger_held: bool,
        driver: &mut TransceiverDriver<T>,
        arbiter: &ModeArbiter,
        config: &SystemConfig,
        time: &impl TimePort,
        sink: &mut impl ResultSink,
        feedback: &mut impl FeedbackPort,
    ) {
        if !trigger_held {
            self.fired = false;
            return;
        }

        let Some(snapshot) = arbiter.snapshot() else {
            return;
        };
        if snapshot.mode != Mode::Write {
            return;
        }
        let Some(payload) = snapshot.pending.filter(|p| !p.is_empty()) else {
            return;
        };
        if self.fired {
            return;
        }
        self.fired = true;

        let message = self.fire_burst(&payload, driver, config, time, feedback);
        sink.publish(message);
        arbiter.clear_payload();
    }

    /// Classify the payload, run the attempt loop, and build the single
    /// result message for this press.
    fn fire_burst<T: Transport>(
        &mut self,
        payload: &str,
        driver: &mut TransceiverDriver<T>,
        config: &SystemConfig,
        time: &impl TimePort,
        feedback: &mut impl FeedbackPort,
    ) -> ResultMessage {
        // All-hex payloads are written verbatim; anything else is treated
        // as text and mapped onto the EPC bank (which also word-aligns it).
        let is_hex = payload.bytes().all(|b| b.is_ascii_hexdigit());
        let epc_hex = if is_hex {
            payload.to_ascii_uppercase()
        } else {
            text_to_hex(payload)
        };

        if epc_hex.len() % 4 != 0 {
            warn!("write: rejected payload '{payload}': not word-aligned");
            return ResultMessage::feedback_error(
                "write payload must be a multiple of 4 hex digits",
            );
        }

        info!(
            "write: programming EPC {} ({} attempts max)",
            epc_hex, config.write_attempts
        );

        match self.attempt_loop(&epc_hex, driver, config, time) {
            BurstOutcome::Acked => {
                info!("write: EPC {} programmed", epc_hex);
                feedback.beep();
                ResultMessage::WriteResult {
                    uid: epc_hex,
                    data: payload.to_owned(),
                    status: Status::Ok,
                    message: "write successful".to_owned(),
                }
            }
            BurstOutcome::Device(code) => ResultMessage::WriteResult {
                uid: epc_hex,
                data: payload.to_owned(),
                status: Status::Error,
                message: describe_device_error(code),
            },
            BurstOutcome::Timeout => ResultMessage::WriteResult {
                uid: epc_hex,
                data: payload.to_owned(),
                status: Status::Error,
                message: "no response from transceiver".to_owned(),
            },
        }
    }

    fn attempt_loop<T: Transport>(
        &mut self,
        epc_hex: &str,
        driver: &mut TransceiverDriver<T>,
        config: &SystemConfig,
        time: &impl TimePort,
    ) -> BurstOutcome {
        let mut last = BurstOutcome::Timeout;

        for attempt in 1..=config.write_attempts {
            if attempt > 1 {
                time.sleep_ms(config.write_backoff_ms);
            }

            driver.reset_outcome();
            if let Err(e) = driver.write_epc(epc_hex, &config.access_password) {
                warn!("write: attempt {attempt} failed to send: {e}");
                continue;
            }

            let deadline = time.now_ms() + config.write_reply_window_ms;
            loop {
                if let Err(e) = driver.process_incoming() {
                    warn!("write: receive failed: {e}");
                    break;
                }
                match driver.write_outcome() {
                    WriteOutcome::Acked => return BurstOutcome::Acked,
                    WriteOutcome::Error(code) => {
                        warn!("write: attempt {attempt} rejected: 0x{code:02X}");
                        last = BurstOutcome::Device(code);
                        break;
                    }
                    WriteOutcome::Pending => {}
                }
                if time.now_ms() >= deadline {
                    warn!("write: attempt {attempt} timed out");
                    last = BurstOutcome::Timeout;
                    break;
                }
                time.sleep_ms(ACK_DRAIN_INTERVAL_MS);
            }
        }

        last
    }
}

impl Default for WriteTask {
    fn default() -> Self {
        Self::new()
    }
}

/// Map a device error code onto the operator-facing message.
fn describe_device_error(code: u8) -> String {
    match code {
        0x10 => "tag not found or out of range".to_owned(),
        0x15 => "no tag detected in poll".to_owned(),
        0x16 => "access denied (check password)".to_owned(),
        other => format!("device error 0x{other:02X}"),
    }
}
