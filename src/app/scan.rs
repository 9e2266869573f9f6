//! Trigger-gated scan cycle.
//!
//! State machine: Idle (trigger released, or mode is Write) → Polling
//! (trigger held, mode is Scan). A polling cycle fires a single-shot
//! inventory command and drains the reply window; a tag whose EPC differs
//! from the last one seen is emitted as a read result. The duplicate key
//! is cleared only when the trigger is released, so re-presenting the same
//! tag after a release produces a fresh result.
//!
//! The mode is re-read at the start of every cycle, before any UART
//! traffic — while the device is in write mode this task never touches the
//! radio and never emits.

use log::{info, warn};

use crate::config::SystemConfig;
use crate::protocol::epc::hex_to_text;
use crate::protocol::frame::Tag;
use crate::radio::r200::TransceiverDriver;
use crate::radio::transport::Transport;

use super::arbiter::{Mode, ModeArbiter};
use super::messages::ResultMessage;
use super::ports::{FeedbackPort, ResultSink, TimePort};

/// Scan-side state machine. One instance lives on the radio task.
pub struct ScanTask {
    /// EPC of the last emitted read; `None` whenever the trigger is up.
    last_epc: Option<String>,
}

impl ScanTask {
    pub fn new() -> Self {
        Self { last_epc: None }
    }

    /// Run one task cycle.
    ///
    /// `trigger_held` is the debounced trigger sample for this cycle; the
    /// caller samples it exactly once per cycle and shares it with the
    /// write task.
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
            self.last_epc = None;
            return;
        }

        // Arbiter contended: skip this cycle, try again next period.
        let Some(snapshot) = arbiter.snapshot() else {
            return;
        };
        if snapshot.mode != Mode::Scan {
            return;
        }

        if let Err(e) = driver.poll() {
            warn!("scan: poll command failed: {e}");
            return;
        }

        // A single poll yields zero or one notification; drain the reply
        // window and stop at the first tag.
        let deadline = time.now_ms() + config.poll_window_ms;
        while time.now_ms() < deadline {
            match driver.process_incoming() {
                Ok(Some(tag)) => {
                    self.emit(tag, sink, feedback);
                    return;
                }
                Ok(None) => {}
                Err(e) => {
                    warn!("scan: receive failed: {e}");
                    return;
                }
            }
            time.sleep_ms(config.drain_interval_ms);
        }
    }

    fn emit(&mut self, tag: Tag, sink: &mut impl ResultSink, feedback: &mut impl FeedbackPort) {
        if self.last_epc.as_deref() == Some(tag.epc.as_str()) {
            return;
        }
        self.last_epc = Some(tag.epc.clone());

        let text = {
            let decoded = hex_to_text(&tag.epc);
            if decoded.is_empty() {
                tag.epc.clone()
            } else {
                decoded
            }
        };

        info!("scan: tag {} (rssi {})", tag.epc, tag.rssi);
        sink.publish(ResultMessage::ReadResult {
            uid: tag.epc,
            text,
            rssi: tag.rssi,
        });
        feedback.beep();
    }
}

impl Default for ScanTask {
    fn default() -> Self {
        Self::new()
    }
}
