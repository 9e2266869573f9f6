//! Integration tests: scan/write state machines over a scripted transport.

use std::cell::Cell;
use std::collections::VecDeque;

use tagwand::app::arbiter::{Mode, ModeArbiter};
use tagwand::app::messages::{ResultMessage, Status};
use tagwand::app::ports::{FeedbackPort, ResultSink, TimePort};
use tagwand::app::scan::ScanTask;
use tagwand::app::write::WriteTask;
use tagwand::config::SystemConfig;
use tagwand::protocol::frame::{encode, CMD_SINGLE_POLL, CMD_WRITE_EPC, TYPE_NOTIFICATION};
use tagwand::radio::r200::TransceiverDriver;
use tagwand::radio::transport::Transport;

// ── Mock implementations ──────────────────────────────────────

/// Transport that answers every sent command with a canned reply, the way
/// the real transceiver answers polls and writes.
#[derive(Default)]
struct ScriptedTransport {
    rx: VecDeque<u8>,
    /// Every outbound frame, verbatim.
    tx: Vec<Vec<u8>>,
    /// Queued into `rx` whenever a command is written.
    auto_reply: Option<Vec<u8>>,
}

impl Transport for ScriptedTransport {
    type Error = ();

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, ()> {
        let mut n = 0;
        while n < buf.len() {
            match self.rx.pop_front() {
                Some(b) => {
                    buf[n] = b;
                    n += 1;
                }
                None => break,
            }
        }
        Ok(n)
    }

    fn write(&mut self, data: &[u8]) -> Result<usize, ()> {
        self.tx.push(data.to_vec());
        if let Some(reply) = &self.auto_reply {
            self.rx.extend(reply.iter().copied());
        }
        Ok(data.len())
    }

    fn flush(&mut self) -> Result<(), ()> {
        Ok(())
    }

    fn available(&self) -> bool {
        !self.rx.is_empty()
    }
}

/// Simulated clock: `sleep_ms` advances time instantly.
struct SimClock {
    now: Cell<u64>,
}

impl SimClock {
    fn new() -> Self {
        Self { now: Cell::new(0) }
    }
}

impl TimePort for SimClock {
    fn now_ms(&self) -> u64 {
        self.now.get()
    }

    fn sleep_ms(&self, ms: u32) {
        self.now.set(self.now.get() + u64::from(ms));
    }
}

#[derive(Default)]
struct VecSink {
    messages: Vec<ResultMessage>,
}

impl ResultSink for VecSink {
    fn publish(&mut self, msg: ResultMessage) {
        self.messages.push(msg);
    }
}

#[derive(Default)]
struct CountingFeedback {
    beeps: usize,
}

impl FeedbackPort for CountingFeedback {
    fn beep(&mut self) {
        self.beeps += 1;
    }
}

// ── Helpers ───────────────────────────────────────────────────

fn tag_notification(epc: &[u8], rssi: u8) -> Vec<u8> {
    // RSSI + PC + EPC + CRC.
    let mut params = vec![rssi, 0x30, 0x00];
    params.extend_from_slice(epc);
    params.extend_from_slice(&[0x12, 0x34]);
    encode(TYPE_NOTIFICATION, CMD_SINGLE_POLL, &params)
        .unwrap()
        .to_vec()
}

fn write_ack() -> Vec<u8> {
    encode(0x01, CMD_WRITE_EPC, &[]).unwrap().to_vec()
}

fn device_error(code: u8) -> Vec<u8> {
    encode(0x01, 0xFF, &[code]).unwrap().to_vec()
}

fn command_bytes_sent(tx: &[Vec<u8>], cmd: u8) -> usize {
    tx.iter().filter(|frame| frame.get(2) == Some(&cmd)).count()
}

struct Rig {
    driver: TransceiverDriver<ScriptedTransport>,
    arbiter: ModeArbiter,
    config: SystemConfig,
    clock: SimClock,
    sink: VecSink,
    feedback: CountingFeedback,
    scan: ScanTask,
    write: WriteTask,
}

impl Rig {
    fn new() -> Self {
        Self {
            driver: TransceiverDriver::new(ScriptedTransport::default()),
            arbiter: ModeArbiter::new(),
            config: SystemConfig::default(),
            clock: SimClock::new(),
            sink: VecSink::default(),
            feedback: CountingFeedback::default(),
            scan: ScanTask::new(),
            write: WriteTask::new(),
        }
    }

    fn transport(&mut self) -> &mut ScriptedTransport {
        self.driver.transport_mut()
    }

    /// One radio-task cycle: trigger sample shared by both machines.
    fn cycle(&mut self, trigger_held: bool) {
        self.scan.run_cycle(
            trigger_held,
            &mut self.driver,
            &self.arbiter,
            &self.config,
            &self.clock,
            &mut self.sink,
            &mut self.feedback,
        );
        self.write.run_cycle(
            trigger_held,
            &mut self.driver,
            &self.arbiter,
            &self.config,
            &self.clock,
            &mut self.sink,
            &mut self.feedback,
        );
    }
}

// ── Scan path ─────────────────────────────────────────────────

#[test]
fn same_tag_deduplicated_until_trigger_release() {
    let mut rig = Rig::new();
    rig.transport().auto_reply = Some(tag_notification(&[0xAA, 0xBB, 0xCC, 0xDD], 0x5A));

    // Two cycles with the trigger held: the tag is present both times but
    // only the first poll emits.
    rig.cycle(true);
    rig.cycle(true);
    assert_eq!(rig.sink.messages.len(), 1);
    match &rig.sink.messages[0] {
        ResultMessage::ReadResult { uid, rssi, .. } => {
            assert_eq!(uid, "AABBCCDD");
            assert_eq!(*rssi, 0x5A);
        }
        other => panic!("expected ReadResult, got {other:?}"),
    }

    // Release and re-present: a fresh result is produced.
    rig.cycle(false);
    rig.cycle(true);
    assert_eq!(rig.sink.messages.len(), 2);
    assert_eq!(rig.feedback.beeps, 2);
}

#[test]
fn unreadable_epc_falls_back_to_raw_hex_text() {
    let mut rig = Rig::new();
    rig.transport().auto_reply = Some(tag_notification(&[0x01, 0x02, 0x03, 0x04], 0x40));

    rig.cycle(true);
    match &rig.sink.messages[0] {
        ResultMessage::ReadResult { uid, text, .. } => {
            assert_eq!(uid, "01020304");
            assert_eq!(text, uid, "non-printable EPC falls back to raw hex");
        }
        other => panic!("expected ReadResult, got {other:?}"),
    }
}

#[test]
fn scan_is_silent_while_in_write_mode() {
    let mut rig = Rig::new();
    rig.transport().auto_reply = Some(tag_notification(&[0xAA, 0xBB, 0xCC, 0xDD], 0x5A));
    rig.arbiter.set_mode(Mode::Write);

    rig.cycle(true);
    rig.cycle(true);

    assert!(rig.sink.messages.is_empty());
    assert_eq!(
        command_bytes_sent(&rig.driver.transport_mut().tx, CMD_SINGLE_POLL),
        0,
        "no poll may be sent while write mode is active"
    );
}

// ── Write path ────────────────────────────────────────────────

fn arm_write(rig: &mut Rig, payload: &str) {
    rig.arbiter.set_mode(Mode::Write);
    assert!(rig.arbiter.set_payload(payload));
}

#[test]
fn write_ack_yields_single_ok_result() {
    let mut rig = Rig::new();
    rig.transport().auto_reply = Some(write_ack());
    arm_write(&mut rig, "1122");

    rig.cycle(true);

    assert_eq!(rig.sink.messages.len(), 1);
    match &rig.sink.messages[0] {
        ResultMessage::WriteResult {
            uid,
            data,
            status,
            message,
        } => {
            assert_eq!(uid, "1122");
            assert_eq!(data, "1122");
            assert_eq!(*status, Status::Ok);
            assert!(message.contains("successful"));
        }
        other => panic!("expected WriteResult, got {other:?}"),
    }
    assert_eq!(
        command_bytes_sent(&rig.driver.transport_mut().tx, CMD_WRITE_EPC),
        1,
        "success on the first attempt stops the retry loop"
    );
    assert_eq!(rig.feedback.beeps, 1);
    assert_eq!(
        rig.arbiter.snapshot().unwrap().pending,
        None,
        "payload is consumed by the burst"
    );
}

#[test]
fn fired_latch_requires_release_and_repress() {
    let mut rig = Rig::new();
    rig.transport().auto_reply = Some(write_ack());
    arm_write(&mut rig, "1122");

    rig.cycle(true);
    // Holding the trigger must not fire again, even with a fresh payload.
    assert!(rig.arbiter.set_payload("3344"));
    rig.cycle(true);
    assert_eq!(rig.sink.messages.len(), 1);

    // Release, re-press: the new payload fires.
    rig.cycle(false);
    rig.cycle(true);
    assert_eq!(rig.sink.messages.len(), 2);
    match &rig.sink.messages[1] {
        ResultMessage::WriteResult { uid, .. } => assert_eq!(uid, "3344"),
        other => panic!("expected WriteResult, got {other:?}"),
    }
}

#[test]
fn access_denied_is_reported_with_its_message() {
    let mut rig = Rig::new();
    rig.transport().auto_reply = Some(device_error(0x16));
    arm_write(&mut rig, "1122");

    rig.cycle(true);

    assert_eq!(rig.sink.messages.len(), 1);
    match &rig.sink.messages[0] {
        ResultMessage::WriteResult {
            status, message, ..
        } => {
            assert_eq!(*status, Status::Error);
            assert!(message.contains("access denied"));
        }
        other => panic!("expected WriteResult, got {other:?}"),
    }
    assert_eq!(rig.feedback.beeps, 0, "failed writes do not beep");
}

#[test]
fn no_response_exhausts_the_attempt_budget() {
    let mut rig = Rig::new();
    arm_write(&mut rig, "1122");

    rig.cycle(true);

    assert_eq!(
        command_bytes_sent(&rig.driver.transport_mut().tx, CMD_WRITE_EPC),
        rig.config.write_attempts as usize,
        "exactly the attempt budget, no more"
    );
    assert_eq!(rig.sink.messages.len(), 1);
    match &rig.sink.messages[0] {
        ResultMessage::WriteResult {
            status, message, ..
        } => {
            assert_eq!(*status, Status::Error);
            assert!(message.contains("no response"));
        }
        other => panic!("expected WriteResult, got {other:?}"),
    }
}

#[test]
fn misaligned_hex_payload_surfaces_feedback_error() {
    let mut rig = Rig::new();
    arm_write(&mut rig, "ABC");

    rig.cycle(true);

    assert_eq!(
        command_bytes_sent(&rig.driver.transport_mut().tx, CMD_WRITE_EPC),
        0,
        "invalid payloads never reach the UART"
    );
    assert_eq!(rig.sink.messages.len(), 1);
    match &rig.sink.messages[0] {
        ResultMessage::Feedback { status, message } => {
            assert_eq!(*status, Status::Error);
            assert!(message.contains("multiple of 4"));
        }
        other => panic!("expected Feedback, got {other:?}"),
    }
}

#[test]
fn text_payload_is_word_aligned_and_written() {
    let mut rig = Rig::new();
    rig.transport().auto_reply = Some(write_ack());
    // Not all-hex, so it is treated as text: "Hi!" -> 486921 -> padded.
    arm_write(&mut rig, "Hi!");

    rig.cycle(true);

    match &rig.sink.messages[0] {
        ResultMessage::WriteResult {
            uid, data, status, ..
        } => {
            assert_eq!(uid, "48692100");
            assert_eq!(data, "Hi!");
            assert_eq!(*status, Status::Ok);
        }
        other => panic!("expected WriteResult, got {other:?}"),
    }
}
