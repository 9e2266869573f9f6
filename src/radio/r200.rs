//! R200 UHF transceiver driver.
//!
//! Owns the UART transport and the streaming frame decoder; exposes the
//! three operations the tasks need (inventory poll, EPC write, reply
//! drain) plus the last write outcome. All timeout logic lives with the
//! caller — the transceiver answers a single poll with zero or one
//! notification, so callers drain [`process_incoming`] within a bounded
//! window of their own choosing.
//!
//! [`process_incoming`]: TransceiverDriver::process_incoming

use log::{debug, warn};

use crate::error::{Error, ProtocolError, Result, TransportError};
use crate::protocol::epc::hex_to_bytes;
use crate::protocol::frame::{
    classify, encode, FrameDecoder, FrameEvent, Tag, CMD_HARDWARE_VERSION, CMD_SINGLE_POLL,
    CMD_WRITE_EPC, TYPE_COMMAND,
};

use super::transport::Transport;

/// EPC memory bank selector for write commands.
const MEM_BANK_EPC: u8 = 0x01;
/// First word of the EPC field (skips the CRC and PC words).
const EPC_START_WORD: u16 = 2;
/// Password(4) + bank(1) + start address(2) + word count(2).
const WRITE_PARAM_OVERHEAD: usize = 9;
/// Write command parameter buffer, sized for the longest EPC banks in the
/// field (64 data bytes).
const MAX_WRITE_PARAMS: usize = WRITE_PARAM_OVERHEAD + 64;

/// Outcome of the most recent EPC write command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// No reply received since the last reset.
    Pending,
    /// The transceiver acknowledged the write.
    Acked,
    /// The transceiver reported an error code.
    Error(u8),
}

/// Driver for an R200-class UHF transceiver on a byte transport.
pub struct TransceiverDriver<T: Transport> {
    transport: T,
    decoder: FrameDecoder,
    outcome: WriteOutcome,
}

impl<T: Transport> TransceiverDriver<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            decoder: FrameDecoder::new(),
            outcome: WriteOutcome::Pending,
        }
    }

    /// Request the hardware/firmware version (boot health check).
    /// The reply is logged when it arrives; nothing is surfaced.
    pub fn hardware_version(&mut self) -> Result<()> {
        self.send(CMD_HARDWARE_VERSION, &[])
    }

    /// Fire a single-shot inventory poll. Non-blocking; the reply (if any)
    /// arrives through [`Self::process_incoming`].
    pub fn poll(&mut self) -> Result<()> {
        self.send(CMD_SINGLE_POLL, &[])
    }

    /// Program a new EPC into the tag in field.
    ///
    /// `new_epc` must be word-aligned hex (a multiple of 4 digits);
    /// misaligned or non-hex input is rejected without touching the UART.
    /// The stored write outcome is reset before the command goes out.
    pub fn write_epc(&mut self, new_epc: &str, password: &str) -> Result<()> {
        if new_epc.is_empty() || new_epc.len() % 4 != 0 {
            return Err(ProtocolError::EpcNotWordAligned.into());
        }
        let data = hex_to_bytes(new_epc).ok_or(ProtocolError::EpcNotHex)?;
        let word_count = (data.len() / 2) as u16;
        let pwd = u32::from_str_radix(password, 16).unwrap_or(0);

        let mut params = heapless::Vec::<u8, MAX_WRITE_PARAMS>::new();
        let overflow = params.extend_from_slice(&pwd.to_be_bytes()).is_err()
            || params.push(MEM_BANK_EPC).is_err()
            || params.extend_from_slice(&EPC_START_WORD.to_be_bytes()).is_err()
            || params.extend_from_slice(&word_count.to_be_bytes()).is_err()
            || params.extend_from_slice(&data).is_err();
        if overflow {
            return Err(ProtocolError::ParamsTooLong.into());
        }

        self.outcome = WriteOutcome::Pending;
        self.send(CMD_WRITE_EPC, &params)
    }

    /// Drain buffered transceiver bytes through the frame decoder.
    ///
    /// Write acknowledgements and device errors update the stored outcome;
    /// the first tag notification decoded this call is returned. Callers
    /// own the deadline and call this repeatedly inside their window.
    pub fn process_incoming(&mut self) -> Result<Option<Tag>> {
        let mut tag: Option<Tag> = None;
        let mut buf = [0u8; 64];

        while self.transport.available() {
            let n = self
                .transport
                .read(&mut buf)
                .map_err(|_| TransportError::ReadFailed)?;
            if n == 0 {
                break;
            }
            for &byte in &buf[..n] {
                let Some(frame) = self.decoder.feed(byte) else {
                    continue;
                };
                match classify(&frame) {
                    Some(FrameEvent::TagRead(t)) => {
                        if tag.is_none() {
                            tag = Some(t);
                        }
                    }
                    Some(FrameEvent::WriteAck) => {
                        debug!("r200: write acknowledged");
                        self.outcome = WriteOutcome::Acked;
                    }
                    Some(FrameEvent::DeviceError(code)) => {
                        warn!("r200: device error 0x{code:02X}");
                        self.outcome = WriteOutcome::Error(code);
                    }
                    Some(FrameEvent::HardwareInfo) => {
                        debug!("r200: hardware info {:02X?}", frame.params());
                    }
                    // Unroutable frames are dropped without a trace of error.
                    None => {}
                }
            }
        }

        Ok(tag)
    }

    /// Outcome of the write command sent since the last reset.
    pub fn write_outcome(&self) -> WriteOutcome {
        self.outcome
    }

    /// Access the underlying transport (bench rigs and test harnesses).
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Forget any previous write reply before a fresh attempt.
    pub fn reset_outcome(&mut self) {
        self.outcome = WriteOutcome::Pending;
    }

    fn send(&mut self, cmd: u8, params: &[u8]) -> Result<()> {
        let frame = encode(TYPE_COMMAND, cmd, params)?;
        let written = self
            .transport
            .write(&frame)
            .map_err(|_| TransportError::WriteFailed)?;
        if written != frame.len() {
            return Err(Error::Transport(TransportError::WriteFailed));
        }
        self.transport
            .flush()
            .map_err(|_| TransportError::WriteFailed)?;
        Ok(())
    }
}

// ── Tests ────────────────────────────────────────────────────
