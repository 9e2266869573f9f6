//! R200 wire protocol.
//!
//! Wire format:
//! ```text
//! ┌──────┬──────┬──────┬─────────────┬───────────┬──────────┬──────┐
//! │ 0xAA │ TYPE │ CMD  │ LEN (2B BE) │ PARAMS(N) │ CHECKSUM │ 0xDD │
//! └──────┴──────┴──────┴─────────────┴───────────┴──────────┴──────┘
//! ```
//!
//! Checksum is the low byte of the sum over TYPE..last PARAM byte.
//! [`frame`] owns framing, reassembly, and reply classification;
//! [`epc`] owns the EPC text/hex conversions.

pub mod epc;
pub mod frame;
