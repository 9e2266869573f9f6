//! Transceiver access layer.
//!
//! The UART towards the R200 module is a single owned handle, reachable
//! only through [`r200::TransceiverDriver`] — whoever owns the driver owns
//! the radio. Mode arbitration above this layer decides which task drives
//! it in a given cycle.

pub mod r200;
pub mod transport;
