//! System configuration parameters
//!
//! All tunable parameters for the TagWand firmware: protocol timing windows,
//! the write retry budget, and UART link settings.  The deadline values
//! mirror the transceiver's poll/response cadence and should only be changed
//! together with antenna/power settings.

use serde::{Deserialize, Serialize};

/// Core system configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemConfig {
    // --- Transceiver UART link ---
    /// UART baud rate towards the R200 module.
    pub uart_baud: u32,

    // --- Scan timing ---
    /// Window to drain a single-poll reply (milliseconds).
    pub poll_window_ms: u64,
    /// Sleep between reply-drain iterations (milliseconds).
    pub drain_interval_ms: u32,
    /// Radio task loop period when idle (milliseconds).
    pub task_period_ms: u32,

    // --- Write retry ---
    /// Maximum write attempts per trigger press.
    pub write_attempts: u32,
    /// Window to wait for a write acknowledge per attempt (milliseconds).
    pub write_reply_window_ms: u64,
    /// Backoff between failed write attempts (milliseconds).
    pub write_backoff_ms: u32,
    /// Access password sent with every EPC write (8 hex digits).
    pub access_password: heapless::String<8>,
}

impl Default for SystemConfig {
    fn default() -> Self {
        let mut password = heapless::String::new();
        // Factory default access password for unlocked tags.
        let _ = password.push_str("00000000");

        Self {
            // UART
            uart_baud: 115_200,

            // Scan
            poll_window_ms: 60,
            drain_interval_ms: 2,
            task_period_ms: 20,

            // Write
            write_attempts: 5,
            write_reply_window_ms: 800,
            write_backoff_ms: 100,
            access_password: password,
        }
    }
}
