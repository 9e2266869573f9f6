//! GPIO / peripheral pin assignments for the TagWand handheld board.
//!
//! Single source of truth — every driver references this module rather than
//! hard-coding pin numbers.  Change a pin here and it propagates everywhere.

// ---------------------------------------------------------------------------
// R200 UHF transceiver (UART1)
// ---------------------------------------------------------------------------

/// UART TX towards the transceiver's RX.
pub const R200_TX_GPIO: i32 = 17;
/// UART RX from the transceiver's TX.
pub const R200_RX_GPIO: i32 = 16;

// ---------------------------------------------------------------------------
// Trigger button (active-low with external pull-up)
// ---------------------------------------------------------------------------

/// Momentary trigger switch gating scan/write activity.
pub const TRIGGER_GPIO: i32 = 21;

// ---------------------------------------------------------------------------
// User feedback
// ---------------------------------------------------------------------------

/// Passive buzzer driven by the (external) feedback task.
pub const BUZZER_GPIO: i32 = 22;
/// Status LED: connection / activity indication.
pub const LED_GPIO: i32 = 2;
