//! Inter-task notification channel.
//!
//! Uses an `embassy-sync` bounded MPMC channel to bridge the radio task
//! with the notification pump. Producers never block the hardware loops:
//! a full queue drops the message (bounded staleness beats stalling the
//! poll cadence). The pump on the other side blocks indefinitely for the
//! next message.
//!
//! ```text
//! ┌──────────────┐  ResultMessage  ┌───────────────────┐
//! │  Radio task   │───────────────▶│ Notification pump │──▶ client link
//! │  + dispatcher │   (depth 5)    │  (blocking recv)  │
//! └──────────────┘                 └───────────────────┘
//! ```

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use log::warn;

use crate::app::messages::ResultMessage;
use crate::app::ports::ResultSink;

/// Channel depth for outbound result messages.
const RESULT_DEPTH: usize = 5;

/// Outbound result channel: radio task / dispatcher → notification pump.
pub static RESULT_CHANNEL: Channel<CriticalSectionRawMutex, ResultMessage, RESULT_DEPTH> =
    Channel::new();

/// Non-blocking bounded send; drops (with a warning) when the pump lags.
pub fn publish(msg: ResultMessage) {
    if RESULT_CHANNEL.try_send(msg).is_err() {
        warn!("notify: result queue full, dropping message");
    }
}

/// Block the calling thread until the next message arrives.
pub fn receive_blocking() -> ResultMessage {
    futures_lite::future::block_on(RESULT_CHANNEL.receive())
}

/// [`ResultSink`] adapter over the static channel.
pub struct QueueSink;

impl ResultSink for QueueSink {
    fn publish(&mut self, msg: ResultMessage) {
        publish(msg);
    }
}
