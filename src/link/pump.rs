//! Notification pump: result channel → wireless client.
//!
//! Runs on its own thread. Blocks for the next queued message, serialises
//! it to JSON, and hands it to the client link. Messages that arrive while
//! no client is connected are consumed and discarded — the channel depth
//! bounds staleness, not the link.

use log::{debug, info, warn};

use crate::app::ports::ClientLink;
use crate::channels;

/// Forward exactly one queued message (blocking until one arrives).
pub fn forward_next(link: &mut impl ClientLink) {
    let msg = channels::receive_blocking();

    if !link.is_connected() {
        debug!("notify: no client connected, dropping message");
        return;
    }

    match serde_json::to_string(&msg) {
        Ok(json) => {
            info!("notify: {json}");
            link.send_text(&json);
        }
        Err(e) => warn!("notify: failed to serialise message: {e}"),
    }
}

/// Pump loop entry point for the notification thread.
pub fn run(mut link: impl ClientLink) -> ! {
    loop {
        forward_next(&mut link);
    }
}
