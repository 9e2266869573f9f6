//! Client link adapters.
//!
//! The production link is the BLE GATT server (an external collaborator):
//! its notify characteristic implements [`ClientLink`] and its write
//! characteristic feeds [`handle_client_text`]. `ConsoleLink` is the
//! bench stand-in that prints outbound messages to the serial log and is
//! always "connected".
//!
//! [`handle_client_text`]: crate::link::commands::handle_client_text

use log::info;

use crate::app::ports::ClientLink;

/// Serial-console stand-in for the wireless client link.
pub struct ConsoleLink;

impl ClientLink for ConsoleLink {
    fn is_connected(&self) -> bool {
        true
    }

    fn send_text(&mut self, text: &str) {
        info!("client <- {text}");
    }
}
