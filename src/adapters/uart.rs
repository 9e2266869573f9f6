//! ESP-IDF UART transport towards the R200 transceiver.
//!
//! Owns the `UartDriver` for the transceiver link — constructing this
//! adapter is what makes radio access exclusive, since the driver handle
//! cannot be cloned and everything above it goes through
//! [`TransceiverDriver`](crate::radio::r200::TransceiverDriver).

#[cfg(target_os = "espidf")]
pub use esp_impl::EspUartTransport;

#[cfg(target_os = "espidf")]
mod esp_impl {
    use esp_idf_hal::uart::UartDriver;

    use crate::radio::transport::Transport;

    /// UART-backed byte transport. Reads are non-blocking: a zero-tick
    /// timeout returns whatever the RX FIFO already holds.
    pub struct EspUartTransport {
        uart: UartDriver<'static>,
    }

    impl EspUartTransport {
        pub fn new(uart: UartDriver<'static>) -> Self {
            Self { uart }
        }
    }

    impl Transport for EspUartTransport {
        type Error = esp_idf_sys::EspError;

        fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
            self.uart.read(buf, 0)
        }

        fn write(&mut self, data: &[u8]) -> Result<usize, Self::Error> {
            self.uart.write(data)
        }

        fn flush(&mut self) -> Result<(), Self::Error> {
            self.uart.wait_tx_done(100)
        }

        fn available(&self) -> bool {
            self.uart.remaining_read().map(|n| n > 0).unwrap_or(false)
        }
    }
}
