//! TagWand Firmware — Main Entry Point
//!
//! Hexagonal architecture with two long-lived threads around a shared
//! mode arbiter:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                     Adapters (outer ring)                    │
//! │                                                              │
//! │  EspUartTransport   GpioTrigger   BeepRequester  ConsoleLink │
//! │  (Transport)        (TriggerPort) (FeedbackPort) (ClientLink)│
//! │                                                              │
//! │  ─────────────────── Port Trait Boundary ──────────────────  │
//! │                                                              │
//! │  ┌──────────────────────────────────────────────────────┐    │
//! │  │ radio thread (APP core)                              │    │
//! │  │   TransceiverDriver · ScanTask · WriteTask           │    │
//! │  └──────────────────────────────────────────────────────┘    │
//! │                     │ result channel (depth 5)               │
//! │  ┌──────────────────▼───────────────────────────────────┐    │
//! │  │ notify thread (PRO core) — pump to the client link   │    │
//! │  └──────────────────────────────────────────────────────┘    │
//! │                                                              │
//! │  ModeArbiter ◀── link::commands (BLE write characteristic)   │
//! └──────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use std::sync::Arc;

use anyhow::Result;
use log::{info, warn};

use esp_idf_hal::gpio::{AnyIOPin, IOPin, PinDriver, Pull};
use esp_idf_hal::peripherals::Peripherals;
use esp_idf_hal::uart::{config::Config as UartConfig, UartDriver};
use esp_idf_hal::units::Hertz;

use tagwand::adapters::feedback::BeepRequester;
use tagwand::adapters::link::ConsoleLink;
use tagwand::adapters::time::MonotonicClock;
use tagwand::adapters::uart::EspUartTransport;
use tagwand::app::arbiter::ModeArbiter;
use tagwand::app::ports::{TimePort, TriggerPort};
use tagwand::app::scan::ScanTask;
use tagwand::app::write::WriteTask;
use tagwand::channels::QueueSink;
use tagwand::config::SystemConfig;
use tagwand::drivers::task_pin::{spawn_on_core, Core};
use tagwand::drivers::trigger::GpioTrigger;
use tagwand::link::pump;
use tagwand::radio::r200::TransceiverDriver;

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("TagWand v{} starting", env!("CARGO_PKG_VERSION"));

    let config = SystemConfig::default();
    let peripherals = Peripherals::take()?;

    // ── 2. Transceiver UART ───────────────────────────────────
    // The UART handle is owned by the driver, the driver by the radio
    // thread — nothing else can reach the radio.
    let uart_config = UartConfig::new().baudrate(Hertz(config.uart_baud));
    let uart = UartDriver::new(
        peripherals.uart1,
        peripherals.pins.gpio17,
        peripherals.pins.gpio16,
        Option::<AnyIOPin>::None,
        Option::<AnyIOPin>::None,
        &uart_config,
    )?;
    let mut driver = TransceiverDriver::new(EspUartTransport::new(uart));

    // Health check: the version reply is logged when the radio thread
    // starts draining.
    if let Err(e) = driver.hardware_version() {
        warn!("transceiver version query failed: {e}");
    }

    // ── 3. Trigger button ─────────────────────────────────────
    let mut trigger_pin = PinDriver::input(peripherals.pins.gpio21.downgrade())?;
    trigger_pin.set_pull(Pull::Up)?;
    let trigger = GpioTrigger::new(trigger_pin);

    // ── 4. Shared mode state ──────────────────────────────────
    // The BLE write characteristic dispatches inbound commands with
    // `link::commands::handle_client_text(text, &arbiter)` and publishes
    // the returned feedback through `channels::publish`.
    let arbiter = Arc::new(ModeArbiter::new());

    // ── 5. Radio thread (APP core) ────────────────────────────
    let radio_arbiter = Arc::clone(&arbiter);
    let radio_config = config.clone();
    let _radio = spawn_on_core(Core::App, 12, 8, "radio\0", move || {
        run_radio_loop(driver, trigger, &radio_arbiter, &radio_config);
    });

    // ── 6. Notification pump (PRO core) ───────────────────────
    let _notify = spawn_on_core(Core::Pro, 10, 8, "notify\0", move || {
        pump::run(ConsoleLink);
    });

    info!("System ready: hold the trigger to scan, switch modes over the client link");

    // The threads own the system from here; FreeRTOS schedules them.
    loop {
        std::thread::sleep(std::time::Duration::from_secs(1));
    }
}

/// Radio loop: one thread owns the transceiver and runs both task state
/// machines. The trigger is sampled exactly once per cycle and the mode is
/// re-read by each state machine, so a mode flip takes effect within one
/// period and the two machines never drive the UART in the same cycle.
fn run_radio_loop(
    mut driver: TransceiverDriver<EspUartTransport>,
    mut trigger: GpioTrigger,
    arbiter: &ModeArbiter,
    config: &SystemConfig,
) {
    let clock = MonotonicClock::new();
    let mut scan = ScanTask::new();
    let mut write = WriteTask::new();
    let mut sink = QueueSink;
    let mut feedback = BeepRequester;

    loop {
        let held = trigger.is_held();

        scan.run_cycle(
            held,
            &mut driver,
            arbiter,
            config,
            &clock,
            &mut sink,
            &mut feedback,
        );
        write.run_cycle(
            held,
            &mut driver,
            arbiter,
            config,
            &clock,
            &mut sink,
            &mut feedback,
        );

        clock.sleep_ms(config.task_period_ms);
    }
}
