//! Turret firmware entry point.
//!
//! Hexagonal architecture around a single cooperative poll loop.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  UartTransport     HardwareAdapter        LogEventSink         │
//! │  (host link)       (Trigger + ServoBus)   (EventSink)          │
//! │  Esp32TimeAdapter  TaskWatchdog                                │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │              AppService (pure logic)                   │    │
//! │  │  Decoder · Output · LinkWatchdog · AxisMapper          │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

// ── Imports ───────────────────────────────────────────────────
use anyhow::{Context, Result};
use esp_idf_hal::delay::FreeRtos;
use esp_idf_hal::gpio::{AnyIOPin, AnyInputPin, AnyOutputPin, PinDriver};
use esp_idf_hal::peripherals::Peripherals;
use esp_idf_hal::uart::{UartDriver, config::Config as UartConfig};
use esp_idf_hal::units::Hertz;
use log::{info, warn};

use turret::adapters::hardware::HardwareAdapter;
use turret::adapters::log_sink::LogEventSink;
use turret::adapters::time::Esp32TimeAdapter;
use turret::adapters::uart::UartTransport;
use turret::app::service::AppService;
use turret::config::SystemConfig;
use turret::drivers::sts_bus::StsBus;
use turret::drivers::trigger::TriggerDriver;
use turret::drivers::watchdog::TaskWatchdog;
use turret::pins;

/// Yield to the idle task once per iteration so its own TWDT stays fed.
const LOOP_YIELD_MS: u32 = 1;

// ── Main ──────────────────────────────────────────────────────

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  Turret v{}                          ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Configuration ──────────────────────────────────────
    let config = SystemConfig::default();
    config.validate()?;
    match serde_json::to_string(&config) {
        Ok(json) => info!("Config: {}", json),
        Err(e) => warn!("Config dump failed: {}", e),
    }

    let watchdog = TaskWatchdog::new(config.loop_stall_timeout_ms);

    // ── 3. Peripherals ────────────────────────────────────────
    let peripherals = Peripherals::take().context("peripherals already taken")?;

    // SAFETY: each GPIO number in `pins` is claimed exactly once here.
    let (trigger_pin, host_tx, host_rx, servo_tx, servo_rx) = unsafe {
        (
            AnyOutputPin::new(pins::TRIGGER_GPIO),
            AnyOutputPin::new(pins::HOST_UART_TX_GPIO),
            AnyInputPin::new(pins::HOST_UART_RX_GPIO),
            AnyOutputPin::new(pins::SERVO_UART_TX_GPIO),
            AnyInputPin::new(pins::SERVO_UART_RX_GPIO),
        )
    };

    let trigger = TriggerDriver::new(
        PinDriver::output(trigger_pin).context("trigger GPIO")?,
        FreeRtos,
    );

    let host_uart = UartDriver::new(
        peripherals.uart0,
        host_tx,
        host_rx,
        Option::<AnyIOPin>::None,
        Option::<AnyIOPin>::None,
        &UartConfig::default().baudrate(Hertz(config.command_baud)),
    )
    .context("host UART")?;
    let mut link = UartTransport::new(host_uart);

    let servos = if config.servo_bus_enabled {
        let servo_uart = UartDriver::new(
            peripherals.uart1,
            servo_tx,
            servo_rx,
            Option::<AnyIOPin>::None,
            Option::<AnyIOPin>::None,
            &UartConfig::default().baudrate(Hertz(config.servo_baud)),
        )
        .context("servo UART")?;
        Some(StsBus::new(
            UartTransport::new(servo_uart),
            config.servo_reply_timeout_ms,
        ))
    } else {
        info!("Servo bus disabled by config");
        None
    };

    // ── 4. Adapters + app service ─────────────────────────────
    let mut hw = HardwareAdapter::new(trigger, servos);
    let mut log_sink = LogEventSink::new();
    let time = Esp32TimeAdapter::new();

    let mut app = AppService::new(config)?;
    app.start(&mut hw, &mut log_sink);

    info!(
        "System ready. Entering poll loop (stall reset after {} ms).",
        watchdog.timeout_ms()
    );

    // ── 5. Poll loop ──────────────────────────────────────────
    loop {
        app.poll(time.now_ms(), &mut link, &mut hw, &mut log_sink);
        watchdog.feed();
        FreeRtos::delay_ms(LOOP_YIELD_MS);
    }
}
