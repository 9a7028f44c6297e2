//! UART transport adapter.
//!
//! Implements [`Transport`] for both serial links: the host command link
//! and the half-duplex servo bus.
//!
//! - **`target_os = "espidf"`**: wraps `esp_idf_hal::uart::UartDriver`.
//!   A zero timeout maps to `NON_BLOCK`, anything else to FreeRTOS ticks.
//! - **`not(target_os = "espidf")`**: an in-memory loopback: bytes handed
//!   to [`UartTransport::inject`] come out of `read`, bytes passed to
//!   `write` are kept for [`UartTransport::take_written`].

use crate::protocol::transport::Transport;

#[cfg(target_os = "espidf")]
use esp_idf_hal::delay::{NON_BLOCK, TickType};
#[cfg(target_os = "espidf")]
use esp_idf_hal::uart::UartDriver;
#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::EspError;

#[cfg(not(target_os = "espidf"))]
use std::collections::VecDeque;

// ── ESP-IDF backend ───────────────────────────────────────────

#[cfg(target_os = "espidf")]
pub struct UartTransport<'d> {
    uart: UartDriver<'d>,
}

#[cfg(target_os = "espidf")]
impl<'d> UartTransport<'d> {
    pub fn new(uart: UartDriver<'d>) -> Self {
        Self { uart }
    }
}

#[cfg(target_os = "espidf")]
impl Transport for UartTransport<'_> {
    type Error = EspError;

    fn read(&mut self, buf: &mut [u8], timeout_ms: u32) -> Result<usize, EspError> {
        let ticks = if timeout_ms == 0 {
            NON_BLOCK
        } else {
            TickType::new_millis(u64::from(timeout_ms)).ticks()
        };
        self.uart.read(buf, ticks)
    }

    fn write(&mut self, data: &[u8]) -> Result<usize, EspError> {
        self.uart.write(data)
    }

    fn clear_input(&mut self) -> Result<(), EspError> {
        self.uart.clear_rx()
    }
}

// ── Host loopback ─────────────────────────────────────────────

#[cfg(not(target_os = "espidf"))]
#[derive(Default)]
pub struct UartTransport {
    rx: VecDeque<u8>,
    tx: Vec<u8>,
}

#[cfg(not(target_os = "espidf"))]
impl UartTransport {
    pub fn loopback() -> Self {
        Self::default()
    }

    /// Queue bytes as if the far end had sent them.
    pub fn inject(&mut self, bytes: &[u8]) {
        self.rx.extend(bytes.iter().copied());
    }

    /// Bytes still waiting to be read.
    pub fn pending(&self) -> usize {
        self.rx.len()
    }

    /// Everything written so far; clears the record.
    pub fn take_written(&mut self) -> Vec<u8> {
        core::mem::take(&mut self.tx)
    }
}

#[cfg(not(target_os = "espidf"))]
impl Transport for UartTransport {
    type Error = core::convert::Infallible;

    fn read(&mut self, buf: &mut [u8], _timeout_ms: u32) -> Result<usize, Self::Error> {
        let n = buf.len().min(self.rx.len());
        for (slot, b) in buf.iter_mut().zip(self.rx.drain(..n)) {
            *slot = b;
        }
        Ok(n)
    }

    fn write(&mut self, data: &[u8]) -> Result<usize, Self::Error> {
        self.tx.extend_from_slice(data);
        Ok(data.len())
    }

    fn clear_input(&mut self) -> Result<(), Self::Error> {
        self.rx.clear();
        Ok(())
    }
}
