//! Task Watchdog Timer (TWDT) driver.
//!
//! Wraps the ESP-IDF TWDT API to reset the device if the poll loop
//! stalls for longer than `loop_stall_timeout_ms`.  This is the hardware
//! backstop beneath the link watchdog in [`crate::safety`]: that one
//! guards against a silent host, this one against a hung firmware.
//!
//! The main loop must call `feed()` on every iteration.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

use log::{info, warn};

pub struct TaskWatchdog {
    #[cfg(target_os = "espidf")]
    subscribed: bool,
    timeout_ms: u32,
}

impl TaskWatchdog {
    /// Reconfigure the TWDT and subscribe the current task.
    pub fn new(timeout_ms: u32) -> Self {
        #[cfg(target_os = "espidf")]
        {
            let cfg = esp_task_wdt_config_t {
                timeout_ms,
                idle_core_mask: 0,
                trigger_panic: true,
            };
            // SAFETY: plain FFI calls; a null task handle means "current task".
            let subscribed = unsafe {
                let ret = esp_task_wdt_reconfigure(&cfg);
                if ret != ESP_OK {
                    warn!("TWDT reconfigure returned {} (may already be configured)", ret);
                }
                esp_task_wdt_add(core::ptr::null_mut()) == ESP_OK
            };
            if subscribed {
                info!("TWDT: subscribed ({} ms, panic on trigger)", timeout_ms);
            } else {
                warn!("TWDT: failed to subscribe, loop stalls will go undetected");
            }
            Self {
                subscribed,
                timeout_ms,
            }
        }

        #[cfg(not(target_os = "espidf"))]
        {
            if timeout_ms == 0 {
                warn!("TWDT(sim): zero timeout");
            }
            info!("TWDT(sim): no-op ({} ms)", timeout_ms);
            Self { timeout_ms }
        }
    }

    /// Feed the watchdog.  Must be called at least every `timeout_ms`.
    pub fn feed(&self) {
        #[cfg(target_os = "espidf")]
        if self.subscribed {
            // SAFETY: the current task was added in `new`.
            unsafe {
                esp_task_wdt_reset();
            }
        }
    }

    pub fn timeout_ms(&self) -> u32 {
        self.timeout_ms
    }
}
