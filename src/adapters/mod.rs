//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements    | Connects to                       |
//! |------------|---------------|-----------------------------------|
//! | `hardware` | TriggerPort   | trigger GPIO driver               |
//! |            | ServoBusPort  | STS servo bus (optional)          |
//! | `log_sink` | EventSink     | Serial log output                 |
//! | `time`     | -             | ESP32 system timer                |
//! | `uart`     | Transport     | ESP-IDF UART / in-memory loopback |

pub mod hardware;
pub mod log_sink;
pub mod time;
pub mod uart;
