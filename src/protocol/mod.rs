//! Host command link.
//!
//! ```text
//! ┌───────────┐   ┌──────────────┐   ┌─────────────────────┐
//! │ Transport │──▶│   Decoder    │──▶│ AppService (apply)  │
//! │ (trait)   │   │ byte / burst │   │ output · watchdog · │
//! └───────────┘   │ / line       │   │ axes                │
//!                 └──────────────┘   └─────────────────────┘
//! ```

pub mod decoder;
pub mod line;
pub mod transport;
