//! GPIO / peripheral pin assignments for the turret controller board.
//!
//! Single source of truth: `main` references this module rather than
//! hard-coding pin numbers.  Change a pin here and it propagates everywhere.

// ---------------------------------------------------------------------------
// Trigger output
// ---------------------------------------------------------------------------

/// Push-pull digital output, HIGH = firing.  Pulled down on the board so
/// the line idles LOW through reset.
pub const TRIGGER_GPIO: i32 = 4;

// ---------------------------------------------------------------------------
// Host command link (UART0, USB-serial bridge)
// ---------------------------------------------------------------------------

pub const HOST_UART_TX_GPIO: i32 = 43;
pub const HOST_UART_RX_GPIO: i32 = 44;

// ---------------------------------------------------------------------------
// Servo bus (UART1 through a half-duplex buffer)
// ---------------------------------------------------------------------------

pub const SERVO_UART_TX_GPIO: i32 = 17;
pub const SERVO_UART_RX_GPIO: i32 = 18;
