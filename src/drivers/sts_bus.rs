//! Feetech STS serial bus servo driver.
//!
//! Wire format (instruction and status packets share the layout):
//! ```text
//! ┌───────┬────┬─────┬───────────────┬──────────────┬──────────┐
//! │ FF FF │ ID │ LEN │ INSTR / ERROR │ PARAMS (N B) │ CHECKSUM │
//! └───────┴────┴─────┴───────────────┴──────────────┴──────────┘
//!   LEN      = N + 2
//!   CHECKSUM = !(ID + LEN + INSTR + Σ PARAMS)   (u8, wrapping)
//! ```
//!
//! Every instruction sent to a single id is answered with a status packet.
//! The driver only issues PING and register WRITE, both of which are
//! acknowledged with an empty status (`LEN = 2`), so a reply is always six
//! bytes.

use heapless::Vec;
use log::{debug, warn};

use crate::app::ports::ServoBusPort;
use crate::error::ServoError;
use crate::protocol::transport::Transport;

const HEADER: [u8; 2] = [0xFF, 0xFF];

/// Largest packet the driver builds (header through checksum).
pub const MAX_PACKET: usize = 16;

/// `FF FF ID 02 ERR CHK`
pub const STATUS_LEN: usize = 6;

pub mod instr {
    pub const PING: u8 = 0x01;
    pub const WRITE: u8 = 0x03;
}

/// Control-table addresses used by the driver.
pub mod reg {
    /// 0 = position servo, 1 = wheel, 2 = PWM, 3 = stepper.  EEPROM.
    pub const OPERATING_MODE: u8 = 0x21;
    pub const TORQUE_ENABLE: u8 = 0x28;
    /// u16 little-endian.
    pub const GOAL_POSITION: u8 = 0x2A;
    /// 0 unlocks EEPROM writes, 1 locks them again.
    pub const EEPROM_LOCK: u8 = 0x37;
}

pub type Packet = Vec<u8, MAX_PACKET>;

/// Bitwise NOT of the wrapping byte sum.
pub fn checksum(body: &[u8]) -> u8 {
    !body.iter().fold(0u8, |acc, &b| acc.wrapping_add(b))
}

/// Build an instruction packet.  `None` if `params` does not fit.
pub fn encode_packet(id: u8, instruction: u8, params: &[u8]) -> Option<Packet> {
    let len = u8::try_from(params.len() + 2).ok()?;
    let mut p = Packet::new();
    p.extend_from_slice(&HEADER).ok()?;
    p.extend_from_slice(&[id, len, instruction]).ok()?;
    p.extend_from_slice(params).ok()?;
    let sum = checksum(&p[2..]);
    p.push(sum).ok()?;
    Some(p)
}

/// Validate a status packet from servo `id` and return its parameters.
pub fn parse_status(id: u8, reply: &[u8]) -> Result<&[u8], ServoError> {
    if reply.len() < STATUS_LEN || reply[..2] != HEADER {
        return Err(ServoError::BadReply);
    }
    let len = usize::from(reply[3]);
    if reply[2] != id || len + 4 != reply.len() {
        return Err(ServoError::BadReply);
    }
    let (body, chk) = reply[2..].split_at(reply.len() - 3);
    if checksum(body) != chk[0] {
        return Err(ServoError::Checksum);
    }
    match reply[4] {
        0 => Ok(&reply[5..reply.len() - 1]),
        bits => Err(ServoError::Status(bits)),
    }
}

/// STS servo bus over any byte [`Transport`].
pub struct StsBus<T: Transport> {
    link: T,
    reply_timeout_ms: u32,
}

impl<T: Transport> StsBus<T> {
    pub fn new(link: T, reply_timeout_ms: u32) -> Self {
        Self {
            link,
            reply_timeout_ms,
        }
    }

    /// Borrow the underlying transport.
    pub fn link(&self) -> &T {
        &self.link
    }

    pub fn link_mut(&mut self) -> &mut T {
        &mut self.link
    }

    /// Write `data` to consecutive registers starting at `addr`.
    pub fn write_register(&mut self, id: u8, addr: u8, data: &[u8]) -> Result<(), ServoError> {
        let mut params: Vec<u8, MAX_PACKET> = Vec::new();
        params.push(addr).map_err(|_| ServoError::WriteFailed)?;
        params
            .extend_from_slice(data)
            .map_err(|()| ServoError::WriteFailed)?;
        self.transact(id, instr::WRITE, &params)
    }

    /// Send one instruction and wait for its empty status packet.
    fn transact(&mut self, id: u8, instruction: u8, params: &[u8]) -> Result<(), ServoError> {
        let packet = encode_packet(id, instruction, params).ok_or(ServoError::WriteFailed)?;

        // Drop any stale bytes so they cannot be mistaken for our reply.
        if let Err(e) = self.link.clear_input() {
            warn!("servo bus: clear_input failed: {:?}", e);
        }
        match self.link.write(&packet) {
            Ok(n) if n == packet.len() => {}
            Ok(n) => {
                warn!("servo bus: short write {}/{} to id {}", n, packet.len(), id);
                return Err(ServoError::WriteFailed);
            }
            Err(e) => {
                warn!("servo bus: write to id {} failed: {:?}", id, e);
                return Err(ServoError::WriteFailed);
            }
        }

        let mut reply = [0u8; STATUS_LEN];
        let got = self.read_reply(&mut reply);
        if got < STATUS_LEN {
            return Err(ServoError::Timeout);
        }
        parse_status(id, &reply).map(|_| ())
    }

    fn read_reply(&mut self, buf: &mut [u8]) -> usize {
        let mut got = 0;
        while got < buf.len() {
            match self.link.read(&mut buf[got..], self.reply_timeout_ms) {
                Ok(0) => break,
                Ok(n) => got += n,
                Err(e) => {
                    warn!("servo bus: read failed: {:?}", e);
                    break;
                }
            }
        }
        got
    }
}

impl<T: Transport> ServoBusPort for StsBus<T> {
    fn ping(&mut self, id: u8) -> bool {
        match self.transact(id, instr::PING, &[]) {
            Ok(()) => true,
            Err(e) => {
                debug!("servo {} ping: {}", id, e);
                false
            }
        }
    }

    fn set_position_mode(&mut self, id: u8) -> Result<(), ServoError> {
        self.write_register(id, reg::EEPROM_LOCK, &[0])?;
        let mode = self.write_register(id, reg::OPERATING_MODE, &[0]);
        // Relock even when the mode write failed.
        let lock = self.write_register(id, reg::EEPROM_LOCK, &[1]);
        mode.and(lock)
    }

    fn enable_torque(&mut self, id: u8) -> Result<(), ServoError> {
        self.write_register(id, reg::TORQUE_ENABLE, &[1])
    }

    fn write_position(&mut self, id: u8, position: u16) -> Result<(), ServoError> {
        self.write_register(id, reg::GOAL_POSITION, &position.to_le_bytes())
    }
}
