//! I2C bus adapter.
//!
//! Implements [`Bus`] for any `embedded-hal` 1.0 [`I2c`] peripheral.  A
//! probe is an empty write: the target either ACKs its address or it does
//! not.  HAL errors are folded into the classic two-wire status numbering
//! so they can be carried in an error-code subtype.

use embedded_hal::i2c::{Error as _, ErrorKind, I2c, NoAcknowledgeSource};
use log::trace;

use crate::ports::{BUS_OK, Bus};

pub const STATUS_DATA_TOO_LONG: u8 = 1;
pub const STATUS_ADDRESS_NACK: u8 = 2;
pub const STATUS_DATA_NACK: u8 = 3;
pub const STATUS_OTHER: u8 = 4;

/// Map an `embedded-hal` error kind to a two-wire status code.
pub fn status_from_kind(kind: ErrorKind) -> u8 {
    match kind {
        ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address | NoAcknowledgeSource::Unknown) => {
            STATUS_ADDRESS_NACK
        }
        ErrorKind::NoAcknowledge(NoAcknowledgeSource::Data) => STATUS_DATA_NACK,
        ErrorKind::Overrun => STATUS_DATA_TOO_LONG,
        _ => STATUS_OTHER,
    }
}

/// Owns an I2C peripheral and exposes it as a [`Bus`].
pub struct I2cBus<I> {
    i2c: I,
}

impl<I: I2c> I2cBus<I> {
    pub fn new(i2c: I) -> Self {
        Self { i2c }
    }

    /// Borrow the peripheral, e.g. for a chip driver that talks to it.
    pub fn inner(&mut self) -> &mut I {
        &mut self.i2c
    }

    pub fn release(self) -> I {
        self.i2c
    }
}

impl<I: I2c> Bus for I2cBus<I> {
    fn probe(&mut self, address: u8) -> u8 {
        let status = match self.i2c.write(address, &[]) {
            Ok(()) => BUS_OK,
            Err(e) => status_from_kind(e.kind()),
        };
        trace!("probe 0x{:02x} -> {}", address, status);
        status
    }
}
