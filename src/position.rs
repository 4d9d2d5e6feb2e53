//! Port identity — where a module sits on the Host.
//!
//! Ports are stored 0-indexed with [`UNSET`] as the "no port" sentinel.
//! Everything that leaves the module (reports, error-code tags) uses the
//! 1-indexed port number.

use core::fmt::{self, Write};

use log::warn;

use crate::error::PortError;

/// Sentinel for an unset port.
pub const UNSET: u8 = 255;

/// Highest port that fits the 4-bit tag nibble of an error code.
pub const MAX_TAGGED_PORT: u8 = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    talon: u8,
    sensor: u8,
    max_port: u8,
}

impl Position {
    /// Build from 1-indexed inputs.  0 or anything above `max_port` is
    /// stored as unset.  `max_port` is clamped to [`MAX_TAGGED_PORT`].
    pub fn new(talon_port: u8, sensor_port: u8, max_port: u8) -> Self {
        if max_port > MAX_TAGGED_PORT {
            warn!("max port {} clamped to {}", max_port, MAX_TAGGED_PORT);
        }
        let max_port = max_port.min(MAX_TAGGED_PORT);
        Self {
            talon: Self::to_index(talon_port, max_port).unwrap_or(UNSET),
            sensor: Self::to_index(sensor_port, max_port).unwrap_or(UNSET),
            max_port,
        }
    }

    fn to_index(port: u8, max_port: u8) -> Option<u8> {
        (1..=max_port).contains(&port).then(|| port - 1)
    }

    /// Raw 0-indexed talon port, [`UNSET`] if none.
    pub fn talon_index(&self) -> u8 {
        self.talon
    }

    /// Raw 0-indexed sensor port, [`UNSET`] if none.
    pub fn sensor_index(&self) -> u8 {
        self.sensor
    }

    /// 1-indexed talon port.
    pub fn talon_port(&self) -> Option<u8> {
        (self.talon != UNSET).then(|| self.talon + 1)
    }

    /// 1-indexed sensor port.
    pub fn sensor_port(&self) -> Option<u8> {
        (self.sensor != UNSET).then(|| self.sensor + 1)
    }

    /// Set the talon port.  On rejection the previous value is kept.
    pub fn set_talon_port(&mut self, port: u8) -> crate::error::Result<()> {
        let idx = Self::to_index(port, self.max_port).ok_or(PortError::TalonOutOfRange(port))?;
        self.talon = idx;
        Ok(())
    }

    /// Set the sensor port.  On rejection the previous value is kept.
    pub fn set_sensor_port(&mut self, port: u8) -> crate::error::Result<()> {
        let idx = Self::to_index(port, self.max_port).ok_or(PortError::SensorOutOfRange(port))?;
        self.sensor = idx;
        Ok(())
    }

    /// Low byte OR-ed into every error code: talon in bits 7..4, sensor in
    /// bits 3..0, both 1-indexed.
    pub fn error_tag(&self) -> u32 {
        let talon = self.talon_port().map_or(0, u32::from);
        let sensor = self.sensor_port().map_or(0, u32::from);
        ((talon & 0x0F) << 4) | (sensor & 0x0F)
    }

    /// Write the `"Pos":[talon,sensor]` pair.
    pub fn write_pos<W: Write>(&self, out: &mut W) -> fmt::Result {
        out.write_str("\"Pos\":[")?;
        write_port(out, self.talon_port())?;
        out.write_char(',')?;
        write_port(out, self.sensor_port())?;
        out.write_char(']')
    }
}

fn write_port<W: Write>(out: &mut W, port: Option<u8>) -> fmt::Result {
    match port {
        Some(p) => write!(out, "{p}"),
        None => out.write_str("null"),
    }
}
