//! Error codes and typed errors for the Haar sensor module.
//!
//! Faults raised during discovery and acquisition are never returned to
//! the caller.  They are packed into a 32-bit [`ErrorCode`] and appended to
//! the module's [`ErrorLog`](crate::diagnostics::ErrorLog), to be drained
//! later by the Host.  The code layout is:
//!
//! ```text
//!   31            16 15   12 11    8 7     4 3     0
//!  ┌────────────────┬───────┬───────┬───────┬───────┐
//!  │  fault class   │subtype│   0   │ talon │sensor │
//!  └────────────────┴───────┴───────┴───────┴───────┘
//! ```
//!
//! Port nibbles are 1-indexed so a literal 0 means "no port information".

use core::fmt;

// ---------------------------------------------------------------------------
// Fault classes
// ---------------------------------------------------------------------------

/// Top-level category of an error code (the high half-word, plus the
/// fixed low bits of the port range classes).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum FaultClass {
    /// DPS368 did not answer at either address during discovery.
    PressureInit = 0x1001_0000,
    /// SHT31 returned NaN and the bus probe that followed failed.
    HumidityBus = 0x1002_0000,
    /// SHT31 failed to initialise at either address.
    HumidityInit = 0x1003_0000,
    /// SHT31 returned NaN while the bus was still answering.
    HumidityNan = 0x1004_0000,
    /// No known device answered the presence check.
    FindFail = 0x1005_0000,
    /// DPS368 single-shot measurement returned a non-zero status.
    PressureRead = 0x8001_0000,
    /// Commanded sensor port outside the host's port range.
    SensorPortRange = 0x9001_0100,
    /// Commanded talon port outside the host's port range.
    TalonPortRange = 0x9001_0200,
}

impl FaultClass {
    pub const fn bits(self) -> u32 {
        self as u32
    }
}

impl fmt::Display for FaultClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PressureInit => write!(f, "DPS368 init failed"),
            Self::HumidityBus => write!(f, "SHT3x I2C error"),
            Self::HumidityInit => write!(f, "SHT3x init failed"),
            Self::HumidityNan => write!(f, "SHT3x returned NaN"),
            Self::FindFail => write!(f, "device not found"),
            Self::PressureRead => write!(f, "DPS368 read failed"),
            Self::SensorPortRange => write!(f, "sensor port out of range"),
            Self::TalonPortRange => write!(f, "talon port out of range"),
        }
    }
}

// ---------------------------------------------------------------------------
// Subtypes
// ---------------------------------------------------------------------------

/// Which physical quantity (or which bus status) a fault refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Subtype {
    None,
    Temperature,
    /// Pressure on the DPS368, humidity on the SHT31.
    Secondary,
    /// Raw transport status code from a failed probe.
    BusStatus(u8),
}

impl Subtype {
    pub const fn bits(self) -> u32 {
        match self {
            Self::None => 0,
            Self::Temperature => 0x1000,
            Self::Secondary => 0x2000,
            Self::BusStatus(status) => ((status & 0x0F) as u32) << 12,
        }
    }
}

// ---------------------------------------------------------------------------
// Error code
// ---------------------------------------------------------------------------

pub const CLASS_MASK: u32 = 0xFFFF_0000;
pub const SUBTYPE_MASK: u32 = 0x0000_F000;
pub const TALON_TAG_MASK: u32 = 0x0000_00F0;
pub const SENSOR_TAG_MASK: u32 = 0x0000_000F;

/// A packed 32-bit fault record as stored in the error log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ErrorCode(u32);

impl ErrorCode {
    /// Combine a fault class, a subtype and the port tag from
    /// [`Position::error_tag`](crate::position::Position::error_tag).
    pub const fn new(class: FaultClass, subtype: Subtype, port_tag: u32) -> Self {
        Self(class.bits() | subtype.bits() | (port_tag & 0xFF))
    }

    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u32 {
        self.0
    }

    pub const fn class_bits(self) -> u32 {
        self.0 & CLASS_MASK
    }

    pub const fn subtype_bits(self) -> u32 {
        self.0 & SUBTYPE_MASK
    }

    /// 1-indexed talon port carried in the code, 0 if none.
    pub const fn talon_tag(self) -> u8 {
        ((self.0 & TALON_TAG_MASK) >> 4) as u8
    }

    /// 1-indexed sensor port carried in the code, 0 if none.
    pub const fn sensor_tag(self) -> u8 {
        (self.0 & SENSOR_TAG_MASK) as u8
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:x}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Port errors
// ---------------------------------------------------------------------------

/// Rejected port assignment.  The offending value is carried back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortError {
    TalonOutOfRange(u8),
    SensorOutOfRange(u8),
}

impl fmt::Display for PortError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TalonOutOfRange(p) => write!(f, "talon port {p} out of range"),
            Self::SensorOutOfRange(p) => write!(f, "sensor port {p} out of range"),
        }
    }
}

impl PortError {
    pub const fn class(self) -> FaultClass {
        match self {
            Self::TalonOutOfRange(_) => FaultClass::TalonPortRange,
            Self::SensorOutOfRange(_) => FaultClass::SensorPortRange,
        }
    }
}

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, PortError>;
