//! Haar sensor module library.
//!
//! Driver for the Haar board (DPS368 barometric pressure/temperature and
//! SHT31 humidity/temperature on a shared I2C bus).  The acquisition and
//! fault-logging logic is hardware-agnostic: the bus and both chip drivers
//! are reached through the traits in [`ports`], so everything here runs on
//! the host against mocks.

#![deny(unused_must_use)]

pub mod adapters;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod ports;
pub mod position;
pub mod sensors;

pub use error::{ErrorCode, FaultClass, PortError};
pub use ports::{Bus, HumidityChip, PressureChip, Sensor};
pub use sensors::SensorHub;
pub use sensors::haar::{Haar, HaarReading};
