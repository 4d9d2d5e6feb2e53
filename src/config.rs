//! Module configuration parameters
//!
//! Construction-time settings for a [`Haar`](crate::sensors::haar::Haar)
//! module.  The Host may load these from its own storage; the defaults match
//! a v2.1 board on talon port 2.

use serde::{Deserialize, Serialize};

/// Hardware revision assumed when the Host does not supply one (v2.1).
pub const DEFAULT_HARDWARE_VERSION: u8 = 0x21;

/// Maximum DPS368 oversampling level (2^7 internal samples per result).
pub const MAX_OVERSAMPLING: u8 = 7;

/// Number of ports on the Host's talon / sensor connectors.
pub const DEFAULT_MAX_PORT: u8 = 4;

/// Core module configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HaarConfig {
    // --- Position ---
    /// 1-indexed talon port; 0 = unset
    pub talon_port: u8,
    /// 1-indexed sensor port; 0 = unset
    pub sensor_port: u8,
    /// Highest valid 1-indexed port number, at most 15 (one tag nibble)
    pub max_port: u8,

    // --- Board ---
    /// Hardware revision as BCD-like nibbles (0x21 = v2.1)
    pub hardware_version: u8,

    // --- Acquisition ---
    /// DPS368 oversampling level (0-7)
    pub oversampling: u8,
}

impl Default for HaarConfig {
    fn default() -> Self {
        Self {
            // Position
            talon_port: 2,
            sensor_port: 0,
            max_port: DEFAULT_MAX_PORT,

            // Board
            hardware_version: DEFAULT_HARDWARE_VERSION,

            // Acquisition
            oversampling: MAX_OVERSAMPLING,
        }
    }
}
