//! Port traits — the boundary between the module logic and the hardware.
//!
//! ```text
//!   Host ──▶ Sensor ──▶ Haar ──▶ PressureChip / HumidityChip ──▶ Bus
//! ```
//!
//! The bus transport and both chip drivers are driven adapters: the module
//! consumes them via generics, so the acquisition and fault logic never
//! touches a peripheral directly and can run on the host against mocks.
//! [`Sensor`] is the driving side, the flat interface every module on the
//! Host implements.

// ───────────────────────────────────────────────────────────────
// Bus transport
// ───────────────────────────────────────────────────────────────

/// Transmission status for a successful probe.
pub const BUS_OK: u8 = 0;

/// Shared two-wire bus.  Timeout and retry policy belong to the
/// implementation.
pub trait Bus {
    /// Address the device and end the transmission.  Returns the raw
    /// status code: 0 on ACK, otherwise 1 data too long, 2 address NACK,
    /// 3 data NACK, 4 other, 5 timeout.
    fn probe(&mut self, address: u8) -> u8;
}

// ───────────────────────────────────────────────────────────────
// Chip drivers
// ───────────────────────────────────────────────────────────────

/// Barometric pressure / temperature chip (DPS368).
pub trait PressureChip<B: Bus> {
    /// Configure the chip at `address`.
    fn begin(&mut self, bus: &mut B, address: u8);

    /// Single-shot temperature in °C.  `Err` carries the driver status.
    fn measure_temperature_once(&mut self, bus: &mut B, oversampling: u8) -> Result<f32, i16>;

    /// Single-shot pressure in Pa.  `Err` carries the driver status.
    fn measure_pressure_once(&mut self, bus: &mut B, oversampling: u8) -> Result<f32, i16>;
}

/// Relative humidity / temperature chip (SHT3x).
pub trait HumidityChip<B: Bus> {
    /// Returns `false` if the chip did not answer at `address`.
    fn begin(&mut self, bus: &mut B, address: u8) -> bool;

    /// Temperature in °C, NaN on failure.
    fn read_temperature(&mut self, bus: &mut B) -> f32;

    /// Relative humidity in %, NaN on failure.
    fn read_humidity(&mut self, bus: &mut B) -> f32;
}

// ───────────────────────────────────────────────────────────────
// Sensor (driving port: Host → module)
// ───────────────────────────────────────────────────────────────

/// Uniform interface the Host uses to drive heterogeneous modules.
///
/// Every report method returns a JSON member (`"TAG":{...}`) ready to be
/// placed inside the Host's enclosing object.  None of them fail: faults go
/// to the module's error log and show up in [`Sensor::get_errors`].
pub trait Sensor {
    /// Discover and configure the hardware.
    fn begin(&mut self);

    /// One acquisition.
    fn get_data(&mut self) -> String;

    /// Static description: versions and position.
    fn get_metadata(&self) -> String;

    /// Drain the error log.
    fn get_errors(&mut self) -> String;

    /// Bus liveness only; says nothing about configuration.
    fn is_present(&mut self) -> bool;

    /// 1-indexed talon port, `None` if unset.
    fn talon_port(&self) -> Option<u8>;

    /// 1-indexed sensor port, `None` if unset.
    fn sensor_port(&self) -> Option<u8>;
}
