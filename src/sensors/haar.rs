//! Haar board: DPS368 pressure/temperature + SHT31 humidity/temperature on
//! one I2C bus.
//!
//! Discovery tries each chip at its primary address and falls back to the
//! alternate.  Every acquisition re-checks presence and re-runs discovery
//! before reading, then builds a report where each failed channel is an
//! explicit `null`.  Faults never fail a call; they are classified and
//! pushed to the module's [`ErrorLog`].
//!
//! ## NaN disambiguation
//!
//! The SHT31 driver reports both a CRC/computation fault and a dropped bus
//! transaction as NaN.  After a NaN the DPS368 is probed on the same bus:
//! if it still answers the SHT31 itself is blamed, otherwise the fault is
//! logged as a bus error carrying the probe status.

use core::fmt::{self, Write};

use log::{debug, trace, warn};

use crate::config::{DEFAULT_MAX_PORT, HaarConfig, MAX_OVERSAMPLING};
use crate::diagnostics::{ErrorLog, ErrorReport, MAX_NUM_ERRORS};
use crate::error::{ErrorCode, FaultClass, Subtype};
use crate::ports::{BUS_OK, Bus, HumidityChip, PressureChip, Sensor};
use crate::position::Position;

pub const ADR_DPS368: u8 = 0x76;
pub const ADR_DPS368_ALT: u8 = 0x77;
pub const ADR_SHT31: u8 = 0x44;
pub const ADR_SHT31_ALT: u8 = 0x45;

pub const FIRMWARE_VERSION: &str = "0.2.0";

/// Key every report is filed under.
pub const REPORT_TAG: &str = "HAAR";

/// One acquisition.  `None` means the channel failed or the chip is absent.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HaarReading {
    /// DPS368 temperature, °C.
    pub dps368_temperature: Option<f32>,
    /// DPS368 pressure, hPa.
    pub pressure_hpa: Option<f64>,
    /// SHT31 temperature, °C.
    pub sht31_temperature: Option<f32>,
    /// SHT31 relative humidity, %.
    pub humidity: Option<f32>,
}

impl HaarReading {
    /// Write the `"DPS368":{...},"SHT31":{...}` members.
    pub fn write_fields<W: Write>(&self, out: &mut W) -> fmt::Result {
        out.write_str("\"DPS368\":{\"Temperature\":")?;
        write_fixed(out, self.dps368_temperature.map(f64::from), 2)?;
        out.write_str(",\"Pressure\":")?;
        write_fixed(out, self.pressure_hpa, 3)?;
        out.write_str("},\"SHT31\":{\"Temperature\":")?;
        write_fixed(out, self.sht31_temperature.map(f64::from), 2)?;
        out.write_str(",\"Humidity\":")?;
        write_fixed(out, self.humidity.map(f64::from), 2)?;
        out.write_char('}')
    }
}

/// `value` with `decimals` places, or `null`.  Non-finite values have no
/// JSON spelling and are written as `null` too.
fn write_fixed<W: Write>(out: &mut W, value: Option<f64>, decimals: usize) -> fmt::Result {
    match value {
        Some(v) if v.is_finite() => write!(out, "{:.*}", decimals, v),
        _ => out.write_str("null"),
    }
}

/// Which SHT31 channel produced a NaN.
#[derive(Debug, Clone, Copy)]
enum Sht31Channel {
    Temperature,
    Humidity,
}

impl Sht31Channel {
    fn subtype(self) -> Subtype {
        match self {
            Self::Temperature => Subtype::Temperature,
            Self::Humidity => Subtype::Secondary,
        }
    }
}

pub struct Haar<B, P, H, const N: usize = MAX_NUM_ERRORS> {
    bus: B,
    pressure: P,
    humidity: H,
    position: Position,
    version: u8,
    oversampling: u8,
    /// DPS368 address after detection.
    adr_dps368: u8,
    dps368_found: bool,
    init_done: bool,
    errors: ErrorLog<N>,
}

impl<B, P, H, const N: usize> Haar<B, P, H, N>
where
    B: Bus,
    P: PressureChip<B>,
    H: HumidityChip<B>,
{
    /// Ports are 1-indexed; 0 leaves a port unset.
    pub fn new(bus: B, pressure: P, humidity: H, talon_port: u8, sensor_port: u8, version: u8) -> Self {
        Self {
            bus,
            pressure,
            humidity,
            position: Position::new(talon_port, sensor_port, DEFAULT_MAX_PORT),
            version,
            oversampling: MAX_OVERSAMPLING,
            adr_dps368: ADR_DPS368,
            dps368_found: false,
            init_done: false,
            errors: ErrorLog::new(),
        }
    }

    pub fn from_config(bus: B, pressure: P, humidity: H, config: &HaarConfig) -> Self {
        let mut haar = Self::new(bus, pressure, humidity, 0, 0, config.hardware_version);
        haar.position = Position::new(config.talon_port, config.sensor_port, config.max_port);
        haar.oversampling = config.oversampling.min(MAX_OVERSAMPLING);
        haar
    }

    /// Probe both chips and configure whichever address answers.
    pub fn begin(&mut self) {
        self.dps368_found = if self.bus.probe(ADR_DPS368) == BUS_OK {
            self.pressure.begin(&mut self.bus, ADR_DPS368);
            self.adr_dps368 = ADR_DPS368;
            true
        } else if self.bus.probe(ADR_DPS368_ALT) == BUS_OK {
            self.pressure.begin(&mut self.bus, ADR_DPS368_ALT);
            self.adr_dps368 = ADR_DPS368_ALT;
            true
        } else {
            self.throw(FaultClass::PressureInit, Subtype::None);
            false
        };
        if self.dps368_found {
            debug!("DPS368 at 0x{:02x}", self.adr_dps368);
        }

        if !self.humidity.begin(&mut self.bus, ADR_SHT31)
            && !self.humidity.begin(&mut self.bus, ADR_SHT31_ALT)
        {
            self.throw(FaultClass::HumidityInit, Subtype::None);
        }

        self.init_done = true;
    }

    /// True if the DPS368 answers at either address.
    pub fn is_present(&mut self) -> bool {
        let status_alt = self.bus.probe(ADR_DPS368_ALT);
        let status_base = self.bus.probe(ADR_DPS368);
        trace!("HAAR presence: alt={} base={}", status_alt, status_base);
        status_alt == BUS_OK || status_base == BUS_OK
    }

    /// Take one reading from every channel.
    ///
    /// Discovery is re-run before every reading so a board that was
    /// power-cycled since the last call is reconfigured.
    pub fn acquire(&mut self) -> HaarReading {
        if !self.is_present() {
            self.throw(FaultClass::FindFail, Subtype::None);
            return HaarReading::default();
        }

        self.begin();

        let mut reading = HaarReading::default();
        if self.dps368_found {
            reading.dps368_temperature = match self
                .pressure
                .measure_temperature_once(&mut self.bus, self.oversampling)
            {
                Ok(t) => Some(t),
                Err(status) => {
                    debug!("DPS368 temperature status {}", status);
                    self.throw(FaultClass::PressureRead, Subtype::Temperature);
                    None
                }
            };
            reading.pressure_hpa = match self
                .pressure
                .measure_pressure_once(&mut self.bus, self.oversampling)
            {
                // Pa -> hPa
                Ok(p) => Some(f64::from(p) / 100.0),
                Err(status) => {
                    debug!("DPS368 pressure status {}", status);
                    self.throw(FaultClass::PressureRead, Subtype::Secondary);
                    None
                }
            };
        }

        let temperature = self.humidity.read_temperature(&mut self.bus);
        let humidity = self.humidity.read_humidity(&mut self.bus);
        reading.sht31_temperature = self.check_nan(temperature, Sht31Channel::Temperature);
        reading.humidity = self.check_nan(humidity, Sht31Channel::Humidity);

        reading
    }

    fn check_nan(&mut self, value: f32, channel: Sht31Channel) -> Option<f32> {
        if !value.is_nan() {
            return Some(value);
        }
        let status = self.bus.probe(self.adr_dps368);
        if status == BUS_OK {
            self.throw(FaultClass::HumidityNan, channel.subtype());
        } else {
            self.throw(FaultClass::HumidityBus, Subtype::BusStatus(status));
        }
        None
    }

    /// Set the talon port (1-indexed).  Rejections are also logged.
    pub fn set_talon_port(&mut self, port: u8) -> crate::error::Result<()> {
        let result = self.position.set_talon_port(port);
        if let Err(e) = result {
            self.throw(e.class(), Subtype::None);
        }
        result
    }

    /// Set the sensor port (1-indexed).  Rejections are also logged.
    pub fn set_sensor_port(&mut self, port: u8) -> crate::error::Result<()> {
        let result = self.position.set_sensor_port(port);
        if let Err(e) = result {
            self.throw(e.class(), Subtype::None);
        }
        result
    }

    /// Drain the error log as a typed report.
    pub fn take_errors(&mut self) -> ErrorReport<N> {
        self.errors.drain()
    }

    fn throw(&mut self, class: FaultClass, subtype: Subtype) {
        let code = ErrorCode::new(class, subtype, self.position.error_tag());
        let total = self.errors.push(code);
        warn!("HAAR {}: {} ({} since last read)", class, code, total);
    }
}

impl<B, P, H, const N: usize> Haar<B, P, H, N> {
    pub fn position(&self) -> &Position {
        &self.position
    }

    /// `"<major>.<minor>"` from the version nibbles.
    pub fn hardware_version(&self) -> String {
        format!("{:x}.{:x}", self.version >> 4, self.version & 0x0F)
    }

    pub fn is_initialized(&self) -> bool {
        self.init_done
    }

    /// Address the DPS368 answered at during the last discovery.
    pub fn resolved_address(&self) -> Option<u8> {
        self.dps368_found.then_some(self.adr_dps368)
    }

    /// Faults raised since the last drain.
    pub fn error_count(&self) -> u32 {
        self.errors.total()
    }

    /// `"HAAR":{<body>,"Pos":[t,s]}`
    fn write_report<F>(&self, out: &mut String, body: F) -> fmt::Result
    where
        F: FnOnce(&mut String) -> fmt::Result,
    {
        write!(out, "\"{REPORT_TAG}\":{{")?;
        body(out)?;
        out.write_char(',')?;
        self.position.write_pos(out)?;
        out.write_char('}')
    }

    /// Give back the bus and both drivers.
    pub fn release(self) -> (B, P, H) {
        (self.bus, self.pressure, self.humidity)
    }
}

impl<B, P, H, const N: usize> Sensor for Haar<B, P, H, N>
where
    B: Bus,
    P: PressureChip<B>,
    H: HumidityChip<B>,
{
    fn begin(&mut self) {
        Haar::begin(self);
    }

    fn get_data(&mut self) -> String {
        let reading = self.acquire();
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = self.write_report(&mut out, |out| reading.write_fields(out));
        debug!("{}", out);
        out
    }

    fn get_metadata(&self) -> String {
        let mut out = String::new();
        let _ = self.write_report(&mut out, |out| {
            write!(
                out,
                "\"Hardware\":\"{}\",\"Firmware\":\"{FIRMWARE_VERSION}\"",
                self.hardware_version()
            )
        });
        out
    }

    fn get_errors(&mut self) -> String {
        let report = self.errors.drain();
        let mut out = String::new();
        let _ = self.write_report(&mut out, |out| report.write_fields(out));
        out
    }

    fn is_present(&mut self) -> bool {
        Haar::is_present(self)
    }

    fn talon_port(&self) -> Option<u8> {
        self.position.talon_port()
    }

    fn sensor_port(&self) -> Option<u8> {
        self.position.sensor_port()
    }
}
