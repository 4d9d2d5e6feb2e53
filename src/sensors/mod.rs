//! Sensor subsystem — module drivers and the aggregating [`SensorHub`].
//!
//! The hub owns every module behind the flat [`Sensor`] interface and gathers
//! their per-module JSON members into one array per request.  Each module
//! gets its own object so two boards of the same kind never collide on a key.

pub mod haar;

use core::fmt::Write;

use log::info;

use crate::ports::Sensor;

/// Aggregates heterogeneous sensor modules on one Host.
#[derive(Default)]
pub struct SensorHub {
    modules: Vec<Box<dyn Sensor>>,
}

impl SensorHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a module.  Modules are polled in insertion order.
    pub fn add(&mut self, module: Box<dyn Sensor>) {
        self.modules.push(module);
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Run discovery on every module.
    pub fn begin_all(&mut self) {
        for m in &mut self.modules {
            m.begin();
        }
        info!("hub: {} module(s) started", self.modules.len());
    }

    /// Number of modules answering on their bus.
    pub fn present_count(&mut self) -> usize {
        let mut count = 0;
        for m in &mut self.modules {
            if m.is_present() {
                count += 1;
            }
        }
        count
    }

    /// `{"Data":[{...},{...}]}` with one object per module.
    ///
    /// A module that is absent still contributes its all-null member, so
    /// the Host always sees every registered position.
    pub fn read_all(&mut self) -> String {
        let members: Vec<String> = self.modules.iter_mut().map(|m| m.get_data()).collect();
        wrap("Data", &members)
    }

    /// `{"Metadata":[...]}`
    pub fn metadata(&self) -> String {
        let members: Vec<String> = self.modules.iter().map(|m| m.get_metadata()).collect();
        wrap("Metadata", &members)
    }

    /// `{"Errors":[...]}`.  Drains every module's error log.
    pub fn errors(&mut self) -> String {
        let members: Vec<String> = self.modules.iter_mut().map(|m| m.get_errors()).collect();
        wrap("Errors", &members)
    }
}

fn wrap(key: &str, members: &[String]) -> String {
    let mut out = String::new();
    let _ = write!(out, "{{\"{key}\":[");
    for (i, member) in members.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        let _ = write!(out, "{{{member}}}");
    }
    out.push_str("]}");
    out
}
