//! Fault logging for a sensor module.
//!
//! Keeps the last `N` error codes in a RAM ring buffer.  The total number of
//! faults raised since the last drain is counted separately, so the Host can
//! tell when older codes were overwritten.  Reading the log drains it.

use core::fmt::{self, Write};

use heapless::HistoryBuffer;
use log::trace;

use crate::error::ErrorCode;

/// Default ring capacity.
pub const MAX_NUM_ERRORS: usize = 10;

/// Snapshot returned by [`ErrorLog::drain`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorReport<const N: usize = MAX_NUM_ERRORS> {
    /// Retained codes, oldest first.
    pub codes: heapless::Vec<ErrorCode, N>,
    /// Codes were lost since the last drain.
    pub overwritten: bool,
    /// Faults raised since the last drain, including overwritten ones.
    pub total: u32,
}

impl<const N: usize> ErrorReport<N> {
    /// Write `"CODES":[...],"OW":n,"NUM":n`.
    pub fn write_fields<W: Write>(&self, out: &mut W) -> fmt::Result {
        out.write_str("\"CODES\":[")?;
        for (i, code) in self.codes.iter().enumerate() {
            if i > 0 {
                out.write_char(',')?;
            }
            write!(out, "\"{code}\"")?;
        }
        write!(
            out,
            "],\"OW\":{},\"NUM\":{}",
            u8::from(self.overwritten),
            self.total
        )
    }
}

/// Bounded ring of error codes with overwrite tracking.
pub struct ErrorLog<const N: usize = MAX_NUM_ERRORS> {
    ring: HistoryBuffer<u32, N>,
    total: u32,
}

impl<const N: usize> Default for ErrorLog<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> ErrorLog<N> {
    pub const fn new() -> Self {
        Self {
            ring: HistoryBuffer::new(),
            total: 0,
        }
    }

    /// Record a fault.  Returns the running total.
    pub fn push(&mut self, code: ErrorCode) -> u32 {
        self.ring.write(code.raw());
        self.total = self.total.saturating_add(1);
        trace!("error log: {} ({}/{})", code, self.total, N);
        self.total
    }

    pub fn total(&self) -> u32 {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    pub fn capacity(&self) -> usize {
        N
    }

    /// Take every retained code and reset the log.
    pub fn drain(&mut self) -> ErrorReport<N> {
        let mut codes = heapless::Vec::new();
        for raw in self.ring.oldest_ordered() {
            // Cannot overflow: the ring never holds more than N entries.
            let _ = codes.push(ErrorCode::from_raw(*raw));
        }
        let report = ErrorReport {
            codes,
            overwritten: self.total as usize > N,
            total: self.total,
        };
        self.ring.clear();
        self.total = 0;
        report
    }
}
