//! Batch counters over measurement files.
//!
//! Each line is `A.B.C.D S`, where the status flag `S` is `1` when the address
//! answered the measurement and `0` when it did not.

use crate::codec;
use crate::errors::{Error, Result};
use crate::types::LookupEngine;
use log::info;
use std::io::BufRead;

/// Outcome of one pass over a measurement file.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BatchReport {
    /// Measurement lines processed.
    pub total: u64,
    /// Lines whose address has a matching prefix, regardless of status.
    pub reachable: u64,
    /// Lines with status `1`.
    pub active: u64,
    /// Lines with status `1` whose address has no matching prefix.
    pub active_unreachable: u64,
}

/// Split a measurement line into its address and active flag.
pub fn parse_measurement(line: &str) -> Result<(u32, bool)> {
    let mut fields = line.split_whitespace();
    let (Some(addr), Some(status), None) = (fields.next(), fields.next(), fields.next()) else {
        return Err(Error::parse(line, "expected `A.B.C.D S`"));
    };
    let addr = codec::parse_addr(addr)?;
    let active = match status {
        "1" => true,
        "0" => false,
        _ => return Err(Error::parse(line, "status must be 0 or 1")),
    };
    Ok((addr, active))
}

/// Classify every measurement line in one pass.
pub fn tally<R: BufRead>(engine: &LookupEngine, reader: R) -> Result<BatchReport> {
    let mut report = BatchReport::default();
    for (idx, line) in reader.lines().enumerate() {
        let line_no = idx + 1;
        let line = line.map_err(|e| Error::from(e).at_line(line_no))?;
        if line.trim().is_empty() {
            continue;
        }
        let (addr, active) = parse_measurement(&line).map_err(|e| e.at_line(line_no))?;
        let matched = engine.lookup(addr).is_some();
        report.total += 1;
        if matched {
            report.reachable += 1;
        }
        if active {
            report.active += 1;
            if !matched {
                report.active_unreachable += 1;
            }
        }
    }
    info!(
        "[BATCH] total={} reachable={} active={} active_unreachable={}",
        report.total, report.reachable, report.active, report.active_unreachable
    );
    Ok(report)
}

/// Number of measured addresses covered by some prefix.
pub fn count_reachable<R: BufRead>(engine: &LookupEngine, reader: R) -> Result<u64> {
    tally(engine, reader).map(|r| r.reachable)
}

/// Number of active measured addresses no prefix covers.
pub fn count_active_unreachable<R: BufRead>(engine: &LookupEngine, reader: R) -> Result<u64> {
    tally(engine, reader).map(|r| r.active_unreachable)
}
