//! Prefix table loader: one `A.B.C.D/M` record per line.

use crate::errors::{Error, Result};
use crate::types::LookupEngine;
use log::{debug, info, warn};
use std::io::BufRead;

/// Insert every record read from `reader` into `engine`.
///
/// Blank lines are skipped. The first malformed, out-of-range or duplicate
/// record aborts the load with an [`Error::AtLine`]; prefixes inserted before
/// it stay in the engine. Returns the number of prefixes inserted.
pub fn load_prefixes<R: BufRead>(engine: &mut LookupEngine, reader: R) -> Result<usize> {
    let mut inserted = 0usize;
    for (idx, line) in reader.lines().enumerate() {
        let line_no = idx + 1;
        let line = line.map_err(|e| Error::from(e).at_line(line_no))?;
        let record = line.trim();
        if record.is_empty() {
            continue;
        }
        if let Err(e) = engine.load_prefix(record) {
            warn!("[LOAD] Line {line_no}: {e}");
            return Err(e.at_line(line_no));
        }
        inserted += 1;
        if inserted.is_multiple_of(100_000) {
            debug!("[LOAD] {inserted} prefixes so far");
        }
    }
    info!(
        "[LOAD] Loaded {inserted} prefixes into {} nodes",
        engine.node_count()
    );
    Ok(inserted)
}
