use anyhow::{Context, Result};
use log::info;
use lpmtrie_core::{batch, LookupEngine};
use std::fs::File;
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};

fn load_engine(prefixes: &Path) -> Result<LookupEngine> {
    let engine = LookupEngine::from_path(prefixes)
        .with_context(|| format!("Failed to load prefix table: {}", prefixes.display()))?;
    info!(
        "Loaded {} prefixes ({} nodes) from {}",
        engine.len(),
        engine.node_count(),
        prefixes.display()
    );
    Ok(engine)
}

pub fn cmd_lookup(prefixes: PathBuf, addrs: Vec<String>) -> Result<()> {
    let engine = load_engine(&prefixes)?;
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    for addr in &addrs {
        let found = engine
            .classify(addr)
            .with_context(|| format!("Invalid address: {addr}"))?;
        match found {
            Some(prefix) => writeln!(out, "{addr} {prefix}")?,
            None => writeln!(out, "{addr} -")?,
        }
    }
    Ok(())
}

pub fn cmd_count(prefixes: PathBuf, measurements: PathBuf) -> Result<()> {
    let engine = load_engine(&prefixes)?;
    let file = File::open(&measurements)
        .map_err(lpmtrie_core::Error::from)
        .with_context(|| format!("Failed to open measurements: {}", measurements.display()))?;
    let report = batch::tally(&engine, BufReader::new(file))
        .with_context(|| format!("Failed to read measurements: {}", measurements.display()))?;

    println!("total: {}", report.total);
    println!("reachable: {}", report.reachable);
    println!("active: {}", report.active);
    println!("active_unreachable: {}", report.active_unreachable);
    Ok(())
}
