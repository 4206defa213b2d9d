//! Query-facing wrapper around a built [`PrefixTrie`].
//!
//! Building needs `&mut self`, lookups only `&self`: once loading is done the
//! engine can be shared (e.g. behind an `Arc`) for concurrent read-only use.

use crate::{
    codec, ensure_logging,
    errors::{Error, Result},
    loader, telemetry,
    types::{LookupEngine, Prefix, PrefixTrie},
    Iter,
};
use ipnet::Ipv4Net;
use log::debug;
use metrics::counter;
use std::{fs::File, io::BufRead, io::BufReader, path::Path};

impl Default for LookupEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl LookupEngine {
    pub fn new() -> Self {
        ensure_logging();
        telemetry::init();
        Self {
            trie: PrefixTrie::new(),
        }
    }

    /// Build an engine from `A.B.C.D/M` lines; see [`loader::load_prefixes`].
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        let mut engine = Self::new();
        loader::load_prefixes(&mut engine, reader)?;
        Ok(engine)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        debug!("[LOAD] Opened {}", path.as_ref().display());
        Self::from_reader(BufReader::new(file))
    }

    pub fn insert(&mut self, addr: u32, mask_len: u8) -> Result<()> {
        self.trie.insert(addr, mask_len)
    }

    pub fn insert_prefix(&mut self, prefix: Prefix) -> Result<()> {
        self.trie.insert(prefix.addr(), prefix.mask_len())
    }

    pub fn insert_net(&mut self, net: Ipv4Net) -> Result<()> {
        self.insert_prefix(Prefix::from(net))
    }

    /// Insert pre-parsed pairs in order, stopping at the first failure.
    pub fn bulk_insert(&mut self, items: &[(u32, u8)]) -> Result<()> {
        for &(addr, mask_len) in items {
            self.insert(addr, mask_len)?;
        }
        Ok(())
    }

    /// Parse `A.B.C.D/M` and insert it.
    pub fn load_prefix(&mut self, text: &str) -> Result<()> {
        let (addr, mask_len) = codec::parse_prefix(text)?;
        let mask_len = u8::try_from(mask_len).map_err(|_| Error::InvalidMask(mask_len))?;
        self.insert(addr, mask_len)
    }

    pub fn lookup(&self, addr: u32) -> Option<Prefix> {
        counter!("lpmtrie_lookups_total").increment(1);
        let found = self.trie.lookup(addr);
        if found.is_none() {
            counter!("lpmtrie_lookup_misses_total").increment(1);
        }
        found
    }

    /// Longest match for a dotted-quad address. `Ok(None)` means no prefix covers it.
    pub fn classify(&self, addr_text: &str) -> Result<Option<Prefix>> {
        let addr = codec::parse_addr(addr_text)?;
        Ok(self.lookup(addr))
    }

    pub fn get_exact(&self, addr: u32, mask_len: u8) -> Option<Prefix> {
        self.trie.get_exact(addr, mask_len)
    }

    pub fn prefixes(&self) -> Iter<'_> {
        self.trie.iter()
    }

    pub fn len(&self) -> usize {
        self.trie.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trie.is_empty()
    }

    pub fn node_count(&self) -> usize {
        self.trie.node_count()
    }
}
