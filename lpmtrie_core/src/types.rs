//! Data structures for the prefix trie

use crate::codec;
use crate::constants::MAX_MASK_LEN;
use crate::errors::Error;
use crate::helpers::canonical;
use ipnet::Ipv4Net;
use std::{fmt, net::Ipv4Addr, str::FromStr};

/// Offset type: index of a node inside the trie arena.
pub type Offset = u32;

/// A CIDR block, always held in canonical form (host bits zeroed).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Prefix {
    addr: u32,
    mask_len: u8,
}

impl Prefix {
    /// Build a prefix, clearing any address bits beyond `mask_len`.
    pub fn new(addr: u32, mask_len: u8) -> Result<Self, Error> {
        if mask_len > MAX_MASK_LEN {
            return Err(Error::InvalidMask(mask_len as u32));
        }
        Ok(Self {
            addr: canonical(addr, mask_len),
            mask_len,
        })
    }

    pub fn addr(&self) -> u32 {
        self.addr
    }

    pub fn mask_len(&self) -> u8 {
        self.mask_len
    }

    /// True when the top `mask_len` bits of `addr` equal this prefix.
    pub fn covers(&self, addr: u32) -> bool {
        canonical(addr, self.mask_len) == self.addr
    }
}

impl fmt::Display for Prefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", codec::format_addr(self.addr), self.mask_len)
    }
}

impl FromStr for Prefix {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (addr, mask_len) = codec::parse_prefix(s)?;
        let mask_len = u8::try_from(mask_len).map_err(|_| Error::InvalidMask(mask_len))?;
        Prefix::new(addr, mask_len)
    }
}

impl From<Ipv4Net> for Prefix {
    fn from(net: Ipv4Net) -> Self {
        Self {
            addr: u32::from(net.network()),
            mask_len: net.prefix_len(),
        }
    }
}

impl From<Prefix> for Ipv4Net {
    fn from(p: Prefix) -> Self {
        // mask_len is bounded by Prefix::new
        Ipv4Net::new_assert(Ipv4Addr::from(p.addr), p.mask_len)
    }
}

/// Trie node. A child link equal to `ROOT` means "no child".
#[derive(Debug, Default, Clone)]
pub struct Node {
    pub left: Offset,
    pub right: Offset,
    pub prefix: Option<Prefix>,
}

/// Bit-per-level binary trie over IPv4 addresses, stored in an index arena.
#[derive(Debug, Clone)]
pub struct PrefixTrie {
    pub(crate) nodes: Vec<Node>, // nodes[ROOT] always exists
    pub(crate) len: usize,       // attached prefixes
}

/// One loaded prefix table: build with `insert`/`load_prefix`, then query.
#[derive(Debug, Clone)]
pub struct LookupEngine {
    pub(crate) trie: PrefixTrie,
}
