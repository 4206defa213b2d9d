//! Constants and configuration for the prefix trie

/// Width of an IPv4 address in bits; also the maximum trie depth.
pub const ADDR_BITS: u8 = 32;
pub const MAX_MASK_LEN: u8 = ADDR_BITS;

/// Arena offset of the root node. Never a valid child, so it doubles as "no child".
pub const ROOT: u32 = 0;

pub const TOP_BIT: u32 = 0x8000_0000;

pub const INITIAL_NODES: usize = 64; // arena pre-allocation for a fresh trie
