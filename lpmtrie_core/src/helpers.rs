//! Bit helpers for trie traversal

use crate::constants::{ADDR_BITS, TOP_BIT};

/// Bit of `addr` consulted at `depth` (0-based, most significant bit first).
#[inline]
pub fn get_bit(addr: u32, depth: u8) -> u8 {
    debug_assert!(depth < ADDR_BITS);
    ((addr & (TOP_BIT >> depth)) != 0) as u8
}

#[inline]
pub fn mask(prefix_len: u8) -> u32 {
    if prefix_len == 0 {
        0
    } else if prefix_len >= ADDR_BITS {
        !0u32
    } else {
        !(!0u32 >> prefix_len)
    }
}

// Canonicalise an address: zero host bits beyond `plen`.
#[inline(always)]
pub fn canonical(addr: u32, plen: u8) -> u32 {
    addr & mask(plen)
}
