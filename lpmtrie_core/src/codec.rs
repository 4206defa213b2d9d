//! Dotted-quad address and `A.B.C.D/M` prefix text codec.
//!
//! Octets must be plain decimal digits; values above 255 are rejected rather
//! than truncated. The mask of a prefix is handed back unchecked so that the
//! trie reports an out-of-range length as [`Error::InvalidMask`].

use crate::errors::Error;

/// Decimal digits only; values past `u32::MAX` saturate so range checks still see them.
fn parse_decimal(field: &str, input: &str, what: &'static str) -> Result<u32, Error> {
    if field.is_empty() || !field.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::parse(input, what));
    }
    Ok(field.parse::<u32>().unwrap_or(u32::MAX))
}

fn parse_octets(text: &str, input: &str) -> Result<u32, Error> {
    let mut addr = 0u32;
    let mut count = 0usize;
    for field in text.split('.') {
        count += 1;
        if count > 4 {
            break;
        }
        let octet = parse_decimal(field, input, "octet is not a decimal number")?;
        if octet > 255 {
            return Err(Error::parse(input, "octet out of range 0..=255"));
        }
        addr = (addr << 8) | octet;
    }
    if count != 4 {
        return Err(Error::parse(input, "expected four dot-separated octets"));
    }
    Ok(addr)
}

/// Parse `A.B.C.D` into its 32-bit value.
pub fn parse_addr(text: &str) -> Result<u32, Error> {
    parse_octets(text.trim(), text)
}

/// Parse `A.B.C.D/M` into `(address, mask_len)`; the mask is not range-checked.
pub fn parse_prefix(text: &str) -> Result<(u32, u32), Error> {
    let trimmed = text.trim();
    let (addr, mask) = trimmed
        .split_once('/')
        .ok_or_else(|| Error::parse(text, "expected A.B.C.D/M"))?;
    let addr = parse_octets(addr, text)?;
    let mask = parse_decimal(mask, text, "mask length is not a decimal number")?;
    Ok((addr, mask))
}

pub fn format_addr(addr: u32) -> String {
    format!(
        "{}.{}.{}.{}",
        (addr >> 24) & 0xFF,
        (addr >> 16) & 0xFF,
        (addr >> 8) & 0xFF,
        addr & 0xFF
    )
}
