//
// target.rs: CIMA target resolution
//
// A write goes to a set of CIMA instances, one bit per instance in a
// 64-bit mask. The set is either given explicitly as a mask string or
// derived from a single index. A non-empty mask string always wins.
//

use std::fmt;

use crate::errors::ErrorCode;

// Number of addressable CIMA instances.
pub const NUM_CIMAS: usize = 64;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CimaMask(pub u64);

impl CimaMask {
    pub fn from_index(index: u64) -> Result<CimaMask, ErrorCode> {
        if index >= NUM_CIMAS as u64 {
            return Err(ErrorCode::BadTargetIndex { index });
        }
        Ok(CimaMask(1 << index))
    }

    // Number of CIMA instances addressed.
    pub fn count(&self) -> u32 {
        self.0.count_ones()
    }

    pub fn contains(&self, index: usize) -> bool {
        index < NUM_CIMAS && self.0 & (1 << index) != 0
    }

    // Addressed instances, lowest first.
    pub fn units(&self) -> impl Iterator<Item = usize> + '_ {
        (0..NUM_CIMAS).filter(move |i| self.contains(*i))
    }
}

// Verilog-style, nibble groups of four: 64'h0000_0000_0000_0001
impl fmt::Display for CimaMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let v = self.0;
        write!(
            f,
            "64'h{:04X}_{:04X}_{:04X}_{:04X}",
            (v >> 48) & 0xffff,
            (v >> 32) & 0xffff,
            (v >> 16) & 0xffff,
            v & 0xffff
        )
    }
}

// Parse an explicit mask: 64'h<hex>, 0x<hex> or bare hex. Underscores
// are ignored. At most 16 hex digits.
pub fn parse_mask(text: &str) -> Result<CimaMask, ErrorCode> {
    let bad_mask = || ErrorCode::BadMask {
        text: text.to_string(),
    };

    let body = ["64'h", "64'H", "0x", "0X"]
        .iter()
        .find_map(|prefix| text.strip_prefix(*prefix))
        .unwrap_or(text);
    let digits = body.chars().filter(|c| *c != '_').collect::<String>();

    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(bad_mask());
    }
    if digits.len() > NUM_CIMAS / 4 {
        return Err(ErrorCode::MaskTooWide {
            text: text.to_string(),
        });
    }

    u64::from_str_radix(&digits, 16)
        .map(CimaMask)
        .map_err(|_| bad_mask())
}

// Work out which CIMAs a write applies to. An empty mask falls back to
// the single instance at 'index'; a malformed mask is an error, never a
// silent fallback.
pub fn resolve(mask_text: &str, index: u64) -> Result<CimaMask, ErrorCode> {
    let mask_text = mask_text.trim();
    if mask_text.is_empty() {
        CimaMask::from_index(index)
    } else {
        parse_mask(mask_text)
    }
}
