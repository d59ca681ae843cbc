//! Typdex tags: a field's type code and index packed into 1–4 bytes.
//!
//! The first byte opens with the same unary marker as a varint, followed by
//! the type bits and then the index bits, big-endian:
//!
//! ```text
//!  bytes  marker  type bits  index bits  type max  index max
//!    1     0         4          3          0x0F       7
//!    2     10        6          8          0x3F       0xFF
//!    3     110       8         13          0xFF       0x1FFF
//!    4     1110      8         20          0xFF       0xF_FFFF
//! ```
//!
//! The encoder picks the smallest tier whose bounds hold for both fields.
//! A first byte starting with four set bits is not a typdex.

use tracing::trace;

use crate::buffer::DyBuf;
use crate::error::{DyBufError, Result};

/// Largest index the widest tier can carry.
pub const TYPDEX_INDEX_MAX: u32 = (1 << 20) - 1;

/// Longest encoded tag.
pub const MAX_TYPDEX_LEN: usize = 4;

/// A decoded `(type, index)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Typdex {
    pub type_code: u8,
    pub index: u32,
}

impl Typdex {
    pub fn new(type_code: u8, index: u32) -> Self {
        Self { type_code, index }
    }

    /// Bytes this tag occupies once encoded.
    ///
    /// # Errors
    ///
    /// Returns [`DyBufError::TypdexIndexOutOfRange`] if `index` exceeds
    /// [`TYPDEX_INDEX_MAX`].
    pub fn encoded_len(&self) -> Result<usize> {
        tier_for(self.type_code, self.index).map(|tier| tier.len)
    }
}

struct Tier {
    len: usize,
    marker: u8,
    type_max: u8,
    index_bits: u32,
}

static TIERS: [Tier; MAX_TYPDEX_LEN] = [
    Tier { len: 1, marker: 0x00, type_max: 0x0F, index_bits: 3 },
    Tier { len: 2, marker: 0x80, type_max: 0x3F, index_bits: 8 },
    Tier { len: 3, marker: 0xC0, type_max: 0xFF, index_bits: 13 },
    Tier { len: 4, marker: 0xE0, type_max: 0xFF, index_bits: 20 },
];

impl Tier {
    fn index_max(&self) -> u32 {
        (1 << self.index_bits) - 1
    }

    fn fits(&self, type_code: u8, index: u32) -> bool {
        type_code <= self.type_max && index <= self.index_max()
    }
}

fn tier_for(type_code: u8, index: u32) -> Result<&'static Tier> {
    TIERS
        .iter()
        .find(|tier| tier.fits(type_code, index))
        .ok_or(DyBufError::TypdexIndexOutOfRange {
            index,
            max: TYPDEX_INDEX_MAX,
        })
}

// ── Pure functions ────────────────────────────────────────────────────────────

/// Encodes `tag` into a stack array, returning it with the used length.
pub fn encode_typdex(tag: Typdex) -> Result<([u8; MAX_TYPDEX_LEN], usize)> {
    let tier = tier_for(tag.type_code, tag.index)?;
    let word = (u32::from(tier.marker) << (8 * (tier.len - 1)))
        | (u32::from(tag.type_code) << tier.index_bits)
        | tag.index;

    let mut out = [0u8; MAX_TYPDEX_LEN];
    out[..tier.len].copy_from_slice(&word.to_be_bytes()[MAX_TYPDEX_LEN - tier.len..]);
    Ok((out, tier.len))
}

/// Decodes one tag from the start of `bytes`, returning it with the number of
/// bytes consumed.
///
/// # Errors
///
/// - [`DyBufError::MalformedTypdex`] if the first byte starts with `1111`.
/// - [`DyBufError::UnexpectedEnd`] if the tag is truncated.
pub fn decode_typdex(bytes: &[u8]) -> Result<(Typdex, usize)> {
    let first = *bytes
        .first()
        .ok_or(DyBufError::UnexpectedEnd { needed: 1, remainder: 0 })?;
    let tier = TIERS
        .get(first.leading_ones() as usize)
        .ok_or_else(|| {
            trace!(first, "typdex header has no tier marker");
            DyBufError::MalformedTypdex(first)
        })?;
    let group = bytes.get(..tier.len).ok_or(DyBufError::UnexpectedEnd {
        needed: tier.len,
        remainder: bytes.len(),
    })?;

    let mut raw = [0u8; MAX_TYPDEX_LEN];
    raw[MAX_TYPDEX_LEN - tier.len..].copy_from_slice(group);
    // 7 payload bits per byte; the rest is marker.
    let word = u32::from_be_bytes(raw) & ((1 << (7 * tier.len)) - 1);

    let tag = Typdex {
        type_code: (word >> tier.index_bits) as u8,
        index: word & tier.index_max(),
    };
    Ok((tag, tier.len))
}

// ── Buffer operations ─────────────────────────────────────────────────────────

impl DyBuf<'_> {
    /// Appends a `(type_code, index)` tag in the smallest tier that fits.
    ///
    /// # Errors
    ///
    /// [`DyBufError::TypdexIndexOutOfRange`] if `index` cannot be encoded, or
    /// any error from [`DyBuf::reserve`].  Nothing is written on error.
    pub fn append_typdex(&mut self, type_code: u8, index: u32) -> Result<&mut Self> {
        let (bytes, len) = encode_typdex(Typdex::new(type_code, index))?;
        self.append_bytes(&bytes[..len])
    }

    /// Decodes the tag at the cursor without advancing.
    pub fn peek_typdex(&self) -> Result<Typdex> {
        decode_typdex(self.unread()).map(|(tag, _)| tag)
    }

    /// Decodes the tag at the cursor and advances past it.
    pub fn next_typdex(&mut self) -> Result<Typdex> {
        let (tag, consumed) = decode_typdex(self.unread())?;
        self.advance(consumed)?;
        Ok(tag)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
