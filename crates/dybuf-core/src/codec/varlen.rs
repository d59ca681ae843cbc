//! Length-prefixed payloads.
//!
//! ```text
//! bytes:       [varuint len][len bytes]
//! text:        [varuint len + 1][len UTF-8 bytes][0x00]
//! var text:    [varuint len][len UTF-8 bytes]
//! u8 / u16:    [1- or 2-byte big-endian len][len bytes]
//! ```
//!
//! The fixed-width prefixes cap a payload at 255 or 65,535 bytes; longer
//! payloads are refused with [`DyBufError::LengthTooLarge`] rather than
//! truncated.  Decoding returns views into the buffer; nothing is copied.

use std::ops::Range;

use tracing::trace;

use crate::buffer::DyBuf;
use crate::codec::varint::{decode_varuint, encode_varuint_into, varuint_len};
use crate::error::{DyBufError, Result};

/// Decodes a length prefix at the start of `bytes` and checks the payload is
/// present.
///
/// Returns the payload's range within `bytes` and the total bytes consumed
/// (prefix plus payload).
pub fn decode_len_prefixed(bytes: &[u8]) -> Result<(Range<usize>, usize)> {
    let (len, prefix) = decode_varuint(bytes)?;
    let len = usize::try_from(len).map_err(|_| DyBufError::LengthOverflow(len))?;
    let end = prefix
        .checked_add(len)
        .ok_or(DyBufError::LengthOverflow(len as u64))?;
    if end > bytes.len() {
        return Err(DyBufError::UnexpectedEnd {
            needed: end,
            remainder: bytes.len(),
        });
    }
    Ok((prefix..end, end))
}

/// Decodes a `W`-byte big-endian length prefix at the start of `bytes` and
/// checks the payload is present.  Same return shape as
/// [`decode_len_prefixed`].
pub fn decode_fixed_len_prefixed<const W: usize>(bytes: &[u8]) -> Result<(Range<usize>, usize)> {
    let prefix = bytes.get(..W).ok_or(DyBufError::UnexpectedEnd {
        needed: W,
        remainder: bytes.len(),
    })?;
    let len = prefix.iter().fold(0usize, |acc, &b| (acc << 8) | usize::from(b));
    let end = W + len;
    if end > bytes.len() {
        return Err(DyBufError::UnexpectedEnd {
            needed: end,
            remainder: bytes.len(),
        });
    }
    Ok((W..end, end))
}

/// Largest payload a `W`-byte prefix can describe.
const fn fixed_prefix_max<const W: usize>() -> usize {
    (1 << (8 * W)) - 1
}

/// Interprets a text payload: exactly one trailing NUL, UTF-8 before it.
///
/// The terminator is required.  Payloads written without one (some writers
/// treat it as optional) fail with [`DyBufError::MissingTerminator`]; read
/// those with [`DyBuf::next_var_str`] instead.
pub fn text_payload(payload: &[u8]) -> Result<&str> {
    match payload.split_last() {
        Some((&0, text)) => Ok(std::str::from_utf8(text)?),
        _ => {
            trace!(len = payload.len(), "text payload without terminator");
            Err(DyBufError::MissingTerminator)
        }
    }
}

fn utf8_payload(payload: &[u8]) -> Result<&str> {
    Ok(std::str::from_utf8(payload)?)
}

impl DyBuf<'_> {
    // ── Encode ────────────────────────────────────────────────────────────────

    /// Appends `data` behind its varuint length.  An empty slice is `0x00`.
    ///
    /// # Errors
    ///
    /// Any error from [`DyBuf::reserve`]; nothing is written on error.
    pub fn append_bytes_with_len(&mut self, data: &[u8]) -> Result<&mut Self> {
        let prefix = varuint_len(data.len() as u64);
        let slot = self.write_slot(prefix + data.len())?;
        encode_varuint_into(data.len() as u64, &mut slot[..prefix]);
        slot[prefix..].copy_from_slice(data);
        Ok(self)
    }

    /// Appends `text` with a trailing NUL; the length prefix counts the NUL.
    pub fn append_str_with_len(&mut self, text: &str) -> Result<&mut Self> {
        let body = text.len() + 1;
        let prefix = varuint_len(body as u64);
        let slot = self.write_slot(prefix + body)?;
        encode_varuint_into(body as u64, &mut slot[..prefix]);
        slot[prefix..prefix + text.len()].copy_from_slice(text.as_bytes());
        slot[prefix + text.len()] = 0;
        Ok(self)
    }

    /// Appends `text` behind its varuint byte length, without a terminator.
    pub fn append_var_str(&mut self, text: &str) -> Result<&mut Self> {
        self.append_bytes_with_len(text.as_bytes())
    }

    /// Appends `data` behind a 1-byte length.
    ///
    /// # Errors
    ///
    /// [`DyBufError::LengthTooLarge`] if `data` is longer than 255 bytes, or
    /// any error from [`DyBuf::reserve`].  Nothing is written on error.
    pub fn append_bytes_with_u8_len(&mut self, data: &[u8]) -> Result<&mut Self> {
        self.append_fixed_prefixed::<1>(data)
    }

    /// Appends `data` behind a 2-byte big-endian length (at most 65,535 bytes).
    pub fn append_bytes_with_u16_len(&mut self, data: &[u8]) -> Result<&mut Self> {
        self.append_fixed_prefixed::<2>(data)
    }

    pub fn append_str_with_u8_len(&mut self, text: &str) -> Result<&mut Self> {
        self.append_fixed_prefixed::<1>(text.as_bytes())
    }

    pub fn append_str_with_u16_len(&mut self, text: &str) -> Result<&mut Self> {
        self.append_fixed_prefixed::<2>(text.as_bytes())
    }

    fn append_fixed_prefixed<const W: usize>(&mut self, data: &[u8]) -> Result<&mut Self> {
        let max = fixed_prefix_max::<W>();
        if data.len() > max {
            trace!(len = data.len(), max, "payload too long for fixed prefix");
            return Err(DyBufError::LengthTooLarge {
                len: data.len(),
                max,
            });
        }
        let slot = self.write_slot(W + data.len())?;
        slot[..W].copy_from_slice(&(data.len() as u64).to_be_bytes()[8 - W..]);
        slot[W..].copy_from_slice(data);
        Ok(self)
    }

    // ── Decode ────────────────────────────────────────────────────────────────

    /// Returns the length-prefixed payload at the cursor without advancing.
    pub fn peek_bytes_with_len(&self) -> Result<&[u8]> {
        let unread = self.unread();
        let (payload, _) = decode_len_prefixed(unread)?;
        Ok(&unread[payload])
    }

    /// Returns the length-prefixed payload at the cursor and advances past it.
    ///
    /// # Errors
    ///
    /// [`DyBufError::UnexpectedEnd`] if the declared length runs past the
    /// extent.  The cursor does not move on error.
    pub fn next_bytes_with_len(&mut self) -> Result<&[u8]> {
        let (payload, consumed) = decode_len_prefixed(self.unread())?;
        let group = self.read_bytes(consumed)?;
        Ok(&group[payload])
    }

    /// Returns the text payload at the cursor without advancing.
    pub fn peek_str_with_len(&self) -> Result<&str> {
        self.peek_bytes_with_len().and_then(text_payload)
    }

    /// Returns the text payload at the cursor and advances past it.
    ///
    /// # Errors
    ///
    /// [`DyBufError::MissingTerminator`] or [`DyBufError::InvalidUtf8`] for a
    /// bad payload, in which case the cursor does not move.
    pub fn next_str_with_len(&mut self) -> Result<&str> {
        // Validate before moving so a bad payload leaves the cursor in place.
        self.peek_str_with_len()?;
        self.next_bytes_with_len().and_then(text_payload)
    }
}

impl DyBuf<'_> {
    /// Returns the unterminated var-length text at the cursor without
    /// advancing.
    pub fn peek_var_str(&self) -> Result<&str> {
        self.peek_bytes_with_len().and_then(utf8_payload)
    }

    /// Returns the unterminated var-length text at the cursor and advances
    /// past it.  The cursor does not move if the text is not UTF-8.
    pub fn next_var_str(&mut self) -> Result<&str> {
        self.peek_var_str()?;
        self.next_bytes_with_len().and_then(utf8_payload)
    }

    pub fn peek_bytes_with_u8_len(&self) -> Result<&[u8]> {
        self.peek_fixed_prefixed::<1>()
    }

    pub fn next_bytes_with_u8_len(&mut self) -> Result<&[u8]> {
        self.next_fixed_prefixed::<1>()
    }

    pub fn peek_bytes_with_u16_len(&self) -> Result<&[u8]> {
        self.peek_fixed_prefixed::<2>()
    }

    pub fn next_bytes_with_u16_len(&mut self) -> Result<&[u8]> {
        self.next_fixed_prefixed::<2>()
    }

    pub fn next_str_with_u8_len(&mut self) -> Result<&str> {
        self.peek_fixed_prefixed::<1>().and_then(utf8_payload)?;
        self.next_fixed_prefixed::<1>().and_then(utf8_payload)
    }

    pub fn next_str_with_u16_len(&mut self) -> Result<&str> {
        self.peek_fixed_prefixed::<2>().and_then(utf8_payload)?;
        self.next_fixed_prefixed::<2>().and_then(utf8_payload)
    }

    fn peek_fixed_prefixed<const W: usize>(&self) -> Result<&[u8]> {
        let unread = self.unread();
        let (payload, _) = decode_fixed_len_prefixed::<W>(unread)?;
        Ok(&unread[payload])
    }

    fn next_fixed_prefixed<const W: usize>(&mut self) -> Result<&[u8]> {
        let (payload, consumed) = decode_fixed_len_prefixed::<W>(self.unread())?;
        let group = self.read_bytes(consumed)?;
        Ok(&group[payload])
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
