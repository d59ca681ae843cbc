//! Fixed-width big-endian integers, bools and IEEE-754 floats.
//!
//! Signed values are written as their two's complement bit pattern, so
//! `append_i16(-2)` and `append_u16(0xFFFE)` produce the same bytes.

use crate::buffer::DyBuf;
use crate::error::Result;

/// Largest value a 24-bit field can hold.
pub const U24_MAX: u32 = 0x00FF_FFFF;

impl DyBuf<'_> {
    // ── Append ────────────────────────────────────────────────────────────────

    pub fn append_u8(&mut self, value: u8) -> Result<&mut Self> {
        self.append_bytes(&[value])
    }

    pub fn append_u16(&mut self, value: u16) -> Result<&mut Self> {
        self.append_bytes(&value.to_be_bytes())
    }

    /// Appends the low 24 bits of `value`.  Bits above [`U24_MAX`] are dropped.
    pub fn append_u24(&mut self, value: u32) -> Result<&mut Self> {
        self.append_bytes(&value.to_be_bytes()[1..])
    }

    pub fn append_u32(&mut self, value: u32) -> Result<&mut Self> {
        self.append_bytes(&value.to_be_bytes())
    }

    pub fn append_u64(&mut self, value: u64) -> Result<&mut Self> {
        self.append_bytes(&value.to_be_bytes())
    }

    pub fn append_i8(&mut self, value: i8) -> Result<&mut Self> {
        self.append_bytes(&value.to_be_bytes())
    }

    pub fn append_i16(&mut self, value: i16) -> Result<&mut Self> {
        self.append_bytes(&value.to_be_bytes())
    }

    pub fn append_i32(&mut self, value: i32) -> Result<&mut Self> {
        self.append_bytes(&value.to_be_bytes())
    }

    pub fn append_i64(&mut self, value: i64) -> Result<&mut Self> {
        self.append_bytes(&value.to_be_bytes())
    }

    // ── Peek (no advance) ─────────────────────────────────────────────────────

    pub fn peek_u8(&self) -> Result<u8> {
        Ok(self.peek_array::<1>()?[0])
    }

    pub fn peek_u16(&self) -> Result<u16> {
        self.peek_array().map(u16::from_be_bytes)
    }

    pub fn peek_u24(&self) -> Result<u32> {
        let [a, b, c] = self.peek_array::<3>()?;
        Ok(u32::from_be_bytes([0, a, b, c]))
    }

    pub fn peek_u32(&self) -> Result<u32> {
        self.peek_array().map(u32::from_be_bytes)
    }

    pub fn peek_u64(&self) -> Result<u64> {
        self.peek_array().map(u64::from_be_bytes)
    }

    // ── Next (advance) ────────────────────────────────────────────────────────

    pub fn next_u8(&mut self) -> Result<u8> {
        let value = self.peek_u8()?;
        self.advance(1)?;
        Ok(value)
    }

    pub fn next_u16(&mut self) -> Result<u16> {
        let value = self.peek_u16()?;
        self.advance(2)?;
        Ok(value)
    }

    pub fn next_u24(&mut self) -> Result<u32> {
        let value = self.peek_u24()?;
        self.advance(3)?;
        Ok(value)
    }

    pub fn next_u32(&mut self) -> Result<u32> {
        let value = self.peek_u32()?;
        self.advance(4)?;
        Ok(value)
    }

    pub fn next_u64(&mut self) -> Result<u64> {
        let value = self.peek_u64()?;
        self.advance(8)?;
        Ok(value)
    }

    pub fn next_i8(&mut self) -> Result<i8> {
        self.next_u8().map(|v| v as i8)
    }

    pub fn next_i16(&mut self) -> Result<i16> {
        self.next_u16().map(|v| v as i16)
    }

    pub fn next_i32(&mut self) -> Result<i32> {
        self.next_u32().map(|v| v as i32)
    }

    pub fn next_i64(&mut self) -> Result<i64> {
        self.next_u64().map(|v| v as i64)
    }

    // ── Bool and IEEE-754 ─────────────────────────────────────────────────────

    /// Appends `0x01` for `true`, `0x00` for `false`.
    pub fn append_bool(&mut self, value: bool) -> Result<&mut Self> {
        self.append_u8(u8::from(value))
    }

    /// Reads one byte; any non-zero value is `true`.
    pub fn next_bool(&mut self) -> Result<bool> {
        self.next_u8().map(|v| v != 0)
    }

    pub fn append_f32(&mut self, value: f32) -> Result<&mut Self> {
        self.append_u32(value.to_bits())
    }

    pub fn next_f32(&mut self) -> Result<f32> {
        self.next_u32().map(f32::from_bits)
    }

    pub fn append_f64(&mut self, value: f64) -> Result<&mut Self> {
        self.append_u64(value.to_bits())
    }

    pub fn next_f64(&mut self) -> Result<f64> {
        self.next_u64().map(f64::from_bits)
    }

    /// Copies the next `N` bytes into an array without advancing.
    pub(crate) fn peek_array<const N: usize>(&self) -> Result<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.peek_bytes(N)?);
        Ok(out)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
