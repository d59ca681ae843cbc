//! Packet decoder (the open-for-read state).

use tracing::{debug, trace};

use crate::buffer::DyBuf;
use crate::codec::typdex::decode_typdex;
use crate::codec::varint::{decode_varuint, zigzag_decode};
use crate::codec::varlen::{decode_len_prefixed, text_payload};
use crate::error::{DyBufError, Result};
use crate::packet::field::{Field, FieldType};

// ── Pure decoding ─────────────────────────────────────────────────────────────

/// Decodes the field record at the start of `bytes`.
///
/// Returns the field's index, its value and the number of bytes the whole
/// record (tag plus value) occupies.
///
/// # Errors
///
/// - [`DyBufError::UnknownFieldType`] for a type code outside the table.
/// - [`DyBufError::UnsupportedFieldType`] for reserved container codes.
/// - Any tag or value decoding error.
pub fn decode_field(bytes: &[u8]) -> Result<(u32, Field<'_>, usize)> {
    let (tag, tag_len) = decode_typdex(bytes)?;
    let field_type = FieldType::try_from(tag.type_code).map_err(|()| {
        trace!(code = tag.type_code, "unknown field type");
        DyBufError::UnknownFieldType(tag.type_code)
    })?;
    let body = &bytes[tag_len..];

    let (field, body_len) = match field_type {
        FieldType::Eof => (Field::Eof, 0),
        FieldType::Version => {
            let (v, n) = decode_varuint(body)?;
            (Field::Version(v), n)
        }
        FieldType::Bool => {
            let [b] = fixed::<1>(body)?;
            (Field::Bool(b != 0), 1)
        }
        FieldType::Int => {
            let (v, n) = decode_varuint(body)?;
            (Field::Int(zigzag_decode(v)), n)
        }
        FieldType::Uint => {
            let (v, n) = decode_varuint(body)?;
            (Field::Uint(v), n)
        }
        FieldType::Float => (Field::Float(f32::from_be_bytes(fixed(body)?)), 4),
        FieldType::Double => (Field::Double(f64::from_be_bytes(fixed(body)?)), 8),
        FieldType::String => {
            let (payload, n) = decode_len_prefixed(body)?;
            (Field::String(text_payload(&body[payload])?), n)
        }
        FieldType::Bytes => {
            let (payload, n) = decode_len_prefixed(body)?;
            (Field::Bytes(&body[payload]), n)
        }
        FieldType::Array | FieldType::Map => {
            return Err(DyBufError::UnsupportedFieldType(field_type));
        }
    };
    Ok((tag.index, field, tag_len + body_len))
}

fn fixed<const N: usize>(bytes: &[u8]) -> Result<[u8; N]> {
    let src = bytes.get(..N).ok_or(DyBufError::UnexpectedEnd {
        needed: N,
        remainder: bytes.len(),
    })?;
    let mut out = [0u8; N];
    out.copy_from_slice(src);
    Ok(out)
}

// ── Reader ────────────────────────────────────────────────────────────────────

/// Walks the `(tag, value)` records of a packet.
///
/// Every `next_*` call either consumes one whole field or leaves the cursor
/// where it was.  Asking for the wrong type is reported as
/// [`DyBufError::FieldTypeMismatch`], so a caller may fall back to
/// [`PacketReader::peek_type`] or [`PacketReader::next_field`].
#[derive(Debug)]
pub struct PacketReader<'a> {
    buf: DyBuf<'a>,
}

impl PacketReader<'static> {
    /// Opens a private copy of `data` for reading.
    pub fn cloned(data: &[u8]) -> Result<Self> {
        Ok(Self::from_buf(DyBuf::cloned_from(data)?))
    }
}

impl<'a> PacketReader<'a> {
    /// Opens `data` for zero-copy reading.
    pub fn new(data: &'a [u8]) -> Self {
        Self::from_buf(DyBuf::view(data))
    }

    /// Reads from the cursor of an existing buffer to its extent.
    ///
    /// An owned buffer's extent is its whole zero-filled capacity, and zero
    /// bytes decode as `Eof` fields.  Pass such a buffer through
    /// [`DyBuf::into_written`] first, or use [`super::PacketWriter::into_reader`].
    pub fn from_buf(buf: DyBuf<'a>) -> Self {
        debug!(ownership = ?buf.ownership(), remainder = buf.remainder(), "packet opened for read");
        Self { buf }
    }

    pub fn position(&self) -> usize {
        self.buf.position()
    }

    /// Bytes left after the cursor; 0 once the whole packet is consumed.
    pub fn remainder(&self) -> usize {
        self.buf.remainder()
    }

    pub fn into_inner(self) -> DyBuf<'a> {
        self.buf
    }

    /// Type and index of the next field, without consuming it.
    ///
    /// # Errors
    ///
    /// [`DyBufError::UnknownFieldType`] if the tag names no known type.
    pub fn peek_type(&self) -> Result<(FieldType, u32)> {
        let tag = self.buf.peek_typdex()?;
        let field_type = FieldType::try_from(tag.type_code)
            .map_err(|()| DyBufError::UnknownFieldType(tag.type_code))?;
        Ok((field_type, tag.index))
    }

    /// Consumes the next field whatever its type.
    pub fn next_field(&mut self) -> Result<(u32, Field<'_>)> {
        let (_, _, consumed) = decode_field(self.buf.unread())?;
        let record = self.buf.read_bytes(consumed)?;
        let (index, field, _) = decode_field(record)?;
        Ok((index, field))
    }

    /// Consumes every field up to and including `Eof`.
    ///
    /// On error the cursor is restored to where it was before the call.
    pub fn fields(&mut self) -> Result<Vec<(u32, Field<'_>)>> {
        let start = self.buf.position();
        if let Err(err) = self.skip_to_eof() {
            self.buf.set_position(start)?;
            return Err(err);
        }

        let mut record = &self.buf.snapshot_written()[start..];
        let mut fields = Vec::new();
        while !record.is_empty() {
            let (index, field, consumed) = decode_field(record)?;
            fields.push((index, field));
            record = &record[consumed..];
        }
        Ok(fields)
    }

    fn skip_to_eof(&mut self) -> Result<()> {
        loop {
            if let (_, Field::Eof) = self.next_field()? {
                return Ok(());
            }
        }
    }

    // ── Typed accessors ───────────────────────────────────────────────────────

    /// Consumes the version marker and returns its value.
    pub fn next_version(&mut self) -> Result<u64> {
        match self.take(FieldType::Version)? {
            (_, Field::Version(v)) => Ok(v),
            (_, other) => Err(mismatch(FieldType::Version, &other)),
        }
    }

    /// Consumes the end-of-packet marker.
    pub fn next_eof(&mut self) -> Result<()> {
        self.take(FieldType::Eof).map(|_| ())
    }

    pub fn next_bool(&mut self) -> Result<(u32, bool)> {
        match self.take(FieldType::Bool)? {
            (index, Field::Bool(v)) => Ok((index, v)),
            (_, other) => Err(mismatch(FieldType::Bool, &other)),
        }
    }

    pub fn next_int(&mut self) -> Result<(u32, i64)> {
        match self.take(FieldType::Int)? {
            (index, Field::Int(v)) => Ok((index, v)),
            (_, other) => Err(mismatch(FieldType::Int, &other)),
        }
    }

    pub fn next_uint(&mut self) -> Result<(u32, u64)> {
        match self.take(FieldType::Uint)? {
            (index, Field::Uint(v)) => Ok((index, v)),
            (_, other) => Err(mismatch(FieldType::Uint, &other)),
        }
    }

    pub fn next_float(&mut self) -> Result<(u32, f32)> {
        match self.take(FieldType::Float)? {
            (index, Field::Float(v)) => Ok((index, v)),
            (_, other) => Err(mismatch(FieldType::Float, &other)),
        }
    }

    pub fn next_double(&mut self) -> Result<(u32, f64)> {
        match self.take(FieldType::Double)? {
            (index, Field::Double(v)) => Ok((index, v)),
            (_, other) => Err(mismatch(FieldType::Double, &other)),
        }
    }

    /// Consumes a string field; the text borrows from the packet.
    pub fn next_string(&mut self) -> Result<(u32, &str)> {
        match self.take(FieldType::String)? {
            (index, Field::String(v)) => Ok((index, v)),
            (_, other) => Err(mismatch(FieldType::String, &other)),
        }
    }

    /// Consumes a bytes field; the payload borrows from the packet.
    pub fn next_bytes(&mut self) -> Result<(u32, &[u8])> {
        match self.take(FieldType::Bytes)? {
            (index, Field::Bytes(v)) => Ok((index, v)),
            (_, other) => Err(mismatch(FieldType::Bytes, &other)),
        }
    }

    fn take(&mut self, expected: FieldType) -> Result<(u32, Field<'_>)> {
        let (found, _) = self.peek_type()?;
        if found != expected {
            return Err(DyBufError::FieldTypeMismatch { expected, found });
        }
        self.next_field()
    }
}

fn mismatch(expected: FieldType, found: &Field<'_>) -> DyBufError {
    DyBufError::FieldTypeMismatch {
        expected,
        found: found.field_type(),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::packet::PacketWriter;

    fn sample_packet() -> Vec<u8> {
        let mut writer = PacketWriter::new(0).unwrap();
        writer
            .append_version(7)
            .unwrap()
            .append_int(0, -300)
            .unwrap()
            .append_string(1, "héllo")
            .unwrap()
            .append_bytes(2, &[0xDE, 0xAD])
            .unwrap();
        writer.finish().unwrap().to_vec()
    }

    #[test]
    fn test_typed_accessors_follow_write_order() {
        // Arrange
        let bytes = sample_packet();
        let mut reader = PacketReader::new(&bytes);

        // Act / Assert
        assert_eq!(reader.next_version().unwrap(), 7);
        assert_eq!(reader.next_int().unwrap(), (0, -300));
        assert_eq!(reader.next_string().unwrap(), (1, "héllo"));
        assert_eq!(reader.next_bytes().unwrap(), (2, &[0xDE, 0xAD][..]));
        reader.next_eof().unwrap();
        assert_eq!(reader.remainder(), 0);
    }

    #[test]
    fn test_wrong_accessor_is_a_mismatch_and_does_not_move() {
        let bytes = sample_packet();
        let mut reader = PacketReader::new(&bytes);

        let result = reader.next_bool();

        assert_eq!(
            result,
            Err(DyBufError::FieldTypeMismatch {
                expected: FieldType::Bool,
                found: FieldType::Version,
            })
        );
        assert_eq!(reader.position(), 0);
        assert_eq!(reader.next_version().unwrap(), 7);
    }

    #[test]
    fn test_peek_type_reports_type_and_index() {
        let bytes = sample_packet();
        let mut reader = PacketReader::new(&bytes);
        reader.next_version().unwrap();
        reader.next_int().unwrap();

        assert_eq!(reader.peek_type().unwrap(), (FieldType::String, 1));
        assert_eq!(reader.peek_type().unwrap(), (FieldType::String, 1));
    }

    #[test]
    fn test_fields_collects_through_eof() {
        let bytes = sample_packet();
        let mut reader = PacketReader::new(&bytes);

        let fields = reader.fields().unwrap();

        assert_eq!(
            fields,
            vec![
                (0, Field::Version(7)),
                (0, Field::Int(-300)),
                (1, Field::String("héllo")),
                (2, Field::Bytes(&[0xDE, 0xAD])),
                (0, Field::Eof),
            ]
        );
    }

    #[test]
    fn test_fields_restores_cursor_on_truncated_packet() {
        let bytes = sample_packet();
        let truncated = &bytes[..bytes.len() - 1];
        let mut reader = PacketReader::new(truncated);
        reader.next_version().unwrap();
        let before = reader.position();

        assert!(reader.fields().is_err());
        assert_eq!(reader.position(), before);
    }

    #[test]
    fn test_unknown_type_code_is_rejected() {
        // (0xA, 0) is not a defined type.
        let bytes = [0x50];
        let mut reader = PacketReader::new(&bytes);
        assert_eq!(reader.peek_type(), Err(DyBufError::UnknownFieldType(0xA)));
        assert_eq!(reader.next_field().err(), Some(DyBufError::UnknownFieldType(0xA)));
    }

    #[test]
    fn test_reserved_container_is_unsupported() {
        // (Array, 0) followed by garbage.
        let bytes = [0x40, 0x01];
        let mut reader = PacketReader::new(&bytes);
        assert_eq!(reader.peek_type().unwrap(), (FieldType::Array, 0));
        assert_eq!(
            reader.next_field().err(),
            Some(DyBufError::UnsupportedFieldType(FieldType::Array))
        );
        assert_eq!(reader.position(), 0);
    }

    #[test]
    fn test_bad_utf8_string_leaves_cursor() {
        // (String, 0) len 3: C3 28 00
        let bytes = [0x30, 0x03, 0xC3, 0x28, 0x00];
        let mut reader = PacketReader::new(&bytes);
        assert!(matches!(reader.next_string(), Err(DyBufError::InvalidUtf8(_))));
        assert_eq!(reader.position(), 0);
    }

    #[test]
    fn test_cloned_reader_outlives_source() {
        let reader_bytes = sample_packet();
        let mut reader = PacketReader::cloned(&reader_bytes).unwrap();
        drop(reader_bytes);
        assert_eq!(reader.next_version().unwrap(), 7);
    }

    #[test]
    fn test_float_and_double_round_trip() {
        let mut writer = PacketWriter::new(0).unwrap();
        writer.append_float(4, 1.5).unwrap().append_double(5, -0.25).unwrap();
        let bytes = writer.finish().unwrap().to_vec();

        let mut reader = PacketReader::new(&bytes);
        assert_eq!(reader.next_float().unwrap(), (4, 1.5));
        assert_eq!(reader.next_double().unwrap(), (5, -0.25));
        reader.next_eof().unwrap();
    }
}
