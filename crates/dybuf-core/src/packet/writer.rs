//! Packet encoder (the open-for-write state).

use tracing::debug;

use crate::buffer::DyBuf;
use crate::error::{DyBufError, Result};
use crate::packet::field::{Field, FieldType};
use crate::packet::PacketReader;

/// Appends `(tag, value)` records to a buffer.
///
/// Each `append_*` call writes one complete field or nothing at all: if the
/// value cannot be written the tag is rolled back too.
///
/// Writing `Eof` (directly or through [`PacketWriter::finish`]) closes the
/// packet.  Later appends fail with [`DyBufError::PacketFinished`] until
/// [`PacketWriter::clear`] starts a new one.
///
/// # Examples
///
/// ```rust
/// use dybuf_core::packet::{PacketReader, PacketWriter};
///
/// let mut writer = PacketWriter::new(32).unwrap();
/// writer.append_version(1).unwrap().append_string(0, "hello").unwrap();
/// let bytes = writer.finish().unwrap().to_vec();
///
/// let mut reader = PacketReader::new(&bytes);
/// assert_eq!(reader.next_version().unwrap(), 1);
/// assert_eq!(reader.next_string().unwrap(), (0, "hello"));
/// reader.next_eof().unwrap();
/// ```
#[derive(Debug)]
pub struct PacketWriter<'a> {
    buf: DyBuf<'a>,
    fields: usize,
    finished: bool,
}

impl PacketWriter<'static> {
    /// Opens a packet in a new owned, growable buffer.
    pub fn new(capacity: usize) -> Result<Self> {
        Ok(Self::from_buf(DyBuf::with_capacity(capacity)?))
    }
}

impl<'a> PacketWriter<'a> {
    /// Opens a packet over caller memory.  The packet cannot outgrow `data`.
    pub fn borrowed(data: &'a mut [u8]) -> Self {
        Self::from_buf(DyBuf::borrowed(data))
    }

    /// Opens a packet at the cursor of an existing buffer.
    pub fn from_buf(buf: DyBuf<'a>) -> Self {
        debug!(ownership = ?buf.ownership(), position = buf.position(), "packet opened for write");
        Self {
            buf,
            fields: 0,
            finished: false,
        }
    }

    /// Number of fields appended so far, `Eof` included.
    pub fn field_count(&self) -> usize {
        self.fields
    }

    /// Returns `true` once `Eof` has been written.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Bytes written so far.
    pub fn bytes(&self) -> &[u8] {
        self.buf.snapshot_written()
    }

    /// Discards everything written and starts a new packet in the same storage.
    pub fn clear(&mut self) {
        self.buf.clear();
        self.fields = 0;
        self.finished = false;
    }

    /// Returns the underlying buffer.
    pub fn into_inner(self) -> DyBuf<'a> {
        self.buf
    }

    /// Hands the written bytes to a reader, positioned at the start.
    pub fn into_reader(self) -> PacketReader<'a> {
        PacketReader::from_buf(self.buf.into_written())
    }

    // ── Fields ────────────────────────────────────────────────────────────────

    /// Writes the version marker: tag `(Version, 0)` then `version` as a varint.
    pub fn append_version(&mut self, version: u64) -> Result<&mut Self> {
        self.field(FieldType::Version, 0, |buf| {
            buf.append_var_u64(version)?;
            Ok(())
        })
    }

    pub fn append_bool(&mut self, index: u32, value: bool) -> Result<&mut Self> {
        self.field(FieldType::Bool, index, |buf| {
            buf.append_bool(value)?;
            Ok(())
        })
    }

    /// Signed integers are written as zigzag varints.
    pub fn append_int(&mut self, index: u32, value: i64) -> Result<&mut Self> {
        self.field(FieldType::Int, index, |buf| {
            buf.append_var_i64(value)?;
            Ok(())
        })
    }

    pub fn append_uint(&mut self, index: u32, value: u64) -> Result<&mut Self> {
        self.field(FieldType::Uint, index, |buf| {
            buf.append_var_u64(value)?;
            Ok(())
        })
    }

    pub fn append_float(&mut self, index: u32, value: f32) -> Result<&mut Self> {
        self.field(FieldType::Float, index, |buf| {
            buf.append_f32(value)?;
            Ok(())
        })
    }

    pub fn append_double(&mut self, index: u32, value: f64) -> Result<&mut Self> {
        self.field(FieldType::Double, index, |buf| {
            buf.append_f64(value)?;
            Ok(())
        })
    }

    pub fn append_string(&mut self, index: u32, value: &str) -> Result<&mut Self> {
        self.field(FieldType::String, index, |buf| {
            buf.append_str_with_len(value)?;
            Ok(())
        })
    }

    pub fn append_bytes(&mut self, index: u32, value: &[u8]) -> Result<&mut Self> {
        self.field(FieldType::Bytes, index, |buf| {
            buf.append_bytes_with_len(value)?;
            Ok(())
        })
    }

    /// Writes the end-of-packet marker.
    pub fn append_eof(&mut self) -> Result<&mut Self> {
        self.field(FieldType::Eof, 0, |_| Ok(()))
    }

    /// Writes any decoded [`Field`], so a packet can be re-encoded from what a
    /// [`super::PacketReader`] produced.  `Version` and `Eof` ignore `index`.
    pub fn append_field(&mut self, index: u32, field: Field<'_>) -> Result<&mut Self> {
        match field {
            Field::Eof => self.append_eof(),
            Field::Version(v) => self.append_version(v),
            Field::Bool(v) => self.append_bool(index, v),
            Field::Int(v) => self.append_int(index, v),
            Field::Uint(v) => self.append_uint(index, v),
            Field::Float(v) => self.append_float(index, v),
            Field::Double(v) => self.append_double(index, v),
            Field::String(v) => self.append_string(index, v),
            Field::Bytes(v) => self.append_bytes(index, v),
        }
    }

    /// Appends `Eof` and returns the finished packet.
    ///
    /// # Errors
    ///
    /// [`DyBufError::PacketFinished`] if the packet was already finished.
    pub fn finish(&mut self) -> Result<&[u8]> {
        self.append_eof()?;
        debug!(fields = self.fields, bytes = self.buf.position(), "packet finished");
        Ok(self.buf.snapshot_written())
    }

    fn field<F>(&mut self, field_type: FieldType, index: u32, write_value: F) -> Result<&mut Self>
    where
        F: FnOnce(&mut DyBuf<'a>) -> Result<()>,
    {
        if self.finished {
            return Err(DyBufError::PacketFinished);
        }
        let start = self.buf.position();
        let tagged = self.buf.append_typdex(field_type as u8, index).map(|_| ());
        if let Err(err) = tagged.and_then(|()| write_value(&mut self.buf)) {
            self.buf.set_position(start)?;
            return Err(err);
        }
        self.fields += 1;
        self.finished = field_type == FieldType::Eof;
        Ok(self)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
