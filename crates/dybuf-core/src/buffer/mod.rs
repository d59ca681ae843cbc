//! Ownership-aware byte buffer with a single read/write cursor.
//!
//! A [`DyBuf`] is a contiguous memory region plus a `position`.  Appends write
//! at `position` and advance it; reads return views at `position` and advance
//! it.  The valid extent is the whole backing region: the capacity of an
//! owned buffer, or the exact length of caller-supplied memory.
//!
//! ```text
//!  0                 position                     extent
//!  |-------written------|---------remainder----------|
//! ```
//!
//! Every fallible operation leaves `position` unchanged when it fails.

pub mod storage;

use tracing::trace;

use crate::error::{DyBufError, Result};
pub use storage::{Ownership, Storage};

/// Smallest capacity an owned buffer grows to.
const MIN_GROWTH: usize = 64;

/// Growable, ownership-tagged byte buffer.
///
/// # Examples
///
/// ```rust
/// use dybuf_core::DyBuf;
///
/// let mut buf = DyBuf::with_capacity(4).unwrap();
/// buf.append_bytes(b"hello world").unwrap(); // grows past the initial 4 bytes
/// assert_eq!(buf.snapshot_written(), b"hello world");
///
/// buf.clear();
/// assert_eq!(buf.position(), 0);
/// ```
#[derive(Debug)]
pub struct DyBuf<'a> {
    storage: Storage<'a>,
    position: usize,
    mark: usize,
}

impl DyBuf<'static> {
    /// Creates an owned, growable buffer with `capacity` zeroed bytes.
    ///
    /// # Errors
    ///
    /// Returns [`DyBufError::AllocationFailed`] if the allocator refuses.
    pub fn with_capacity(capacity: usize) -> Result<Self> {
        let data = storage::try_alloc_zeroed(capacity)?;
        Ok(Self::from_storage(Storage::Owned(data)))
    }

    /// Creates a fixed-extent buffer holding a private copy of `data`.
    ///
    /// # Errors
    ///
    /// Returns [`DyBufError::AllocationFailed`] if the allocator refuses.
    pub fn cloned_from(data: &[u8]) -> Result<Self> {
        let mut copy = storage::try_alloc_zeroed(data.len())?;
        copy.copy_from_slice(data);
        Ok(Self::from_storage(Storage::Cloned(copy.into_boxed_slice())))
    }

    /// Wraps memory the caller hands over; it is freed when the buffer drops.
    ///
    /// The extent is fixed at `data.len()`.
    pub fn adopted(data: Box<[u8]>) -> Self {
        Self::from_storage(Storage::Adopted(data))
    }
}

impl<'a> DyBuf<'a> {
    /// Wraps writable caller memory; the caller keeps ownership.
    ///
    /// Reads and writes are confined to `[0, data.len())` and the buffer never
    /// grows.
    pub fn borrowed(data: &'a mut [u8]) -> Self {
        Self::from_storage(Storage::Borrowed(data))
    }

    /// Wraps read-only caller memory for decoding.  Appends fail with
    /// [`DyBufError::ReadOnly`].
    pub fn view(data: &'a [u8]) -> Self {
        Self::from_storage(Storage::View(data))
    }

    fn from_storage(storage: Storage<'a>) -> Self {
        Self {
            storage,
            position: 0,
            mark: 0,
        }
    }

    // ── Cursor ────────────────────────────────────────────────────────────────

    /// Ownership mode chosen at construction.
    pub fn ownership(&self) -> Ownership {
        self.storage.ownership()
    }

    /// Current cursor position.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Total valid extent: capacity for owned buffers, fixed length otherwise.
    pub fn extent(&self) -> usize {
        self.storage.as_slice().len()
    }

    /// Bytes between the cursor and the end of the extent.
    pub fn remainder(&self) -> usize {
        self.extent() - self.position
    }

    /// Allocated bytes behind the buffer.  Only owned buffers can hold more
    /// than their extent.
    pub fn capacity(&self) -> usize {
        match &self.storage {
            Storage::Owned(data) => data.capacity(),
            other => other.as_slice().len(),
        }
    }

    /// Resets the cursor to 0 without touching storage or extent.
    pub fn clear(&mut self) {
        self.position = 0;
        self.mark = 0;
    }

    /// Moves the cursor back to 0 so written bytes can be read again.  The
    /// mark survives.
    pub fn rewind(&mut self) {
        self.position = 0;
    }

    /// Moves the cursor to `position`.
    ///
    /// # Errors
    ///
    /// Returns [`DyBufError::PositionOutOfBounds`] if `position > extent`.
    pub fn set_position(&mut self, position: usize) -> Result<()> {
        let extent = self.extent();
        if position > extent {
            return Err(DyBufError::PositionOutOfBounds { position, extent });
        }
        self.position = position;
        if self.mark > position {
            self.mark = position;
        }
        Ok(())
    }

    /// Remembers the current position for a later [`DyBuf::reset`].
    pub fn mark(&mut self) {
        self.mark = self.position;
    }

    /// Returns the cursor to the last [`DyBuf::mark`] (0 if never marked).
    pub fn reset(&mut self) {
        self.position = self.mark;
    }

    // ── Writing ───────────────────────────────────────────────────────────────

    /// Makes room for `needed` bytes at the cursor, growing owned storage.
    ///
    /// # Errors
    ///
    /// [`DyBufError::ReadOnly`] for views, [`DyBufError::CapacityExhausted`]
    /// for fixed-extent buffers, [`DyBufError::AllocationFailed`] if growth
    /// fails.  Nothing is modified on error.
    pub fn reserve(&mut self, needed: usize) -> Result<()> {
        let remainder = self.remainder();
        let required = self
            .position
            .checked_add(needed)
            .ok_or(DyBufError::AllocationFailed { requested: usize::MAX })?;

        match &mut self.storage {
            Storage::View(_) => Err(DyBufError::ReadOnly),
            _ if needed <= remainder => Ok(()),
            Storage::Owned(data) => {
                let new_len = required.saturating_mul(2).max(MIN_GROWTH);
                data.try_reserve_exact(new_len - data.len())
                    .map_err(|_| DyBufError::AllocationFailed { requested: new_len })?;
                trace!(from = data.len(), to = new_len, "growing owned buffer");
                data.resize(new_len, 0);
                Ok(())
            }
            _ => Err(DyBufError::CapacityExhausted { needed, remainder }),
        }
    }

    /// Reserves `len` bytes, advances the cursor past them and returns the
    /// slot so the caller can fill it in place.
    pub(crate) fn write_slot(&mut self, len: usize) -> Result<&mut [u8]> {
        self.reserve(len)?;
        let start = self.position;
        let data = self.storage.as_mut_slice()?;
        self.position += len;
        Ok(&mut data[start..start + len])
    }

    /// Copies `bytes` at the cursor and advances past them.
    ///
    /// # Errors
    ///
    /// See [`DyBuf::reserve`].
    pub fn append_bytes(&mut self, bytes: &[u8]) -> Result<&mut Self> {
        self.write_slot(bytes.len())?.copy_from_slice(bytes);
        Ok(self)
    }

    // ── Reading ───────────────────────────────────────────────────────────────

    /// Everything from the cursor to the end of the extent, without advancing.
    pub fn unread(&self) -> &[u8] {
        &self.storage.as_slice()[self.position..]
    }

    /// Returns a view of the next `n` bytes without advancing.
    ///
    /// # Errors
    ///
    /// Returns [`DyBufError::UnexpectedEnd`] if `n > remainder`.
    pub fn peek_bytes(&self, n: usize) -> Result<&[u8]> {
        let unread = self.unread();
        unread.get(..n).ok_or(DyBufError::UnexpectedEnd {
            needed: n,
            remainder: unread.len(),
        })
    }

    /// Returns a view of the next `n` bytes and advances past them.
    ///
    /// The view borrows the buffer, so it cannot be held across an append.
    ///
    /// # Errors
    ///
    /// Returns [`DyBufError::UnexpectedEnd`] if `n > remainder`.
    pub fn read_bytes(&mut self, n: usize) -> Result<&[u8]> {
        let start = self.position;
        self.advance(n)?;
        Ok(&self.storage.as_slice()[start..start + n])
    }

    /// Returns everything from the cursor to the extent and advances to the end.
    pub fn read_remaining(&mut self) -> &[u8] {
        let start = self.position;
        self.position = self.extent();
        &self.storage.as_slice()[start..]
    }

    /// Moves the cursor forward by `n` bytes without looking at them.
    pub(crate) fn advance(&mut self, n: usize) -> Result<()> {
        let remainder = self.remainder();
        if n > remainder {
            return Err(DyBufError::UnexpectedEnd { needed: n, remainder });
        }
        self.position += n;
        Ok(())
    }

    /// Bytes `[0, position)`: everything appended since the last clear.
    pub fn snapshot_written(&self) -> &[u8] {
        &self.storage.as_slice()[..self.position]
    }

    /// Consumes the buffer and returns one whose extent is the written prefix,
    /// with the cursor at 0.  Use this before handing an owned buffer to a
    /// reader, since the unwritten capacity of owned storage is zero-filled
    /// and would otherwise be read as data.
    pub fn into_written(self) -> DyBuf<'a> {
        let written = self.position;
        let storage = match self.storage {
            Storage::Owned(mut data) => {
                data.truncate(written);
                Storage::Owned(data)
            }
            Storage::Cloned(data) => Storage::Cloned(truncate_boxed(data, written)),
            Storage::Adopted(data) => Storage::Adopted(truncate_boxed(data, written)),
            Storage::Borrowed(data) => Storage::Borrowed(&mut data[..written]),
            Storage::View(data) => Storage::View(&data[..written]),
        };
        Self::from_storage(storage)
    }

    /// Consumes the buffer and returns the written prefix as a vector.
    ///
    /// Owned storage is truncated in place; other modes copy.
    pub fn into_vec(self) -> Vec<u8> {
        match self.storage {
            Storage::Owned(mut data) => {
                data.truncate(self.position);
                data
            }
            other => other.as_slice()[..self.position].to_vec(),
        }
    }
}

fn truncate_boxed(data: Box<[u8]>, len: usize) -> Box<[u8]> {
    let mut data = data.into_vec();
    data.truncate(len);
    data.into_boxed_slice()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
