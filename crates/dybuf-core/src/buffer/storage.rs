//! Backing storage for [`super::DyBuf`].
//!
//! # Why an enum instead of an ownership flag? (for beginners)
//!
//! A raw buffer API usually carries a pointer plus a boolean saying "free this on
//! release".  Forgetting to honour the flag leaks memory; honouring it twice
//! crashes.  Here each ownership mode is its own variant, so what happens on
//! teardown is decided by the type of the data held:
//!
//! - `Vec<u8>` and `Box<[u8]>` are freed when the buffer is dropped.
//! - `&mut [u8]` and `&[u8]` belong to the caller and are never freed here;
//!   the lifetime `'a` guarantees the memory outlives the buffer.

use crate::error::{DyBufError, Result};

/// Memory region behind a buffer, tagged by who owns it.
#[derive(Debug)]
pub enum Storage<'a> {
    /// Allocated by the buffer; grows on demand.
    Owned(Vec<u8>),
    /// Allocated by the buffer and filled from caller bytes; fixed extent.
    Cloned(Box<[u8]>),
    /// Caller memory handed over to the buffer, freed on drop; fixed extent.
    Adopted(Box<[u8]>),
    /// Caller memory, writable, never freed by the buffer; fixed extent.
    Borrowed(&'a mut [u8]),
    /// Caller memory, read-only, never freed by the buffer.
    View(&'a [u8]),
}

/// Ownership mode reported by [`super::DyBuf::ownership`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ownership {
    Owned,
    Cloned,
    Adopted,
    Borrowed,
    View,
}

impl Ownership {
    /// Returns `true` if dropping the buffer frees the backing memory.
    pub fn frees_on_drop(self) -> bool {
        matches!(self, Ownership::Owned | Ownership::Cloned | Ownership::Adopted)
    }

    /// Returns `true` if appends may reallocate the backing memory.
    pub fn is_growable(self) -> bool {
        matches!(self, Ownership::Owned)
    }
}

impl<'a> Storage<'a> {
    pub(crate) fn ownership(&self) -> Ownership {
        match self {
            Storage::Owned(_) => Ownership::Owned,
            Storage::Cloned(_) => Ownership::Cloned,
            Storage::Adopted(_) => Ownership::Adopted,
            Storage::Borrowed(_) => Ownership::Borrowed,
            Storage::View(_) => Ownership::View,
        }
    }

    pub(crate) fn as_slice(&self) -> &[u8] {
        match self {
            Storage::Owned(v) => v,
            Storage::Cloned(b) | Storage::Adopted(b) => b,
            Storage::Borrowed(s) => s,
            Storage::View(s) => s,
        }
    }

    pub(crate) fn as_mut_slice(&mut self) -> Result<&mut [u8]> {
        match self {
            Storage::Owned(v) => Ok(v),
            Storage::Cloned(b) | Storage::Adopted(b) => Ok(b),
            Storage::Borrowed(s) => Ok(s),
            Storage::View(_) => Err(DyBufError::ReadOnly),
        }
    }
}

/// Allocates a zero-filled vector of exactly `len` bytes, reporting failure
/// instead of aborting the process.
pub(crate) fn try_alloc_zeroed(len: usize) -> Result<Vec<u8>> {
    let mut v = Vec::new();
    v.try_reserve_exact(len)
        .map_err(|_| DyBufError::AllocationFailed { requested: len })?;
    v.resize(len, 0);
    Ok(v)
}
