//! # Contiguous Record Handle
//!
//! `Contiguous<T>` pairs a [`RecordBuffer`] with the record type living
//! at its start. The handle owns the buffer; the typed view borrows the
//! handle, so every slice reachable from the view is pinned for exactly
//! as long as the borrow lasts. Moving the handle moves only the `Vec`
//! header, never the heap block, so the in-buffer slice headers stay
//! valid for the handle's whole life.
//!
//! A handle is either *empty* (fresh destination for the copy path) or
//! holds a deserialized record. Scalar fields of a held record may be
//! mutated freely through [`view_mut`](Contiguous::view_mut); resizing
//! any reachable array is impossible by construction.

use std::fmt;
use std::marker::PhantomData;

use crate::buffer::RecordBuffer;
use crate::layout::Shaped;

/// An owned buffer holding a deserialized record and everything it
/// references.
pub struct Contiguous<T: Shaped> {
    buffer: RecordBuffer,
    _record: PhantomData<T>,
}

impl<T: Shaped> Contiguous<T> {
    /// An empty handle, ready to be a copy-deserialization destination.
    pub const fn empty() -> Self {
        Self {
            buffer: RecordBuffer::new(),
            _record: PhantomData,
        }
    }

    /// An empty handle whose buffer can hold `bytes` without
    /// reallocating.
    pub fn with_capacity(bytes: usize) -> Self {
        Self {
            buffer: RecordBuffer::with_capacity(bytes),
            _record: PhantomData,
        }
    }

    pub(crate) fn from_buffer(buffer: RecordBuffer) -> Self {
        Self {
            buffer,
            _record: PhantomData,
        }
    }

    /// The deserialized record.
    ///
    /// # Panics
    ///
    /// Panics if no record has been deserialized into this handle.
    pub fn view(&self) -> &T {
        assert!(
            self.buffer.len() >= size_of::<T>(),
            "no record has been deserialized into this handle",
        );
        debug_assert_eq!(self.buffer.as_ptr() as usize % align_of::<T>(), 0);
        // SAFETY: a buffer at least `size_of::<T>()` long only ever comes
        // from a successful deserialization, which validated the image
        // and bound every reachable slice header into this same buffer.
        // The buffer base is aligned for `T` (checked above).
        unsafe { &*self.buffer.as_ptr().cast::<T>() }
    }

    /// The deserialized record, mutably.
    ///
    /// # Panics
    ///
    /// Panics if no record has been deserialized into this handle.
    pub fn view_mut(&mut self) -> &mut T {
        assert!(
            self.buffer.len() >= size_of::<T>(),
            "no record has been deserialized into this handle",
        );
        debug_assert_eq!(self.buffer.as_ptr() as usize % align_of::<T>(), 0);
        // SAFETY: as in `view`; exclusivity comes from `&mut self`.
        unsafe { &mut *self.buffer.as_mut_ptr().cast::<T>() }
    }

    /// The backing bytes: payload region followed by the branched-header
    /// region.
    pub fn as_bytes(&self) -> &[u8] {
        self.buffer.as_slice()
    }

    /// The backing buffer.
    pub fn buffer(&self) -> &RecordBuffer {
        &self.buffer
    }

    pub(crate) fn buffer_mut(&mut self) -> &mut RecordBuffer {
        &mut self.buffer
    }

    /// Consumes the handle, returning the backing buffer — for example
    /// to deserialize it in place again.
    pub fn into_buffer(self) -> RecordBuffer {
        self.buffer
    }
}

impl<T: Shaped> Default for Contiguous<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T: Shaped> fmt::Debug for Contiguous<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Contiguous")
            .field("record", &crate::layout::Shape::of::<T>().name)
            .field("bytes", &self.buffer.len())
            .finish()
    }
}
