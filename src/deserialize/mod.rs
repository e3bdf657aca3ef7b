//! # Deserialization Entry Points
//!
//! Reconstructing a record from its wire bytes is two passes over the
//! same shape tree:
//!
//! ```text
//! input bytes ──► measure ──► Regions { data_len, extra_len }
//!      │                            │
//!      ▼                            ▼
//! size the buffer to Regions::total()   (grow in place, or copy into
//!      │                                 a destination of that size)
//!      ▼
//! bind over buffer[0 .. data_len], materialising branched-array
//! headers from buffer[headers_start() ..]
//!      │
//!      ▼
//! Contiguous<T>
//! ```
//!
//! [`Deserializer`] carries the configuration (currently the
//! dynamic-array length ceiling) and offers the two façades of the
//! module: [`Deserializer::in_place`], which consumes and grows the
//! caller's buffer, and [`Deserializer::copy_into`], which leaves the
//! input untouched and reuses a caller-owned destination handle. The
//! free functions [`required_size`], [`deserialize_in_place`] and
//! [`deserialize_copy`] use the default configuration.
//!
//! ## Failure
//!
//! The input is fully validated by the measuring pass before a single
//! output byte is written, so on error the destination of `copy_into` is
//! left exactly as it was.

mod measure;
mod slicer;

use crate::buffer::{BUFFER_ALIGN, RecordBuffer};
use crate::contiguous::Contiguous;
use crate::error::DeserializationError;
use crate::layout::{Shape, Shaped, Slice};

/// Wire size of a dynamic-array length, one machine word.
pub(crate) const WORD: usize = size_of::<usize>();

/// Alignment required for materialised slice headers.
const HEADER_ALIGN: usize = align_of::<Slice<u8>>();

/// Sizes of the two regions of a deserialized buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Regions {
    /// Bytes of in-stream payload: record image, length words, inline
    /// element blocks.
    pub data_len: usize,
    /// Bytes of branched-array element headers materialised after the
    /// payload.
    pub extra_len: usize,
}

impl Regions {
    /// Total buffer length after deserialization.
    ///
    /// When branched headers are present the header region starts at
    /// [`data_len`](Self::data_len) rounded up to header alignment;
    /// without them the total is exactly `data_len`.
    pub fn total(&self) -> usize {
        self.headers_start() + self.extra_len
    }

    /// Byte offset where the branched-header region begins.
    pub(crate) fn headers_start(&self) -> usize {
        if self.extra_len == 0 {
            self.data_len
        } else {
            self.data_len.next_multiple_of(HEADER_ALIGN)
        }
    }
}

/// Hard ceilings applied while measuring untrusted input.
#[derive(Clone, Copy, Debug)]
pub struct Limits {
    /// Maximum element count any single dynamic array may declare.
    pub max_array_len: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_array_len: usize::MAX,
        }
    }
}

/// Configurable deserializer for contiguous record buffers.
///
/// ```
/// use contig::{Deserializer, RecordBuffer, Slice};
///
/// contig::record! {
///     struct Message {
///         code: u16,
///         body: Slice<u8>,
///     }
/// }
///
/// let mut wire = vec![0u8; std::mem::size_of::<Message>()];
/// wire[..2].copy_from_slice(&7u16.to_ne_bytes());
/// wire.extend_from_slice(&2usize.to_ne_bytes());
/// wire.extend_from_slice(&[0xAA, 0xBB]);
///
/// let deserializer = Deserializer::new().max_array_len(1 << 20);
/// let message = deserializer.in_place::<Message>(RecordBuffer::from_bytes(&wire))?;
/// assert_eq!(message.view().code, 7);
/// assert_eq!(&message.view().body[..], &[0xAA, 0xBB]);
/// # Ok::<(), contig::DeserializationError>(())
/// ```
#[derive(Clone, Debug, Default)]
pub struct Deserializer {
    limits: Limits,
}

impl Deserializer {
    /// A deserializer with default limits (no length ceiling).
    pub fn new() -> Self {
        Self::default()
    }

    /// Caps the element count any single dynamic array may declare.
    /// Exceeding it fails deserialization with
    /// [`DeserializationError::LengthOverLimit`].
    pub fn max_array_len(mut self, limit: usize) -> Self {
        self.limits.max_array_len = limit;
        self
    }

    /// Runs the measuring pass alone, returning both region sizes.
    pub fn measure<T: Shaped>(&self, input: &[u8]) -> Result<Regions, DeserializationError> {
        measure::measure(Shape::of::<T>(), input, &self.limits)
    }

    /// Bytes of buffer a successful deserialization of `input` ends up
    /// with.
    pub fn required_size<T: Shaped>(&self, input: &[u8]) -> Result<usize, DeserializationError> {
        Ok(self.measure::<T>(input)?.total())
    }

    /// Deserializes the record serialized in `buffer`, in place.
    ///
    /// The buffer is grown (once) when the branched-header region needs
    /// room beyond its current length, and truncated to the exact total
    /// otherwise; its storage is never copied, so the returned handle
    /// wraps the very same allocation.
    pub fn in_place<T: Shaped>(
        &self,
        mut buffer: RecordBuffer,
    ) -> Result<Contiguous<T>, DeserializationError> {
        const { assert!(align_of::<T>() <= BUFFER_ALIGN) };
        let regions = self.measure::<T>(buffer.as_slice())?;
        buffer.resize(regions.total());
        // SAFETY: `buffer` was measured as `T` just above (resizing never
        // moves or alters the first `data_len` bytes) and now spans the
        // full region total.
        unsafe { slicer::bind(Shape::of::<T>(), &mut buffer, &regions) };
        Ok(Contiguous::from_buffer(buffer))
    }

    /// Deserializes the record serialized in `input` into `destination`,
    /// leaving `input` untouched.
    ///
    /// The destination's existing allocation is reused without
    /// re-zeroing when large enough; bytes past the copied payload are
    /// zero-filled. On error the destination is left unchanged.
    pub fn copy_into<T: Shaped>(
        &self,
        input: &[u8],
        destination: &mut Contiguous<T>,
    ) -> Result<(), DeserializationError> {
        const { assert!(align_of::<T>() <= BUFFER_ALIGN) };
        let regions = self.measure::<T>(input)?;
        let total = regions.total();
        let buffer = destination.buffer_mut();
        buffer.copy_from(&input[..input.len().min(total)]);
        buffer.grow(total);
        // SAFETY: the copied prefix contains the measured payload and the
        // buffer now spans the full region total.
        unsafe { slicer::bind(Shape::of::<T>(), buffer, &regions) };
        Ok(())
    }
}

/// Bytes of buffer a successful deserialization of `input` ends up with,
/// under default limits.
pub fn required_size<T: Shaped>(input: &[u8]) -> Result<usize, DeserializationError> {
    Deserializer::new().required_size::<T>(input)
}

/// Deserializes the record serialized in `buffer` in place, under
/// default limits. See [`Deserializer::in_place`].
pub fn deserialize_in_place<T: Shaped>(
    buffer: RecordBuffer,
) -> Result<Contiguous<T>, DeserializationError> {
    Deserializer::new().in_place(buffer)
}

/// Deserializes the record serialized in `input` into `destination`,
/// under default limits. See [`Deserializer::copy_into`].
pub fn deserialize_copy<T: Shaped>(
    input: &[u8],
    destination: &mut Contiguous<T>,
) -> Result<(), DeserializationError> {
    Deserializer::new().copy_into(input, destination)
}
