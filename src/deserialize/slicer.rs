//! # Binding Pass
//!
//! Second of the two deserialization passes. The buffer has been sized by
//! the measuring pass and split into two regions:
//!
//! ```text
//! +--------------------------------------+---------------------------+
//! | payload: image + wire payload bytes  | headers: branched-array   |
//! | [0 .. data_len)                      | element headers (extra)   |
//! +--------------------------------------+---------------------------+
//! ```
//!
//! This pass walks the shape tree in the same depth-first declared-field
//! order as the measuring pass and writes every slice header:
//!
//! - an ordinary dynamic array is bound to its packed payload in place —
//!   the header gets the address just past the length word;
//! - a branched dynamic array (header-only elements, absent from the
//!   wire) is handed freshly materialised element headers from the
//!   reserved tail region, bump-allocated strictly forward and, by
//!   construction of the measuring pass, consumed exactly.
//!
//! The stream was fully validated by the measuring pass, so this pass
//! performs no bounds checks of its own beyond debug assertions.

use std::ptr;

use crate::buffer::RecordBuffer;
use crate::layout::{Shape, ShapeKind};

use super::{Regions, WORD};

/// Type-erased image of a slice header; layout-compatible with
/// `Slice<T>` for every `T`.
#[repr(C)]
struct RawHeader {
    data: *mut u8,
    len: usize,
}

/// Binds every slice header reachable from the record at the start of
/// `buffer`.
///
/// # Safety
///
/// `regions` must come from a successful [`measure`] of the same `shape`
/// over `buffer[..regions.data_len]`'s current contents, and
/// `buffer.len()` must be at least `regions.total()`. Under that
/// contract every cursor advance below stays inside the buffer.
///
/// [`measure`]: super::measure::measure
pub(crate) unsafe fn bind(shape: &'static Shape, buffer: &mut RecordBuffer, regions: &Regions) {
    debug_assert!(buffer.len() >= regions.total());
    let headers = regions.headers_start();
    let mut pass = Bind {
        base: buffer.as_mut_ptr(),
        payload: shape.size,
        payload_end: regions.data_len,
        headers,
        headers_end: headers + regions.extra_len,
    };
    unsafe { pass.node(shape, 0) };
    debug_assert_eq!(pass.payload, pass.payload_end, "payload region not fully consumed");
    debug_assert_eq!(pass.headers, pass.headers_end, "header region not fully consumed");
}

struct Bind {
    base: *mut u8,
    /// Cursor into the payload region, in bytes from `base`.
    payload: usize,
    payload_end: usize,
    /// Bump cursor into the branched-header region.
    headers: usize,
    headers_end: usize,
}

impl Bind {
    /// Binds one value of `shape` whose image lives at byte offset `at`.
    ///
    /// # Safety
    ///
    /// `at .. at + shape.size` and both region cursors must lie inside
    /// the measured buffer (upheld by [`bind`]'s contract and the
    /// measuring pass's arithmetic).
    unsafe fn node(&mut self, shape: &'static Shape, at: usize) {
        if !shape.indirections {
            return;
        }
        match shape.kind {
            ShapeKind::Scalar => {}
            ShapeKind::Record { fields } => {
                for field in fields {
                    unsafe { self.node(field.shape, at + field.offset) };
                }
            }
            ShapeKind::Array { len, elem } => {
                for index in 0..len {
                    unsafe { self.node(elem, at + index * elem.size) };
                }
            }
            ShapeKind::Slice { elem } => unsafe { self.dyn_array(elem, at) },
        }
    }

    /// Binds one dynamic array whose header lives at offset `header_at`,
    /// then recurses into its elements.
    ///
    /// # Safety
    ///
    /// As for [`Bind::node`].
    unsafe fn dyn_array(&mut self, elem: &'static Shape, header_at: usize) {
        let len = unsafe { self.read_word() };
        let bytes = len * elem.size;

        let data = if elem.header_only {
            // Branched: element headers are not on the wire; hand them
            // out from the reserved region.
            let at = self.headers;
            self.headers += bytes;
            debug_assert!(self.headers <= self.headers_end);
            at
        } else {
            let at = self.payload;
            self.payload += bytes;
            debug_assert!(self.payload <= self.payload_end);
            at
        };
        debug_assert!(
            len == 0 || data % elem.align == 0,
            "payload for {} lands misaligned at offset {data}; reorder the record's arrays",
            elem.name,
        );
        unsafe { self.write_header(header_at, data, len) };

        if elem.indirections {
            for index in 0..len {
                unsafe { self.node(elem, data + index * elem.size) };
            }
        }
    }

    /// Reads the next length word from the payload cursor.
    ///
    /// # Safety
    ///
    /// The measuring pass verified a word is present here.
    unsafe fn read_word(&mut self) -> usize {
        debug_assert!(self.payload + WORD <= self.payload_end);
        // Length words can sit at any offset after an odd-sized payload.
        let word = unsafe { ptr::read_unaligned(self.base.add(self.payload).cast::<usize>()) };
        self.payload += WORD;
        word
    }

    /// Writes a slice header at offset `at` pointing at offset `data`.
    ///
    /// # Safety
    ///
    /// `at .. at + size_of::<RawHeader>()` must be inside the buffer.
    unsafe fn write_header(&mut self, at: usize, data: usize, len: usize) {
        let header = RawHeader {
            data: unsafe { self.base.add(data) },
            len,
        };
        // Headers inside packed element images may themselves sit at
        // unaligned offsets.
        unsafe { ptr::write_unaligned(self.base.add(at).cast::<RawHeader>(), header) };
    }
}
