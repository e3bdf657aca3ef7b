#![feature(const_type_name)]
//! # contig - Contiguous Record Buffer Deserialization
//!
//! `contig` reconstructs statically-typed records — scalars, nested
//! records, static arrays, dynamic arrays, arrays of arrays — from a
//! single flat byte buffer, and keeps them flat: after deserialization
//! the record and every byte transitively reachable from it live inside
//! one backing allocation, with every dynamic array represented as a
//! two-word header pointing back into that same allocation. No per-field
//! heap allocation ever happens; only the outer buffer may grow, at most
//! once per call.
//!
//! ## Wire format
//!
//! For a record type `T`, the serialized bytes are:
//!
//! ```text
//! +----------------------+----------------------------------------------+
//! | T's in-memory image  | per dynamic array, depth-first field order:  |
//! | (sizeof(T) bytes,    |   <length: machine word> <packed elements>   |
//! | headers garbage)     |   (element sub-arrays follow recursively)    |
//! +----------------------+----------------------------------------------+
//! ```
//!
//! Slice headers inside the image are present but meaningless on the
//! wire; only the length words carried in the stream matter. One
//! exception shapes the whole design: when a dynamic array's elements
//! are themselves nothing but slice headers (an array of dynamic arrays,
//! or of records composed solely of them), those element images are
//! *omitted* from the wire — there would be nothing real to store. These
//! *branched arrays* get their element headers materialised in a
//! reserved region at the tail of the buffer instead.
//!
//! ## Two passes
//!
//! ```text
//! input bytes ──► measure ──► (data_len, extra_len)
//!      │                            │
//!      ▼                            ▼
//!   size the buffer to data_len (+ aligned extra_len)
//!      │
//!      ▼
//!   bind: walk the payload, write every slice header, hand branched
//!   arrays their element headers from the reserved tail region
//!      │
//!      ▼
//!   Contiguous<T>
//! ```
//!
//! The measuring pass validates every length word and element block
//! against the input, so the binding pass runs unchecked. The format is
//! host-native — layout, padding and endianness match the peer that
//! serialized the record — and a single [`DeserializationError`] kind
//! rejects truncated or over-limit input.
//!
//! ## Quick start
//!
//! ```
//! use contig::{RecordBuffer, Slice};
//!
//! contig::record! {
//!     #[derive(Debug)]
//!     pub struct Points {
//!         pub tag: u32,
//!         pub xs: Slice<i32>,
//!     }
//! }
//!
//! // Wire image: the record image, then each dynamic array as
//! // <length word><packed elements>.
//! let mut wire = vec![0u8; std::mem::size_of::<Points>()];
//! wire[..4].copy_from_slice(&7u32.to_ne_bytes());
//! wire.extend_from_slice(&3usize.to_ne_bytes());
//! for x in [1i32, 2, 3] {
//!     wire.extend_from_slice(&x.to_ne_bytes());
//! }
//!
//! let points = contig::deserialize_in_place::<Points>(RecordBuffer::from_bytes(&wire))?;
//! assert_eq!(points.view().tag, 7);
//! assert_eq!(&points.view().xs[..], &[1, 2, 3]);
//! # Ok::<(), contig::DeserializationError>(())
//! ```
//!
//! ## Module overview
//!
//! - [`layout`]: static type descriptors ([`Shape`], [`Shaped`],
//!   [`Slice`]) and the [`record!`] macro
//! - [`buffer`]: the aligned, growable backing allocation
//! - [`deserialize`]: the measuring and binding passes and the public
//!   entry points
//! - [`contiguous`]: the owning record handle
//! - [`error`]: the one rejection kind
//!
//! ## Scope
//!
//! The matching serializer, schema evolution, endianness conversion and
//! cross-layout interop are out of scope: the format round-trips between
//! peers of identical layout. Malformed input is rejected; it is not
//! authenticated.

#[macro_use]
mod macros;

pub mod buffer;
pub mod contiguous;
pub mod deserialize;
pub mod error;
pub mod layout;

pub use buffer::RecordBuffer;
pub use contiguous::Contiguous;
pub use deserialize::{
    Deserializer, Limits, Regions, deserialize_copy, deserialize_in_place, required_size,
};
pub use error::DeserializationError;
pub use layout::{FieldShape, Shape, ShapeKind, Shaped, Slice};
