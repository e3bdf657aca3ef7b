//! # Record Definition Macro
//!
//! [`record!`](crate::record) defines a deserializable record type: it
//! emits the struct with `#[repr(C)]` layout and derives the
//! [`Shaped`](crate::layout::Shaped) implementation describing that
//! layout, with field offsets taken from `offset_of!` so the descriptor
//! can never drift from the real struct.
//!
//! ## Usage
//!
//! ```
//! use contig::Slice;
//!
//! contig::record! {
//!     /// A measurement batch.
//!     #[derive(Debug)]
//!     pub struct Batch {
//!         pub id: u64,
//!         pub samples: Slice<f32>,
//!     }
//! }
//!
//! assert_eq!(std::mem::size_of::<Batch>(), 3 * std::mem::size_of::<usize>());
//! ```
//!
//! Fields may be any [`Shaped`](crate::layout::Shaped) type: scalars,
//! nested records, `[T; N]`, and [`Slice<T>`](crate::Slice).
//!
//! ## Payload packing caveat
//!
//! Dynamic-array payloads are packed on the wire with no padding between
//! blocks. An element type with alignment above one, placed after another
//! array whose payload size is not a multiple of that alignment, would
//! land misaligned; keep such arrays ordered coarsest-element-first (or
//! pad odd payloads at the schema level). This is a property of the
//! record schema, not of any particular input, and is asserted in debug
//! builds when the payload is bound.

/// Defines a `#[repr(C)]` record struct and its layout descriptor.
#[macro_export]
macro_rules! record {
    (
        $(#[$attr:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$field_attr:meta])*
                $field_vis:vis $field:ident : $field_ty:ty
            ),+ $(,)?
        }
    ) => {
        $(#[$attr])*
        #[repr(C)]
        $vis struct $name {
            $(
                $(#[$field_attr])*
                $field_vis $field: $field_ty,
            )+
        }

        // SAFETY: the struct is `#[repr(C)]`, the descriptor lists every
        // field in declared order with its `offset_of!` offset, and each
        // field type carries its own `Shaped` contract.
        unsafe impl $crate::layout::Shaped for $name {
            const SHAPE: $crate::layout::Shape = $crate::layout::Shape::record::<$name>(&[
                $(
                    $crate::layout::FieldShape {
                        name: ::core::stringify!($field),
                        offset: ::core::mem::offset_of!($name, $field),
                        shape: &<$field_ty as $crate::layout::Shaped>::SHAPE,
                    },
                )+
            ]);
        }
    };
}
