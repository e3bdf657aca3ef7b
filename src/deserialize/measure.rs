//! # Measuring Pass
//!
//! First of the two deserialization passes: a read-only, type-driven walk
//! of the input that computes the two region sizes the buffer must hold.
//!
//! - `data_len` — bytes of in-stream payload: the record image plus every
//!   length word and inline element block, in depth-first declared-field
//!   order.
//! - `extra_len` — bytes of branched-array element headers that are *not*
//!   on the wire and must be materialised after the payload.
//!
//! Every length word and element block is bounds-checked against the
//! input before it is consumed, so the binding pass that follows can
//! trust the stream completely. Arithmetic on wire-supplied lengths is
//! saturating: an absurd length inflates the requirement to the point
//! where the input-length predicate rejects it, instead of wrapping.

use crate::error::{DeserializationError, check_input_len, check_length_limit};
use crate::layout::{Shape, ShapeKind};

use super::{Limits, Regions, WORD};

/// Computes the region sizes for one value of `shape` serialized in
/// `input`.
pub(crate) fn measure(
    shape: &'static Shape,
    input: &[u8],
    limits: &Limits,
) -> Result<Regions, DeserializationError> {
    check_input_len(shape.name, input.len(), shape.size)?;
    let mut pass = Measure {
        input,
        limits,
        extra: 0,
    };
    let data_len = pass.node(shape, shape.size)?;
    Ok(Regions {
        data_len,
        extra_len: pass.extra,
    })
}

struct Measure<'a> {
    input: &'a [u8],
    limits: &'a Limits,
    /// Accumulated branched-header bytes.
    extra: usize,
}

impl Measure<'_> {
    /// Sizes one value of `shape` whose image is already accounted for,
    /// consuming its dynamic-array payloads from `pos`. Returns the
    /// cursor past everything the value owns.
    fn node(&mut self, shape: &'static Shape, pos: usize) -> Result<usize, DeserializationError> {
        if !shape.indirections {
            return Ok(pos);
        }
        match shape.kind {
            ShapeKind::Scalar => Ok(pos),
            ShapeKind::Record { fields } => {
                let mut pos = pos;
                for field in fields {
                    pos = self.node(field.shape, pos)?;
                }
                Ok(pos)
            }
            ShapeKind::Array { len, elem } => {
                let mut pos = pos;
                for _ in 0..len {
                    pos = self.node(elem, pos)?;
                }
                Ok(pos)
            }
            ShapeKind::Slice { elem } => self.dyn_array(shape, elem, pos),
        }
    }

    /// Sizes one dynamic array: its length word, its inline payload (for
    /// ordinary elements) or its header-region claim (for branched
    /// elements), and recursively whatever its elements own.
    fn dyn_array(
        &mut self,
        header: &'static Shape,
        elem: &'static Shape,
        pos: usize,
    ) -> Result<usize, DeserializationError> {
        check_input_len(header.name, self.input.len(), pos.saturating_add(WORD))?;
        let len = self.read_word(pos);
        check_length_limit(header.name, len, self.limits.max_array_len)?;
        let mut pos = pos + WORD;

        if elem.header_only {
            // Branched: the element headers are absent from the wire and
            // claim space in the reserved region after the payload.
            self.extra = self.extra.saturating_add(len.saturating_mul(elem.size));
        } else {
            let bytes = len.saturating_mul(elem.size);
            check_input_len(header.name, self.input.len(), pos.saturating_add(bytes))?;
            pos += bytes;
        }

        if elem.indirections {
            for _ in 0..len {
                pos = self.node(elem, pos)?;
            }
        }
        Ok(pos)
    }

    fn read_word(&self, pos: usize) -> usize {
        let mut word = [0u8; WORD];
        word.copy_from_slice(&self.input[pos..pos + WORD]);
        usize::from_ne_bytes(word)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::Slice;

    fn measure_default(shape: &'static Shape, input: &[u8]) -> Result<Regions, DeserializationError> {
        measure(shape, input, &Limits::default())
    }

    fn push_word(wire: &mut Vec<u8>, value: usize) {
        wire.extend_from_slice(&value.to_ne_bytes());
    }

    crate::record! {
        struct Flat {
            a: i32,
            b: i32,
        }
    }

    crate::record! {
        struct Ints {
            xs: Slice<i32>,
        }
    }

    crate::record! {
        struct Matrix {
            m: Slice<Slice<i32>>,
        }
    }

    #[test]
    fn flat_record_is_just_its_image() {
        let regions = measure_default(Shape::of::<Flat>(), &[0u8; 8]).unwrap();
        assert_eq!(regions, Regions { data_len: 8, extra_len: 0 });
        assert_eq!(regions.total(), 8);
    }

    #[test]
    fn image_shorter_than_the_record_is_rejected() {
        let err = measure_default(Shape::of::<Flat>(), &[0u8; 7]).unwrap_err();
        assert_eq!(
            err,
            DeserializationError::InputTooShort {
                type_name: Shape::of::<Flat>().name,
                actual: 7,
                required: 8,
            }
        );
    }

    #[test]
    fn dynamic_array_counts_length_word_and_payload() {
        let mut wire = vec![0u8; size_of::<Ints>()];
        push_word(&mut wire, 3);
        for x in [1i32, 2, 3] {
            wire.extend_from_slice(&x.to_ne_bytes());
        }
        let regions = measure_default(Shape::of::<Ints>(), &wire).unwrap();
        assert_eq!(regions, Regions { data_len: 36, extra_len: 0 });
    }

    #[test]
    fn truncated_payload_is_rejected_with_the_shortfall() {
        let mut wire = vec![0u8; size_of::<Ints>()];
        push_word(&mut wire, 3);
        wire.extend_from_slice(&[0u8; 6]);
        let err = measure_default(Shape::of::<Ints>(), &wire).unwrap_err();
        assert_eq!(
            err,
            DeserializationError::InputTooShort {
                type_name: Shape::of::<Slice<i32>>().name,
                actual: 30,
                required: 36,
            }
        );
    }

    #[test]
    fn missing_length_word_is_rejected() {
        let wire = vec![0u8; size_of::<Ints>() + 4];
        assert!(measure_default(Shape::of::<Ints>(), &wire).is_err());
    }

    #[test]
    fn branched_array_reserves_header_space() {
        // m = [[1, 2], [3]]
        let mut wire = vec![0u8; size_of::<Matrix>()];
        push_word(&mut wire, 2);
        push_word(&mut wire, 2);
        for x in [1i32, 2] {
            wire.extend_from_slice(&x.to_ne_bytes());
        }
        push_word(&mut wire, 1);
        wire.extend_from_slice(&3i32.to_ne_bytes());

        let regions = measure_default(Shape::of::<Matrix>(), &wire).unwrap();
        assert_eq!(regions.data_len, 52);
        assert_eq!(regions.extra_len, 2 * size_of::<Slice<i32>>());
        // The header region starts word-aligned after the payload.
        assert_eq!(regions.total(), 56 + 32);
    }

    #[test]
    fn huge_length_is_rejected_by_the_input_check_under_default_limits() {
        let mut wire = vec![0u8; size_of::<Ints>()];
        push_word(&mut wire, usize::MAX);
        let err = measure_default(Shape::of::<Ints>(), &wire).unwrap_err();
        assert!(matches!(err, DeserializationError::InputTooShort { .. }));
    }

    #[test]
    fn length_above_the_configured_ceiling_is_rejected() {
        let mut wire = vec![0u8; size_of::<Ints>()];
        push_word(&mut wire, 5000);
        wire.extend_from_slice(&vec![0u8; 5000 * 4]);
        let limits = Limits { max_array_len: 4096 };
        let err = measure(Shape::of::<Ints>(), &wire, &limits).unwrap_err();
        assert_eq!(
            err,
            DeserializationError::LengthOverLimit {
                type_name: Shape::of::<Slice<i32>>().name,
                length: 5000,
                limit: 4096,
            }
        );
    }

    #[test]
    fn empty_array_still_needs_its_length_word() {
        let mut wire = vec![0u8; size_of::<Ints>()];
        push_word(&mut wire, 0);
        let regions = measure_default(Shape::of::<Ints>(), &wire).unwrap();
        assert_eq!(regions, Regions { data_len: 24, extra_len: 0 });
    }
}
