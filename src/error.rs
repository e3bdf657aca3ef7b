//! # Deserialization Errors
//!
//! One error kind covers every rejectable input: [`DeserializationError`].
//! It is produced by exactly two predicates — an input-length check that
//! guards every read from the wire, and a length-limit check that guards
//! every decoded dynamic-array length against the configured ceiling.
//!
//! Everything else that can go wrong is a programmer error (a shape that
//! does not match its type, a slicer cursor escaping its region) and
//! surfaces as a debug assertion, never as an error value.
//!
//! ## Recovery
//!
//! Deserialization is all-or-nothing. The input is validated in full
//! before any output byte is written, so a returned error leaves a copy
//! destination exactly as it was; an in-place buffer consumed by value is
//! simply dropped.

use thiserror::Error;

/// Rejection of a malformed or over-limit input buffer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeserializationError {
    /// The input ended before the bytes a value required.
    #[error("input data length {actual} < required {required} while reading {type_name}")]
    InputTooShort {
        /// Type whose bytes were being read when the input ran out.
        type_name: &'static str,
        /// Bytes actually available.
        actual: usize,
        /// Bytes the read needed the input to reach.
        required: usize,
    },

    /// A dynamic array declared more elements than the configured ceiling.
    #[error("length {length} exceeds limit {limit} for {type_name}")]
    LengthOverLimit {
        /// The dynamic-array type whose length word was decoded.
        type_name: &'static str,
        /// Element count decoded from the wire.
        length: usize,
        /// Configured ceiling.
        limit: usize,
    },
}

/// Fails unless at least `required` bytes are available for `type_name`.
pub(crate) fn check_input_len(
    type_name: &'static str,
    actual: usize,
    required: usize,
) -> Result<(), DeserializationError> {
    if actual < required {
        return Err(DeserializationError::InputTooShort {
            type_name,
            actual,
            required,
        });
    }
    Ok(())
}

/// Fails if a decoded element count exceeds the configured ceiling.
pub(crate) fn check_length_limit(
    type_name: &'static str,
    length: usize,
    limit: usize,
) -> Result<(), DeserializationError> {
    if length > limit {
        return Err(DeserializationError::LengthOverLimit {
            type_name,
            length,
            limit,
        });
    }
    Ok(())
}
