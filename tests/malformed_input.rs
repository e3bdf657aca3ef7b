//! Rejection behavior on malformed and over-limit input: every failure
//! is a `DeserializationError` naming the type being read, and a failed
//! copy deserialization leaves its destination untouched.

use contig::{Contiguous, DeserializationError, Deserializer, RecordBuffer, Shape, Slice,
    deserialize_copy, deserialize_in_place, required_size};

use std::mem::size_of;

contig::record! {
    #[derive(Debug)]
    struct Ints {
        xs: Slice<i32>,
    }
}

contig::record! {
    #[derive(Debug)]
    struct Matrix {
        m: Slice<Slice<i32>>,
    }
}

fn push_len(wire: &mut Vec<u8>, len: usize) {
    wire.extend_from_slice(&len.to_ne_bytes());
}

fn ints_wire(values: &[i32]) -> Vec<u8> {
    let mut wire = vec![0u8; size_of::<Ints>()];
    push_len(&mut wire, values.len());
    for v in values {
        wire.extend_from_slice(&v.to_ne_bytes());
    }
    wire
}

#[test]
fn input_shorter_than_the_record_image_is_rejected() {
    let err = required_size::<Ints>(&[0u8; 10]).unwrap_err();
    assert_eq!(
        err,
        DeserializationError::InputTooShort {
            type_name: Shape::of::<Ints>().name,
            actual: 10,
            required: 16,
        }
    );
    let message = err.to_string();
    assert!(message.contains("input data length 10 < required 16"));
    assert!(message.contains("Ints"));
}

#[test]
fn empty_input_for_a_nonzero_record_is_rejected() {
    let err = required_size::<Ints>(&[]).unwrap_err();
    assert!(matches!(
        err,
        DeserializationError::InputTooShort { actual: 0, required: 16, .. }
    ));
}

#[test]
fn missing_length_word_is_rejected() {
    let wire = vec![0u8; size_of::<Ints>() + 4];
    let err = deserialize_in_place::<Ints>(RecordBuffer::from_bytes(&wire)).unwrap_err();
    assert!(matches!(err, DeserializationError::InputTooShort { .. }));
}

#[test]
fn truncated_element_payload_reports_the_shortfall() {
    let mut wire = ints_wire(&[1, 2, 3]);
    wire.truncate(30);

    let err = deserialize_in_place::<Ints>(RecordBuffer::from_bytes(&wire)).unwrap_err();
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
fn absurd_length_is_rejected_by_the_input_check_under_default_limits() {
    let mut wire = vec![0u8; size_of::<Ints>()];
    push_len(&mut wire, usize::MAX);

    let err = required_size::<Ints>(&wire).unwrap_err();
    assert!(matches!(err, DeserializationError::InputTooShort { .. }));
}

#[test]
fn length_over_the_configured_ceiling_names_the_array_type() {
    let mut wire = vec![0u8; size_of::<Ints>()];
    push_len(&mut wire, usize::MAX);

    let deserializer = Deserializer::new().max_array_len(1 << 20);
    let err = deserializer
        .in_place::<Ints>(RecordBuffer::from_bytes(&wire))
        .unwrap_err();
    assert_eq!(
        err,
        DeserializationError::LengthOverLimit {
            type_name: Shape::of::<Slice<i32>>().name,
            length: usize::MAX,
            limit: 1 << 20,
        }
    );
    let message = err.to_string();
    assert!(message.contains("exceeds limit"));
    assert!(message.contains("Slice<i32>"));
}

#[test]
fn length_exactly_at_the_ceiling_is_accepted() {
    let wire = ints_wire(&[1, 2, 3]);
    let record = Deserializer::new()
        .max_array_len(3)
        .in_place::<Ints>(RecordBuffer::from_bytes(&wire))
        .unwrap();
    assert_eq!(&record.view().xs[..], &[1, 2, 3]);
}

#[test]
fn inner_array_of_a_branched_array_is_checked_too() {
    // m = [[1, 2], [3]] with the second inner payload cut off.
    let mut wire = vec![0u8; size_of::<Matrix>()];
    push_len(&mut wire, 2);
    push_len(&mut wire, 2);
    for v in [1i32, 2] {
        wire.extend_from_slice(&v.to_ne_bytes());
    }
    push_len(&mut wire, 1);

    let err = deserialize_in_place::<Matrix>(RecordBuffer::from_bytes(&wire)).unwrap_err();
    assert!(matches!(
        err,
        DeserializationError::InputTooShort { required: 52, .. }
    ));
}

#[test]
fn truncated_branched_length_word_is_rejected() {
    let mut wire = vec![0u8; size_of::<Matrix>()];
    push_len(&mut wire, 2);
    push_len(&mut wire, 2);
    wire.truncate(28);

    let err = required_size::<Matrix>(&wire).unwrap_err();
    assert!(matches!(err, DeserializationError::InputTooShort { .. }));
}

#[test]
fn failed_copy_leaves_the_destination_unchanged() {
    let mut destination: Contiguous<Ints> = Contiguous::empty();
    deserialize_copy(&ints_wire(&[10, 20]), &mut destination).unwrap();
    let length = destination.as_bytes().len();

    let mut bad = ints_wire(&[1, 2, 3]);
    bad.truncate(30);
    assert!(deserialize_copy(&bad, &mut destination).is_err());

    assert_eq!(destination.as_bytes().len(), length);
    assert_eq!(&destination.view().xs[..], &[10, 20]);
}

#[test]
fn failed_copy_into_a_fresh_destination_keeps_it_empty() {
    let mut destination: Contiguous<Ints> = Contiguous::empty();
    assert!(deserialize_copy(&[0u8; 4], &mut destination).is_err());
    assert!(destination.as_bytes().is_empty());
}
