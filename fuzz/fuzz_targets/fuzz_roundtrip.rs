//! Fuzz the round trip: build a structured value, serialize it the way
//! the wire format prescribes, deserialize, and compare field-wise.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use contig::{RecordBuffer, Slice, deserialize_in_place, required_size};

contig::record! {
    struct Packet {
        kind: u32,
        series: Slice<i32>,
        payload: Slice<u8>,
        nested: Slice<Slice<u8>>,
    }
}

#[derive(Debug, Arbitrary)]
struct Model {
    kind: u32,
    series: Vec<i32>,
    payload: Vec<u8>,
    nested: Vec<Vec<u8>>,
}

fn push_len(wire: &mut Vec<u8>, len: usize) {
    wire.extend_from_slice(&len.to_ne_bytes());
}

fn serialize(model: &Model) -> Vec<u8> {
    let mut wire = vec![0u8; std::mem::size_of::<Packet>()];
    wire[..4].copy_from_slice(&model.kind.to_ne_bytes());
    push_len(&mut wire, model.series.len());
    for v in &model.series {
        wire.extend_from_slice(&v.to_ne_bytes());
    }
    push_len(&mut wire, model.payload.len());
    wire.extend_from_slice(&model.payload);
    push_len(&mut wire, model.nested.len());
    for row in &model.nested {
        push_len(&mut wire, row.len());
        wire.extend_from_slice(row);
    }
    wire
}

fuzz_target!(|model: Model| {
    let wire = serialize(&model);
    let total = required_size::<Packet>(&wire).expect("self-serialized wire must measure");
    let packet = deserialize_in_place::<Packet>(RecordBuffer::from_bytes(&wire))
        .expect("self-serialized wire must deserialize");
    assert_eq!(packet.as_bytes().len(), total);

    let view = packet.view();
    assert_eq!(view.kind, model.kind);
    assert_eq!(&view.series[..], &model.series[..]);
    assert_eq!(&view.payload[..], &model.payload[..]);
    assert_eq!(view.nested.len(), model.nested.len());
    for (bound, original) in view.nested.as_slice().iter().zip(&model.nested) {
        assert_eq!(&bound[..], &original[..]);
    }
});
