//! Fuzz the copy deserialization path with raw bytes.
//!
//! Whatever the input, deserialization must either return an error or
//! produce a view whose every reachable slice is readable and inside
//! the backing buffer. It must never panic or touch memory out of
//! bounds.
//!
//! Field order in the probe keeps wider-element arrays ahead of byte
//! arrays so no input can make a payload land misaligned.

#![no_main]

use libfuzzer_sys::fuzz_target;

use contig::{Contiguous, Deserializer, Slice};

contig::record! {
    struct Inner {
        id: u64,
        data: Slice<u8>,
    }
}

contig::record! {
    struct Probe {
        tag: u32,
        words: Slice<u64>,
        inline: Slice<Inner>,
        bytes: Slice<u8>,
        rows: Slice<Slice<u8>>,
    }
}

fuzz_target!(|data: &[u8]| {
    let deserializer = Deserializer::new().max_array_len(1 << 16);
    let mut destination: Contiguous<Probe> = Contiguous::empty();
    if deserializer.copy_into::<Probe>(data, &mut destination).is_err() {
        return;
    }

    let base = destination.as_bytes().as_ptr() as usize;
    let end = base + destination.as_bytes().len();
    let probe = destination.view();

    let mut checksum = probe.tag as u64;
    checksum = probe
        .words
        .iter()
        .fold(checksum, |acc, &w| acc.wrapping_add(w));
    for inner in probe.inline.as_slice() {
        checksum = checksum.wrapping_add(inner.id);
        checksum = checksum.wrapping_add(inner.data.iter().map(|&b| b as u64).sum::<u64>());
    }
    checksum = checksum.wrapping_add(probe.bytes.iter().map(|&b| b as u64).sum::<u64>());
    for row in probe.rows.as_slice() {
        let ptr = row.as_ptr() as usize;
        assert!(ptr >= base && ptr <= end);
        checksum = checksum.wrapping_add(row.iter().map(|&b| b as u64).sum::<u64>());
    }
    std::hint::black_box(checksum);
});
