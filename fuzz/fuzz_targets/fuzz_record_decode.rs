//! Fuzz target: record codec
//!
//! Feeds arbitrary text to `decode` and `decode_candidate` and verifies:
//! - No panics on any input
//! - Decoded fields never carry leading/trailing whitespace
//! - A decoded record that encodes cleanly decodes back to itself
//!
//! cargo fuzz run fuzz_record_decode

#![no_main]

use libfuzzer_sys::fuzz_target;
use sirenlog::codec::RecordCodec;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = core::str::from_utf8(data) else {
        return;
    };
    let codec = RecordCodec::default();

    if let Ok(record) = codec.decode(text) {
        for field in [&record.title, &record.date, &record.time, &record.category] {
            assert_eq!(field.trim(), field.as_str(), "untrimmed field from {text:?}");
        }
        if let Ok(line) = codec.encode(&record) {
            assert_eq!(codec.decode(&line).ok(), Some(record));
        }
    }

    if let Ok(candidate) = codec.decode_candidate(text) {
        if !candidate.percentage.is_empty() {
            assert!(candidate.percentage.ends_with('%'));
        }
    }
});
