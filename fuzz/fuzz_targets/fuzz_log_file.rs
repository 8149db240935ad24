//! Fuzz target: opening and mutating an arbitrary log file
//!
//! Writes fuzz bytes as the log, opens it, and runs every mutation,
//! verifying:
//! - `open` succeeds for any file content, UTF-8 or not
//! - After open the file ends with the terminator
//! - `delete_last` lowers the record count by exactly one
//! - Annotate never changes the record count
//!
//! cargo fuzz run fuzz_log_file

#![no_main]

use libfuzzer_sys::fuzz_target;
use sirenlog::codec::RecordCodec;
use sirenlog::store::LogStore;

fuzz_target!(|data: &[u8]| {
    let Ok(dir) = tempfile::tempdir() else {
        return;
    };
    let path = dir.path().join("data.csv");
    if std::fs::write(&path, data).is_err() {
        return;
    }

    // Any content opens; unreadable lines are skipped, not fatal.
    let store = match LogStore::open(&path, RecordCodec::default()) {
        Ok(store) => store,
        Err(e) => panic!("open rejected {} bytes: {e}", data.len()),
    };
    let Ok(bytes) = std::fs::read(&path) else {
        return;
    };
    assert!(bytes.ends_with(b"\n"), "open left a torn tail");

    let Ok(before) = store.record_count() else {
        return;
    };
    let _ = store.read_window(3);

    let _ = store.annotate_first_unclassified("A");
    assert_eq!(store.record_count().ok(), Some(before));

    if store.delete_last().is_ok() {
        assert_eq!(store.record_count().ok(), Some(before - 1));
    }
});
