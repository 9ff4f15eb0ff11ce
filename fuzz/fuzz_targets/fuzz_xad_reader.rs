#![no_main]

use libfuzzer_sys::fuzz_target;
use xadder::comment::decode_comment;
use xadder::reader::{DecodeOptions, XadReader};
use xadder::sink::MemorySink;

fuzz_target!(|data: &[u8]| {
    // Small inflate cap so decompression bombs stay cheap
    let reader = XadReader::new(DecodeOptions::default().with_max_inflated_bytes(Some(1 << 20)));

    // Any input must decode or fail with an error, never panic
    let _ = reader.read_bytes(data, &mut MemorySink::new());

    // Comment bodies take arbitrary text as well
    if let Ok(text) = std::str::from_utf8(data) {
        let _ = decode_comment(text, &mut MemorySink::new());
    }
});
