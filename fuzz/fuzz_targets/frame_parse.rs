//! Fuzz target for frame parsing
//!
//! Arbitrary lines must parse to a frame or a structured error, never panic.
//! Any frame that parses must survive an encode/parse cycle unchanged.

#![no_main]

use libfuzzer_sys::fuzz_target;
use prt7_proto::{parse, Frame};

fuzz_target!(|data: &[u8]| {
    let Ok(frame) = parse(data) else {
        return;
    };

    if let Frame::Load(byte) = frame {
        assert_eq!(data.get(2), Some(&byte), "load payload must be the third byte");
    }

    let encoded = frame.encode();
    assert_eq!(parse(&encoded), Ok(frame), "encoded frame must parse back");
});
