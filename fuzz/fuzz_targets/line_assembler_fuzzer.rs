//! Fuzz target for line assembly
//!
//! Feeds arbitrary byte chunks through the assembler.
//!
//! # Invariants
//!
//! - Lines are never empty and never longer than `MAX_LINE_LEN`
//! - Lines never contain `\r` or `\n`
//! - Chunk boundaries do not change the lines delivered

#![no_main]

use bytes::Bytes;
use libfuzzer_sys::fuzz_target;
use prt7_proto::{LineAssembler, MAX_LINE_LEN};

fn drain(assembler: &mut LineAssembler, into: &mut Vec<Bytes>) {
    while let Some(line) = assembler.next_line() {
        into.push(line);
    }
}

fuzz_target!(|chunks: Vec<Vec<u8>>| {
    let mut assembler = LineAssembler::new();
    let mut delivered: Vec<Bytes> = Vec::new();

    for chunk in &chunks {
        assembler.push(chunk);
        drain(&mut assembler, &mut delivered);
    }
    while let Some(line) = assembler.flush() {
        delivered.push(line);
    }
    assert_eq!(assembler.buffered(), 0);

    for line in &delivered {
        assert!(!line.is_empty());
        assert!(line.len() <= MAX_LINE_LEN);
        assert!(!line.iter().any(|&b| b == b'\n' || b == b'\r'));
    }

    // Same bytes in one push
    let mut whole = LineAssembler::new();
    let mut expected: Vec<Bytes> = Vec::new();
    whole.push(&chunks.concat());
    drain(&mut whole, &mut expected);
    while let Some(line) = whole.flush() {
        expected.push(line);
    }
    assert_eq!(delivered, expected);
});
