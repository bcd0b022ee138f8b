//! Property-based tests for line parsing and assembly.
//!
//! These verify that the parser and line assembler behave for ALL inputs, not
//! just the handful of frames a transmitter usually sends.

use prt7_proto::{Frame, LineAssembler, MAX_LINE_LEN, ParseError, parse, parse_rotation};
use proptest::prelude::*;

/// Strategy for generating arbitrary frames
fn arbitrary_frame() -> impl Strategy<Value = Frame> {
    prop_oneof![any::<u8>().prop_map(Frame::Load), any::<i64>().prop_map(Frame::Map)]
}

proptest! {
    #[test]
    fn prop_parse_never_panics(line in prop::collection::vec(any::<u8>(), 0..64)) {
        let _ = parse(&line);
    }

    #[test]
    fn prop_encoded_frame_parses_back(frame in arbitrary_frame()) {
        // PROPERTY: the wire form is accepted and yields the same frame
        prop_assert_eq!(parse(&frame.encode()), Ok(frame));
    }

    #[test]
    fn prop_load_payload_is_verbatim(byte in any::<u8>(), tail in prop::collection::vec(any::<u8>(), 0..8)) {
        let mut line = vec![b'L', b',', byte];
        line.extend(tail);
        prop_assert_eq!(parse(&line), Ok(Frame::Load(byte)));
    }

    #[test]
    fn prop_unknown_kind_rejected(kind in any::<u8>().prop_filter("not a frame kind", |b| *b != b'L' && *b != b'M')) {
        prop_assert_eq!(parse(&[kind, b',', b'1']), Err(ParseError::UnknownKind { kind }));
    }

    #[test]
    fn prop_rotation_ignores_trailing_garbage(n in any::<i32>(), garbage in "[a-zA-Z ,]{0,6}") {
        let text = format!("{n}{garbage}");
        prop_assert_eq!(parse_rotation(text.as_bytes()), i64::from(n));
    }

    #[test]
    fn prop_assembler_chunking_is_transparent(
        frames in prop::collection::vec(arbitrary_frame(), 1..20),
        split in 1usize..16,
    ) {
        let wire: Vec<u8> = frames
            .iter()
            .filter(|frame| !matches!(frame, Frame::Load(b'\n' | b'\r')))
            .flat_map(|frame| {
                let mut line = frame.encode().to_vec();
                line.extend_from_slice(b"\r\n");
                line
            })
            .collect();

        let mut whole = LineAssembler::new();
        whole.push(&wire);
        let expected: Vec<_> = std::iter::from_fn(|| whole.next_line()).collect();

        let mut chunked = LineAssembler::new();
        let mut actual = Vec::new();
        for chunk in wire.chunks(split) {
            chunked.push(chunk);
            actual.extend(std::iter::from_fn(|| chunked.next_line()));
        }

        // PROPERTY: how bytes are chunked never changes the lines produced
        prop_assert_eq!(actual, expected);
    }

    #[test]
    fn prop_lines_never_exceed_limit(data in prop::collection::vec(any::<u8>(), 0..1024)) {
        let mut assembler = LineAssembler::new();
        assembler.push(&data);
        while let Some(line) = assembler.flush() {
            prop_assert!(!line.is_empty());
            prop_assert!(line.len() <= MAX_LINE_LEN);
            prop_assert!(!line.contains(&b'\n') && !line.contains(&b'\r'));
        }
    }
}
