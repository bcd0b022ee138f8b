//! Property-based tests for the rotor, output buffer and session.
//!
//! Each test states an invariant that must hold for every input, checked
//! against a small reference model where one is useful.

use prt7_core::{
    ALPHABET, Mapping, OutputBuffer, Rotor, Session, SessionAction, SessionConfig, SessionState,
};
use prt7_proto::Frame;
use proptest::prelude::*;

fn arbitrary_mapping() -> impl Strategy<Value = Mapping> {
    prop_oneof![Just(Mapping::Shift), Just(Mapping::Literal)]
}

fn arbitrary_frame() -> impl Strategy<Value = Frame> {
    prop_oneof![
        3 => prop::sample::select(ALPHABET.to_vec()).prop_map(Frame::Load),
        1 => any::<u8>().prop_map(Frame::Load),
        2 => (-100i64..100).prop_map(Frame::Map),
    ]
}

/// Reference decoder: an explicit shift over the alphabet.
fn model_decode(frames: &[Frame]) -> Vec<u8> {
    let mut head: i64 = 0;
    let mut out = Vec::new();
    for frame in frames {
        match *frame {
            Frame::Map(n) => head = (head + n).rem_euclid(26),
            Frame::Load(c) if c.is_ascii_uppercase() => {
                let index = (i64::from(c - b'A') + head).rem_euclid(26);
                out.push(ALPHABET[index as usize]);
            },
            Frame::Load(c) => out.push(c),
        }
    }
    out
}

proptest! {
    #[test]
    fn prop_rotate_inverse_restores_head(start in any::<i64>(), n in (i64::MIN + 1)..=i64::MAX) {
        let mut rotor = Rotor::default();
        rotor.rotate(start);
        let before = rotor.head_index();

        rotor.rotate(n);
        rotor.rotate(-n);

        // PROPERTY: rotate(n) then rotate(-n) is the identity on the head
        prop_assert_eq!(rotor.head_index(), before);
    }

    #[test]
    fn prop_rotate_is_modular(n in any::<i64>()) {
        let mut full = Rotor::default();
        full.rotate(n);

        let mut reduced = Rotor::default();
        reduced.rotate(n % 26);

        // PROPERTY: only n mod 26 matters
        prop_assert_eq!(full.head_index(), reduced.head_index());
        prop_assert!(full.head_index() < 26);
    }

    #[test]
    fn prop_map_is_pure(mapping in arbitrary_mapping(), n in any::<i64>(), input in any::<u8>()) {
        let mut rotor = Rotor::new(mapping);
        rotor.rotate(n);

        // PROPERTY: same head, same input, same output
        prop_assert_eq!(rotor.map(input), rotor.map(input));
    }

    #[test]
    fn prop_map_passes_non_letters(
        mapping in arbitrary_mapping(),
        n in any::<i64>(),
        input in any::<u8>().prop_filter("not an uppercase letter", |b| !b.is_ascii_uppercase()),
    ) {
        let mut rotor = Rotor::new(mapping);
        rotor.rotate(n);
        prop_assert_eq!(rotor.map(input), input);
    }

    #[test]
    fn prop_shift_mapping_is_a_permutation(n in any::<i64>()) {
        let mut rotor = Rotor::new(Mapping::Shift);
        rotor.rotate(n);

        let mut mapped: Vec<u8> = ALPHABET.iter().map(|&c| rotor.map(c)).collect();
        mapped.sort_unstable();

        // PROPERTY: decoding never loses or duplicates letters
        prop_assert_eq!(mapped, ALPHABET.to_vec());
    }

    #[test]
    fn prop_render_full_preserves_order(bytes in prop::collection::vec(any::<u8>(), 0..128)) {
        let mut buffer = OutputBuffer::new();
        for &byte in &bytes {
            buffer.append(byte);
        }

        prop_assert_eq!(buffer.as_bytes(), &bytes[..]);
        let expected: String = bytes.iter().copied().map(char::from).collect();
        prop_assert_eq!(buffer.render_full(), expected);
    }

    #[test]
    fn prop_session_matches_model(frames in prop::collection::vec(arbitrary_frame(), 1..64)) {
        let mut session = Session::new(SessionConfig::default());
        session.connected().unwrap();

        for frame in &frames {
            session.handle_line(frame.encode()).unwrap();
        }
        session.handle_end_of_input().unwrap();

        let decoded = session.result().unwrap();

        // ORACLE: every frame applied, output equals the reference shift
        prop_assert_eq!(decoded.frames_processed, frames.len() as u64);
        prop_assert_eq!(decoded.bytes, model_decode(&frames));
    }

    #[test]
    fn prop_idle_threshold_exact(threshold in 1u32..200, frames in 1usize..5) {
        let config = SessionConfig { idle_threshold: threshold, ..SessionConfig::default() };
        let mut session = Session::new(config);
        session.connected().unwrap();
        for _ in 0..frames {
            session.handle_line("L,X").unwrap();
        }

        let mut polls = 0u32;
        loop {
            polls += 1;
            let actions = session.handle_idle().unwrap();
            if matches!(actions[..], [SessionAction::Finished { .. }]) {
                break;
            }
            prop_assert!(matches!(actions[..], [SessionAction::Wait(_)]));
            prop_assert!(polls < threshold);
        }

        // PROPERTY: finished on exactly the threshold-th empty poll
        prop_assert_eq!(polls, threshold);
        prop_assert_eq!(session.state(), SessionState::Finished);
    }
}
