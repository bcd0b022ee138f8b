//! Property tests over whole runs.
//!
//! Random frame streams go through the real runtime and are compared against a
//! few lines of modular arithmetic.

use std::time::Duration;

use prt7_core::Mapping;
use prt7_harness::{Scenario, ScenarioOutcome, SimTransport};
use prt7_proto::Frame;
use proptest::prelude::*;

fn run(scenario: Scenario) -> ScenarioOutcome {
    tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(scenario.run())
}

fn arbitrary_frame() -> impl Strategy<Value = Frame> {
    prop_oneof![
        prop::sample::select(b"ABCDEFGHIJKLMNOPQRSTUVWXYZ ".to_vec()).prop_map(Frame::Load),
        (-1000i64..1000).prop_map(Frame::Map)
    ]
}

/// Reference decoder: offset arithmetic on letters.
fn model_decode(frames: &[Frame], mapping: Mapping) -> String {
    let mut offset = 0i64;
    let mut out = String::new();
    for frame in frames {
        match *frame {
            Frame::Map(amount) => offset = (offset + amount).rem_euclid(26),
            Frame::Load(b' ') => out.push(' '),
            Frame::Load(letter) => {
                let decoded = match mapping {
                    Mapping::Shift => b'A' + ((i64::from(letter - b'A') + offset) % 26) as u8,
                    Mapping::Literal => letter,
                };
                out.push(char::from(decoded));
            },
        }
    }
    out
}

proptest! {
    #[test]
    fn prop_run_matches_model(
        frames in prop::collection::vec(arbitrary_frame(), 1..60),
        literal in any::<bool>(),
    ) {
        let mapping = if literal { Mapping::Literal } else { Mapping::Shift };
        let transport = SimTransport::new().frames(frames.clone()).then_close();
        let outcome = run(Scenario::new(transport).mapping(mapping));

        let report = outcome.result.unwrap();
        prop_assert_eq!(report.frames_processed, frames.len() as u64);
        prop_assert_eq!(report.message, model_decode(&frames, mapping));
        prop_assert_eq!(outcome.observer.finish_count(), 1);
    }

    #[test]
    fn prop_idle_timeout_is_exact(
        threshold in 1u32..200,
        interval_ms in 1u64..500,
    ) {
        let transport = SimTransport::from_lines(["L,A"]);
        let outcome = run(
            Scenario::new(transport)
                .idle_threshold(threshold)
                .poll_interval(Duration::from_millis(interval_ms)),
        );

        prop_assert!(outcome.result.is_ok());
        prop_assert_eq!(outcome.stats.empty_polls(), u64::from(threshold));
        prop_assert_eq!(outcome.env.sleep_count(), u64::from(threshold - 1));
        prop_assert_eq!(
            outcome.env.elapsed(),
            Duration::from_millis(interval_ms) * (threshold - 1)
        );
    }

    #[test]
    fn prop_interleaved_silence_does_not_change_message(
        frames in prop::collection::vec(arbitrary_frame(), 1..30),
        gaps in prop::collection::vec(0usize..10, 30),
    ) {
        let mut transport = SimTransport::new();
        for (frame, gap) in frames.iter().zip(&gaps) {
            transport = transport.idle(*gap).frames([*frame]);
        }
        let outcome = run(Scenario::new(transport).idle_threshold(10));

        let expected = model_decode(&frames, Mapping::Shift);
        prop_assert_eq!(outcome.message(), Some(expected.as_str()));
    }
}
