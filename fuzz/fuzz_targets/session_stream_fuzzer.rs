//! Fuzz target for the session state machine
//!
//! Drives a session with arbitrary lines and empty polls.
//!
//! # Invariants
//!
//! - Session methods never panic on any input
//! - The rotor head always stays on the ring
//! - Output grows by exactly one byte per applied LOAD frame
//! - `Finished` is emitted at most once and nothing is accepted after it

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use prt7_core::{Session, SessionAction, SessionConfig, SessionState};
use prt7_proto::Frame;

#[derive(Debug, Arbitrary)]
enum Poll {
    Line(Vec<u8>),
    Empty,
    EndOfInput,
}

#[derive(Debug, Arbitrary)]
struct Run {
    idle_threshold: u8,
    startup_limit: Option<u8>,
    polls: Vec<Poll>,
}

fuzz_target!(|run: Run| {
    let config = SessionConfig {
        idle_threshold: u32::from(run.idle_threshold.max(1)),
        startup_idle_limit: run.startup_limit.map(|limit| u32::from(limit.max(1))),
        ..SessionConfig::default()
    };
    let mut session = Session::new(config);
    session.connected().expect("fresh session accepts connect");

    let mut finished = 0;
    for poll in run.polls {
        let before = session.output().len();
        let result = match poll {
            Poll::Line(line) => session.handle_line(line),
            Poll::Empty => session.handle_idle(),
            Poll::EndOfInput => session.handle_end_of_input(),
        };

        let Ok(actions) = result else {
            assert_eq!(session.state(), SessionState::Finished);
            continue;
        };

        for action in &actions {
            match action {
                SessionAction::FrameApplied { frame: Frame::Load(_), .. } => {
                    assert_eq!(session.output().len(), before + 1);
                },
                SessionAction::Finished { .. } => finished += 1,
                _ => {},
            }
        }
        assert!(session.rotor().head_index() < 26);
    }

    assert!(finished <= 1);
});
