//! Progress observer hook.
//!
//! Observers see what the session did but cannot influence it. Every method
//! has an empty default, and `()` is the no-op observer.

use prt7_proto::{Frame, ParseError};

use crate::session::FrameReport;

/// Receives session progress notifications.
pub trait SessionObserver {
    /// A frame was parsed and applied.
    fn on_frame_processed(&mut self, frame: &Frame, report: &FrameReport) {
        let _ = (frame, report);
    }

    /// A line could not be parsed and was skipped.
    fn on_parse_failure(&mut self, line: &[u8], error: &ParseError) {
        let _ = (line, error);
    }

    /// The stream ended.
    fn on_stream_finished(&mut self, frame_count: u64, message: &str) {
        let _ = (frame_count, message);
    }
}

impl SessionObserver for () {}

impl<O: SessionObserver + ?Sized> SessionObserver for &mut O {
    fn on_frame_processed(&mut self, frame: &Frame, report: &FrameReport) {
        (**self).on_frame_processed(frame, report);
    }

    fn on_parse_failure(&mut self, line: &[u8], error: &ParseError) {
        (**self).on_parse_failure(line, error);
    }

    fn on_stream_finished(&mut self, frame_count: u64, message: &str) {
        (**self).on_stream_finished(frame_count, message);
    }
}
