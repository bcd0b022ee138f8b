//! Progress output through `tracing`.

use prt7_core::{FrameReport, OutputBuffer, SessionObserver};
use prt7_proto::{Frame, ParseError};

/// Observer that logs each frame, rejected line and the end of the stream.
///
/// Frame progress is logged at `info`, malformed lines at `warn`. The
/// bracketed progress view is only rendered when `info` is enabled.
#[derive(Debug, Clone, Default)]
pub struct TracingObserver {
    progress: OutputBuffer,
}

impl TracingObserver {
    /// Observer with no progress yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Decoded bytes seen so far.
    pub fn progress(&self) -> &OutputBuffer {
        &self.progress
    }
}

impl SessionObserver for TracingObserver {
    fn on_frame_processed(&mut self, frame: &Frame, report: &FrameReport) {
        match (frame, report.decoded) {
            (Frame::Load(input), Some(decoded)) => {
                self.progress.append(decoded);
                tracing::info!(
                    frame = %frame,
                    input = %char::from(*input),
                    decoded = %char::from(decoded),
                    message = %self.progress.render_partial(),
                    "fragment decoded"
                );
            },
            (Frame::Map(amount), _) => tracing::info!(
                frame = %frame,
                amount,
                head = %char::from(report.head),
                "rotor rotated"
            ),
            (Frame::Load(_), None) => {},
        }
    }

    fn on_parse_failure(&mut self, line: &[u8], error: &ParseError) {
        tracing::warn!(line = %String::from_utf8_lossy(line), %error, "malformed frame");
    }

    fn on_stream_finished(&mut self, frame_count: u64, message: &str) {
        tracing::info!(frames = frame_count, message_len = message.len(), "stream finished");
    }
}
