//! Observer that records every notification.

use prt7_core::{FrameReport, OutputBuffer, SessionObserver};
use prt7_proto::{Frame, ParseError};

/// One recorded observer notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Observed {
    /// A frame was applied.
    Frame {
        /// The frame
        frame: Frame,
        /// Session state after it
        report: FrameReport,
        /// Message so far, in progress form (`[H][O]`)
        partial: String,
    },
    /// A line was skipped.
    Rejected {
        /// The raw line, lossily decoded
        line: String,
        /// Why it was skipped
        error: ParseError,
    },
    /// The stream ended.
    Finished {
        /// Frames processed
        frames_processed: u64,
        /// Final message
        message: String,
    },
}

/// Records notifications in arrival order.
#[derive(Debug, Clone, Default)]
pub struct RecordingObserver {
    events: Vec<Observed>,
    progress: OutputBuffer,
}

impl RecordingObserver {
    /// Empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything recorded so far.
    pub fn events(&self) -> &[Observed] {
        &self.events
    }

    /// Recorded frame reports, in order.
    pub fn reports(&self) -> impl Iterator<Item = &FrameReport> {
        self.events.iter().filter_map(|event| match event {
            Observed::Frame { report, .. } => Some(report),
            _ => None,
        })
    }

    /// Progress view after each frame, in order.
    pub fn partials(&self) -> impl Iterator<Item = &str> {
        self.events.iter().filter_map(|event| match event {
            Observed::Frame { partial, .. } => Some(partial.as_str()),
            _ => None,
        })
    }

    /// Number of `Finished` notifications.
    pub fn finish_count(&self) -> usize {
        self.events.iter().filter(|event| matches!(event, Observed::Finished { .. })).count()
    }

    /// One line per notification, suitable for snapshots.
    pub fn transcript(&self) -> String {
        let mut out = String::new();
        for event in &self.events {
            let line = match event {
                Observed::Frame { frame, report, partial } => match report.decoded {
                    Some(decoded) => format!(
                        "#{} {frame} -> {} | {}",
                        report.frames_processed,
                        char::from(decoded),
                        partial
                    ),
                    None => format!(
                        "#{} {frame} head={}",
                        report.frames_processed,
                        char::from(report.head)
                    ),
                },
                Observed::Rejected { line, error } => format!("skip {line:?}: {error}"),
                Observed::Finished { frames_processed, message } => {
                    format!("done frames={frames_processed} message={message:?}")
                },
            };
            out.push_str(&line);
            out.push('\n');
        }
        out
    }
}

impl SessionObserver for RecordingObserver {
    fn on_frame_processed(&mut self, frame: &Frame, report: &FrameReport) {
        if let Some(decoded) = report.decoded {
            self.progress.append(decoded);
        }
        self.events.push(Observed::Frame {
            frame: *frame,
            report: report.clone(),
            partial: self.progress.render_partial(),
        });
    }

    fn on_parse_failure(&mut self, line: &[u8], error: &ParseError) {
        self.events.push(Observed::Rejected {
            line: String::from_utf8_lossy(line).into_owned(),
            error: *error,
        });
    }

    fn on_stream_finished(&mut self, frame_count: u64, message: &str) {
        self.events
            .push(Observed::Finished { frames_processed: frame_count, message: message.to_owned() });
    }
}
