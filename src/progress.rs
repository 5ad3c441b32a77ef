//! Progress reporting for long synchronous operations.
//!
//! Map generation runs as one blocking call on the event-loop thread. The
//! generator invokes the sink periodically from inside its work loop, and
//! those invocations are the only points where the rest of the application
//! runs: the window-side sink repaints the progress bar and drains pending
//! input, exiting the process outright on a quit event. Implementations
//! must be cheap since they may be called many times per stage.

/// Receiver for generation progress updates.
///
/// `fraction` is in `[0, 1]` and never decreases across calls from a single
/// generation run; the final report before the generator returns is `1.0`.
pub trait ProgressSink {
    fn report(&mut self, fraction: f32, message: &str);
}

/// Sink that discards all reports. Used by tests and headless generation.
pub struct NullSink;

impl ProgressSink for NullSink {
    fn report(&mut self, _fraction: f32, _message: &str) {}
}

/// Sink that records every report, for asserting on the sequence.
#[cfg(test)]
pub struct RecordingSink {
    pub reports: Vec<(f32, String)>,
}

#[cfg(test)]
impl RecordingSink {
    pub fn new() -> Self {
        Self { reports: Vec::new() }
    }
}

#[cfg(test)]
impl ProgressSink for RecordingSink {
    fn report(&mut self, fraction: f32, message: &str) {
        self.reports.push((fraction, message.to_string()));
    }
}
