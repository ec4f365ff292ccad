// Copyright 2026 the Lucida Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr). Frame
//! timestamps are reported in milliseconds.

use std::io::Write;

use lucida_core::trace::{
    CycleOutcomeKind, CycleSummaryEvent, DepthAcquisitionEvent, FrameAdvancedEvent, GateEvent,
    GateOutcome, SessionTransitionEvent, TraceSink, UserMessageEvent,
};

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink").finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self {
            writer: Box::new(std::io::stderr()),
        }
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>) -> Self {
        Self { writer }
    }
}

impl Default for PrettyPrintSink {
    fn default() -> Self {
        Self::stderr()
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self { writer }
    }
}

fn ns_to_ms(ns: i64) -> f64 {
    ns as f64 / 1_000_000.0
}

fn gate_name(outcome: GateOutcome) -> &'static str {
    match outcome {
        GateOutcome::Ready => "ready",
        GateOutcome::InstallRequested => "install-requested",
        GateOutcome::PermissionRequested => "permission-requested",
        GateOutcome::Unavailable => "unavailable",
    }
}

fn outcome_name(outcome: CycleOutcomeKind) -> &'static str {
    match outcome {
        CycleOutcomeKind::Completed => "completed",
        CycleOutcomeKind::Skipped => "skipped",
        CycleOutcomeKind::SessionLost => "session-lost",
        CycleOutcomeKind::CompositorFailed => "compositor-failed",
    }
}

fn flag(v: bool) -> &'static str {
    if v { "yes" } else { "no" }
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_gate(&mut self, e: &GateEvent) {
        let _ = writeln!(self.writer, "[gate] {}", gate_name(e.outcome));
    }

    fn on_session_transition(&mut self, e: &SessionTransitionEvent) {
        let _ = writeln!(self.writer, "[session] {:?} -> {:?}", e.from, e.to);
    }

    fn on_frame_advanced(&mut self, e: &FrameAdvancedEvent) {
        let _ = writeln!(
            self.writer,
            "[frame] cycle={} ts={:.3}ms tracking={:?}",
            e.cycle_index,
            ns_to_ms(e.timestamp_ns),
            e.tracking,
        );
    }

    fn on_depth_acquisition(&mut self, e: &DepthAcquisitionEvent) {
        let _ = writeln!(
            self.writer,
            "[depth] cycle={} acquired={}",
            e.cycle_index,
            flag(e.acquired),
        );
    }

    fn on_cycle_summary(&mut self, e: &CycleSummaryEvent) {
        let _ = writeln!(
            self.writer,
            "[cycle] cycle={} outcome={} ts={:.3}ms background={} depth={}/{} scene={}",
            e.cycle_index,
            outcome_name(e.outcome),
            ns_to_ms(e.timestamp_ns),
            flag(e.background_drawn),
            flag(e.depth_attempted),
            flag(e.depth_acquired),
            flag(e.scene_drawn),
        );
    }

    fn on_user_message(&mut self, e: &UserMessageEvent<'_>) {
        let _ = writeln!(self.writer, "[message] {:?}", e.text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lucida_core::frame::TrackingState;
    use lucida_core::lifecycle::LifecycleState;

    #[test]
    fn pretty_print_cycle_summary() {
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new());
        sink.on_cycle_summary(&CycleSummaryEvent {
            cycle_index: 3,
            outcome: CycleOutcomeKind::Completed,
            timestamp_ns: 16_666_667,
            background_drawn: true,
            depth_attempted: true,
            depth_acquired: false,
            scene_drawn: true,
        });
        let output = String::from_utf8(sink.writer).unwrap();
        assert!(output.contains("[cycle]"), "got: {output}");
        assert!(output.contains("cycle=3"), "got: {output}");
        assert!(output.contains("outcome=completed"), "got: {output}");
        assert!(output.contains("depth=yes/no"), "got: {output}");
    }

    #[test]
    fn pretty_print_transition_and_frame() {
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new());
        sink.on_session_transition(&SessionTransitionEvent {
            from: LifecycleState::Created,
            to: LifecycleState::Resumed,
        });
        sink.on_frame_advanced(&FrameAdvancedEvent {
            cycle_index: 1,
            timestamp_ns: 1_000_000,
            tracking: TrackingState::Tracking,
        });
        let output = String::from_utf8(sink.writer).unwrap();
        assert!(output.contains("Created -> Resumed"), "got: {output}");
        assert!(output.contains("ts=1.000ms"), "got: {output}");
    }
}
