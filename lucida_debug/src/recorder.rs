// Copyright 2026 the Lucida Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Compact binary event recording and decoding.
//!
//! [`RecorderSink`] implements [`TraceSink`] and encodes events into a
//! `Vec<u8>` as tagged fixed-size little-endian records (message text is the
//! one length-prefixed field). [`decode`] reads them back as an iterator of
//! [`RecordedEvent`] for offline analysis and Chrome trace export.

use lucida_core::frame::TrackingState;
use lucida_core::lifecycle::LifecycleState;
use lucida_core::trace::{
    CycleOutcomeKind, CycleSummaryEvent, DepthAcquisitionEvent, FrameAdvancedEvent, GateEvent,
    GateOutcome, SessionTransitionEvent, TraceSink, UserMessageEvent,
};

// ---------------------------------------------------------------------------
// Event type discriminants
// ---------------------------------------------------------------------------

const TAG_GATE: u8 = 1;
const TAG_TRANSITION: u8 = 2;
const TAG_FRAME_ADVANCED: u8 = 3;
const TAG_DEPTH: u8 = 4;
const TAG_CYCLE_SUMMARY: u8 = 5;
const TAG_USER_MESSAGE: u8 = 6;

// ---------------------------------------------------------------------------
// RecorderSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that encodes events into a compact binary buffer.
#[derive(Debug, Default)]
pub struct RecorderSink {
    buf: Vec<u8>,
}

impl RecorderSink {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a view of the recorded bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Consumes the recorder and returns the recorded bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    // -- encoding helpers --------------------------------------------------

    fn write_u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    fn write_u32(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_u64(&mut self, v: u64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_i64(&mut self, v: i64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_gate_outcome(&mut self, o: GateOutcome) {
        self.write_u8(match o {
            GateOutcome::Ready => 0,
            GateOutcome::InstallRequested => 1,
            GateOutcome::PermissionRequested => 2,
            GateOutcome::Unavailable => 3,
        });
    }

    fn write_state(&mut self, s: LifecycleState) {
        self.write_u8(match s {
            LifecycleState::Absent => 0,
            LifecycleState::Created => 1,
            LifecycleState::Resumed => 2,
            LifecycleState::Paused => 3,
            LifecycleState::Closed => 4,
        });
    }

    fn write_tracking(&mut self, t: TrackingState) {
        self.write_u8(match t {
            TrackingState::Tracking => 0,
            TrackingState::Paused => 1,
            TrackingState::Stopped => 2,
        });
    }

    fn write_outcome_kind(&mut self, o: CycleOutcomeKind) {
        self.write_u8(match o {
            CycleOutcomeKind::Completed => 0,
            CycleOutcomeKind::Skipped => 1,
            CycleOutcomeKind::SessionLost => 2,
            CycleOutcomeKind::CompositorFailed => 3,
        });
    }
}

impl TraceSink for RecorderSink {
    fn on_gate(&mut self, e: &GateEvent) {
        self.write_u8(TAG_GATE);
        self.write_gate_outcome(e.outcome);
    }

    fn on_session_transition(&mut self, e: &SessionTransitionEvent) {
        self.write_u8(TAG_TRANSITION);
        self.write_state(e.from);
        self.write_state(e.to);
    }

    fn on_frame_advanced(&mut self, e: &FrameAdvancedEvent) {
        self.write_u8(TAG_FRAME_ADVANCED);
        self.write_u64(e.cycle_index);
        self.write_i64(e.timestamp_ns);
        self.write_tracking(e.tracking);
    }

    fn on_depth_acquisition(&mut self, e: &DepthAcquisitionEvent) {
        self.write_u8(TAG_DEPTH);
        self.write_u64(e.cycle_index);
        self.write_u8(u8::from(e.acquired));
    }

    fn on_cycle_summary(&mut self, e: &CycleSummaryEvent) {
        self.write_u8(TAG_CYCLE_SUMMARY);
        self.write_u64(e.cycle_index);
        self.write_outcome_kind(e.outcome);
        self.write_i64(e.timestamp_ns);
        self.write_u8(u8::from(e.background_drawn));
        self.write_u8(u8::from(e.depth_attempted));
        self.write_u8(u8::from(e.depth_acquired));
        self.write_u8(u8::from(e.scene_drawn));
    }

    fn on_user_message(&mut self, e: &UserMessageEvent<'_>) {
        self.write_u8(TAG_USER_MESSAGE);
        let take = e.text.len().min(u32::MAX as usize);
        #[expect(
            clippy::cast_possible_truncation,
            reason = "length capped at u32::MAX above"
        )]
        self.write_u32(take as u32);
        self.buf.extend_from_slice(&e.text.as_bytes()[..take]);
    }
}

// ---------------------------------------------------------------------------
// Decoder
// ---------------------------------------------------------------------------

/// A decoded event from a binary recording.
#[derive(Clone, Debug)]
pub enum RecordedEvent {
    /// A [`GateEvent`].
    Gate(GateEvent),
    /// A [`SessionTransitionEvent`].
    Transition(SessionTransitionEvent),
    /// A [`FrameAdvancedEvent`].
    FrameAdvanced(FrameAdvancedEvent),
    /// A [`DepthAcquisitionEvent`].
    Depth(DepthAcquisitionEvent),
    /// A [`CycleSummaryEvent`].
    CycleSummary(CycleSummaryEvent),
    /// A user-facing message.
    UserMessage(String),
}

/// Decodes a byte slice produced by [`RecorderSink`] into an iterator of
/// [`RecordedEvent`].
pub fn decode(bytes: &[u8]) -> DecodeIter<'_> {
    DecodeIter {
        data: bytes,
        pos: 0,
    }
}

/// Iterator over decoded events.
#[derive(Debug)]
pub struct DecodeIter<'a> {
    data: &'a [u8],
    pos: usize,
}

impl DecodeIter<'_> {
    fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    fn read_u8(&mut self) -> Option<u8> {
        if self.remaining() < 1 {
            return None;
        }
        let v = self.data[self.pos];
        self.pos += 1;
        Some(v)
    }

    fn read_u32(&mut self) -> Option<u32> {
        if self.remaining() < 4 {
            return None;
        }
        let v = u32::from_le_bytes(self.data[self.pos..self.pos + 4].try_into().ok()?);
        self.pos += 4;
        Some(v)
    }

    fn read_u64(&mut self) -> Option<u64> {
        if self.remaining() < 8 {
            return None;
        }
        let v = u64::from_le_bytes(self.data[self.pos..self.pos + 8].try_into().ok()?);
        self.pos += 8;
        Some(v)
    }

    fn read_i64(&mut self) -> Option<i64> {
        if self.remaining() < 8 {
            return None;
        }
        let v = i64::from_le_bytes(self.data[self.pos..self.pos + 8].try_into().ok()?);
        self.pos += 8;
        Some(v)
    }

    fn read_gate_outcome(&mut self) -> Option<GateOutcome> {
        Some(match self.read_u8()? {
            0 => GateOutcome::Ready,
            1 => GateOutcome::InstallRequested,
            2 => GateOutcome::PermissionRequested,
            _ => GateOutcome::Unavailable,
        })
    }

    fn read_state(&mut self) -> Option<LifecycleState> {
        Some(match self.read_u8()? {
            0 => LifecycleState::Absent,
            1 => LifecycleState::Created,
            2 => LifecycleState::Resumed,
            3 => LifecycleState::Paused,
            _ => LifecycleState::Closed,
        })
    }

    fn read_tracking(&mut self) -> Option<TrackingState> {
        Some(match self.read_u8()? {
            0 => TrackingState::Tracking,
            1 => TrackingState::Paused,
            _ => TrackingState::Stopped,
        })
    }

    fn read_outcome_kind(&mut self) -> Option<CycleOutcomeKind> {
        Some(match self.read_u8()? {
            0 => CycleOutcomeKind::Completed,
            1 => CycleOutcomeKind::Skipped,
            2 => CycleOutcomeKind::SessionLost,
            _ => CycleOutcomeKind::CompositorFailed,
        })
    }

    fn decode_event(&mut self, tag: u8) -> Option<RecordedEvent> {
        match tag {
            TAG_GATE => Some(RecordedEvent::Gate(GateEvent {
                outcome: self.read_gate_outcome()?,
            })),
            TAG_TRANSITION => Some(RecordedEvent::Transition(SessionTransitionEvent {
                from: self.read_state()?,
                to: self.read_state()?,
            })),
            TAG_FRAME_ADVANCED => Some(RecordedEvent::FrameAdvanced(FrameAdvancedEvent {
                cycle_index: self.read_u64()?,
                timestamp_ns: self.read_i64()?,
                tracking: self.read_tracking()?,
            })),
            TAG_DEPTH => Some(RecordedEvent::Depth(DepthAcquisitionEvent {
                cycle_index: self.read_u64()?,
                acquired: self.read_u8()? != 0,
            })),
            TAG_CYCLE_SUMMARY => Some(RecordedEvent::CycleSummary(CycleSummaryEvent {
                cycle_index: self.read_u64()?,
                outcome: self.read_outcome_kind()?,
                timestamp_ns: self.read_i64()?,
                background_drawn: self.read_u8()? != 0,
                depth_attempted: self.read_u8()? != 0,
                depth_acquired: self.read_u8()? != 0,
                scene_drawn: self.read_u8()? != 0,
            })),
            TAG_USER_MESSAGE => {
                let len = self.read_u32()? as usize;
                if self.remaining() < len {
                    return None;
                }
                let text = String::from_utf8_lossy(&self.data[self.pos..self.pos + len]).into_owned();
                self.pos += len;
                Some(RecordedEvent::UserMessage(text))
            }
            _ => None,
        }
    }
}

impl Iterator for DecodeIter<'_> {
    type Item = RecordedEvent;

    fn next(&mut self) -> Option<Self::Item> {
        let tag = self.read_u8()?;
        self.decode_event(tag)
    }
}
