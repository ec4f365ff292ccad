// Copyright 2026 the Lucida Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for the session lifecycle and frame loop.
//!
//! This module provides a [`TraceSink`] trait with per-event methods that the
//! lifecycle controller and orchestrator call at each stage. All method
//! bodies default to no-ops, so implementing only the events you care about
//! is fine.
//!
//! [`Tracer`] wraps an optional `&mut dyn TraceSink`. When the `trace`
//! feature is **off**, every `Tracer` method compiles to nothing (zero
//! overhead). When **on**, each method performs a single `Option` branch
//! before dispatching.
//!
//! # Crate features
//!
//! - `trace` — enables the `Tracer` method bodies (one branch per call).

use crate::frame::TrackingState;
use crate::lifecycle::LifecycleState;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Availability-gate outcome, stripped of its error payload for tracing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GateOutcome {
    /// Service installed and camera permission granted.
    Ready,
    /// Install flow started; retry on next foreground entry.
    InstallRequested,
    /// Permission flow started; retry on next foreground entry.
    PermissionRequested,
    /// Terminal availability failure for this foreground cycle.
    Unavailable,
}

/// How one orchestration cycle ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CycleOutcomeKind {
    /// The cycle ran to the end of the fixed sequence.
    Completed,
    /// No resumed session existed; the cycle was a no-op.
    Skipped,
    /// `advance()` failed and the session was discarded.
    SessionLost,
    /// Compositor reconfiguration failed before any drawing.
    CompositorFailed,
}

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Emitted after each availability-gate evaluation.
#[derive(Clone, Copy, Debug)]
pub struct GateEvent {
    /// The gate's outcome.
    pub outcome: GateOutcome,
}

/// Emitted on every session lifecycle transition.
#[derive(Clone, Copy, Debug)]
pub struct SessionTransitionEvent {
    /// State before the transition.
    pub from: LifecycleState,
    /// State after the transition.
    pub to: LifecycleState,
}

/// Emitted when `advance()` produces a frame.
#[derive(Clone, Copy, Debug)]
pub struct FrameAdvancedEvent {
    /// Monotonic cycle counter.
    pub cycle_index: u64,
    /// Frame timestamp in nanoseconds (zero before the first real frame).
    pub timestamp_ns: i64,
    /// Tracking state at this frame.
    pub tracking: TrackingState,
}

/// Emitted after a depth-image acquisition attempt.
#[derive(Clone, Copy, Debug)]
pub struct DepthAcquisitionEvent {
    /// Monotonic cycle counter.
    pub cycle_index: u64,
    /// Whether an image was acquired (`false` means not yet available).
    pub acquired: bool,
}

/// Emitted at the end of every orchestration cycle.
#[derive(Clone, Copy, Debug)]
pub struct CycleSummaryEvent {
    /// Monotonic cycle counter.
    pub cycle_index: u64,
    /// How the cycle ended.
    pub outcome: CycleOutcomeKind,
    /// Frame timestamp in nanoseconds (zero if no frame was produced).
    pub timestamp_ns: i64,
    /// Whether the background was drawn.
    pub background_drawn: bool,
    /// Whether depth acquisition was attempted.
    pub depth_attempted: bool,
    /// Whether a depth image was acquired.
    pub depth_acquired: bool,
    /// Whether the scene was drawn.
    pub scene_drawn: bool,
}

/// Emitted whenever a user-facing message is shown.
#[derive(Clone, Copy, Debug)]
pub struct UserMessageEvent<'t> {
    /// The message text.
    pub text: &'t str,
}

// ---------------------------------------------------------------------------
// TraceSink
// ---------------------------------------------------------------------------

/// Receives lifecycle and frame-loop events.
///
/// All methods default to no-ops.
pub trait TraceSink {
    /// Called after each availability-gate evaluation.
    fn on_gate(&mut self, e: &GateEvent) {
        _ = e;
    }

    /// Called on every session lifecycle transition.
    fn on_session_transition(&mut self, e: &SessionTransitionEvent) {
        _ = e;
    }

    /// Called when `advance()` produces a frame.
    fn on_frame_advanced(&mut self, e: &FrameAdvancedEvent) {
        _ = e;
    }

    /// Called after a depth-image acquisition attempt.
    fn on_depth_acquisition(&mut self, e: &DepthAcquisitionEvent) {
        _ = e;
    }

    /// Called at the end of every orchestration cycle.
    fn on_cycle_summary(&mut self, e: &CycleSummaryEvent) {
        _ = e;
    }

    /// Called whenever a user-facing message is shown.
    fn on_user_message(&mut self, e: &UserMessageEvent<'_>) {
        _ = e;
    }
}

/// A [`TraceSink`] that ignores every event.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer
// ---------------------------------------------------------------------------

/// Thin wrapper around an optional [`TraceSink`].
///
/// When the `trace` feature is **off**, every method compiles to nothing.
/// When **on**, each method checks the inner `Option` (one branch) before
/// dispatching to the sink.
pub struct Tracer<'a> {
    #[cfg(feature = "trace")]
    sink: Option<&'a mut dyn TraceSink>,
    #[cfg(not(feature = "trace"))]
    _marker: core::marker::PhantomData<&'a mut dyn TraceSink>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

impl<'a> Tracer<'a> {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: &'a mut dyn TraceSink) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: None }
        }
        #[cfg(not(feature = "trace"))]
        {
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Emits a [`GateEvent`].
    #[inline]
    pub fn gate(&mut self, e: &GateEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_gate(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`SessionTransitionEvent`].
    #[inline]
    pub fn session_transition(&mut self, e: &SessionTransitionEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_session_transition(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`FrameAdvancedEvent`].
    #[inline]
    pub fn frame_advanced(&mut self, e: &FrameAdvancedEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_frame_advanced(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`DepthAcquisitionEvent`].
    #[inline]
    pub fn depth_acquisition(&mut self, e: &DepthAcquisitionEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_depth_acquisition(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`CycleSummaryEvent`].
    #[inline]
    pub fn cycle_summary(&mut self, e: &CycleSummaryEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_cycle_summary(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`UserMessageEvent`].
    #[inline]
    pub fn user_message(&mut self, e: &UserMessageEvent<'_>) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_user_message(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }
}
