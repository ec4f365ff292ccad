// Copyright 2026 the Lucida Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-redraw frame orchestration.
//!
//! [`FrameOrchestrator::run_cycle`] is invoked once per redraw callback and
//! walks a fixed sequence:
//!
//! ```text
//!   Idle ─► BoundTextures ─► GeometryPushed ─► FrameAdvanced
//!        ─► OcclusionConfigured ─► GeometrySynced ─► DepthMaybeAcquired
//!        ─► BackgroundDrawn ─► {SceneDrawn | SkippedNotTracking}
//! ```
//!
//! Failures are handled per step: a failed `advance()` is session-fatal (the
//! session is discarded and the cycle ends without drawing); a failed
//! compositor reconfiguration aborts the cycle before any drawing; a depth
//! image that is not yet available is silently skipped. Nothing propagates
//! past the redraw callback boundary; the next callback gets a fresh chance.

use crate::error::CompositorError;
use crate::frame::{Frame, TrackingState};
use crate::geometry::GeometryTracker;
use crate::lifecycle::{ActiveSession, SessionLifecycleController};
use crate::message::{self, MessageSink};
use crate::policy;
use crate::render::{BackgroundCompositor, SceneRenderer};
use crate::service::TrackingSession;
use crate::settings::DepthSettings;
use crate::trace::{
    CycleOutcomeKind, CycleSummaryEvent, DepthAcquisitionEvent, FrameAdvancedEvent, Tracer,
};

/// Near clip distance for the scene projection.
pub const Z_NEAR: f64 = 0.1;
/// Far clip distance for the scene projection.
pub const Z_FAR: f64 = 100.0;

/// What one completed cycle actually did.
#[derive(Clone, Copy, Debug)]
pub struct CycleReport {
    /// Monotonic cycle counter.
    pub cycle_index: u64,
    /// The frame's timestamp in nanoseconds.
    pub timestamp_ns: i64,
    /// The frame's tracking state.
    pub tracking: TrackingState,
    /// Whether the background was drawn (timestamp was non-zero).
    pub background_drawn: bool,
    /// Whether depth acquisition was attempted.
    pub depth_attempted: bool,
    /// Whether a depth image was acquired and uploaded.
    pub depth_acquired: bool,
    /// Whether the scene was drawn (tracking was not paused).
    pub scene_drawn: bool,
}

/// How one cycle ended.
#[derive(Debug)]
pub enum CycleOutcome {
    /// No resumed session existed; nothing happened.
    Skipped,
    /// `advance()` failed; the session was discarded and a message shown.
    SessionLost,
    /// Compositor reconfiguration failed before any drawing.
    CompositorFailed(CompositorError),
    /// The cycle ran to the end of the fixed sequence.
    Completed(CycleReport),
}

enum CycleError {
    SessionLost,
    Compositor(CompositorError),
}

/// Runs the fixed per-redraw sequence against the live session.
#[derive(Debug, Default)]
pub struct FrameOrchestrator {
    cycle_index: u64,
}

impl FrameOrchestrator {
    /// Creates an orchestrator with the cycle counter at zero.
    #[must_use]
    pub const fn new() -> Self {
        Self { cycle_index: 0 }
    }

    /// Total cycles started so far.
    #[must_use]
    pub const fn cycles(&self) -> u64 {
        self.cycle_index
    }

    /// Runs one orchestration cycle. Call exactly once per redraw callback.
    pub fn run_cycle<S: TrackingSession>(
        &mut self,
        lifecycle: &mut SessionLifecycleController<S>,
        geometry: &mut GeometryTracker,
        compositor: &mut dyn BackgroundCompositor,
        scene: &mut dyn SceneRenderer,
        settings: &DepthSettings,
        messages: &mut dyn MessageSink,
        tracer: &mut Tracer<'_>,
    ) -> CycleOutcome {
        let cycle_index = self.cycle_index;
        self.cycle_index += 1;

        let Some(mut active) = lifecycle.active() else {
            self.summarize(tracer, cycle_index, CycleOutcomeKind::Skipped, None);
            return CycleOutcome::Skipped;
        };

        let result = Self::drive(
            cycle_index,
            &mut active,
            geometry,
            compositor,
            scene,
            settings,
            tracer,
        );

        match result {
            Ok(report) => {
                self.summarize(
                    tracer,
                    cycle_index,
                    CycleOutcomeKind::Completed,
                    Some(&report),
                );
                CycleOutcome::Completed(report)
            }
            Err(CycleError::SessionLost) => {
                lifecycle.discard_session(tracer);
                message::report(
                    messages,
                    tracer,
                    crate::error::ServiceError::CameraUnavailable.user_message(),
                );
                self.summarize(tracer, cycle_index, CycleOutcomeKind::SessionLost, None);
                CycleOutcome::SessionLost
            }
            Err(CycleError::Compositor(e)) => {
                message::report(messages, tracer, &alloc::string::ToString::to_string(&e));
                self.summarize(tracer, cycle_index, CycleOutcomeKind::CompositorFailed, None);
                CycleOutcome::CompositorFailed(e)
            }
        }
    }

    fn drive<S: TrackingSession>(
        cycle_index: u64,
        active: &mut ActiveSession<'_, S>,
        geometry: &mut GeometryTracker,
        compositor: &mut dyn BackgroundCompositor,
        scene: &mut dyn SceneRenderer,
        settings: &DepthSettings,
        tracer: &mut Tracer<'_>,
    ) -> Result<CycleReport, CycleError> {
        // Step 1: one-shot camera texture binding. Done here rather than at
        // surface creation because the session is not guaranteed to exist
        // yet when the surface comes up; the repeat check is negligible.
        if !active.textures_bound() {
            let texture = compositor.camera_texture();
            active.session().set_camera_texture(texture);
            active.mark_textures_bound();
        }

        // Step 2: push display geometry if it changed since the last cycle.
        if let Some(geom) = geometry.take_changed() {
            active.session().set_display_geometry(geom);
        }

        // Step 3: advance by exactly one frame. Under the blocking update
        // mode this paces the loop to the camera frame interval. Failure is
        // fatal to the session, not to the process.
        let frame: Frame = active
            .session()
            .advance()
            .map_err(|_| CycleError::SessionLost)?;
        tracer.frame_advanced(&FrameAdvancedEvent {
            cycle_index,
            timestamp_ns: frame.timestamp_ns,
            tracking: frame.tracking,
        });

        // Step 4: apply the depth/occlusion decision to the compositor.
        // Either call may fail reading shader assets; drawing with a
        // half-configured compositor is not allowed, so abort before any
        // draw call.
        let decision = policy::decide(active.session().is_depth_supported(), settings);
        compositor
            .set_depth_visualization(decision.visualization)
            .map_err(CycleError::Compositor)?;
        compositor
            .set_occlusion(decision.occlusion)
            .map_err(CycleError::Compositor)?;

        // Step 5: sync display-geometry-derived UV state every cycle.
        // Camera framing can change without a rotation event.
        compositor.update_display_geometry(&frame);

        // Step 6: depth acquisition. "Not yet available" is expected while
        // the sensor warms up and stays silent; the guard's drop returns the
        // buffer to the service on every exit path.
        let mut depth_attempted = false;
        let mut depth_acquired = false;
        if frame.tracking == TrackingState::Tracking
            && (decision.occlusion || decision.visualization)
        {
            depth_attempted = true;
            if let Some(depth) = active.session().acquire_depth_image(&frame) {
                compositor.update_depth_texture(&depth);
                depth_acquired = true;
            }
            tracer.depth_acquisition(&DepthAcquisitionEvent {
                cycle_index,
                acquired: depth_acquired,
            });
        }

        // Step 7: background draw, suppressed until the camera produces its
        // first real frame so leftover texture data is never shown.
        let background_drawn = frame.timestamp_ns != 0;
        if background_drawn {
            compositor.draw_background();
        }

        // Step 8: tracking gate. Without a valid pose there is no scene
        // drawing, but the background above keeps the screen from going
        // blank.
        let scene_drawn = if frame.tracking == TrackingState::Paused {
            false
        } else {
            let projection = frame.intrinsics.projection(Z_NEAR, Z_FAR);
            scene.draw_scene(&frame, &projection);
            true
        };

        Ok(CycleReport {
            cycle_index,
            timestamp_ns: frame.timestamp_ns,
            tracking: frame.tracking,
            background_drawn,
            depth_attempted,
            depth_acquired,
            scene_drawn,
        })
    }

    fn summarize(
        &self,
        tracer: &mut Tracer<'_>,
        cycle_index: u64,
        outcome: CycleOutcomeKind,
        report: Option<&CycleReport>,
    ) {
        tracer.cycle_summary(&CycleSummaryEvent {
            cycle_index,
            outcome,
            timestamp_ns: report.map_or(0, |r| r.timestamp_ns),
            background_drawn: report.is_some_and(|r| r.background_drawn),
            depth_attempted: report.is_some_and(|r| r.depth_attempted),
            depth_acquired: report.is_some_and(|r| r.depth_acquired),
            scene_drawn: report.is_some_and(|r| r.scene_drawn),
        });
    }
}
