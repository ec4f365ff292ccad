// Copyright 2026 the Lucida Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cross-component scenarios driven by the scripted doubles.
//!
//! These tests wire the lifecycle controller and orchestrator to the
//! `lucida_harness` doubles and assert the ordering invariants and failure
//! paths end to end. The doubles share one call log, so ordering across
//! collaborators (surface vs. session) is directly assertable; they also
//! panic on session call-order violations, so a regression in the resume or
//! pause discipline fails loudly even where no explicit assertion looks.

use lucida_core::config::DepthMode;
use lucida_core::error::ServiceError;
use lucida_core::frame::TrackingState;
use lucida_core::geometry::GeometryTracker;
use lucida_core::lifecycle::{LifecycleState, SessionLifecycleController};
use lucida_core::orchestrator::{CycleOutcome, FrameOrchestrator, Z_FAR, Z_NEAR};
use lucida_core::service::InstallStatus;
use lucida_core::settings::{DepthSettings, InstantPlacementSettings};
use lucida_core::trace::Tracer;

use lucida_harness::service::TEST_INTRINSICS;
use lucida_harness::{
    Call, CallLog, DepthOutcome, MessageRecorder, RecordingCompositor, RecordingScene,
    RecordingSurface, ScriptedService, ScriptedSession, SessionScript,
};

const CAMERA_LOST: &str = "Camera not available. Try restarting the app.";

struct World {
    log: CallLog,
    service: ScriptedService,
    controller: SessionLifecycleController<ScriptedSession>,
    orchestrator: FrameOrchestrator,
    geometry: GeometryTracker,
    surface: RecordingSurface,
    compositor: RecordingCompositor,
    scene: RecordingScene,
    messages: MessageRecorder,
    depth_settings: DepthSettings,
    instant: InstantPlacementSettings,
}

impl World {
    fn new() -> Self {
        let log = CallLog::new();
        Self {
            service: ScriptedService::new(log.clone()),
            controller: SessionLifecycleController::new(),
            orchestrator: FrameOrchestrator::new(),
            geometry: GeometryTracker::new(),
            surface: RecordingSurface::new(log.clone()),
            compositor: RecordingCompositor::new(log.clone()),
            scene: RecordingScene::new(log.clone()),
            messages: MessageRecorder::new(),
            depth_settings: DepthSettings::default(),
            instant: InstantPlacementSettings::default(),
            log,
        }
    }

    /// A world whose service has one session queued.
    fn with_session(script: SessionScript) -> Self {
        let mut world = Self::new();
        world.service.push_session(script);
        world
    }

    fn foreground(&mut self) -> LifecycleState {
        self.controller.on_foreground(
            &mut self.service,
            &mut self.surface,
            &self.depth_settings,
            &self.instant,
            &mut self.messages,
            &mut Tracer::none(),
        )
    }

    fn background(&mut self) -> LifecycleState {
        self.controller
            .on_background(&mut self.surface, &mut self.messages, &mut Tracer::none())
    }

    fn cycle(&mut self) -> CycleOutcome {
        self.orchestrator.run_cycle(
            &mut self.controller,
            &mut self.geometry,
            &mut self.compositor,
            &mut self.scene,
            &self.depth_settings,
            &mut self.messages,
            &mut Tracer::none(),
        )
    }
}

fn tracking_script(frames: usize) -> SessionScript {
    let mut script = SessionScript::new(true);
    for i in 0..frames {
        script.push_frame(
            1_000_000 + i as i64 * 33_333_333,
            TrackingState::Tracking,
            DepthOutcome::Available,
        );
    }
    script
}

// ---------------------------------------------------------------------------
// Lifecycle ordering
// ---------------------------------------------------------------------------

#[test]
fn resume_applies_configuration_before_service_before_surface() {
    let mut world = World::with_session(tracking_script(0));
    assert_eq!(world.foreground(), LifecycleState::Resumed);
    world.log.assert_order(&[
        Call::CreateSession,
        Call::Configure,
        Call::SessionResume,
        Call::SurfaceResume,
    ]);
    assert!(world.surface.resumed);
}

#[test]
fn pause_stops_surface_before_service() {
    let mut world = World::with_session(tracking_script(0));
    world.foreground();
    assert_eq!(world.background(), LifecycleState::Paused);
    world.log.assert_order(&[Call::SurfacePause, Call::SessionPause]);
    assert!(!world.surface.resumed);
}

#[test]
fn background_foreground_round_trip_reconfigures() {
    let mut world = World::with_session(tracking_script(0));
    world.foreground();
    world.background();
    assert_eq!(world.foreground(), LifecycleState::Resumed);
    // Configuration is rebuilt on every pass into Resumed.
    assert_eq!(world.log.count(&Call::Configure), 2);
    // Only one session was ever created.
    assert_eq!(world.log.count(&Call::CreateSession), 1);
}

#[test]
fn closed_controller_ignores_lifecycle_events() {
    let mut world = World::with_session(tracking_script(0));
    world.controller.close(&mut Tracer::none());
    assert_eq!(world.foreground(), LifecycleState::Closed);
    assert_eq!(world.background(), LifecycleState::Closed);
    // Nothing ever reached the service or the surface.
    assert!(world.log.calls().is_empty());
}

#[test]
fn camera_unavailable_at_resume_discards_session() {
    let mut script = tracking_script(0);
    script.push_resume_failure(ServiceError::CameraUnavailable);
    let mut world = World::with_session(script);
    assert_eq!(world.foreground(), LifecycleState::Absent);
    assert_eq!(world.messages.shown, [CAMERA_LOST]);
    // The surface never started.
    assert!(!world.log.contains(&Call::SurfaceResume));
}

#[test]
fn session_creation_failure_stays_absent() {
    let mut world = World::new();
    world.service.push_session_failure(ServiceError::CreationFailed);
    assert_eq!(world.foreground(), LifecycleState::Absent);
    assert_eq!(world.messages.shown, ["Failed to create AR session"]);
    assert!(!world.log.contains(&Call::Configure));
}

// ---------------------------------------------------------------------------
// Availability gate scenarios
// ---------------------------------------------------------------------------

#[test]
fn install_requested_defers_session_creation() {
    // Scenario D: the gate starts an install flow; no session, no config.
    let mut world = World::new();
    world
        .service
        .push_install(Ok(InstallStatus::InstallRequested));
    assert_eq!(world.foreground(), LifecycleState::Absent);
    assert!(!world.log.contains(&Call::CreateSession));
    assert!(!world.log.contains(&Call::Configure));
    assert!(world.messages.shown.is_empty());
}

#[test]
fn install_flow_succeeds_on_reentry() {
    let mut world = World::with_session(tracking_script(0));
    world
        .service
        .push_install(Ok(InstallStatus::InstallRequested));
    assert_eq!(world.foreground(), LifecycleState::Absent);
    assert_eq!(world.foreground(), LifecycleState::Resumed);
    // The install UI was offered exactly once.
    assert_eq!(world.log.count(&Call::RequestInstall { user_prompt: true }), 1);
    assert_eq!(
        world.log.count(&Call::RequestInstall { user_prompt: false }),
        1
    );
}

#[test]
fn missing_permission_defers_session_creation() {
    let mut world = World::with_session(tracking_script(0));
    world.service.permission_granted = false;
    assert_eq!(world.foreground(), LifecycleState::Absent);
    assert_eq!(world.log.count(&Call::RequestPermission), 1);
    assert!(!world.log.contains(&Call::CreateSession));

    world.service.permission_granted = true;
    assert_eq!(world.foreground(), LifecycleState::Resumed);
}

#[test]
fn terminal_unavailability_surfaces_one_message() {
    let mut world = World::new();
    world.service.push_install(Err(ServiceError::DeviceIncompatible));
    assert_eq!(world.foreground(), LifecycleState::Absent);
    assert_eq!(world.messages.shown, ["This device does not support AR"]);
    assert!(!world.log.contains(&Call::CreateSession));
}

// ---------------------------------------------------------------------------
// Orchestration cycles
// ---------------------------------------------------------------------------

#[test]
fn full_cycle_draws_background_depth_and_scene() {
    // Scenario A: capability, occlusion and visualization on, tracking.
    let mut script = SessionScript::new(true);
    script.push_frame(12_345, TrackingState::Tracking, DepthOutcome::Available);
    let mut world = World::with_session(script);
    world.foreground();

    let outcome = world.cycle();
    let CycleOutcome::Completed(report) = outcome else {
        panic!("expected completed cycle, got {outcome:?}");
    };
    assert_eq!(report.timestamp_ns, 12_345);
    assert!(report.background_drawn);
    assert!(report.depth_attempted);
    assert!(report.depth_acquired);
    assert!(report.scene_drawn);

    assert_eq!(world.compositor.background_draws, 1);
    assert_eq!(world.compositor.depth_updates, 1);
    assert_eq!(world.compositor.last_depth_size, Some((4, 4)));
    assert_eq!(world.scene.draws, 1);
    assert_eq!(
        world.scene.last_projection,
        Some(TEST_INTRINSICS.projection(Z_NEAR, Z_FAR))
    );
    // The depth guard was released within the cycle.
    assert_eq!(world.service.outstanding_depth_images(), 0);
    // Depth upload happens before the background draw.
    world.log.assert_order(&[
        Call::UpdateDepthTexture,
        Call::DrawBackground,
        Call::DrawScene,
    ]);
}

#[test]
fn no_capability_skips_depth_acquisition_entirely() {
    // Scenario B: settings ask for occlusion but the device has no depth.
    let mut script = SessionScript::new(false);
    script.push_frame(12_345, TrackingState::Tracking, DepthOutcome::Available);
    let mut world = World::with_session(script);
    world.depth_settings.use_depth_for_occlusion = true;
    world.foreground();

    assert_eq!(
        world.controller.current_config().depth_mode,
        DepthMode::Disabled
    );

    let CycleOutcome::Completed(report) = world.cycle() else {
        panic!("expected completed cycle");
    };
    assert!(!report.depth_attempted);
    assert!(!world.log.contains(&Call::AcquireDepthImage));
    // The compositor was still told to turn both features off.
    assert_eq!(world.compositor.occlusion, Some(false));
    assert_eq!(world.compositor.visualization, Some(false));
    assert!(report.background_drawn);
    assert!(report.scene_drawn);
}

#[test]
fn camera_lost_during_advance_discards_session_without_drawing() {
    // Scenario C.
    let mut script = SessionScript::new(true);
    script.push_advance_failure(ServiceError::CameraUnavailable);
    let mut world = World::with_session(script);
    world.foreground();

    let outcome = world.cycle();
    assert!(matches!(outcome, CycleOutcome::SessionLost));
    assert_eq!(world.controller.state(), LifecycleState::Absent);
    assert_eq!(world.messages.shown, [CAMERA_LOST]);
    assert_eq!(world.compositor.background_draws, 0);
    assert_eq!(world.scene.draws, 0);
}

#[test]
fn cycle_without_session_is_a_noop() {
    let mut world = World::new();
    assert!(matches!(world.cycle(), CycleOutcome::Skipped));
    assert!(world.log.calls().is_empty());
    assert_eq!(world.orchestrator.cycles(), 1);
}

#[test]
fn zero_timestamp_suppresses_background_draw() {
    let mut script = SessionScript::new(true);
    script.push_frame(0, TrackingState::Tracking, DepthOutcome::NotYetAvailable);
    let mut world = World::with_session(script);
    world.foreground();

    let CycleOutcome::Completed(report) = world.cycle() else {
        panic!("expected completed cycle");
    };
    assert!(!report.background_drawn);
    assert_eq!(world.compositor.background_draws, 0);
    // Tracking is valid, so the scene still draws.
    assert!(report.scene_drawn);
}

#[test]
fn paused_tracking_draws_background_but_not_scene() {
    let mut script = SessionScript::new(true);
    script.push_frame(12_345, TrackingState::Paused, DepthOutcome::NotYetAvailable);
    let mut world = World::with_session(script);
    world.foreground();

    let CycleOutcome::Completed(report) = world.cycle() else {
        panic!("expected completed cycle");
    };
    assert!(report.background_drawn);
    assert!(!report.scene_drawn);
    assert_eq!(world.compositor.background_draws, 1);
    assert_eq!(world.scene.draws, 0);
    // Paused tracking also skips depth acquisition.
    assert!(!report.depth_attempted);
}

#[test]
fn depth_not_yet_available_is_silent() {
    let mut script = SessionScript::new(true);
    script.push_frame(12_345, TrackingState::Tracking, DepthOutcome::NotYetAvailable);
    script.push_frame(45_678, TrackingState::Tracking, DepthOutcome::Available);
    let mut world = World::with_session(script);
    world.foreground();

    let CycleOutcome::Completed(first) = world.cycle() else {
        panic!("expected completed cycle");
    };
    assert!(first.depth_attempted);
    assert!(!first.depth_acquired);
    // No message, no depth upload, prior texture untouched.
    assert!(world.messages.shown.is_empty());
    assert_eq!(world.compositor.depth_updates, 0);

    // The next cycle picks depth up once it is available.
    let CycleOutcome::Completed(second) = world.cycle() else {
        panic!("expected completed cycle");
    };
    assert!(second.depth_acquired);
    assert_eq!(world.compositor.depth_updates, 1);
}

#[test]
fn compositor_asset_failure_aborts_before_drawing() {
    let mut script = SessionScript::new(true);
    script.push_frame(12_345, TrackingState::Tracking, DepthOutcome::Available);
    let mut world = World::with_session(script);
    world.foreground();
    world.compositor.fail_visualization = true;

    let outcome = world.cycle();
    assert!(matches!(outcome, CycleOutcome::CompositorFailed(_)));
    assert_eq!(world.messages.shown.len(), 1);
    assert!(
        world.messages.shown[0].starts_with("Failed to read a required asset file: "),
        "got: {}",
        world.messages.shown[0]
    );
    assert_eq!(world.compositor.background_draws, 0);
    assert_eq!(world.scene.draws, 0);
    // The session survives a compositor failure; the next cycle can run.
    assert_eq!(world.controller.state(), LifecycleState::Resumed);
}

#[test]
fn camera_texture_bound_once_per_session() {
    let mut world = World::with_session(tracking_script(3));
    world.foreground();
    world.cycle();
    world.cycle();
    world.cycle();
    assert_eq!(world.log.count(&Call::SetCameraTexture), 1);
}

#[test]
fn replacement_session_rebinds_camera_texture() {
    let mut script = tracking_script(1);
    script.push_advance_failure(ServiceError::CameraUnavailable);
    let mut world = World::with_session(script);
    world.service.push_session(tracking_script(1));

    world.foreground();
    world.cycle();
    assert!(matches!(world.cycle(), CycleOutcome::SessionLost));

    // Recovery: next foreground entry creates a fresh session whose
    // texture flag starts unbound.
    assert_eq!(world.foreground(), LifecycleState::Resumed);
    world.cycle();
    assert_eq!(world.log.count(&Call::SetCameraTexture), 2);
}

#[test]
fn display_geometry_pushed_only_when_changed() {
    let mut world = World::with_session(tracking_script(3));
    world.foreground();
    world.geometry.on_surface_changed(1080, 2280);

    world.cycle();
    assert_eq!(world.log.count(&Call::SetDisplayGeometry), 1);

    // Unchanged geometry is not re-pushed.
    world.cycle();
    assert_eq!(world.log.count(&Call::SetDisplayGeometry), 1);

    // A rotation event triggers one more push.
    world
        .geometry
        .on_rotation(lucida_core::geometry::DisplayRotation::Deg90);
    world.cycle();
    assert_eq!(world.log.count(&Call::SetDisplayGeometry), 2);
}

#[test]
fn uv_transform_reaches_compositor_every_cycle() {
    let mut world = World::with_session(tracking_script(2));
    world.foreground();
    world.cycle();
    world.cycle();
    assert_eq!(world.log.count(&Call::UpdateDisplayGeometry), 2);
    assert!(world.compositor.last_uv.is_some());
}

#[test]
fn foreground_background_storm_never_double_resumes() {
    // Property: arbitrary event sequences never resume/pause a closed
    // session or double-resume; the scripted session panics if they do.
    let mut world = World::with_session(tracking_script(0));
    world.foreground();
    world.foreground(); // redundant foreground is a no-op
    world.background();
    world.background(); // redundant background is a no-op
    world.foreground();
    world.background();
    world.controller.close(&mut Tracer::none());
    world.foreground();
    world.background();
    assert_eq!(world.controller.state(), LifecycleState::Closed);
    assert_eq!(world.log.count(&Call::SessionResume), 2);
    assert_eq!(world.log.count(&Call::SessionPause), 2);
}
