// Copyright 2026 the Lucida Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Simulated session lifecycle that exercises the tracing and diagnostics
//! pipeline.
//!
//! Runs a scripted service through the full story — install prompt, camera
//! permission, depth warm-up, camera loss and recovery, a background/
//! foreground round trip, teardown — recording events to both a
//! [`PrettyPrintSink`](lucida_debug::pretty::PrettyPrintSink) and a
//! [`RecorderSink`](lucida_debug::recorder::RecorderSink), then exports a
//! Chrome trace JSON file.

use std::fs::File;
use std::io::BufWriter;

use lucida_core::error::ServiceError;
use lucida_core::frame::TrackingState;
use lucida_core::geometry::{DisplayRotation, GeometryTracker};
use lucida_core::lifecycle::SessionLifecycleController;
use lucida_core::orchestrator::FrameOrchestrator;
use lucida_core::service::InstallStatus;
use lucida_core::settings::{DepthSettings, InstantPlacementSettings};
use lucida_core::trace::{
    CycleSummaryEvent, DepthAcquisitionEvent, FrameAdvancedEvent, GateEvent,
    SessionTransitionEvent, TraceSink, Tracer, UserMessageEvent,
};

use lucida_harness::{
    CallLog, DepthOutcome, MessageRecorder, RecordingCompositor, RecordingScene, RecordingSurface,
    ScriptedService, ScriptedSession, SessionScript,
};

use lucida_debug::pretty::PrettyPrintSink;
use lucida_debug::recorder::RecorderSink;

/// 33.3ms camera frame interval in nanoseconds (≈30 Hz).
const FRAME_INTERVAL_NS: i64 = 33_333_333;

/// Dispatches every event to both the pretty printer and the recorder.
struct Fanout {
    pretty: PrettyPrintSink,
    recorder: RecorderSink,
}

impl TraceSink for Fanout {
    fn on_gate(&mut self, e: &GateEvent) {
        self.pretty.on_gate(e);
        self.recorder.on_gate(e);
    }

    fn on_session_transition(&mut self, e: &SessionTransitionEvent) {
        self.pretty.on_session_transition(e);
        self.recorder.on_session_transition(e);
    }

    fn on_frame_advanced(&mut self, e: &FrameAdvancedEvent) {
        self.pretty.on_frame_advanced(e);
        self.recorder.on_frame_advanced(e);
    }

    fn on_depth_acquisition(&mut self, e: &DepthAcquisitionEvent) {
        self.pretty.on_depth_acquisition(e);
        self.recorder.on_depth_acquisition(e);
    }

    fn on_cycle_summary(&mut self, e: &CycleSummaryEvent) {
        self.pretty.on_cycle_summary(e);
        self.recorder.on_cycle_summary(e);
    }

    fn on_user_message(&mut self, e: &UserMessageEvent<'_>) {
        self.pretty.on_user_message(e);
        self.recorder.on_user_message(e);
    }
}

fn main() {
    // -- sinks -------------------------------------------------------------
    let mut sink = Fanout {
        pretty: PrettyPrintSink::new(Box::new(std::io::stdout())),
        recorder: RecorderSink::new(),
    };
    let mut tracer = Tracer::new(&mut sink);

    // -- collaborators -----------------------------------------------------
    let log = CallLog::new();
    let mut service = ScriptedService::new(log.clone());
    let mut surface = RecordingSurface::new(log.clone());
    let mut compositor = RecordingCompositor::new(log.clone());
    let mut scene = RecordingScene::new(log.clone());
    let mut messages = MessageRecorder::default();

    let mut lifecycle = SessionLifecycleController::<ScriptedSession>::new();
    let mut orchestrator = FrameOrchestrator::new();
    let mut geometry = GeometryTracker::new();
    let depth_settings = DepthSettings::default();
    let instant_settings = InstantPlacementSettings::default();

    // -- scripts -----------------------------------------------------------
    // First foreground entry triggers the install flow; the second finds the
    // camera permission missing; the third gets a session.
    service.push_install(Ok(InstallStatus::InstallRequested));
    service.permission_granted = false;

    // Session one: the camera needs one cycle to produce a real frame and
    // two for the depth sensor to warm up, then loses the camera.
    let mut first = SessionScript::new(true);
    first.push_frame(0, TrackingState::Tracking, DepthOutcome::NotYetAvailable);
    let mut ts = FRAME_INTERVAL_NS;
    first.push_frame(ts, TrackingState::Tracking, DepthOutcome::NotYetAvailable);
    ts += FRAME_INTERVAL_NS;
    first.push_frame(ts, TrackingState::Tracking, DepthOutcome::Available);
    ts += FRAME_INTERVAL_NS;
    first.push_frame(ts, TrackingState::Paused, DepthOutcome::Available);
    ts += FRAME_INTERVAL_NS;
    first.push_frame(ts, TrackingState::Tracking, DepthOutcome::Available);
    first.push_advance_failure(ServiceError::CameraUnavailable);
    service.push_session(first);

    // Session two: the recovery session, created after the camera loss.
    let mut second = SessionScript::new(true);
    for _ in 0..6 {
        ts += FRAME_INTERVAL_NS;
        second.push_frame(ts, TrackingState::Tracking, DepthOutcome::Available);
    }
    service.push_session(second);

    // -- availability flows ------------------------------------------------
    geometry.on_surface_changed(640, 480);

    // Install prompt.
    lifecycle.on_foreground(
        &mut service,
        &mut surface,
        &depth_settings,
        &instant_settings,
        &mut messages,
        &mut tracer,
    );
    // Permission request.
    lifecycle.on_foreground(
        &mut service,
        &mut surface,
        &depth_settings,
        &instant_settings,
        &mut messages,
        &mut tracer,
    );
    service.permission_granted = true;
    // Ready: session created, configured, resumed.
    lifecycle.on_foreground(
        &mut service,
        &mut surface,
        &depth_settings,
        &instant_settings,
        &mut messages,
        &mut tracer,
    );

    // -- first session: warm-up, rotation, camera loss ---------------------
    for cycle in 0..6 {
        if cycle == 3 {
            geometry.on_rotation(DisplayRotation::Deg90);
        }
        orchestrator.run_cycle(
            &mut lifecycle,
            &mut geometry,
            &mut compositor,
            &mut scene,
            &depth_settings,
            &mut messages,
            &mut tracer,
        );
    }

    // -- recovery ----------------------------------------------------------
    lifecycle.on_foreground(
        &mut service,
        &mut surface,
        &depth_settings,
        &instant_settings,
        &mut messages,
        &mut tracer,
    );
    for _ in 0..3 {
        orchestrator.run_cycle(
            &mut lifecycle,
            &mut geometry,
            &mut compositor,
            &mut scene,
            &depth_settings,
            &mut messages,
            &mut tracer,
        );
    }

    // -- background/foreground round trip ----------------------------------
    lifecycle.on_background(&mut surface, &mut messages, &mut tracer);
    // A redraw that slips in while paused is a no-op.
    orchestrator.run_cycle(
        &mut lifecycle,
        &mut geometry,
        &mut compositor,
        &mut scene,
        &depth_settings,
        &mut messages,
        &mut tracer,
    );
    lifecycle.on_foreground(
        &mut service,
        &mut surface,
        &depth_settings,
        &instant_settings,
        &mut messages,
        &mut tracer,
    );
    for _ in 0..3 {
        orchestrator.run_cycle(
            &mut lifecycle,
            &mut geometry,
            &mut compositor,
            &mut scene,
            &depth_settings,
            &mut messages,
            &mut tracer,
        );
    }

    // -- teardown ----------------------------------------------------------
    lifecycle.close(&mut tracer);
    drop(tracer);

    assert_eq!(service.outstanding_depth_images(), 0);

    // -- export Chrome trace -----------------------------------------------
    let path = "session_trace.json";
    let file = File::create(path).expect("failed to create session_trace.json");
    let mut writer = BufWriter::new(file);
    lucida_debug::chrome::export(sink.recorder.as_bytes(), &mut writer)
        .expect("failed to write Chrome trace");

    println!(
        "Wrote {path} ({} cycles, {} messages shown)",
        orchestrator.cycles(),
        messages.shown.len(),
    );
}
