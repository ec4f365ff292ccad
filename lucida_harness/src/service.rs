// Copyright 2026 the Lucida Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scripted tracking service and session.
//!
//! Tests queue the behaviors they want up front (install results, session
//! scripts, per-frame outcomes); the doubles then play them back while
//! recording every call and enforcing the session call-order contract with
//! panics.

use alloc::collections::VecDeque;
use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::Cell;

use lucida_core::config::Configuration;
use lucida_core::error::ServiceError;
use lucida_core::frame::{CameraIntrinsics, Frame, TrackingState};
use lucida_core::geometry::{uv_rotation, DisplayGeometry, DisplayRotation};
use lucida_core::render::TextureHandle;
use lucida_core::service::{DepthImage, InstallStatus, TrackingService, TrackingSession};
use lucida_core::transform::Transform3d;

use crate::log::{Call, CallLog};

/// Fixed intrinsics used for every scripted frame.
pub const TEST_INTRINSICS: CameraIntrinsics = CameraIntrinsics {
    fx: 500.0,
    fy: 500.0,
    cx: 320.0,
    cy: 240.0,
    width: 640,
    height: 480,
};

/// Depth availability for one scripted frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DepthOutcome {
    /// Depth data has not been produced yet (sensor warm-up).
    NotYetAvailable,
    /// A depth image can be acquired for this frame.
    Available,
}

/// One step of a session's frame script.
#[derive(Clone, Debug)]
pub enum FrameStep {
    /// `advance()` succeeds and produces this frame.
    Frame {
        /// Frame timestamp in nanoseconds.
        timestamp_ns: i64,
        /// Tracking state for this frame.
        tracking: TrackingState,
        /// Whether a depth image is available for this frame.
        depth: DepthOutcome,
    },
    /// `advance()` fails with this error.
    Fail(ServiceError),
}

/// The scripted behavior of one session, queued before creation.
#[derive(Clone, Debug, Default)]
pub struct SessionScript {
    /// Whether this session reports depth support.
    pub depth_supported: bool,
    /// Results played back by `resume()`, oldest first; an empty queue
    /// means every resume succeeds.
    pub resume_results: VecDeque<Result<(), ServiceError>>,
    /// Frame script consumed by `advance()`.
    pub frames: VecDeque<FrameStep>,
}

impl SessionScript {
    /// Creates an empty script with the given depth capability.
    #[must_use]
    pub fn new(depth_supported: bool) -> Self {
        Self {
            depth_supported,
            ..Self::default()
        }
    }

    /// Queues a successful frame.
    pub fn push_frame(&mut self, timestamp_ns: i64, tracking: TrackingState, depth: DepthOutcome) {
        self.frames.push_back(FrameStep::Frame {
            timestamp_ns,
            tracking,
            depth,
        });
    }

    /// Queues an `advance()` failure.
    pub fn push_advance_failure(&mut self, error: ServiceError) {
        self.frames.push_back(FrameStep::Fail(error));
    }

    /// Queues a `resume()` failure.
    pub fn push_resume_failure(&mut self, error: ServiceError) {
        self.resume_results.push_back(Err(error));
    }
}

/// A [`TrackingService`] that plays back queued install results and session
/// scripts.
#[derive(Debug)]
pub struct ScriptedService {
    log: CallLog,
    /// Results played back by `request_install`, oldest first; an empty
    /// queue means the service reports installed.
    pub install_results: VecDeque<Result<InstallStatus, ServiceError>>,
    /// Current camera permission state.
    pub permission_granted: bool,
    sessions: VecDeque<Result<SessionScript, ServiceError>>,
    outstanding: Rc<Cell<isize>>,
}

impl ScriptedService {
    /// Creates a service that is installed and has camera permission, with
    /// no sessions queued.
    #[must_use]
    pub fn new(log: CallLog) -> Self {
        Self {
            log,
            install_results: VecDeque::new(),
            permission_granted: true,
            sessions: VecDeque::new(),
            outstanding: Rc::new(Cell::new(0)),
        }
    }

    /// Queues an install result.
    pub fn push_install(&mut self, result: Result<InstallStatus, ServiceError>) {
        self.install_results.push_back(result);
    }

    /// Queues a session that `create_session` will produce.
    pub fn push_session(&mut self, script: SessionScript) {
        self.sessions.push_back(Ok(script));
    }

    /// Queues a `create_session` failure.
    pub fn push_session_failure(&mut self, error: ServiceError) {
        self.sessions.push_back(Err(error));
    }

    /// Number of depth-image guards currently alive across all sessions this
    /// service created. Must return to zero by the end of every cycle.
    #[must_use]
    pub fn outstanding_depth_images(&self) -> isize {
        self.outstanding.get()
    }
}

impl TrackingService for ScriptedService {
    type Session = ScriptedSession;

    fn request_install(&mut self, user_prompt: bool) -> Result<InstallStatus, ServiceError> {
        self.log.record(Call::RequestInstall { user_prompt });
        self.install_results
            .pop_front()
            .unwrap_or(Ok(InstallStatus::Installed))
    }

    fn camera_permission_granted(&self) -> bool {
        self.permission_granted
    }

    fn request_camera_permission(&mut self) {
        self.log.record(Call::RequestPermission);
    }

    fn create_session(&mut self) -> Result<Self::Session, ServiceError> {
        self.log.record(Call::CreateSession);
        let script = self
            .sessions
            .pop_front()
            .expect("no scripted session queued")?;
        Ok(ScriptedSession {
            log: self.log.clone(),
            depth_supported: script.depth_supported,
            resume_results: script.resume_results,
            frames: script.frames,
            configured: false,
            resumed: false,
            last_config: None,
            last_texture: None,
            last_geometry: None,
            pending_depth: None,
            outstanding: Rc::clone(&self.outstanding),
        })
    }
}

/// A [`TrackingSession`] playing back a [`SessionScript`].
///
/// Panics on call-order violations: configuring or resuming a resumed
/// session, resuming before configuring, advancing or pausing a session that
/// is not resumed.
#[derive(Debug)]
pub struct ScriptedSession {
    log: CallLog,
    depth_supported: bool,
    resume_results: VecDeque<Result<(), ServiceError>>,
    frames: VecDeque<FrameStep>,
    configured: bool,
    resumed: bool,
    /// Last configuration applied.
    pub last_config: Option<Configuration>,
    /// Last camera texture bound.
    pub last_texture: Option<TextureHandle>,
    /// Last display geometry pushed.
    pub last_geometry: Option<DisplayGeometry>,
    pending_depth: Option<DepthOutcome>,
    outstanding: Rc<Cell<isize>>,
}

impl TrackingSession for ScriptedSession {
    type Depth = ScriptedDepthImage;

    fn is_depth_supported(&self) -> bool {
        self.depth_supported
    }

    fn configure(&mut self, config: &Configuration) -> Result<(), ServiceError> {
        assert!(!self.resumed, "configure on a resumed session");
        self.log.record(Call::Configure);
        self.last_config = Some(*config);
        self.configured = true;
        Ok(())
    }

    fn resume(&mut self) -> Result<(), ServiceError> {
        assert!(!self.resumed, "resume on an already resumed session");
        assert!(self.configured, "resume before configure");
        self.log.record(Call::SessionResume);
        match self.resume_results.pop_front().unwrap_or(Ok(())) {
            Ok(()) => {
                self.resumed = true;
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    fn pause(&mut self) -> Result<(), ServiceError> {
        assert!(self.resumed, "pause on a session that is not resumed");
        self.log.record(Call::SessionPause);
        self.resumed = false;
        Ok(())
    }

    fn advance(&mut self) -> Result<Frame, ServiceError> {
        assert!(self.resumed, "advance on a session that is not resumed");
        self.log.record(Call::Advance);
        let step = self.frames.pop_front().expect("frame script exhausted");
        match step {
            FrameStep::Fail(e) => Err(e),
            FrameStep::Frame {
                timestamp_ns,
                tracking,
                depth,
            } => {
                self.pending_depth = Some(depth);
                let rotation = self
                    .last_geometry
                    .map_or(DisplayRotation::Deg0, |g| g.rotation);
                Ok(Frame {
                    timestamp_ns,
                    camera_pose: Transform3d::from_translation(0.0, 1.4, 0.0),
                    intrinsics: TEST_INTRINSICS,
                    tracking,
                    display_uv: uv_rotation(rotation),
                })
            }
        }
    }

    fn set_camera_texture(&mut self, texture: TextureHandle) {
        self.log.record(Call::SetCameraTexture);
        self.last_texture = Some(texture);
    }

    fn set_display_geometry(&mut self, geometry: DisplayGeometry) {
        self.log.record(Call::SetDisplayGeometry);
        self.last_geometry = Some(geometry);
    }

    fn acquire_depth_image(&mut self, _frame: &Frame) -> Option<Self::Depth> {
        self.log.record(Call::AcquireDepthImage);
        match self.pending_depth.take() {
            Some(DepthOutcome::Available) => Some(ScriptedDepthImage::new(Rc::clone(
                &self.outstanding,
            ))),
            _ => None,
        }
    }
}

/// A small deterministic depth buffer that tracks its own lifetime.
///
/// The shared outstanding counter increments on creation and decrements on
/// drop; tests assert it returns to zero to prove the orchestrator releases
/// the buffer on every exit path.
#[derive(Debug)]
pub struct ScriptedDepthImage {
    data: Vec<u16>,
    outstanding: Rc<Cell<isize>>,
}

impl ScriptedDepthImage {
    fn new(outstanding: Rc<Cell<isize>>) -> Self {
        outstanding.set(outstanding.get() + 1);
        // A 4×4 millimeter ramp, recognizable in assertions.
        let data = (0..16).map(|i| 1000 + i * 25).collect();
        Self { data, outstanding }
    }
}

impl DepthImage for ScriptedDepthImage {
    fn width(&self) -> u32 {
        4
    }

    fn height(&self) -> u32 {
        4
    }

    fn data(&self) -> &[u16] {
        &self.data
    }
}

impl Drop for ScriptedDepthImage {
    fn drop(&mut self) {
        self.outstanding.set(self.outstanding.get() - 1);
    }
}
