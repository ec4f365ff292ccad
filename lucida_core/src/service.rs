// Copyright 2026 the Lucida Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracking/depth service contract.
//!
//! Lucida treats the AR service as a black box behind two traits:
//!
//! - **[`TrackingService`]** — the process-wide entry point: install status,
//!   camera permission, and session creation. The
//!   [`AvailabilityGate`](crate::availability::AvailabilityGate) is its only
//!   pre-session consumer.
//!
//! - **[`TrackingSession`]** — one live AR experience. Owned exclusively by
//!   the [`SessionLifecycleController`](crate::lifecycle); advanced one frame
//!   at a time by the orchestrator. Closing a session is dropping it: native
//!   resource release is the implementation's `Drop` responsibility.
//!
//! - **[`DepthImage`]** — a scoped 16-bit depth buffer acquired from a frame.
//!   The buffer is returned to the service when the value is dropped, which
//!   the orchestrator relies on to guarantee release on every exit path of a
//!   cycle.
//!
//! Redraw delivery is deliberately not abstracted here: the host calls
//! [`FrameOrchestrator::run_cycle`](crate::orchestrator::FrameOrchestrator::run_cycle)
//! from its own redraw callback, and the callback's start/stop handshake goes
//! through [`RenderSurface`](crate::render::RenderSurface).

use crate::config::Configuration;
use crate::error::ServiceError;
use crate::frame::Frame;
use crate::geometry::DisplayGeometry;
use crate::render::TextureHandle;

/// Result of an install query or install request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InstallStatus {
    /// The service is installed and up to date.
    Installed,
    /// An install/update flow was started; control is leaving the app and
    /// the caller must retry on the next foreground entry.
    InstallRequested,
}

/// Process-wide entry point to the tracking/depth service.
pub trait TrackingService {
    /// The session type this service creates.
    type Session: TrackingSession;

    /// Queries install status, optionally prompting the user to install or
    /// update the service. `user_prompt` is true at most once per gate
    /// instance; later queries run without UI.
    fn request_install(&mut self, user_prompt: bool) -> Result<InstallStatus, ServiceError>;

    /// Whether camera permission is currently granted.
    fn camera_permission_granted(&self) -> bool;

    /// Starts the asynchronous camera permission flow. The outcome arrives
    /// via a later [`camera_permission_granted`] query.
    ///
    /// [`camera_permission_granted`]: Self::camera_permission_granted
    fn request_camera_permission(&mut self);

    /// Creates a new session. Only called after the availability gate
    /// reports ready; may still fail (e.g. an uninstall race).
    fn create_session(&mut self) -> Result<Self::Session, ServiceError>;
}

/// One live AR experience.
///
/// Call-order contract: [`configure`](Self::configure) before
/// [`resume`](Self::resume); [`advance`](Self::advance) only while resumed.
/// Implementations are free to treat violations as fatal; the scripted
/// doubles panic on them.
pub trait TrackingSession {
    /// The scoped depth buffer type this session produces.
    type Depth: DepthImage;

    /// Whether the device supports automatic depth for this session.
    fn is_depth_supported(&self) -> bool;

    /// Applies a configuration. Must not be called while resumed.
    fn configure(&mut self, config: &Configuration) -> Result<(), ServiceError>;

    /// Resumes frame production. Fails with
    /// [`ServiceError::CameraUnavailable`] if the camera cannot be opened.
    fn resume(&mut self) -> Result<(), ServiceError>;

    /// Pauses frame production.
    fn pause(&mut self) -> Result<(), ServiceError>;

    /// Advances by exactly one frame. Under
    /// [`UpdateMode::Blocking`](crate::config::UpdateMode::Blocking) this
    /// blocks up to one camera frame interval. Fails with
    /// [`ServiceError::CameraUnavailable`] if the camera is lost mid-session.
    fn advance(&mut self) -> Result<Frame, ServiceError>;

    /// Binds the compositor's camera color texture. Set at most once per
    /// session instance, from the render thread.
    fn set_camera_texture(&mut self, texture: TextureHandle);

    /// Pushes new display geometry, to be applied before the next frame.
    fn set_display_geometry(&mut self, geometry: DisplayGeometry);

    /// Tries to acquire the depth image for `frame`. `None` means the depth
    /// data is not yet available, which is expected while the sensor warms
    /// up and is not an error.
    fn acquire_depth_image(&mut self, frame: &Frame) -> Option<Self::Depth>;
}

/// A scoped 16-bit depth buffer, released back to the service on drop.
pub trait DepthImage {
    /// Buffer width in pixels.
    fn width(&self) -> u32;
    /// Buffer height in pixels.
    fn height(&self) -> u32;
    /// Row-major depth values in millimeters.
    fn data(&self) -> &[u16];
}
