// Copyright 2026 the Lucida Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Rendering collaborator contracts.
//!
//! The core issues draw calls in a fixed order but owns no GPU objects.
//! Three traits mark the boundary:
//!
//! - **[`RenderSurface`]** — start/stop of redraw callback delivery. The
//!   lifecycle controller resumes it only after the service is confirmed
//!   live, and pauses it (a blocking handshake) before the service is
//!   touched on the way down. That ordering is what serializes lifecycle
//!   transitions against in-flight cycles without any locking.
//!
//! - **[`BackgroundCompositor`]** — the camera image / depth visualization
//!   layer. Reconfiguring it may read shader assets and can fail.
//!
//! - **[`SceneRenderer`]** — virtual content drawn with the tracked pose and
//!   a projection matrix. Shader math and mesh geometry live entirely behind
//!   this trait.

use crate::error::CompositorError;
use crate::frame::Frame;
use crate::service::DepthImage;
use crate::transform::Transform3d;

/// An opaque GPU texture handle shared between compositor and session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TextureHandle(pub u32);

/// Controls delivery of redraw callbacks to the orchestration loop.
pub trait RenderSurface {
    /// Starts redraw callback delivery.
    fn resume_callbacks(&mut self);

    /// Stops redraw callback delivery. Blocks until any in-flight redraw
    /// callback has returned, so no cycle can observe the session after
    /// this call.
    fn pause_callbacks(&mut self);
}

/// Composites the camera image (or depth visualization) behind the scene.
pub trait BackgroundCompositor {
    /// The camera color texture the session renders into. Bound into the
    /// session once per session instance.
    fn camera_texture(&self) -> TextureHandle;

    /// Enables or disables the depth-map color visualization. May need to
    /// read shader assets.
    fn set_depth_visualization(&mut self, enabled: bool) -> Result<(), CompositorError>;

    /// Enables or disables depth occlusion. May need to read shader assets.
    fn set_occlusion(&mut self, enabled: bool) -> Result<(), CompositorError>;

    /// Updates the coordinates used to draw the camera image from the
    /// frame's display UV transform. Called every cycle; camera framing can
    /// change without a rotation event.
    fn update_display_geometry(&mut self, frame: &Frame);

    /// Uploads a freshly acquired depth image to the depth texture.
    fn update_depth_texture(&mut self, depth: &dyn DepthImage);

    /// Draws the background. Only called with a frame whose timestamp is
    /// non-zero.
    fn draw_background(&mut self);
}

/// Draws virtual content for a tracked frame.
pub trait SceneRenderer {
    /// Draws the scene with the frame's pose and the given projection.
    fn draw_scene(&mut self, frame: &Frame, projection: &Transform3d);
}
