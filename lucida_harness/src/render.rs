// Copyright 2026 the Lucida Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Recording rendering collaborators.

use kurbo::Affine;

use lucida_core::error::CompositorError;
use lucida_core::frame::Frame;
use lucida_core::render::{BackgroundCompositor, RenderSurface, SceneRenderer, TextureHandle};
use lucida_core::service::DepthImage;
use lucida_core::transform::Transform3d;

use crate::log::{Call, CallLog};

/// A [`RenderSurface`] that records callback start/stop.
#[derive(Debug)]
pub struct RecordingSurface {
    log: CallLog,
    /// Whether redraw callbacks are currently delivered.
    pub resumed: bool,
}

impl RecordingSurface {
    /// Creates a surface with callbacks stopped.
    #[must_use]
    pub fn new(log: CallLog) -> Self {
        Self {
            log,
            resumed: false,
        }
    }
}

impl RenderSurface for RecordingSurface {
    fn resume_callbacks(&mut self) {
        self.log.record(Call::SurfaceResume);
        self.resumed = true;
    }

    fn pause_callbacks(&mut self) {
        self.log.record(Call::SurfacePause);
        self.resumed = false;
    }
}

/// A [`BackgroundCompositor`] that records calls and keeps the last state
/// seen, with scriptable asset-read failures.
#[derive(Debug)]
pub struct RecordingCompositor {
    log: CallLog,
    /// The camera color texture handle handed to sessions.
    pub texture: TextureHandle,
    /// Make the next `set_depth_visualization` fail.
    pub fail_visualization: bool,
    /// Make the next `set_occlusion` fail.
    pub fail_occlusion: bool,
    /// Last visualization flag applied, if any.
    pub visualization: Option<bool>,
    /// Last occlusion flag applied, if any.
    pub occlusion: Option<bool>,
    /// Last display UV transform seen.
    pub last_uv: Option<Affine>,
    /// Size of the last depth image uploaded.
    pub last_depth_size: Option<(u32, u32)>,
    /// Number of depth texture uploads.
    pub depth_updates: usize,
    /// Number of background draws.
    pub background_draws: usize,
}

impl RecordingCompositor {
    /// Creates a compositor with an arbitrary fixed texture handle.
    #[must_use]
    pub fn new(log: CallLog) -> Self {
        Self {
            log,
            texture: TextureHandle(7),
            fail_visualization: false,
            fail_occlusion: false,
            visualization: None,
            occlusion: None,
            last_uv: None,
            last_depth_size: None,
            depth_updates: 0,
            background_draws: 0,
        }
    }
}

impl BackgroundCompositor for RecordingCompositor {
    fn camera_texture(&self) -> TextureHandle {
        self.texture
    }

    fn set_depth_visualization(&mut self, enabled: bool) -> Result<(), CompositorError> {
        self.log.record(Call::SetVisualization(enabled));
        if self.fail_visualization {
            return Err(CompositorError::AssetRead(
                "shaders/background_show_depth_color_visualization.frag".into(),
            ));
        }
        self.visualization = Some(enabled);
        Ok(())
    }

    fn set_occlusion(&mut self, enabled: bool) -> Result<(), CompositorError> {
        self.log.record(Call::SetOcclusion(enabled));
        if self.fail_occlusion {
            return Err(CompositorError::AssetRead("shaders/occlusion.frag".into()));
        }
        self.occlusion = Some(enabled);
        Ok(())
    }

    fn update_display_geometry(&mut self, frame: &Frame) {
        self.log.record(Call::UpdateDisplayGeometry);
        self.last_uv = Some(frame.display_uv);
    }

    fn update_depth_texture(&mut self, depth: &dyn DepthImage) {
        self.log.record(Call::UpdateDepthTexture);
        self.last_depth_size = Some((depth.width(), depth.height()));
        self.depth_updates += 1;
    }

    fn draw_background(&mut self) {
        self.log.record(Call::DrawBackground);
        self.background_draws += 1;
    }
}

/// A [`SceneRenderer`] that records draws and the last projection.
#[derive(Debug)]
pub struct RecordingScene {
    log: CallLog,
    /// Number of scene draws.
    pub draws: usize,
    /// The projection matrix from the last draw.
    pub last_projection: Option<Transform3d>,
}

impl RecordingScene {
    /// Creates a scene renderer with no draws recorded.
    #[must_use]
    pub fn new(log: CallLog) -> Self {
        Self {
            log,
            draws: 0,
            last_projection: None,
        }
    }
}

impl SceneRenderer for RecordingScene {
    fn draw_scene(&mut self, _frame: &Frame, projection: &Transform3d) {
        self.log.record(Call::DrawScene);
        self.draws += 1;
        self.last_projection = Some(*projection);
    }
}
