// Copyright 2026 the Lucida Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-cycle frame snapshot and camera model.
//!
//! A [`Frame`] is produced by advancing the session exactly once per
//! orchestration cycle and lives for exactly that cycle; it is never cached.
//! The camera is a pinhole model: [`CameraIntrinsics`] plus the session's
//! pose estimate, from which [`CameraIntrinsics::projection`] derives the
//! OpenGL-convention projection matrix used for scene drawing.

use kurbo::Affine;

use crate::transform::Transform3d;

/// Whether the device's pose estimate is currently valid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TrackingState {
    /// The pose estimate is valid.
    Tracking,
    /// Tracking is temporarily interrupted; no valid pose.
    Paused,
    /// Tracking has stopped.
    Stopped,
}

/// Pinhole camera intrinsics in pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraIntrinsics {
    /// Focal length along x.
    pub fx: f64,
    /// Focal length along y.
    pub fy: f64,
    /// Principal point x.
    pub cx: f64,
    /// Principal point y.
    pub cy: f64,
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
}

impl CameraIntrinsics {
    /// Builds the OpenGL-convention perspective projection for these
    /// intrinsics with the given near/far clip distances.
    ///
    /// A principal point at the image center yields a symmetric frustum.
    #[must_use]
    pub fn projection(&self, z_near: f64, z_far: f64) -> Transform3d {
        let w = f64::from(self.width);
        let h = f64::from(self.height);
        let depth = z_far - z_near;
        Transform3d::from_cols(
            [2.0 * self.fx / w, 0.0, 0.0, 0.0],
            [0.0, 2.0 * self.fy / h, 0.0, 0.0],
            [
                1.0 - 2.0 * self.cx / w,
                2.0 * self.cy / h - 1.0,
                -(z_far + z_near) / depth,
                -1.0,
            ],
            [0.0, 0.0, -2.0 * z_far * z_near / depth, 0.0],
        )
    }
}

/// One timestamped snapshot produced by advancing the session.
#[derive(Clone, Copy, Debug)]
pub struct Frame {
    /// Frame timestamp in nanoseconds. Zero means the camera has not yet
    /// produced its first real frame for this session; nothing is drawn
    /// from such a frame.
    pub timestamp_ns: i64,
    /// The camera pose estimate at this frame.
    pub camera_pose: Transform3d,
    /// Camera intrinsics for this frame.
    pub intrinsics: CameraIntrinsics,
    /// Tracking state at this frame.
    pub tracking: TrackingState,
    /// Mapping from normalized viewport coordinates to camera texture
    /// coordinates, recomputed by the service when display geometry changes.
    pub display_uv: Affine,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn centered() -> CameraIntrinsics {
        CameraIntrinsics {
            fx: 500.0,
            fy: 500.0,
            cx: 320.0,
            cy: 240.0,
            width: 640,
            height: 480,
        }
    }

    #[test]
    fn centered_principal_point_is_symmetric() {
        let proj = centered().projection(0.1, 100.0);
        // Off-center terms vanish when the principal point is centered.
        assert_eq!(proj.col(2)[0], 0.0);
        assert_eq!(proj.col(2)[1], 0.0);
        // Perspective divide row.
        assert_eq!(proj.col(2)[3], -1.0);
        assert!(proj.is_finite());
    }

    #[test]
    fn projection_focal_scaling() {
        let proj = centered().projection(0.1, 100.0);
        assert!((proj.col(0)[0] - 2.0 * 500.0 / 640.0).abs() < 1e-12);
        assert!((proj.col(1)[1] - 2.0 * 500.0 / 480.0).abs() < 1e-12);
    }

    #[test]
    fn projection_clip_terms() {
        let proj = centered().projection(0.1, 100.0);
        let depth = 100.0 - 0.1;
        assert!((proj.col(2)[2] - (-(100.0 + 0.1) / depth)).abs() < 1e-12);
        assert!((proj.col(3)[2] - (-2.0 * 100.0 * 0.1 / depth)).abs() < 1e-12);
    }

    #[test]
    fn off_center_principal_point_shifts_frustum() {
        let mut intr = centered();
        intr.cx = 300.0;
        let proj = intr.projection(0.1, 100.0);
        assert!(proj.col(2)[0] > 0.0);
    }
}
