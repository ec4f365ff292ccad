// Copyright 2026 the Lucida Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Display geometry tracking.
//!
//! The host reports viewport resizes and rotation events on its own
//! schedule; the session only wants to hear about them once, before the next
//! frame is requested. [`GeometryTracker`] records the latest
//! [`DisplayGeometry`] and hands it out through [`take_changed`] exactly once
//! per change, which the orchestrator consumes at the top of each cycle.
//!
//! [`uv_rotation`] is the reference construction for the background UV
//! mapping a rotated display implies; scripted sessions use it to populate
//! [`Frame::display_uv`](crate::frame::Frame::display_uv).
//!
//! [`take_changed`]: GeometryTracker::take_changed

use kurbo::Affine;

/// Display rotation in quarter turns.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum DisplayRotation {
    /// Natural orientation.
    #[default]
    Deg0,
    /// Rotated 90° counterclockwise.
    Deg90,
    /// Rotated 180°.
    Deg180,
    /// Rotated 270° counterclockwise.
    Deg270,
}

impl DisplayRotation {
    /// Returns the rotation angle in radians.
    #[must_use]
    pub const fn radians(self) -> f64 {
        match self {
            Self::Deg0 => 0.0,
            Self::Deg90 => core::f64::consts::FRAC_PI_2,
            Self::Deg180 => core::f64::consts::PI,
            Self::Deg270 => 3.0 * core::f64::consts::FRAC_PI_2,
        }
    }
}

/// Viewport size and rotation, as last reported by the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DisplayGeometry {
    /// Viewport width in pixels.
    pub width: u32,
    /// Viewport height in pixels.
    pub height: u32,
    /// Current display rotation.
    pub rotation: DisplayRotation,
}

/// Records host resize/rotation events and hands out changed geometry once.
#[derive(Clone, Copy, Debug, Default)]
pub struct GeometryTracker {
    current: Option<DisplayGeometry>,
    changed: bool,
}

impl GeometryTracker {
    /// Creates a tracker with no geometry yet.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            current: None,
            changed: false,
        }
    }

    /// Records a viewport resize. The rotation is kept from the previous
    /// geometry (natural orientation if there was none).
    pub fn on_surface_changed(&mut self, width: u32, height: u32) {
        let rotation = self.current.map_or(DisplayRotation::Deg0, |g| g.rotation);
        self.set(DisplayGeometry {
            width,
            height,
            rotation,
        });
    }

    /// Records a rotation event. A rotation before any resize is remembered
    /// and applied once the first surface size arrives.
    pub fn on_rotation(&mut self, rotation: DisplayRotation) {
        match self.current {
            Some(g) => self.set(DisplayGeometry { rotation, ..g }),
            None => {
                self.current = Some(DisplayGeometry {
                    width: 0,
                    height: 0,
                    rotation,
                });
            }
        }
    }

    /// Returns the geometry if it changed since the last take, clearing the
    /// changed flag. The caller is expected to push the result into the
    /// session before requesting the next frame.
    pub fn take_changed(&mut self) -> Option<DisplayGeometry> {
        if !self.changed {
            return None;
        }
        self.changed = false;
        self.current
    }

    /// Returns the most recent geometry regardless of the changed flag.
    #[must_use]
    pub const fn current(&self) -> Option<DisplayGeometry> {
        self.current
    }

    fn set(&mut self, geometry: DisplayGeometry) {
        if self.current != Some(geometry) {
            self.current = Some(geometry);
            self.changed = true;
        }
    }
}

/// Returns the UV mapping implied by a display rotation: a quarter-turn
/// rotation about the texture center `(0.5, 0.5)`.
#[must_use]
pub fn uv_rotation(rotation: DisplayRotation) -> Affine {
    Affine::translate((0.5, 0.5)) * Affine::rotate(rotation.radians()) * Affine::translate((-0.5, -0.5))
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Point;

    #[test]
    fn take_changed_is_one_shot() {
        let mut tracker = GeometryTracker::new();
        assert_eq!(tracker.take_changed(), None);

        tracker.on_surface_changed(640, 480);
        let g = tracker.take_changed().unwrap();
        assert_eq!((g.width, g.height), (640, 480));
        assert_eq!(g.rotation, DisplayRotation::Deg0);
        assert_eq!(tracker.take_changed(), None);
    }

    #[test]
    fn rotation_preserves_size() {
        let mut tracker = GeometryTracker::new();
        tracker.on_surface_changed(640, 480);
        let _ = tracker.take_changed();

        tracker.on_rotation(DisplayRotation::Deg90);
        let g = tracker.take_changed().unwrap();
        assert_eq!((g.width, g.height), (640, 480));
        assert_eq!(g.rotation, DisplayRotation::Deg90);
    }

    #[test]
    fn same_geometry_does_not_mark_changed() {
        let mut tracker = GeometryTracker::new();
        tracker.on_surface_changed(640, 480);
        let _ = tracker.take_changed();
        tracker.on_surface_changed(640, 480);
        assert_eq!(tracker.take_changed(), None);
    }

    #[test]
    fn uv_rotation_quarter_turn() {
        let uv = uv_rotation(DisplayRotation::Deg90);
        let p = uv * Point::new(0.0, 0.0);
        // 90° about the center maps the origin corner to (1, 0).
        assert!((p.x - 1.0).abs() < 1e-9, "x was {}", p.x);
        assert!(p.y.abs() < 1e-9, "y was {}", p.y);
    }

    #[test]
    fn uv_rotation_identity_at_natural_orientation() {
        let uv = uv_rotation(DisplayRotation::Deg0);
        let p = uv * Point::new(0.25, 0.75);
        assert!((p.x - 0.25).abs() < 1e-9);
        assert!((p.y - 0.75).abs() < 1e-9);
    }
}
