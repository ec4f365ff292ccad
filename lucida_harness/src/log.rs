// Copyright 2026 the Lucida Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shared call log for cross-collaborator ordering assertions.

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::RefCell;

/// One recorded call on any of the doubles.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Call {
    /// `TrackingService::request_install`.
    RequestInstall {
        /// Whether the install UI was allowed to show.
        user_prompt: bool,
    },
    /// `TrackingService::request_camera_permission`.
    RequestPermission,
    /// `TrackingService::create_session`.
    CreateSession,
    /// `TrackingSession::configure`.
    Configure,
    /// `TrackingSession::resume`.
    SessionResume,
    /// `TrackingSession::pause`.
    SessionPause,
    /// `TrackingSession::advance`.
    Advance,
    /// `TrackingSession::set_camera_texture`.
    SetCameraTexture,
    /// `TrackingSession::set_display_geometry`.
    SetDisplayGeometry,
    /// `TrackingSession::acquire_depth_image`.
    AcquireDepthImage,
    /// `RenderSurface::resume_callbacks`.
    SurfaceResume,
    /// `RenderSurface::pause_callbacks`.
    SurfacePause,
    /// `BackgroundCompositor::set_depth_visualization`.
    SetVisualization(bool),
    /// `BackgroundCompositor::set_occlusion`.
    SetOcclusion(bool),
    /// `BackgroundCompositor::update_display_geometry`.
    UpdateDisplayGeometry,
    /// `BackgroundCompositor::update_depth_texture`.
    UpdateDepthTexture,
    /// `BackgroundCompositor::draw_background`.
    DrawBackground,
    /// `SceneRenderer::draw_scene`.
    DrawScene,
}

/// A cheaply clonable, shared, append-only call log.
#[derive(Clone, Debug, Default)]
pub struct CallLog(Rc<RefCell<Vec<Call>>>);

impl CallLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a call.
    pub fn record(&self, call: Call) {
        self.0.borrow_mut().push(call);
    }

    /// Returns a snapshot of all recorded calls in order.
    #[must_use]
    pub fn calls(&self) -> Vec<Call> {
        self.0.borrow().clone()
    }

    /// Returns the position of the first occurrence of `call`, if any.
    #[must_use]
    pub fn index_of(&self, call: &Call) -> Option<usize> {
        self.0.borrow().iter().position(|c| c == call)
    }

    /// Returns how many times `call` was recorded.
    #[must_use]
    pub fn count(&self, call: &Call) -> usize {
        self.0.borrow().iter().filter(|c| *c == call).count()
    }

    /// Whether `call` was recorded at least once.
    #[must_use]
    pub fn contains(&self, call: &Call) -> bool {
        self.index_of(call).is_some()
    }

    /// Asserts that each of `expected` occurs in the log, in the given
    /// relative order (other calls may be interleaved).
    ///
    /// # Panics
    ///
    /// Panics with the full log if the order does not hold.
    pub fn assert_order(&self, expected: &[Call]) {
        let calls = self.0.borrow();
        let mut cursor = 0;
        for want in expected {
            match calls[cursor..].iter().position(|c| c == want) {
                Some(offset) => cursor += offset + 1,
                None => panic!("expected {want:?} after position {cursor}, log: {calls:?}"),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_in_order() {
        let log = CallLog::new();
        log.record(Call::Configure);
        log.record(Call::SessionResume);
        log.record(Call::SurfaceResume);
        assert_eq!(log.index_of(&Call::Configure), Some(0));
        assert_eq!(log.index_of(&Call::SurfaceResume), Some(2));
        log.assert_order(&[Call::Configure, Call::SessionResume, Call::SurfaceResume]);
    }

    #[test]
    #[should_panic(expected = "expected Configure after position")]
    fn assert_order_catches_inversion() {
        let log = CallLog::new();
        log.record(Call::SessionResume);
        log.record(Call::Configure);
        log.assert_order(&[Call::Configure, Call::SessionResume, Call::Configure]);
    }

    #[test]
    fn clones_share_storage() {
        let log = CallLog::new();
        let other = log.clone();
        other.record(Call::DrawScene);
        assert_eq!(log.count(&Call::DrawScene), 1);
    }
}
