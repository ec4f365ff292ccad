// Copyright 2026 the Lucida Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Availability gate for the AR service and camera permission.
//!
//! The gate runs at the top of every foreground entry while no session
//! exists. Install and permission flows are asynchronous: control leaves the
//! app and a later foreground callback re-enters the gate, so the gate's
//! non-terminal outcomes mean "come back next time", not "wait here".
//!
//! The install prompt is one-shot per gate instance: the first install query
//! may show UI, every later query runs silently. Once the environment is
//! ready the gate keeps returning [`Availability::Ready`] with no side
//! effects.

use crate::error::ServiceError;
use crate::service::{InstallStatus, TrackingService};
use crate::trace::GateOutcome;

/// Outcome of one gate evaluation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Availability {
    /// Service installed and camera permission granted; a session may be
    /// created.
    Ready,
    /// An install flow was started; defer session creation until the next
    /// foreground entry.
    InstallRequested,
    /// A permission flow was started; defer session creation until the next
    /// foreground entry.
    PermissionRequested,
    /// Terminal for this foreground cycle; carries the user-facing reason.
    Unavailable(ServiceError),
}

impl Availability {
    /// Strips the payload for tracing.
    #[must_use]
    pub const fn outcome(&self) -> GateOutcome {
        match self {
            Self::Ready => GateOutcome::Ready,
            Self::InstallRequested => GateOutcome::InstallRequested,
            Self::PermissionRequested => GateOutcome::PermissionRequested,
            Self::Unavailable(_) => GateOutcome::Unavailable,
        }
    }
}

/// Drives the one-shot install/permission flow before a session may exist.
#[derive(Clone, Copy, Debug, Default)]
pub struct AvailabilityGate {
    install_prompted: bool,
}

impl AvailabilityGate {
    /// Creates a gate that has not yet prompted for install.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            install_prompted: false,
        }
    }

    /// Evaluates availability, possibly starting an install or permission
    /// flow. Idempotent once the environment is ready.
    pub fn ensure_ready<S: TrackingService>(&mut self, service: &mut S) -> Availability {
        let prompt = !self.install_prompted;
        match service.request_install(prompt) {
            Ok(InstallStatus::InstallRequested) => {
                self.install_prompted = true;
                return Availability::InstallRequested;
            }
            Ok(InstallStatus::Installed) => {}
            Err(e) => return Availability::Unavailable(e),
        }

        if !service.camera_permission_granted() {
            service.request_camera_permission();
            return Availability::PermissionRequested;
        }

        Availability::Ready
    }
}
