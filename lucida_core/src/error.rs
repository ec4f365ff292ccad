// Copyright 2026 the Lucida Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types for the tracking service and rendering collaborators.
//!
//! Each failure domain gets its own plain enum. `Display` renders the
//! user-facing message for the transient message surface, so callers can
//! forward errors to a [`MessageSink`](crate::message::MessageSink) without a
//! separate mapping table.

use alloc::string::String;

/// Failures reported by the tracking/depth service.
///
/// The first five variants are availability failures seen while the
/// [`AvailabilityGate`](crate::availability::AvailabilityGate) or session
/// creation runs; [`CameraUnavailable`](Self::CameraUnavailable) can also
/// occur on a live session (at resume or while advancing a frame) and is
/// session-fatal but process-recoverable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ServiceError {
    /// The AR service is not installed and no install was started.
    NotInstalled,
    /// The user declined to install the AR service.
    InstallDeclined,
    /// The installed AR service is too old for this app.
    ServiceTooOld,
    /// This app is too old for the installed AR service.
    AppTooOld,
    /// The device does not support the AR service at all.
    DeviceIncompatible,
    /// Session creation failed for a reason not covered above.
    CreationFailed,
    /// The camera is not available (in use, disconnected, or revoked).
    CameraUnavailable,
}

impl ServiceError {
    /// Returns the user-facing message for this failure.
    #[must_use]
    pub const fn user_message(self) -> &'static str {
        match self {
            Self::NotInstalled | Self::InstallDeclined => "Please install ARCore",
            Self::ServiceTooOld => "Please update ARCore",
            Self::AppTooOld => "Please update this app",
            Self::DeviceIncompatible => "This device does not support AR",
            Self::CreationFailed => "Failed to create AR session",
            Self::CameraUnavailable => "Camera not available. Try restarting the app.",
        }
    }
}

impl core::fmt::Display for ServiceError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.user_message())
    }
}

impl core::error::Error for ServiceError {}

/// Failures reported by the background compositor.
///
/// Reconfiguring occlusion or depth visualization may require reading shader
/// assets; that read can fail.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CompositorError {
    /// A required asset file could not be read. Carries a detail string
    /// (typically the asset path or the underlying I/O error).
    AssetRead(String),
}

impl core::fmt::Display for CompositorError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::AssetRead(detail) => {
                write!(f, "Failed to read a required asset file: {detail}")
            }
        }
    }
}

impl core::error::Error for CompositorError {}
