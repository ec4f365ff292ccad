// Copyright 2026 the Lucida Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Session configuration.
//!
//! A [`Configuration`] is a plain value rebuilt from the depth policy and the
//! current settings snapshot every time a session transitions into the
//! resumed state. It is never mutated on a resumed session; changing it
//! requires passing back through a resume transition.

use crate::policy;
use crate::settings::{DepthSettings, InstantPlacementSettings};

/// Lighting estimation mode requested from the service.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum LightEstimation {
    /// Environmental HDR light estimation.
    #[default]
    EnvironmentalHdr,
    /// No light estimation.
    Disabled,
}

/// Depth sensing mode requested from the service.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum DepthMode {
    /// The service produces depth images automatically.
    Automatic,
    /// Depth sensing is off.
    #[default]
    Disabled,
}

/// Instant-placement mode requested from the service.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum InstantPlacementMode {
    /// Instant placement with a local Y-up frame.
    LocalYUp,
    /// Instant placement is off.
    #[default]
    Disabled,
}

/// How `advance()` paces the orchestration loop.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum UpdateMode {
    /// `advance()` blocks up to one camera frame interval, acting as the
    /// loop's natural rate limiter.
    #[default]
    Blocking,
    /// `advance()` returns the latest camera image without blocking.
    LatestCameraImage,
}

/// The full configuration pushed into a session before it resumes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Configuration {
    /// Lighting estimation mode.
    pub light_estimation: LightEstimation,
    /// Depth sensing mode. Invariant: [`DepthMode::Automatic`] only when the
    /// active session reports depth support.
    pub depth_mode: DepthMode,
    /// Instant placement mode.
    pub instant_placement: InstantPlacementMode,
    /// Frame pacing mode.
    pub update_mode: UpdateMode,
}

impl Configuration {
    /// Builds the configuration for a session with the given depth
    /// capability and the current settings snapshots.
    #[must_use]
    pub fn build(
        depth_supported: bool,
        depth: &DepthSettings,
        instant: &InstantPlacementSettings,
    ) -> Self {
        let decision = policy::decide(depth_supported, depth);
        Self {
            light_estimation: LightEstimation::EnvironmentalHdr,
            depth_mode: decision.depth_mode,
            instant_placement: if instant.enabled {
                InstantPlacementMode::LocalYUp
            } else {
                InstantPlacementMode::Disabled
            },
            update_mode: UpdateMode::Blocking,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn depth_mode_follows_capability() {
        let depth = DepthSettings::default();
        let instant = InstantPlacementSettings::default();
        let with = Configuration::build(true, &depth, &instant);
        assert_eq!(with.depth_mode, DepthMode::Automatic);
        let without = Configuration::build(false, &depth, &instant);
        assert_eq!(without.depth_mode, DepthMode::Disabled);
    }

    #[test]
    fn instant_placement_maps_to_local_y_up() {
        let depth = DepthSettings::default();
        let on = Configuration::build(true, &depth, &InstantPlacementSettings { enabled: true });
        assert_eq!(on.instant_placement, InstantPlacementMode::LocalYUp);
        let off = Configuration::build(true, &depth, &InstantPlacementSettings { enabled: false });
        assert_eq!(off.instant_placement, InstantPlacementMode::Disabled);
    }

    #[test]
    fn blocking_update_is_the_default() {
        let c = Configuration::build(
            true,
            &DepthSettings::default(),
            &InstantPlacementSettings::default(),
        );
        assert_eq!(c.update_mode, UpdateMode::Blocking);
        assert_eq!(c.light_estimation, LightEstimation::EnvironmentalHdr);
    }
}
