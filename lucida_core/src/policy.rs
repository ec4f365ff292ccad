// Copyright 2026 the Lucida Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Depth/occlusion decision logic.
//!
//! [`decide`] is a pure function of the device's depth capability and the
//! persisted [`DepthSettings`]. It is consulted when a
//! [`Configuration`](crate::config::Configuration) is built before a resume,
//! and again by the orchestrator on every cycle before the compositor is
//! reconfigured. The capability always wins: a device without depth support
//! gets everything depth-related forced off no matter what the settings say,
//! which also short-circuits depth-image acquisition upstream.

use crate::config::DepthMode;
use crate::settings::DepthSettings;

/// The outcome of one policy evaluation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DepthDecision {
    /// Depth mode to request from the session at the next configure.
    pub depth_mode: DepthMode,
    /// Whether the compositor should occlude virtual content.
    pub occlusion: bool,
    /// Whether the compositor should show the depth visualization.
    pub visualization: bool,
}

/// Maps device capability and user settings to a [`DepthDecision`].
#[must_use]
pub fn decide(depth_supported: bool, settings: &DepthSettings) -> DepthDecision {
    if !depth_supported {
        return DepthDecision {
            depth_mode: DepthMode::Disabled,
            occlusion: false,
            visualization: false,
        };
    }
    DepthDecision {
        depth_mode: DepthMode::Automatic,
        occlusion: settings.use_depth_for_occlusion,
        visualization: settings.show_depth_map,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_capability_forces_everything_off() {
        let settings = DepthSettings {
            use_depth_for_occlusion: true,
            show_depth_map: true,
        };
        let d = decide(false, &settings);
        assert_eq!(d.depth_mode, DepthMode::Disabled);
        assert!(!d.occlusion);
        assert!(!d.visualization);
    }

    #[test]
    fn capability_enables_automatic_depth() {
        let settings = DepthSettings {
            use_depth_for_occlusion: false,
            show_depth_map: false,
        };
        // Depth mode follows the capability, not the compositor settings.
        let d = decide(true, &settings);
        assert_eq!(d.depth_mode, DepthMode::Automatic);
        assert!(!d.occlusion);
        assert!(!d.visualization);
    }

    #[test]
    fn settings_pass_through_with_capability() {
        let settings = DepthSettings {
            use_depth_for_occlusion: true,
            show_depth_map: false,
        };
        let d = decide(true, &settings);
        assert!(d.occlusion);
        assert!(!d.visualization);
    }
}
