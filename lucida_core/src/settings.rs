// Copyright 2026 the Lucida Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Persisted user settings consumed by the core.
//!
//! The settings stores are owned by the UI layer; the core only ever receives
//! snapshots by reference and never writes them back. The `Default` impls are
//! the launch defaults, not a persistence mechanism.

/// Depth-related user preferences.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DepthSettings {
    /// Occlude virtual content behind real-world depth.
    pub use_depth_for_occlusion: bool,
    /// Show the color-mapped depth visualization instead of the camera image.
    pub show_depth_map: bool,
}

impl Default for DepthSettings {
    fn default() -> Self {
        Self {
            use_depth_for_occlusion: true,
            show_depth_map: true,
        }
    }
}

impl DepthSettings {
    /// True if either depth-consuming feature is enabled.
    #[must_use]
    pub const fn any_depth_use(&self) -> bool {
        self.use_depth_for_occlusion || self.show_depth_map
    }
}

/// Instant-placement user preference.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InstantPlacementSettings {
    /// Allow placing content before full environmental understanding.
    pub enabled: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn launch_defaults() {
        let depth = DepthSettings::default();
        assert!(depth.use_depth_for_occlusion);
        assert!(depth.show_depth_map);
        assert!(!InstantPlacementSettings::default().enabled);
    }

    #[test]
    fn any_depth_use() {
        let mut depth = DepthSettings::default();
        assert!(depth.any_depth_use());
        depth.use_depth_for_occlusion = false;
        assert!(depth.any_depth_use());
        depth.show_depth_map = false;
        assert!(!depth.any_depth_use());
    }
}
