/*!
Terrain and ground-resolver settings and tolerances.

These constants centralize the parameters used by the platform adapter, the
connectivity builder, terrain queries, and the ground resolver. Keeping them
together makes tuning easier and keeps behavior identical between the map
loader and the physics tick.

Notes
- Distances are in terrain units (map pixels); Y grows downward.
- Favor practical world-space tolerances over machine epsilon. Authoring data is
  rounded to whole units, so one unit is the natural "same point" threshold.
- The settings structs default to these constants. Override them per map or per
  actor from your game data (they deserialize with `#[serde(default)]`, so a
  TOML table may name only the fields it changes).
*/

use serde::{Deserialize, Serialize};

/// Practical small distance for geometric comparisons (units).
/// Below this a segment's X span is treated as zero when interpolating.
pub const DIST_EPS: f32 = 1.0e-4;

/// Horizontal span below which a segment counts as a wall (units).
pub const WALL_EPSILON: f32 = 1.0;

/// Maximum per-axis gap between two endpoints that still link them (units).
pub const LINK_EPSILON: f32 = 1.0;

/// Clearance subtracted from the surface Y returned by ground queries (units).
/// Lets a caller place a body on the surface without re-colliding next tick.
pub const GROUND_CLEARANCE: f32 = 1.0;

/// Sentinel for "no ground found" when a plain number is required.
/// Never a real coordinate; compare against it, never do arithmetic with it.
pub const NO_GROUND: f32 = f32::MAX;

/// Default vertical tolerance for "is this point on a foothold" checks (units).
pub const FOOTHOLD_TOLERANCE: f32 = 1.0;

/// How far the feet may sink below a surface and still count as standing on it.
pub const UP_TOLERANCE: f32 = 2.0;

/// How far below the feet a surface is still accepted while already grounded.
/// Larger than `LANDING_TOLERANCE` so float jitter does not detach a body at rest.
pub const DOWN_TOLERANCE: f32 = 4.0;

/// How far below the feet a surface is accepted for an airborne body.
pub const LANDING_TOLERANCE: f32 = 1.0;

/// Default half-width of a tracked body for wall contact (units).
pub const BODY_HALF_WIDTH: f32 = 12.0;

/// Default height of a tracked body for wall contact (units).
pub const BODY_HEIGHT: f32 = 60.0;

/// Horizontal reach used to grab a ladder or rope (units).
pub const CLIMB_REACH: f32 = 10.0;

/// Default search radius for nearest-foothold recovery (units).
pub const NEAREST_SEARCH_RADIUS: f32 = 1000.0;

/// Footholds logged individually at debug level on each load.
pub const LOAD_LOG_SAMPLE: usize = 5;

/// Parameters for turning platforms into footholds.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdapterSettings {
    /// See [`WALL_EPSILON`].
    pub wall_epsilon: f32,
}

impl Default for AdapterSettings {
    fn default() -> Self {
        Self {
            wall_epsilon: WALL_EPSILON,
        }
    }
}

/// Parameters applied when a terrain is built from platforms and queried.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainSettings {
    pub adapter: AdapterSettings,
    /// See [`LINK_EPSILON`].
    pub link_epsilon: f32,
    /// See [`GROUND_CLEARANCE`].
    pub ground_clearance: f32,
}

impl Default for TerrainSettings {
    fn default() -> Self {
        Self {
            adapter: AdapterSettings::default(),
            link_epsilon: LINK_EPSILON,
            ground_clearance: GROUND_CLEARANCE,
        }
    }
}

/// Per-actor parameters for the ground resolver.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverSettings {
    /// See [`UP_TOLERANCE`].
    pub up_tolerance: f32,
    /// See [`DOWN_TOLERANCE`].
    pub down_tolerance: f32,
    /// See [`LANDING_TOLERANCE`].
    pub landing_tolerance: f32,
    /// See [`BODY_HALF_WIDTH`].
    pub body_half_width: f32,
    /// See [`BODY_HEIGHT`].
    pub body_height: f32,
}

impl Default for ResolverSettings {
    fn default() -> Self {
        Self {
            up_tolerance: UP_TOLERANCE,
            down_tolerance: DOWN_TOLERANCE,
            landing_tolerance: LANDING_TOLERANCE,
            body_half_width: BODY_HALF_WIDTH,
            body_height: BODY_HEIGHT,
        }
    }
}

impl ResolverSettings {
    /// Downward acceptance window for the current tick.
    ///
    /// A grounded body keeps its surface across small gaps; an airborne body only
    /// latches once it is effectively on the surface.
    #[inline]
    pub fn below_window(&self, previous_grounded: bool) -> f32 {
        if previous_grounded {
            self.down_tolerance.max(self.landing_tolerance).max(0.0)
        } else {
            self.landing_tolerance.max(0.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_constants() {
        let terrain = TerrainSettings::default();
        assert_eq!(terrain.adapter.wall_epsilon, WALL_EPSILON);
        assert_eq!(terrain.link_epsilon, LINK_EPSILON);
        assert_eq!(terrain.ground_clearance, GROUND_CLEARANCE);

        let resolver = ResolverSettings::default();
        assert_eq!(resolver.up_tolerance, UP_TOLERANCE);
        assert_eq!(resolver.body_height, BODY_HEIGHT);
    }

    #[test]
    fn grounded_window_is_wider_than_landing_window() {
        let s = ResolverSettings::default();
        assert!(s.below_window(true) > s.below_window(false));
        assert_eq!(s.below_window(false), LANDING_TOLERANCE);
    }

    #[test]
    fn partial_toml_keeps_other_defaults() {
        let src = r#"
            ground_clearance = 0.5

            [adapter]
            wall_epsilon = 2.0
        "#;
        let parsed: TerrainSettings = toml::from_str(src).expect("valid settings");
        assert_eq!(parsed.adapter.wall_epsilon, 2.0);
        assert_eq!(parsed.ground_clearance, 0.5);
        assert_eq!(parsed.link_epsilon, LINK_EPSILON);
    }

    #[test]
    fn resolver_settings_parse_from_toml() {
        let parsed: ResolverSettings =
            toml::from_str("body_half_width = 20.0\ndown_tolerance = 8.0").expect("valid settings");
        assert_eq!(parsed.body_half_width, 20.0);
        assert_eq!(parsed.down_tolerance, 8.0);
        assert_eq!(parsed.up_tolerance, UP_TOLERANCE);
    }
}
