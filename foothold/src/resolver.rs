//! Physics-facing ground and wall detection.
//!
//! One [`GroundResolver::resolve`] call per body per tick turns a feet position
//! into a [`GroundState`]. Grounded is derived from the terrain every tick, never
//! carried over, except that last tick's result widens the window below the feet.

use nalgebra as na;

use crate::{
    segment::Foothold,
    settings::ResolverSettings,
    terrain::Terrain,
};

/// Output of one [`GroundResolver::resolve`] call.
#[derive(Clone, Debug, PartialEq)]
pub struct GroundState {
    /// The surface the body stands on, if grounded.
    pub surface: Option<Foothold>,
    /// Snap target when grounded (surface Y at the body's X), otherwise the input Y.
    pub y: f32,
    pub grounded: bool,
    /// Any wall overlaps the body's extent.
    pub on_wall: bool,
    /// Mirrors the supporting surface; `false` when airborne.
    pub slippery: bool,
    /// Mirrors the supporting surface; `false` when airborne.
    pub conveyor: bool,
    /// Surface conveyor speed along X, `0` unless `conveyor`.
    pub conveyor_speed: f32,
    /// A wall at or left of the body blocks movement toward -X.
    pub blocked_left: bool,
    /// A wall right of the body blocks movement toward +X.
    pub blocked_right: bool,
}

impl GroundState {
    fn airborne(y: f32) -> Self {
        Self {
            surface: None,
            y,
            grounded: false,
            on_wall: false,
            slippery: false,
            conveyor: false,
            conveyor_speed: 0.0,
            blocked_left: false,
            blocked_right: false,
        }
    }

    /// Id of the supporting surface, if grounded.
    #[inline]
    pub fn surface_id(&self) -> Option<crate::segment::FootholdId> {
        self.surface.as_ref().map(|f| f.id)
    }
}

/// Per-tick ground and wall detection for one kind of body.
///
/// The resolver only reads the terrain and reports; clamping and snapping are
/// left to the caller's integrator.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GroundResolver {
    pub settings: ResolverSettings,
}

impl GroundResolver {
    pub fn new(settings: ResolverSettings) -> Self {
        Self { settings }
    }

    /// Resolve ground and wall contact for a body whose feet are at `position`.
    ///
    /// Equivalent to [`GroundResolver::resolve_moving`] with no vertical motion.
    #[inline]
    pub fn resolve(
        &self,
        terrain: &Terrain,
        position: na::Point2<f32>,
        previous_grounded: bool,
    ) -> GroundState {
        self.resolve_moving(terrain, position, previous_grounded, 0.0)
    }

    /// Resolve ground and wall contact, accounting for vertical motion.
    ///
    /// Behavior
    /// - A surface counts when it lies at most `up_tolerance` above the feet, or
    ///   within the below window ([`ResolverSettings::below_window`]) beneath them.
    ///   The window is wider for a body that was grounded last tick, so a body at
    ///   rest does not flicker between grounded and airborne.
    /// - Among counted surfaces the closest to the feet wins, ties to the lower id.
    /// - While rising (`vertical_velocity < 0`, Y grows downward) one-way
    ///   surfaces are skipped so the body passes through them from below.
    /// - Walls overlapping `[x - half_width, x + half_width] × [y - body_height, y]`
    ///   set `on_wall` and the blocked side.
    pub fn resolve_moving(
        &self,
        terrain: &Terrain,
        position: na::Point2<f32>,
        previous_grounded: bool,
        vertical_velocity: f32,
    ) -> GroundState {
        let (x, y) = (position.x, position.y);
        let mut state = GroundState::airborne(y);

        if !x.is_finite() || !y.is_finite() {
            return state;
        }

        let rising = vertical_velocity < 0.0;
        let above = self.settings.up_tolerance.max(0.0);
        let below = self.settings.below_window(previous_grounded);

        let mut best: Option<(&Foothold, f32, f32)> = None;
        for (foothold, surface_y) in terrain.surfaces_at(x) {
            if rising && foothold.is_one_way() {
                continue;
            }
            // Positive: surface beneath the feet.
            let offset = surface_y - y;
            if offset < -above || offset > below {
                continue;
            }
            let gap = offset.abs();
            if best.is_none_or(|(_, _, best_gap)| gap < best_gap) {
                best = Some((foothold, surface_y, gap));
            }
        }

        if let Some((foothold, surface_y, _)) = best {
            state.grounded = true;
            state.y = surface_y;
            state.slippery = foothold.is_slippery;
            if foothold.is_conveyor {
                state.conveyor = true;
                state.conveyor_speed = foothold.conveyor_speed;
            }
            state.surface = Some(foothold.clone());
        }

        let half_width = self.settings.body_half_width.max(0.0);
        let height = self.settings.body_height.max(0.0);
        for wall in terrain.walls_in_span(x - half_width, x + half_width, y - height, y) {
            state.on_wall = true;
            let wall_x = 0.5 * (wall.min_x() + wall.max_x());
            if wall_x < x {
                state.blocked_left = true;
            } else {
                state.blocked_right = true;
            }
        }

        state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        segment::SurfaceKind,
        settings::{GROUND_CLEARANCE, LANDING_TOLERANCE},
    };

    fn fh(id: u32, x1: f32, y1: f32, x2: f32, y2: f32) -> Foothold {
        Foothold::new(id, x1, y1, x2, y2).expect("valid foothold")
    }

    fn terrain(footholds: Vec<Foothold>) -> Terrain {
        Terrain::build(footholds, GROUND_CLEARANCE).expect("valid terrain")
    }

    fn at(x: f32, y: f32) -> na::Point2<f32> {
        na::Point2::new(x, y)
    }

    #[test]
    fn empty_terrain_is_airborne() {
        let state = GroundResolver::default().resolve(&Terrain::empty(), at(0.0, 0.0), true);
        assert_eq!(state, GroundState::airborne(0.0));
    }

    #[test]
    fn snaps_to_surface_and_mirrors_slippery() {
        let ice = fh(1, 0.0, 200.0, 1000.0, 200.0).with_slippery(true);
        let t = terrain(vec![ice]);
        let state = GroundResolver::default().resolve(&t, at(500.0, 199.5), false);

        assert!(state.grounded);
        assert_eq!(state.y, 200.0);
        assert!(state.slippery);
        assert_eq!(state.surface_id(), Some(1));
    }

    #[test]
    fn mirrors_conveyor_only_while_grounded() {
        let belt = fh(1, 0.0, 200.0, 1000.0, 200.0).with_conveyor(1.0);
        let t = terrain(vec![belt]);
        let resolver = GroundResolver::default();

        let on_belt = resolver.resolve(&t, at(500.0, 200.0), true);
        assert!(on_belt.conveyor);
        assert_eq!(on_belt.conveyor_speed, 1.0);
        assert!(!on_belt.slippery);

        let above = resolver.resolve(&t, at(500.0, 150.0), false);
        assert!(!above.conveyor);
        assert_eq!(above.conveyor_speed, 0.0);
    }

    #[test]
    fn grounded_body_survives_jitter_that_airborne_body_ignores() {
        let t = terrain(vec![fh(1, 0.0, 200.0, 1000.0, 200.0)]);
        let resolver = GroundResolver::default();
        // 3 units above the floor: beyond the landing window, inside the grounded one.
        let feet = at(500.0, 197.0);
        assert!(197.0 + LANDING_TOLERANCE < 200.0);

        assert!(resolver.resolve(&t, feet, true).grounded);
        let airborne = resolver.resolve(&t, feet, false);
        assert!(!airborne.grounded);
        assert_eq!(airborne.y, 197.0);
        assert_eq!(airborne.surface, None);
    }

    #[test]
    fn penetration_within_up_tolerance_still_grounds() {
        let t = terrain(vec![fh(1, 0.0, 200.0, 1000.0, 200.0)]);
        let resolver = GroundResolver::default();
        assert!(resolver.resolve(&t, at(500.0, 201.5), false).grounded);
        assert!(!resolver.resolve(&t, at(500.0, 203.0), false).grounded);
    }

    #[test]
    fn rising_body_passes_through_one_way() {
        let ledge = fh(1, 0.0, 100.0, 200.0, 100.0).with_kind(SurfaceKind::OneWay);
        let t = terrain(vec![ledge]);
        let resolver = GroundResolver::default();

        assert!(!resolver.resolve_moving(&t, at(100.0, 100.5), false, -8.0).grounded);
        assert!(resolver.resolve_moving(&t, at(100.0, 100.5), false, 8.0).grounded);
        assert!(resolver.resolve(&t, at(100.0, 100.5), false).grounded);
    }

    #[test]
    fn rising_body_still_stands_on_solid_ground() {
        let t = terrain(vec![fh(1, 0.0, 100.0, 200.0, 100.0)]);
        let state = GroundResolver::default().resolve_moving(&t, at(100.0, 100.0), true, -8.0);
        assert!(state.grounded);
    }

    #[test]
    fn picks_closest_surface_in_window() {
        let t = terrain(vec![
            fh(1, 0.0, 100.0, 200.0, 100.0),
            fh(2, 0.0, 103.0, 200.0, 103.0),
        ]);
        let state = GroundResolver::default().resolve(&t, at(50.0, 102.0), true);
        assert_eq!(state.surface_id(), Some(2));
        assert_eq!(state.y, 103.0);
    }

    #[test]
    fn walls_report_blocked_side() {
        let t = terrain(vec![
            fh(1, 0.0, 500.0, 1000.0, 500.0),
            fh(2, 490.0, 300.0, 490.0, 500.0),
            fh(3, 530.0, 300.0, 530.0, 500.0),
        ]);
        let resolver = GroundResolver::default();

        let near_left = resolver.resolve(&t, at(500.0, 500.0), true);
        assert!(near_left.grounded);
        assert!(near_left.on_wall);
        assert!(near_left.blocked_left);
        assert!(!near_left.blocked_right);

        let near_right = resolver.resolve(&t, at(520.0, 500.0), true);
        assert!(near_right.on_wall);
        assert!(near_right.blocked_right);
        assert!(!near_right.blocked_left);

        let clear = resolver.resolve(&t, at(200.0, 500.0), true);
        assert!(!clear.on_wall);
        assert!(!clear.blocked_left && !clear.blocked_right);
    }

    #[test]
    fn wall_above_body_does_not_block() {
        let t = terrain(vec![fh(1, 510.0, 0.0, 510.0, 100.0)]);
        let state = GroundResolver::default().resolve(&t, at(500.0, 500.0), false);
        assert!(!state.on_wall);
    }
}
