/*!
The foothold segment model.

A foothold is one oriented line segment of walkable or collidable terrain.
Endpoints keep their authoring order: `(x1, y1)` is the start, `(x2, y2)` the
end, and `previous` / `next` name the neighbours attached at those endpoints.
Nothing requires `x1 <= x2`, so every helper here reads the X span through
`min_x` / `max_x`.

Coordinates are in the terrain's native space, where Y grows downward: a larger
Y is lower on screen.
*/

use nalgebra as na;
use parry2d::{bounding_volume::Aabb, query::PointQuery, shape::Segment};
use serde::{Deserialize, Serialize};

use crate::{
    error::FootholdError,
    settings::{DIST_EPS, WALL_EPSILON},
};

/// Identifier of a foothold, unique within one loaded terrain.
pub type FootholdId = u32;

/// What kind of surface a foothold represents.
///
/// Only `Normal` and `OneWay` support standing. Ladders and ropes are carried
/// through for the movement layer, which owns climbing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SurfaceKind {
    #[default]
    Normal,
    /// Blocks a falling body from above, lets a rising body pass from below.
    OneWay,
    Ladder,
    Rope,
}

impl SurfaceKind {
    #[inline]
    pub fn is_climbable(self) -> bool {
        matches!(self, SurfaceKind::Ladder | SurfaceKind::Rope)
    }
}

/// Horizontal travel direction along the foothold graph.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    /// Toward the `previous` link.
    Left,
    /// Toward the `next` link.
    Right,
}

/// An oriented terrain segment with directional links and surface flags.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Foothold {
    pub id: FootholdId,
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
    /// Foothold attached at `(x1, y1)`, if any.
    pub previous: Option<FootholdId>,
    /// Foothold attached at `(x2, y2)`, if any.
    pub next: Option<FootholdId>,
    /// Nearly vertical: blocks horizontal movement instead of supporting a body.
    pub is_wall: bool,
    /// Traversal cannot decelerate or stop on this surface.
    pub is_slippery: bool,
    /// Carries a standing body along X at `conveyor_speed`.
    #[serde(default)]
    pub is_conveyor: bool,
    /// Units per second along +X; negative moves toward -X.
    #[serde(default)]
    pub conveyor_speed: f32,
    pub kind: SurfaceKind,
    /// Authoring layer, used by callers for vertical grouping.
    #[serde(default)]
    pub layer: i32,
}

impl Foothold {
    /// Build a normal, unlinked foothold.
    ///
    /// The wall flag is derived with the default [`WALL_EPSILON`]; the adapter
    /// re-derives it with the map's configured epsilon.
    pub fn new(
        id: FootholdId,
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
    ) -> Result<Self, FootholdError> {
        let foothold = Self {
            id,
            x1,
            y1,
            x2,
            y2,
            previous: None,
            next: None,
            is_wall: false,
            is_slippery: false,
            is_conveyor: false,
            conveyor_speed: 0.0,
            kind: SurfaceKind::Normal,
            layer: 0,
        };
        foothold.validate()?;
        Ok(foothold.with_wall_epsilon(WALL_EPSILON))
    }

    #[inline]
    pub fn with_kind(mut self, kind: SurfaceKind) -> Self {
        self.kind = kind;
        self
    }

    #[inline]
    pub fn with_slippery(mut self, is_slippery: bool) -> Self {
        self.is_slippery = is_slippery;
        self
    }

    /// Mark as a conveyor moving at `speed` along X.
    #[inline]
    pub fn with_conveyor(mut self, speed: f32) -> Self {
        self.is_conveyor = true;
        self.conveyor_speed = speed;
        self
    }

    #[inline]
    pub fn with_layer(mut self, layer: i32) -> Self {
        self.layer = layer;
        self
    }

    /// Re-derive `is_wall` from the endpoint geometry.
    #[inline]
    pub fn with_wall_epsilon(mut self, wall_epsilon: f32) -> Self {
        self.is_wall = (self.x2 - self.x1).abs() < wall_epsilon;
        self
    }

    /// Check the construction invariants: finite coordinates, distinct endpoints.
    pub fn validate(&self) -> Result<(), FootholdError> {
        let finite = [self.x1, self.y1, self.x2, self.y2]
            .iter()
            .all(|v| v.is_finite());
        if !finite {
            return Err(FootholdError::NonFinite { id: self.id });
        }
        if self.x1 == self.x2 && self.y1 == self.y2 {
            return Err(FootholdError::Degenerate {
                id: self.id,
                x: self.x1,
                y: self.y1,
            });
        }
        Ok(())
    }

    #[inline]
    pub fn start(&self) -> na::Point2<f32> {
        na::Point2::new(self.x1, self.y1)
    }

    #[inline]
    pub fn end(&self) -> na::Point2<f32> {
        na::Point2::new(self.x2, self.y2)
    }

    #[inline]
    pub fn min_x(&self) -> f32 {
        self.x1.min(self.x2)
    }

    #[inline]
    pub fn max_x(&self) -> f32 {
        self.x1.max(self.x2)
    }

    /// Top of the segment (smallest Y).
    #[inline]
    pub fn min_y(&self) -> f32 {
        self.y1.min(self.y2)
    }

    /// Bottom of the segment (largest Y).
    #[inline]
    pub fn max_y(&self) -> f32 {
        self.y1.max(self.y2)
    }

    #[inline]
    pub fn is_one_way(&self) -> bool {
        self.kind == SurfaceKind::OneWay
    }

    #[inline]
    pub fn is_climbable(&self) -> bool {
        self.kind.is_climbable()
    }

    /// Whether a body can stand on this segment at all.
    #[inline]
    pub fn supports_standing(&self) -> bool {
        !self.is_wall && !self.is_climbable()
    }

    /// Whether `x` falls inside the X span, endpoints included.
    #[inline]
    pub fn spans_x(&self, x: f32) -> bool {
        x >= self.min_x() && x <= self.max_x()
    }

    /// Surface Y at `x`, or `None` when `x` is outside the X span.
    ///
    /// Endpoints return their exact stored Y so neighbours agree at joints. A
    /// segment with no usable X span reports its top.
    pub fn y_at(&self, x: f32) -> Option<f32> {
        if !self.spans_x(x) {
            return None;
        }
        if x == self.x1 {
            return Some(if x == self.x2 { self.min_y() } else { self.y1 });
        }
        if x == self.x2 {
            return Some(self.y2);
        }

        let dx = self.x2 - self.x1;
        if dx.abs() < DIST_EPS {
            return Some(self.min_y());
        }

        let t = (x - self.x1) / dx;
        Some(self.y1 + t * (self.y2 - self.y1))
    }

    /// Slope angle in radians from start to end. Positive means the surface
    /// descends toward `x2` (Y grows downward). Walls report `0`.
    pub fn slope(&self) -> f32 {
        if self.is_wall || (self.x2 - self.x1).abs() < DIST_EPS {
            return 0.0;
        }
        (self.y2 - self.y1).atan2(self.x2 - self.x1)
    }

    /// Whether `(x, y)` lies on the surface within `tolerance` vertically.
    pub fn contains_point(&self, x: f32, y: f32, tolerance: f32) -> bool {
        self.y_at(x)
            .is_some_and(|surface_y| (y - surface_y).abs() <= tolerance.max(0.0))
    }

    /// Euclidean distance from `(x, y)` to the closest point of the segment.
    pub fn distance_to(&self, x: f32, y: f32) -> f32 {
        let segment = Segment::new(self.start(), self.end());
        segment.distance_to_local_point(&na::Point2::new(x, y), true)
    }

    /// Axis-aligned bounding box of the segment.
    #[inline]
    pub fn bounds(&self) -> Aabb {
        Aabb::new(
            na::Point2::new(self.min_x(), self.min_y()),
            na::Point2::new(self.max_x(), self.max_y()),
        )
    }

    /// The link followed when walking in `direction`.
    #[inline]
    pub fn link(&self, direction: Direction) -> Option<FootholdId> {
        match direction {
            Direction::Left => self.previous,
            Direction::Right => self.next,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fh(x1: f32, y1: f32, x2: f32, y2: f32) -> Foothold {
        Foothold::new(1, x1, y1, x2, y2).expect("valid foothold")
    }

    #[test]
    fn rejects_degenerate_and_non_finite() {
        assert_eq!(
            Foothold::new(7, 3.0, 4.0, 3.0, 4.0),
            Err(FootholdError::Degenerate {
                id: 7,
                x: 3.0,
                y: 4.0
            })
        );
        assert_eq!(
            Foothold::new(8, f32::NAN, 0.0, 10.0, 0.0),
            Err(FootholdError::NonFinite { id: 8 })
        );
        assert_eq!(
            Foothold::new(9, 0.0, 0.0, f32::INFINITY, 0.0),
            Err(FootholdError::NonFinite { id: 9 })
        );
    }

    #[test]
    fn y_at_interpolates_in_both_orders() {
        let forward = fh(0.0, 100.0, 100.0, 200.0);
        let reversed = fh(100.0, 200.0, 0.0, 100.0);

        for x in [0.0, 25.0, 50.0, 99.0, 100.0] {
            let a = forward.y_at(x).expect("in span");
            let b = reversed.y_at(x).expect("in span");
            assert!((a - b).abs() < 1.0e-4, "x = {x}: {a} vs {b}");
        }
        assert!((forward.y_at(50.0).unwrap() - 150.0).abs() < 1.0e-4);
    }

    #[test]
    fn y_at_is_inclusive_and_bounded() {
        let flat = fh(-10.0, 5.0, 10.0, 5.0);
        assert_eq!(flat.y_at(-10.0), Some(5.0));
        assert_eq!(flat.y_at(10.0), Some(5.0));
        assert_eq!(flat.y_at(10.01), None);
        assert_eq!(flat.y_at(-10.01), None);
    }

    #[test]
    fn endpoints_return_stored_y() {
        let slope = fh(0.0, 0.3, 0.7, 1000.1);
        assert_eq!(slope.y_at(0.0), Some(0.3));
        assert_eq!(slope.y_at(0.7), Some(1000.1));
    }

    #[test]
    fn vertical_segment_reports_top() {
        let wall = fh(50.0, 300.0, 50.0, 100.0);
        assert!(wall.is_wall);
        assert_eq!(wall.y_at(50.0), Some(100.0));
        assert_eq!(wall.slope(), 0.0);
    }

    #[test]
    fn wall_flag_follows_epsilon() {
        let steep = fh(100.0, 0.0, 101.0, 500.0);
        assert!(!steep.is_wall);
        assert!(steep.clone().with_wall_epsilon(2.0).is_wall);
    }

    #[test]
    fn slope_sign_follows_y_down() {
        let descending = fh(0.0, 0.0, 100.0, 100.0);
        let ascending = fh(0.0, 100.0, 100.0, 0.0);
        assert!((descending.slope() - std::f32::consts::FRAC_PI_4).abs() < 1.0e-5);
        assert!((ascending.slope() + std::f32::consts::FRAC_PI_4).abs() < 1.0e-5);
        assert_eq!(fh(0.0, 0.0, 10.0, 0.0).slope(), 0.0);
    }

    #[test]
    fn contains_point_uses_tolerance() {
        let flat = fh(0.0, 200.0, 100.0, 200.0);
        assert!(flat.contains_point(50.0, 199.0, 1.0));
        assert!(flat.contains_point(50.0, 201.0, 1.0));
        assert!(!flat.contains_point(50.0, 202.0, 1.0));
        assert!(!flat.contains_point(150.0, 200.0, 1.0));
    }

    #[test]
    fn distance_is_perpendicular_and_clamped() {
        let flat = fh(0.0, 0.0, 100.0, 0.0);
        assert!((flat.distance_to(50.0, -30.0) - 30.0).abs() < 1.0e-4);
        // Past the end: distance to the endpoint.
        assert!((flat.distance_to(103.0, 4.0) - 5.0).abs() < 1.0e-4);
    }

    #[test]
    fn bounds_cover_both_orders() {
        let a = fh(10.0, 50.0, -10.0, 20.0).bounds();
        assert_eq!(a.mins, na::Point2::new(-10.0, 20.0));
        assert_eq!(a.maxs, na::Point2::new(10.0, 50.0));
    }

    #[test]
    fn climbable_kinds_do_not_support_standing() {
        let ladder = fh(0.0, 0.0, 10.0, 0.0).with_kind(SurfaceKind::Ladder);
        assert!(ladder.is_climbable());
        assert!(!ladder.supports_standing());
        let one_way = fh(0.0, 0.0, 10.0, 0.0).with_kind(SurfaceKind::OneWay);
        assert!(one_way.is_one_way());
        assert!(one_way.supports_standing());
    }
}
