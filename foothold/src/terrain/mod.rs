/*!
Immutable terrain snapshot and the spatial query engine.

A [`Terrain`] is one validated foothold set for one loaded map: footholds
stored in ascending id order, an id lookup, and an [`XSpanIndex`] to prune
candidates before the exact per-segment tests. It is never mutated after
[`Terrain::build`]; a map change builds a new one (see
[`crate::repository::FootholdRepository`]).

Query conventions
- Y grows downward, so "below" means a larger Y.
- X spans are inclusive at both endpoints, so joints between platforms have no
  gap.
- Walls never support standing. Ladders and ropes never support standing and
  never block; they are only reported by [`Terrain::find_climbable`], area
  queries, and enumeration.
- Ties resolve to the lower foothold id, so results are deterministic.
- An empty terrain is valid: every query reports "nothing found".
*/

pub mod index;

use std::collections::HashMap;

use nalgebra as na;
use parry2d::bounding_volume::{Aabb, BoundingVolume};

use crate::{
    error::TerrainError,
    segment::{Direction, Foothold, FootholdId},
    settings::{GROUND_CLEARANCE, NO_GROUND},
};

pub use index::XSpanIndex;

/// One loaded map's foothold graph.
#[derive(Clone, Debug)]
pub struct Terrain {
    /// Sorted by ascending id.
    footholds: Vec<Foothold>,
    slots: HashMap<FootholdId, usize>,
    index: XSpanIndex,
    ground_clearance: f32,
}

impl Default for Terrain {
    fn default() -> Self {
        Self::empty()
    }
}

impl Terrain {
    /// A terrain with no footholds.
    pub fn empty() -> Self {
        Self {
            footholds: Vec::new(),
            slots: HashMap::new(),
            index: XSpanIndex::default(),
            ground_clearance: GROUND_CLEARANCE,
        }
    }

    /// Validate `footholds` and build the query structures.
    ///
    /// Determinism
    /// - Footholds are sorted by id, so the same input always yields the same
    ///   terrain regardless of input order.
    ///
    /// Fails when a foothold breaks its construction invariants, when two
    /// footholds share an id, or when a link names itself or a missing id.
    pub fn build(mut footholds: Vec<Foothold>, ground_clearance: f32) -> Result<Self, TerrainError> {
        for foothold in &footholds {
            foothold.validate()?;
        }

        footholds.sort_by_key(|f| f.id);

        let mut slots = HashMap::with_capacity(footholds.len());
        for (slot, foothold) in footholds.iter().enumerate() {
            if slots.insert(foothold.id, slot).is_some() {
                return Err(TerrainError::DuplicateId(foothold.id));
            }
        }

        for foothold in &footholds {
            for to in [foothold.previous, foothold.next].into_iter().flatten() {
                if to == foothold.id {
                    return Err(TerrainError::SelfLink(foothold.id));
                }
                if !slots.contains_key(&to) {
                    return Err(TerrainError::DanglingLink {
                        from: foothold.id,
                        to,
                    });
                }
            }
        }

        let index = XSpanIndex::build(&footholds);

        Ok(Self {
            footholds,
            slots,
            index,
            ground_clearance: ground_clearance.max(0.0),
        })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.footholds.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.footholds.is_empty()
    }

    /// Every foothold in ascending id order, for diagnostics and tooling.
    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, Foothold> {
        self.footholds.iter()
    }

    #[inline]
    pub fn get(&self, id: FootholdId) -> Option<&Foothold> {
        self.slots.get(&id).map(|&slot| &self.footholds[slot])
    }

    #[inline]
    pub fn ground_clearance(&self) -> f32 {
        self.ground_clearance
    }

    /// Standing surfaces whose X span contains `x`, with their Y at `x`,
    /// in ascending id order.
    pub(crate) fn surfaces_at(&self, x: f32) -> impl Iterator<Item = (&Foothold, f32)> + '_ {
        self.index
            .covering(x)
            .into_iter()
            .map(move |slot| &self.footholds[slot])
            .filter(|f| f.supports_standing())
            .filter_map(move |f| f.y_at(x).map(|y| (f, y)))
    }

    /// The standing surface whose Y at `x` is closest to `y`, within `tolerance`.
    ///
    /// Walls and climbables are excluded.
    pub fn get_foothold_at(&self, x: f32, y: f32, tolerance: f32) -> Option<&Foothold> {
        if !x.is_finite() || !y.is_finite() {
            return None;
        }
        let tolerance = tolerance.max(0.0);
        let mut best: Option<(&Foothold, f32)> = None;

        for (foothold, surface_y) in self.surfaces_at(x) {
            let gap = (surface_y - y).abs();
            if gap > tolerance {
                continue;
            }
            if best.is_none_or(|(_, best_gap)| gap < best_gap) {
                best = Some((foothold, gap));
            }
        }

        best.map(|(foothold, _)| foothold)
    }

    /// Nearest standing surface at or below `y` under `x`, with its Y at `x`.
    fn surface_below(&self, x: f32, y: f32) -> Option<(&Foothold, f32)> {
        if !x.is_finite() || !y.is_finite() {
            return None;
        }
        let mut best: Option<(&Foothold, f32)> = None;

        for (foothold, surface_y) in self.surfaces_at(x) {
            if surface_y < y {
                continue;
            }
            if best.is_none_or(|(_, best_y)| surface_y < best_y) {
                best = Some((foothold, surface_y));
            }
        }

        best
    }

    /// Ground Y under `(x, y)`: the shallowest surface at or below `y`, minus the
    /// ground clearance. `None` means no ground exists under this point.
    pub fn get_ground_below(&self, x: f32, y: f32) -> Option<f32> {
        self.surface_below(x, y)
            .map(|(_, surface_y)| surface_y - self.ground_clearance)
    }

    /// [`Terrain::get_ground_below`] with [`NO_GROUND`] standing in for `None`.
    #[inline]
    pub fn ground_below_or_sentinel(&self, x: f32, y: f32) -> f32 {
        self.get_ground_below(x, y).unwrap_or(NO_GROUND)
    }

    /// The foothold that [`Terrain::get_ground_below`] lands on.
    pub fn get_foothold_below(&self, x: f32, y: f32) -> Option<&Foothold> {
        self.surface_below(x, y).map(|(foothold, _)| foothold)
    }

    /// Every foothold whose bounding box intersects the rectangle, in ascending id
    /// order. Edges touching the rectangle count.
    pub fn get_footholds_in_area(
        &self,
        min_x: f32,
        min_y: f32,
        max_x: f32,
        max_y: f32,
    ) -> Vec<&Foothold> {
        if min_x > max_x || min_y > max_y {
            return Vec::new();
        }
        let area = Aabb::new(na::Point2::new(min_x, min_y), na::Point2::new(max_x, max_y));

        self.index
            .overlapping(min_x, max_x)
            .into_iter()
            .map(|slot| &self.footholds[slot])
            .filter(|f| area.intersects(&f.bounds()))
            .collect()
    }

    /// The foothold closest to `(x, y)` by perpendicular distance, over the whole set.
    pub fn find_nearest_foothold(&self, x: f32, y: f32) -> Option<&Foothold> {
        self.find_nearest_foothold_within(x, y, f32::INFINITY)
    }

    /// Like [`Terrain::find_nearest_foothold`], ignoring footholds farther than
    /// `max_distance`.
    pub fn find_nearest_foothold_within(
        &self,
        x: f32,
        y: f32,
        max_distance: f32,
    ) -> Option<&Foothold> {
        let mut best: Option<(&Foothold, f32)> = None;

        for foothold in &self.footholds {
            let distance = foothold.distance_to(x, y);
            if distance > max_distance {
                continue;
            }
            if best.is_none_or(|(_, best_distance)| distance < best_distance) {
                best = Some((foothold, distance));
            }
        }

        best.map(|(foothold, _)| foothold)
    }

    /// Whether `(x, y)` rests on a standing surface within `tolerance`.
    #[inline]
    pub fn is_on_ground(&self, x: f32, y: f32, tolerance: f32) -> bool {
        self.get_foothold_at(x, y, tolerance).is_some()
    }

    /// The neighbour reached by walking off `foothold` in `direction`.
    pub fn get_connected_foothold(
        &self,
        foothold: &Foothold,
        direction: Direction,
    ) -> Option<&Foothold> {
        foothold.link(direction).and_then(|id| self.get(id))
    }

    /// Slope angle of `foothold` at `x`, or `0` when `x` is outside its span.
    pub fn get_slope_at(&self, foothold: &Foothold, x: f32) -> f32 {
        if foothold.spans_x(x) {
            foothold.slope()
        } else {
            0.0
        }
    }

    /// The ladder or rope a body at `(x, y)` can grab: within `reach`
    /// horizontally and inside the climbable's vertical extent. Closest wins.
    pub fn find_climbable(&self, x: f32, y: f32, reach: f32) -> Option<&Foothold> {
        let reach = reach.max(0.0);
        let mut best: Option<(&Foothold, f32)> = None;

        for slot in self.index.overlapping(x - reach, x + reach) {
            let foothold = &self.footholds[slot];
            if !foothold.is_climbable() || y < foothold.min_y() || y > foothold.max_y() {
                continue;
            }
            let distance = foothold.distance_to(x, y);
            if best.is_none_or(|(_, best_distance)| distance < best_distance) {
                best = Some((foothold, distance));
            }
        }

        best.map(|(foothold, _)| foothold)
    }

    /// Walls whose bounding box overlaps the given extent, in ascending id order.
    ///
    /// `top_y <= bottom_y` in terrain space (Y grows downward).
    pub fn walls_in_span(
        &self,
        min_x: f32,
        max_x: f32,
        top_y: f32,
        bottom_y: f32,
    ) -> Vec<&Foothold> {
        if min_x > max_x || top_y > bottom_y {
            return Vec::new();
        }
        let extent = Aabb::new(na::Point2::new(min_x, top_y), na::Point2::new(max_x, bottom_y));

        self.index
            .overlapping(min_x, max_x)
            .into_iter()
            .map(|slot| &self.footholds[slot])
            .filter(|f| f.is_wall && !f.is_climbable())
            .filter(|f| extent.intersects(&f.bounds()))
            .collect()
    }
}
