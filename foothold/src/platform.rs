//! Authoring-time platforms and their conversion into footholds.
//!
//! Map data describes terrain as a flat list of tagged platforms. Each platform
//! becomes exactly one foothold with the same id and endpoints; the adapter
//! never merges platforms. Links are left empty here and filled in by
//! [`crate::connectivity::link`].

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::{
    error::FootholdError,
    segment::{Foothold, FootholdId, SurfaceKind},
    settings::AdapterSettings,
};

/// Authoring tag of a platform.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlatformKind {
    #[default]
    Normal,
    OneWay,
    Ladder,
    Rope,
}

impl From<PlatformKind> for SurfaceKind {
    fn from(kind: PlatformKind) -> Self {
        match kind {
            PlatformKind::Normal => SurfaceKind::Normal,
            PlatformKind::OneWay => SurfaceKind::OneWay,
            PlatformKind::Ladder => SurfaceKind::Ladder,
            PlatformKind::Rope => SurfaceKind::Rope,
        }
    }
}

/// One platform record as supplied by the map loader.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Platform {
    pub id: FootholdId,
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
    #[serde(default)]
    pub kind: PlatformKind,
    #[serde(default)]
    pub is_slippery: bool,
    #[serde(default)]
    pub is_conveyor: bool,
    #[serde(default)]
    pub conveyor_speed: f32,
    #[serde(default)]
    pub layer: i32,
}

impl Platform {
    /// A normal, non-slippery platform on layer 0.
    pub fn new(id: FootholdId, x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self {
            id,
            x1,
            y1,
            x2,
            y2,
            kind: PlatformKind::Normal,
            is_slippery: false,
            is_conveyor: false,
            conveyor_speed: 0.0,
            layer: 0,
        }
    }

    #[inline]
    pub fn with_kind(mut self, kind: PlatformKind) -> Self {
        self.kind = kind;
        self
    }

    #[inline]
    pub fn with_slippery(mut self, is_slippery: bool) -> Self {
        self.is_slippery = is_slippery;
        self
    }

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

    /// Convert this platform alone, deriving the wall flag with `wall_epsilon`.
    pub fn to_foothold(&self, wall_epsilon: f32) -> Result<Foothold, FootholdError> {
        let mut foothold = Foothold::new(self.id, self.x1, self.y1, self.x2, self.y2)?
            .with_wall_epsilon(wall_epsilon)
            .with_kind(self.kind.into())
            .with_slippery(self.is_slippery)
            .with_layer(self.layer);
        foothold.is_conveyor = self.is_conveyor;
        foothold.conveyor_speed = self.conveyor_speed;
        Ok(foothold)
    }
}

/// A platform the adapter refused, and why.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DroppedPlatform {
    pub id: FootholdId,
    pub reason: FootholdError,
}

/// Result of converting one map's platforms.
#[derive(Clone, Debug, Default)]
pub struct Conversion {
    /// Converted footholds, in input order.
    pub footholds: Vec<Foothold>,
    /// Platforms left out of `footholds`, in input order.
    pub dropped: Vec<DroppedPlatform>,
}

impl Conversion {
    #[inline]
    pub fn dropped_count(&self) -> usize {
        self.dropped.len()
    }
}

/// Convert platforms into unlinked footholds.
///
/// Malformed platforms (non-finite or degenerate endpoints, or an id already
/// taken by an earlier platform) are dropped one by one and reported in
/// [`Conversion::dropped`]; the rest of the map still converts.
pub fn convert(platforms: &[Platform], settings: &AdapterSettings) -> Conversion {
    let mut conversion = Conversion {
        footholds: Vec::with_capacity(platforms.len()),
        dropped: Vec::new(),
    };
    let mut seen: HashSet<FootholdId> = HashSet::with_capacity(platforms.len());

    for platform in platforms {
        let converted = if seen.contains(&platform.id) {
            Err(FootholdError::DuplicateId { id: platform.id })
        } else {
            platform.to_foothold(settings.wall_epsilon)
        };

        match converted {
            Ok(foothold) => {
                seen.insert(foothold.id);
                conversion.footholds.push(foothold);
            }
            Err(reason) => {
                log::warn!("Dropping platform {}: {}", platform.id, reason);
                conversion.dropped.push(DroppedPlatform {
                    id: platform.id,
                    reason,
                });
            }
        }
    }

    conversion
}
