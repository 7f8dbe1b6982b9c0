//! Error types for foothold construction and terrain loading.

use thiserror::Error;

use crate::segment::FootholdId;

/// Why a single segment could not become a foothold.
///
/// These describe bad input data. The adapter drops the offending platform and
/// keeps loading the rest of the map.
#[derive(Clone, Copy, Debug, Error, PartialEq)]
pub enum FootholdError {
    /// An endpoint coordinate is NaN or infinite.
    #[error("foothold {id} has a non-finite coordinate")]
    NonFinite { id: FootholdId },
    /// Both endpoints are the same point.
    #[error("foothold {id} is degenerate: ({x}, {y}) to itself")]
    Degenerate { id: FootholdId, x: f32, y: f32 },
    /// Another platform earlier in the input already uses this id.
    #[error("foothold id {id} is already used")]
    DuplicateId { id: FootholdId },
}

/// Invariant violations detected while publishing a terrain.
///
/// Reaching one of these means the adapter or connectivity builder produced a
/// broken graph, so the load is refused and the previous terrain stays active.
#[derive(Clone, Copy, Debug, Error, PartialEq)]
pub enum TerrainError {
    #[error("duplicate foothold id {0}")]
    DuplicateId(FootholdId),
    #[error("foothold {from} links to missing foothold {to}")]
    DanglingLink { from: FootholdId, to: FootholdId },
    #[error("foothold {0} links to itself")]
    SelfLink(FootholdId),
    #[error(transparent)]
    InvalidFoothold(#[from] FootholdError),
}
