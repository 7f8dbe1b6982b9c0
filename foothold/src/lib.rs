pub mod connectivity;
pub mod error;
pub mod platform;
pub mod repository;
pub mod resolver;
pub mod segment;
pub mod settings;
pub mod terrain;

pub use error::{FootholdError, TerrainError};
pub use platform::{Conversion, DroppedPlatform, Platform, PlatformKind, convert};
pub use repository::{FootholdRepository, LoadReport};
pub use resolver::{GroundResolver, GroundState};
pub use segment::{Direction, Foothold, FootholdId, SurfaceKind};
pub use settings::{
    AdapterSettings, CLIMB_REACH, FOOTHOLD_TOLERANCE, GROUND_CLEARANCE, LINK_EPSILON,
    NEAREST_SEARCH_RADIUS, NO_GROUND, ResolverSettings, TerrainSettings, WALL_EPSILON,
};
pub use terrain::Terrain;

// Re-export nalgebra so callers build positions with the same version.
pub use nalgebra;
