//! Grid indexing and A* path search for agents moving through a world with
//! static obstacles.
//!
//! - [`GridIndex`] stores one payload per cell of a fixed 2D grid and converts
//!   between grid coordinates and world positions.
//! - [`Pathfinder`] keeps a [`PathNode`] per cell, classifies cells as walkable
//!   through an [`ObstructionOracle`], and answers path queries.

pub mod config;
pub mod error;
pub mod map;
pub mod obstruction;
pub mod path_node;
pub mod pathfinder;

pub use config::PathfinderConfig;
pub use error::NavigationError;
pub use map::{GridGeometry, GridIndex};
pub use obstruction::{Aabb, ColumnProbe, ObstacleField, ObstructionOracle};
pub use path_node::{NodeSnapshot, PathNode};
pub use pathfinder::{Heuristic, OpenList, PathResult, Pathfinder, SearchTrace};

pub use pathgrid_common::{GridCoordinate, WorldPosition};
