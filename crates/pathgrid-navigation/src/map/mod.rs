//! Grid-related functionality for navigation.
//!
//! This module provides the generic grid container that backs the
//! pathfinder, along with the geometry used to convert between grid and
//! world coordinates.

pub mod grid_index;

pub use grid_index::{GridGeometry, GridIndex};
