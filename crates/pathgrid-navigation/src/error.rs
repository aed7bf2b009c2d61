//! This module defines the error types used by the `pathgrid-navigation` crate.

#![warn(missing_docs)]

use pathgrid_common::GridCoordinate;
use thiserror::Error;

/// Boxed error raised by an obstruction oracle.
pub type OracleFault = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Error type for navigation operations.
///
/// Failing to find a route is not represented here: an unreachable goal is a
/// normal outcome and is reported through [`crate::PathResult::failure`].
#[derive(Debug, Error)]
pub enum NavigationError {
    /// Returned when a grid is requested with a non-positive width or height,
    /// or with more cells than can be allocated.
    #[error("Invalid grid dimensions: {width}x{height}, both must be positive and the grid must fit in memory")]
    InvalidDimensions {
        /// Requested number of columns.
        width: i32,
        /// Requested number of rows.
        height: i32,
    },
    /// Returned when the world size of a cell is not a finite positive number.
    #[error("Invalid cell size: {0}, must be finite and positive")]
    InvalidCellSize(f32),
    /// Returned when a coordinate lies outside the grid extent.
    #[error("Grid access out of bounds: {0}")]
    OutOfBounds(GridCoordinate),
    /// Returned when a world position to snap onto the grid has a NaN or
    /// infinite `x` or `z` component.
    #[error("World position is not finite: x: {x} z: {z}")]
    NonFinitePosition {
        /// World `x` component.
        x: f32,
        /// World `z` component.
        z: f32,
    },
    /// The obstruction oracle failed during a walkability pass.
    #[error("Obstruction oracle failed")]
    Obstruction(#[source] OracleFault),
}

impl NavigationError {
    /// Returns true if this is an out-of-bounds error.
    pub fn is_out_of_bounds(&self) -> bool {
        matches!(self, NavigationError::OutOfBounds(_))
    }
}

/// Result alias for navigation operations.
pub type Result<T, E = NavigationError> = std::result::Result<T, E>;
