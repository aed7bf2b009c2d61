//! Obstruction queries used to decide which cells are walkable.
//!
//! The pathfinder knows nothing about world geometry. For each cell it asks an
//! [`ObstructionOracle`] whether the vertical column of space around the cell's
//! world position is blocked.

#![warn(missing_docs)]

use core::convert::Infallible;

use nalgebra::{Point3, Vector3};
use pathgrid_common::WorldPosition;

use crate::error::OracleFault;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Half height of the probed column unless configured otherwise.
pub const DEFAULT_PROBE_HALF_HEIGHT: f32 = 5.0;

/// Vertical segment centered on a cell's world position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnProbe {
    /// World position of the cell.
    pub position: WorldPosition,
    /// Distance probed below and above `position`.
    pub half_height: f32,
}

impl ColumnProbe {
    /// Creates a probe around `position`.
    pub fn new(position: WorldPosition, half_height: f32) -> Self {
        Self {
            position,
            half_height,
        }
    }

    /// Lowest probed point.
    pub fn bottom(&self) -> WorldPosition {
        self.position - Vector3::y() * self.half_height
    }

    /// Highest probed point.
    pub fn top(&self) -> WorldPosition {
        self.position + Vector3::y() * self.half_height
    }
}

/// Answers whether a probed column of world space is blocked.
///
/// Implementations must be free of side effects that the search relies on:
/// the pathfinder may call them any number of times per cell.
///
/// Any `Fn(&WorldPosition) -> bool` closure is an infallible oracle that only
/// looks at the probe's center.
pub trait ObstructionOracle {
    /// Fault raised when the oracle cannot answer.
    type Error: Into<OracleFault>;

    /// Returns `Ok(true)` if something blocks the probed column.
    fn is_obstructed(&self, probe: &ColumnProbe) -> Result<bool, Self::Error>;
}

impl<F> ObstructionOracle for F
where
    F: Fn(&WorldPosition) -> bool,
{
    type Error = Infallible;

    fn is_obstructed(&self, probe: &ColumnProbe) -> Result<bool, Self::Error> {
        Ok(self(&probe.position))
    }
}

/// Axis-aligned box in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Aabb {
    /// Corner with the smallest coordinates.
    pub min: Point3<f32>,
    /// Corner with the largest coordinates.
    pub max: Point3<f32>,
}

impl Aabb {
    /// Creates a box from two opposite corners, in any order.
    pub fn from_corners(a: Point3<f32>, b: Point3<f32>) -> Self {
        Self {
            min: a.inf(&b),
            max: a.sup(&b),
        }
    }

    /// Returns true if the vertical segment of `probe` touches the box.
    pub fn intersects_column(&self, probe: &ColumnProbe) -> bool {
        let p = probe.position;
        let (bottom, top) = (probe.bottom().y, probe.top().y);

        p.x >= self.min.x
            && p.x <= self.max.x
            && p.z >= self.min.z
            && p.z <= self.max.z
            && top >= self.min.y
            && bottom <= self.max.y
    }
}

/// Static world made of box obstacles.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ObstacleField {
    obstacles: Vec<Aabb>,
}

impl ObstacleField {
    /// Creates an empty field.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an obstacle.
    pub fn push(&mut self, obstacle: Aabb) {
        self.obstacles.push(obstacle);
    }

    /// All obstacles in insertion order.
    pub fn obstacles(&self) -> &[Aabb] {
        &self.obstacles
    }

    /// Number of obstacles.
    pub fn len(&self) -> usize {
        self.obstacles.len()
    }

    /// Returns true if the field holds no obstacles.
    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }
}

impl FromIterator<Aabb> for ObstacleField {
    fn from_iter<I: IntoIterator<Item = Aabb>>(iter: I) -> Self {
        Self {
            obstacles: iter.into_iter().collect(),
        }
    }
}

impl ObstructionOracle for ObstacleField {
    type Error = Infallible;

    fn is_obstructed(&self, probe: &ColumnProbe) -> Result<bool, Self::Error> {
        Ok(self
            .obstacles
            .iter()
            .any(|obstacle| obstacle.intersects_column(probe)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn probe_at(x: f32, z: f32) -> ColumnProbe {
        ColumnProbe::new(WorldPosition::new(x, 0.0, z), DEFAULT_PROBE_HALF_HEIGHT)
    }

    #[test]
    fn test_probe_extent() {
        let probe = probe_at(1.0, 2.0);
        assert_eq!(probe.bottom(), WorldPosition::new(1.0, -5.0, 2.0));
        assert_eq!(probe.top(), WorldPosition::new(1.0, 5.0, 2.0));
    }

    #[test]
    fn test_closure_oracle() {
        let oracle = |p: &WorldPosition| p.x > 2.0;
        assert_eq!(oracle.is_obstructed(&probe_at(3.0, 0.0)), Ok(true));
        assert_eq!(oracle.is_obstructed(&probe_at(1.0, 0.0)), Ok(false));
    }

    #[test]
    fn test_aabb_from_corners_orders_components() {
        let aabb = Aabb::from_corners(Point3::new(2.0, 1.0, -1.0), Point3::new(0.0, 3.0, 1.0));
        assert_eq!(aabb.min, Point3::new(0.0, 1.0, -1.0));
        assert_eq!(aabb.max, Point3::new(2.0, 3.0, 1.0));
    }

    #[test]
    fn test_column_intersection() {
        let aabb = Aabb::from_corners(Point3::new(1.5, 0.0, 1.5), Point3::new(2.5, 1.0, 2.5));
        assert!(aabb.intersects_column(&probe_at(2.0, 2.0)));
        assert!(aabb.intersects_column(&probe_at(1.5, 2.5)));
        assert!(!aabb.intersects_column(&probe_at(1.0, 2.0)));
        assert!(!aabb.intersects_column(&probe_at(2.0, 3.0)));
    }

    #[test]
    fn test_column_misses_box_out_of_vertical_reach() {
        let floating = Aabb::from_corners(Point3::new(0.0, 6.0, 0.0), Point3::new(1.0, 8.0, 1.0));
        assert!(!floating.intersects_column(&probe_at(0.5, 0.5)));

        let tall = ColumnProbe::new(WorldPosition::new(0.5, 0.0, 0.5), 7.0);
        assert!(floating.intersects_column(&tall));
    }

    #[test]
    fn test_obstacle_field() {
        let field: ObstacleField = [
            Aabb::from_corners(Point3::new(0.0, 0.0, 0.0), Point3::new(0.4, 1.0, 0.4)),
            Aabb::from_corners(Point3::new(3.0, 0.0, 3.0), Point3::new(4.0, 1.0, 4.0)),
        ]
        .into_iter()
        .collect();

        assert_eq!(field.len(), 2);
        assert_eq!(field.is_obstructed(&probe_at(0.0, 0.0)), Ok(true));
        assert_eq!(field.is_obstructed(&probe_at(3.5, 4.0)), Ok(true));
        assert_eq!(field.is_obstructed(&probe_at(2.0, 2.0)), Ok(false));
        assert!(ObstacleField::new().is_empty());
    }
}
