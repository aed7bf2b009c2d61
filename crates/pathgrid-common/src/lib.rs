//! Coordinate types shared by the pathgrid crates.
//!
//! Two frames are in play:
//!
//! - **Grid frame**: discrete `(x, z)` cell addresses, see [`GridCoordinate`].
//! - **World frame**: continuous 3D positions. The grid lies on the `x`/`z`
//!   plane at `y = 0`, see [`WorldPosition`].

#![warn(missing_docs)]

use core::fmt;
use core::ops::{Add, Div, Mul, Sub};

use nalgebra::{Point3, Vector2};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A position in world coordinates.
///
/// The `y` axis is vertical; grid cells are laid out along `x` and `z`.
pub type WorldPosition = Point3<f32>;

/// A discrete cell address `(x, z)` = (column, row).
///
/// Coordinates carry no bounds of their own. Whether a coordinate is valid
/// depends on the grid it is used with, so negative values are representable.
///
/// # Examples
///
/// ```
/// use pathgrid_common::GridCoordinate;
///
/// let a = GridCoordinate::new(2, 3);
/// let b = GridCoordinate::new(1, 1);
/// assert_eq!(a + b, GridCoordinate::new(3, 4));
/// assert_eq!(a * 2, GridCoordinate::new(4, 6));
/// ```
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
pub struct GridCoordinate {
    /// Column index.
    pub x: i32,
    /// Row index.
    pub z: i32,
}

impl GridCoordinate {
    /// Creates a new `GridCoordinate`.
    #[must_use]
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// Straight-line distance between two cell addresses, rounded to the
    /// nearest integer. Saturates at `i32::MAX`.
    ///
    /// ```
    /// use pathgrid_common::GridCoordinate;
    ///
    /// let a = GridCoordinate::new(0, 0);
    /// assert_eq!(GridCoordinate::euclidean_distance(a, GridCoordinate::new(3, 4)), 5);
    /// ```
    pub fn euclidean_distance(a: Self, b: Self) -> i32 {
        let dx = f64::from(a.x) - f64::from(b.x);
        let dz = f64::from(a.z) - f64::from(b.z);
        (dx * dx + dz * dz).sqrt().round() as i32
    }

    /// Component-wise absolute value.
    #[must_use]
    pub const fn abs(self) -> Self {
        Self::new(self.x.abs(), self.z.abs())
    }
}

impl fmt::Display for GridCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "x: {} z: {}", self.x, self.z)
    }
}

impl Add for GridCoordinate {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.z + rhs.z)
    }
}

impl Sub for GridCoordinate {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.z - rhs.z)
    }
}

impl Mul for GridCoordinate {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        Self::new(self.x * rhs.x, self.z * rhs.z)
    }
}

impl Div for GridCoordinate {
    type Output = Self;

    /// Integer division, truncating toward zero. Panics on a zero component
    /// like any integer division.
    fn div(self, rhs: Self) -> Self {
        Self::new(self.x / rhs.x, self.z / rhs.z)
    }
}

impl Mul<i32> for GridCoordinate {
    type Output = Self;

    fn mul(self, rhs: i32) -> Self {
        Self::new(self.x * rhs, self.z * rhs)
    }
}

impl Div<i32> for GridCoordinate {
    type Output = Self;

    fn div(self, rhs: i32) -> Self {
        Self::new(self.x / rhs, self.z / rhs)
    }
}

impl From<(i32, i32)> for GridCoordinate {
    fn from((x, z): (i32, i32)) -> Self {
        Self::new(x, z)
    }
}

impl From<GridCoordinate> for (i32, i32) {
    fn from(coord: GridCoordinate) -> Self {
        (coord.x, coord.z)
    }
}

impl From<Vector2<i32>> for GridCoordinate {
    fn from(v: Vector2<i32>) -> Self {
        Self::new(v.x, v.y)
    }
}

impl From<GridCoordinate> for Vector2<i32> {
    fn from(coord: GridCoordinate) -> Self {
        Vector2::new(coord.x, coord.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arithmetic_is_component_wise() {
        let a = GridCoordinate::new(6, -4);
        let b = GridCoordinate::new(2, 2);
        assert_eq!(a + b, GridCoordinate::new(8, -2));
        assert_eq!(a - b, GridCoordinate::new(4, -6));
        assert_eq!(a * b, GridCoordinate::new(12, -8));
        assert_eq!(a / b, GridCoordinate::new(3, -2));
        assert_eq!(a * 3, GridCoordinate::new(18, -12));
        assert_eq!(a / 2, GridCoordinate::new(3, -2));
    }

    #[test]
    fn test_division_truncates_toward_zero() {
        assert_eq!(GridCoordinate::new(-3, 3) / 2, GridCoordinate::new(-1, 1));
    }

    #[test]
    fn test_equality_and_hash_by_value() {
        use std::collections::HashSet;

        let mut set = HashSet::new();
        set.insert(GridCoordinate::new(1, 2));
        set.insert(GridCoordinate::new(1, 2));
        set.insert(GridCoordinate::new(2, 1));
        assert_eq!(set.len(), 2);
        assert_ne!(GridCoordinate::new(1, 2), GridCoordinate::new(2, 1));
    }

    #[test]
    fn test_euclidean_distance_rounds() {
        let origin = GridCoordinate::default();
        assert_eq!(GridCoordinate::euclidean_distance(origin, GridCoordinate::new(1, 1)), 1);
        assert_eq!(GridCoordinate::euclidean_distance(origin, GridCoordinate::new(2, 2)), 3);
        assert_eq!(
            GridCoordinate::euclidean_distance(GridCoordinate::new(-3, 0), GridCoordinate::new(0, 4)),
            5
        );
    }

    #[test]
    fn test_euclidean_distance_far_apart() {
        let min = GridCoordinate::new(i32::MIN, i32::MIN);
        let max = GridCoordinate::new(i32::MAX, i32::MAX);
        assert_eq!(GridCoordinate::euclidean_distance(min, max), i32::MAX);
        assert_eq!(
            GridCoordinate::euclidean_distance(GridCoordinate::new(-2_000_000_000, 0), GridCoordinate::new(0, 0)),
            2_000_000_000
        );
    }

    #[test]
    fn test_conversions() {
        let coord = GridCoordinate::from((4, 7));
        let v: Vector2<i32> = coord.into();
        assert_eq!(v, Vector2::new(4, 7));
        assert_eq!(GridCoordinate::from(v), coord);
        assert_eq!(<(i32, i32)>::from(coord), (4, 7));
    }

    #[test]
    fn test_display() {
        assert_eq!(GridCoordinate::new(3, -1).to_string(), "x: 3 z: -1");
    }
}
