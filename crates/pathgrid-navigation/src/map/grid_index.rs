//! Fixed-size 2D grid container.
//!
//! [`GridIndex`] maps every in-bounds [`GridCoordinate`] to exactly one payload
//! value and converts between grid coordinates and world positions. Cells are
//! laid out on the world `x`/`z` plane, `cell_size` world units apart.

#![warn(missing_docs)]

use pathgrid_common::{GridCoordinate, WorldPosition};

use crate::error::{NavigationError, Result};

/// Shape of a grid: its extent in cells and the world size of one cell.
///
/// Holds the pure coordinate logic of a [`GridIndex`] so it can be handed to
/// cell factories while the grid itself is still being built.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridGeometry {
    width: i32,
    height: i32,
    cell_size: f32,
}

impl GridGeometry {
    /// Validates and creates a new geometry.
    ///
    /// # Errors
    /// * `InvalidDimensions` if `width` or `height` is not positive.
    /// * `InvalidCellSize` if `cell_size` is not finite and positive.
    pub fn new(width: i32, height: i32, cell_size: f32) -> Result<Self> {
        if width <= 0 || height <= 0 {
            return Err(NavigationError::InvalidDimensions { width, height });
        }
        if !cell_size.is_finite() || cell_size <= 0.0 {
            return Err(NavigationError::InvalidCellSize(cell_size));
        }
        // Only overflows where `usize` is 32 bits wide; the storage size is
        // checked when a grid is built.
        (width as usize)
            .checked_mul(height as usize)
            .ok_or(NavigationError::InvalidDimensions { width, height })?;

        Ok(Self {
            width,
            height,
            cell_size,
        })
    }

    /// Number of columns.
    pub fn width(&self) -> i32 {
        self.width
    }

    /// Number of rows.
    pub fn height(&self) -> i32 {
        self.height
    }

    /// World units per cell.
    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Total number of cells.
    pub fn cell_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Returns true if `coord` lies inside `[0, width) x [0, height)`.
    pub fn is_valid(&self, coord: GridCoordinate) -> bool {
        coord.x >= 0 && coord.z >= 0 && coord.x < self.width && coord.z < self.height
    }

    /// World position of a cell: `(x, 0, z) * cell_size`.
    ///
    /// Defined for every coordinate, in bounds or not.
    pub fn world_position(&self, coord: GridCoordinate) -> WorldPosition {
        WorldPosition::new(
            coord.x as f32 * self.cell_size,
            0.0,
            coord.z as f32 * self.cell_size,
        )
    }

    /// Nearest cell to a world position.
    ///
    /// Halfway values round to the even neighbour. The `y` component is
    /// ignored, and the result is not bounds-checked.
    pub fn grid_coordinate(&self, position: &WorldPosition) -> GridCoordinate {
        GridCoordinate::new(
            (position.x / self.cell_size).round_ties_even() as i32,
            (position.z / self.cell_size).round_ties_even() as i32,
        )
    }

    /// Iterates over every in-bounds coordinate in scan order
    /// (column-major: `x` outer, `z` inner).
    pub fn coordinates(&self) -> impl Iterator<Item = GridCoordinate> + use<> {
        let height = self.height;
        (0..self.width).flat_map(move |x| (0..height).map(move |z| GridCoordinate::new(x, z)))
    }

    /// Storage slot of an in-bounds coordinate.
    fn index(&self, coord: GridCoordinate) -> Option<usize> {
        self.is_valid(coord)
            .then(|| coord.x as usize * self.height as usize + coord.z as usize)
    }
}

/// Dense `width x height` container of per-cell payloads.
///
/// # Examples
///
/// ```
/// use pathgrid_common::GridCoordinate;
/// use pathgrid_navigation::GridIndex;
///
/// let grid = GridIndex::new(3, 2, 1.0, |_, coord| coord.x * 10 + coord.z).unwrap();
/// assert_eq!(*grid.get(GridCoordinate::new(2, 1)).unwrap(), 21);
/// assert!(grid.get(GridCoordinate::new(3, 0)).is_err());
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridIndex<T> {
    geometry: GridGeometry,
    /// Cells in scan order, see [`GridGeometry::coordinates`].
    cells: Vec<T>,
}

impl<T> GridIndex<T> {
    /// Creates a grid, filling each cell with `factory(&geometry, coord)`.
    ///
    /// The factory runs exactly once per cell, in scan order.
    ///
    /// # Arguments
    /// * `width` - Number of columns, must be positive
    /// * `height` - Number of rows, must be positive
    /// * `cell_size` - World units per cell, must be positive
    /// * `factory` - Produces the payload of each cell
    pub fn new<F>(width: i32, height: i32, cell_size: f32, mut factory: F) -> Result<Self>
    where
        F: FnMut(&GridGeometry, GridCoordinate) -> T,
    {
        Self::try_new(width, height, cell_size, |geometry, coord| {
            Ok::<_, NavigationError>(factory(geometry, coord))
        })
    }

    /// Creates a grid from a fallible factory.
    ///
    /// The first factory error aborts construction and is returned as is.
    /// Invalid dimensions, including grids too large to allocate, are reported
    /// through `E: From<NavigationError>`.
    pub fn try_new<F, E>(width: i32, height: i32, cell_size: f32, mut factory: F) -> Result<Self, E>
    where
        F: FnMut(&GridGeometry, GridCoordinate) -> Result<T, E>,
        E: From<NavigationError>,
    {
        let geometry = GridGeometry::new(width, height, cell_size)?;
        let too_large = || NavigationError::InvalidDimensions { width, height };
        if geometry
            .cell_count()
            .checked_mul(size_of::<T>())
            .is_none_or(|bytes| bytes > isize::MAX as usize)
        {
            return Err(too_large().into());
        }
        let mut cells = Vec::new();
        cells
            .try_reserve_exact(geometry.cell_count())
            .map_err(|_| too_large())?;
        for coord in geometry.coordinates() {
            cells.push(factory(&geometry, coord)?);
        }
        Ok(Self { geometry, cells })
    }

    /// Shape of the grid.
    pub fn geometry(&self) -> &GridGeometry {
        &self.geometry
    }

    /// Number of columns.
    pub fn width(&self) -> i32 {
        self.geometry.width
    }

    /// Number of rows.
    pub fn height(&self) -> i32 {
        self.geometry.height
    }

    /// World units per cell.
    pub fn cell_size(&self) -> f32 {
        self.geometry.cell_size
    }

    /// Total number of cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Always false: a grid has at least one cell.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Returns true if `coord` is inside the grid.
    pub fn is_valid(&self, coord: GridCoordinate) -> bool {
        self.geometry.is_valid(coord)
    }

    /// See [`GridGeometry::world_position`].
    pub fn world_position(&self, coord: GridCoordinate) -> WorldPosition {
        self.geometry.world_position(coord)
    }

    /// See [`GridGeometry::grid_coordinate`].
    pub fn grid_coordinate(&self, position: &WorldPosition) -> GridCoordinate {
        self.geometry.grid_coordinate(position)
    }

    /// Gets the cell at `coord`.
    pub fn get(&self, coord: GridCoordinate) -> Result<&T> {
        let index = self
            .geometry
            .index(coord)
            .ok_or(NavigationError::OutOfBounds(coord))?;
        Ok(&self.cells[index])
    }

    /// Gets the cell at `coord` for mutation.
    pub fn get_mut(&mut self, coord: GridCoordinate) -> Result<&mut T> {
        let index = self
            .geometry
            .index(coord)
            .ok_or(NavigationError::OutOfBounds(coord))?;
        Ok(&mut self.cells[index])
    }

    /// Iterates over `(coordinate, cell)` pairs in scan order.
    pub fn iter(&self) -> impl Iterator<Item = (GridCoordinate, &T)> {
        self.geometry.coordinates().zip(self.cells.iter())
    }

    /// Iterates mutably over `(coordinate, cell)` pairs in scan order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (GridCoordinate, &mut T)> {
        self.geometry.coordinates().zip(self.cells.iter_mut())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coord(x: i32, z: i32) -> GridCoordinate {
        GridCoordinate::new(x, z)
    }

    #[test]
    fn test_grid_creation() {
        let grid = GridIndex::new(4, 3, 0.5, |_, c| c).unwrap();
        assert_eq!(grid.width(), 4);
        assert_eq!(grid.height(), 3);
        assert_eq!(grid.cell_size(), 0.5);
        assert_eq!(grid.len(), 12);
        for (c, cell) in grid.iter() {
            assert_eq!(c, *cell);
        }
    }

    #[test]
    fn test_invalid_creation() {
        assert!(matches!(
            GridIndex::new(0, 3, 1.0, |_, _| ()),
            Err(NavigationError::InvalidDimensions { width: 0, height: 3 })
        ));
        assert!(matches!(
            GridIndex::new(3, -2, 1.0, |_, _| ()),
            Err(NavigationError::InvalidDimensions { .. })
        ));
        assert!(matches!(
            GridIndex::new(3, 3, 0.0, |_, _| ()),
            Err(NavigationError::InvalidCellSize(_))
        ));
        assert!(matches!(
            GridIndex::new(3, 3, f32::NAN, |_, _| ()),
            Err(NavigationError::InvalidCellSize(_))
        ));
    }

    #[test]
    fn test_oversized_grid_is_rejected() {
        let mut calls = 0;
        let grid = GridIndex::new(i32::MAX, i32::MAX, 1.0, |_, _| {
            calls += 1;
            0u64
        });
        assert!(matches!(
            grid,
            Err(NavigationError::InvalidDimensions {
                width: i32::MAX,
                height: i32::MAX
            })
        ));
        assert_eq!(calls, 0);
    }

    #[test]
    fn test_factory_scan_order() {
        let mut visited = Vec::new();
        GridIndex::new(2, 3, 1.0, |_, c| visited.push(c)).unwrap();
        assert_eq!(
            visited,
            vec![
                coord(0, 0),
                coord(0, 1),
                coord(0, 2),
                coord(1, 0),
                coord(1, 1),
                coord(1, 2)
            ]
        );
    }

    #[test]
    fn test_factory_receives_geometry() {
        let grid = GridIndex::new(3, 3, 2.0, |geometry, c| geometry.world_position(c)).unwrap();
        let cell = grid.get(coord(2, 1)).unwrap();
        assert_eq!(*cell, WorldPosition::new(4.0, 0.0, 2.0));
    }

    #[test]
    fn test_factory_failure_aborts() {
        #[derive(Debug, PartialEq)]
        enum BuildError {
            Grid,
            Cell(GridCoordinate),
        }

        impl From<NavigationError> for BuildError {
            fn from(_: NavigationError) -> Self {
                BuildError::Grid
            }
        }

        let mut calls = 0;
        let result = GridIndex::try_new(3, 3, 1.0, |_, c| {
            calls += 1;
            if c == coord(1, 0) {
                Err(BuildError::Cell(c))
            } else {
                Ok(())
            }
        });
        assert_eq!(result.unwrap_err(), BuildError::Cell(coord(1, 0)));
        assert_eq!(calls, 4);

        let result = GridIndex::<()>::try_new(0, 3, 1.0, |_, _| Ok::<_, BuildError>(()));
        assert_eq!(result.unwrap_err(), BuildError::Grid);
    }

    #[test]
    fn test_get_and_bounds() {
        let mut grid = GridIndex::new(3, 2, 1.0, |_, _| 0u8).unwrap();
        *grid.get_mut(coord(2, 1)).unwrap() = 7;
        assert_eq!(*grid.get(coord(2, 1)).unwrap(), 7);
        assert_eq!(*grid.get(coord(1, 1)).unwrap(), 0);

        for out in [coord(-1, 0), coord(0, -1), coord(3, 0), coord(0, 2)] {
            assert!(!grid.is_valid(out));
            assert!(matches!(grid.get(out), Err(NavigationError::OutOfBounds(c)) if c == out));
            assert!(grid.get_mut(out).is_err());
        }
        assert!(grid.is_valid(coord(0, 0)));
        assert!(grid.is_valid(coord(2, 1)));
    }

    #[test]
    fn test_world_position() {
        let grid = GridIndex::new(5, 5, 2.5, |_, _| ()).unwrap();
        assert_eq!(grid.world_position(coord(0, 0)), WorldPosition::new(0.0, 0.0, 0.0));
        assert_eq!(grid.world_position(coord(2, 3)), WorldPosition::new(5.0, 0.0, 7.5));
        // Not bounds-checked.
        assert_eq!(grid.world_position(coord(-2, 9)), WorldPosition::new(-5.0, 0.0, 22.5));
    }

    #[test]
    fn test_coordinate_round_trip() {
        let grid = GridIndex::new(6, 4, 1.5, |_, _| ()).unwrap();
        for c in grid.geometry().coordinates() {
            let world = grid.world_position(c);
            assert_eq!(grid.grid_coordinate(&world), c);
        }

        // Anything within half a cell of the center maps back to the same cell.
        let center = grid.world_position(coord(3, 2));
        for (dx, dz) in [(0.7, 0.0), (-0.7, 0.7), (0.0, -0.7), (0.3, 0.3)] {
            let p = WorldPosition::new(center.x + dx, 5.0, center.z + dz);
            assert_eq!(grid.grid_coordinate(&p), coord(3, 2));
        }
    }

    #[test]
    fn test_grid_coordinate_rounding() {
        let grid = GridIndex::new(4, 4, 1.0, |_, _| ()).unwrap();
        assert_eq!(grid.grid_coordinate(&WorldPosition::new(1.4, 0.0, 1.6)), coord(1, 2));
        assert_eq!(grid.grid_coordinate(&WorldPosition::new(2.5, 0.0, 1.5)), coord(2, 2));
        assert_eq!(grid.grid_coordinate(&WorldPosition::new(-0.6, 0.0, 9.2)), coord(-1, 9));
    }
}
