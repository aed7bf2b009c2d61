//! Per-cell search state.

use core::fmt;

use pathgrid_common::GridCoordinate;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Cost used for "not reached yet".
pub const UNREACHED: u32 = u32::MAX;

/// Search record of a single grid cell.
///
/// `f_cost` is only updated by [`PathNode::recompute_f_cost`]. Setting the g or
/// h cost leaves it stale until that call.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PathNode {
    grid_coordinate: GridCoordinate,
    g_cost: u32,
    h_cost: u32,
    f_cost: u32,
    /// Predecessor on the best known path, addressed by coordinate in the
    /// owning grid.
    came_from: Option<GridCoordinate>,
    is_walkable: bool,
}

/// Copy of the values an external debug view shows for a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NodeSnapshot {
    /// Cost from the start, [`UNREACHED`] if the cell was never reached.
    pub g_cost: u32,
    /// Heuristic estimate to the goal.
    pub h_cost: u32,
    /// Last computed `g_cost + h_cost`.
    pub f_cost: u32,
    /// Whether the search may enter the cell.
    pub is_walkable: bool,
}

impl PathNode {
    /// Creates a walkable node with zeroed costs.
    pub fn new(grid_coordinate: GridCoordinate) -> Self {
        Self {
            grid_coordinate,
            g_cost: 0,
            h_cost: 0,
            f_cost: 0,
            came_from: None,
            is_walkable: true,
        }
    }

    /// Coordinate of the cell this node belongs to.
    pub fn grid_coordinate(&self) -> GridCoordinate {
        self.grid_coordinate
    }

    pub fn g_cost(&self) -> u32 {
        self.g_cost
    }

    pub fn h_cost(&self) -> u32 {
        self.h_cost
    }

    pub fn f_cost(&self) -> u32 {
        self.f_cost
    }

    pub fn set_g_cost(&mut self, cost: u32) {
        self.g_cost = cost;
    }

    pub fn set_h_cost(&mut self, cost: u32) {
        self.h_cost = cost;
    }

    /// Sets `f_cost = g_cost + h_cost`, saturating at [`UNREACHED`].
    pub fn recompute_f_cost(&mut self) {
        self.f_cost = self.g_cost.saturating_add(self.h_cost);
    }

    pub fn came_from(&self) -> Option<GridCoordinate> {
        self.came_from
    }

    pub fn set_came_from(&mut self, previous: GridCoordinate) {
        self.came_from = Some(previous);
    }

    pub fn reset_came_from(&mut self) {
        self.came_from = None;
    }

    pub fn is_walkable(&self) -> bool {
        self.is_walkable
    }

    pub fn set_walkable(&mut self, walkable: bool) {
        self.is_walkable = walkable;
    }

    /// Puts the node back into its pre-search state. Walkability is kept.
    pub fn reset_search_state(&mut self) {
        self.set_g_cost(UNREACHED);
        self.set_h_cost(0);
        self.recompute_f_cost();
        self.reset_came_from();
    }

    /// Debug view of the node.
    pub fn snapshot(&self) -> NodeSnapshot {
        NodeSnapshot {
            g_cost: self.g_cost,
            h_cost: self.h_cost,
            f_cost: self.f_cost,
            is_walkable: self.is_walkable,
        }
    }
}

impl fmt::Display for PathNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.grid_coordinate)
    }
}
