//! Construction parameters of a [`crate::Pathfinder`].

use crate::obstruction::DEFAULT_PROBE_HALF_HEIGHT;
use crate::pathfinder::{Heuristic, OpenList};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Grid shape and search options.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PathfinderConfig {
    /// Number of columns.
    pub width: i32,
    /// Number of rows.
    pub height: i32,
    /// World units per cell.
    pub cell_size: f32,
    /// Half height of the column probed around each cell during the
    /// walkability pass.
    pub probe_half_height: f32,
    /// Estimate used for the h cost.
    pub heuristic: Heuristic,
    /// Open list implementation.
    pub open_list: OpenList,
}

impl PathfinderConfig {
    /// Config for a `width x height` grid, everything else default.
    pub fn new(width: i32, height: i32, cell_size: f32) -> Self {
        Self {
            width,
            height,
            cell_size,
            ..Self::default()
        }
    }

    pub fn with_heuristic(mut self, heuristic: Heuristic) -> Self {
        self.heuristic = heuristic;
        self
    }

    pub fn with_open_list(mut self, open_list: OpenList) -> Self {
        self.open_list = open_list;
        self
    }
}

impl Default for PathfinderConfig {
    fn default() -> Self {
        Self {
            width: 10,
            height: 10,
            cell_size: 1.0,
            probe_half_height: DEFAULT_PROBE_HALF_HEIGHT,
            heuristic: Heuristic::default(),
            open_list: OpenList::default(),
        }
    }
}
