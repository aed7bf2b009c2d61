//! A* path search over a walkability grid.
//!
//! The [`Pathfinder`] owns one [`PathNode`] per grid cell. Only walkability
//! persists between queries: every search works on its own copy of the nodes,
//! so `&self` queries may run concurrently.
//!
//! # Cost model
//!
//! Agents move between orthogonal neighbours only. The distance between two
//! cells is `STRAIGHT_COST * ||dx| - |dz||`, i.e. the imbalance between the two
//! axis offsets. For neighbours this is exactly one straight step. As a
//! heuristic it never over-estimates and it changes by at most one step between
//! neighbours, so the paths found are of minimal cost, but it ignores the
//! shared part of the offsets and therefore guides the search poorly for
//! goals lying diagonally from the start. [`Heuristic::Manhattan`] is
//! available as an opt-in alternative for the h cost.

use core::cmp::Ordering;
use core::fmt;
use std::collections::{BinaryHeap, HashSet};

use pathgrid_common::{GridCoordinate, WorldPosition};
use tracing::{debug, info, trace};

use crate::config::PathfinderConfig;
use crate::error::{NavigationError, Result};
use crate::map::GridIndex;
use crate::obstruction::{ColumnProbe, ObstructionOracle};
use crate::path_node::{NodeSnapshot, PathNode, UNREACHED};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Cost of a step to an orthogonal neighbour.
pub const STRAIGHT_COST: u32 = 10;

/// Cost of a diagonal step. Diagonal neighbours are not connected, so the
/// search never uses it.
pub const DIAGONAL_COST: u32 = 14;

/// Distance estimate between two cells: `STRAIGHT_COST * ||dx| - |dz||`.
///
/// ```
/// use pathgrid_common::GridCoordinate;
/// use pathgrid_navigation::pathfinder::distance;
///
/// let origin = GridCoordinate::new(0, 0);
/// assert_eq!(distance(origin, GridCoordinate::new(3, 1)), 20);
/// assert_eq!(distance(origin, GridCoordinate::new(2, 2)), 0);
/// ```
pub fn distance(a: GridCoordinate, b: GridCoordinate) -> u32 {
    let dx = a.x.abs_diff(b.x);
    let dz = a.z.abs_diff(b.z);
    STRAIGHT_COST.saturating_mul(dx.abs_diff(dz))
}

/// Manhattan distance between two cells, in step costs.
pub fn manhattan_distance(a: GridCoordinate, b: GridCoordinate) -> u32 {
    let dx = a.x.abs_diff(b.x);
    let dz = a.z.abs_diff(b.z);
    STRAIGHT_COST.saturating_mul(dx.saturating_add(dz))
}

/// Estimate used for a node's h cost.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Heuristic {
    /// [`distance`], the same estimate used for step costs.
    #[default]
    AxisImbalance,
    /// [`manhattan_distance`].
    Manhattan,
}

impl Heuristic {
    /// Estimated cost from `from` to `goal`.
    pub fn estimate(self, from: GridCoordinate, goal: GridCoordinate) -> u32 {
        match self {
            Heuristic::AxisImbalance => distance(from, goal),
            Heuristic::Manhattan => manhattan_distance(from, goal),
        }
    }
}

/// How the open list picks the next node to expand.
///
/// Both variants expand a node of minimal f cost, so the cost of the returned
/// path is the same. They break ties differently and may therefore return
/// different cells when several paths share that cost.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum OpenList {
    /// Insertion-ordered list scanned linearly. Ties go to the node that has
    /// been in the list longest; updating a node keeps its position.
    #[default]
    LinearScan,
    /// Binary heap keyed on (f cost, push order). An updated node is pushed
    /// again, so ties go to the node whose cost was set first.
    BinaryHeap,
}

/// Result of a path query.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PathResult<T = GridCoordinate> {
    /// Cells from start to goal inclusive, `None` if the goal is unreachable.
    pub path: Option<Vec<T>>,
    /// Total cost of the path (the goal's g cost), 0 when no path exists.
    pub length: u32,
    /// Number of nodes taken off the open list.
    pub nodes_explored: usize,
}

impl<T> PathResult<T> {
    /// Creates a new PathResult for a successful search.
    pub fn success(path: Vec<T>, length: u32, nodes_explored: usize) -> Self {
        Self {
            path: Some(path),
            length,
            nodes_explored,
        }
    }

    /// Creates a new PathResult for a search that exhausted the open list.
    pub fn failure(nodes_explored: usize) -> Self {
        Self {
            path: None,
            length: 0,
            nodes_explored,
        }
    }

    /// Returns true if a path was found.
    pub fn is_success(&self) -> bool {
        self.path.is_some()
    }

    /// Returns the path if one was found.
    pub fn path(&self) -> Option<&[T]> {
        self.path.as_deref()
    }

    /// Returns the path if one was found.
    pub fn into_path(self) -> Option<Vec<T>> {
        self.path
    }

    /// Converts every waypoint with `f`, keeping the metadata.
    pub fn map_path<U>(self, f: impl FnMut(T) -> U) -> PathResult<U> {
        PathResult {
            path: self.path.map(|path| path.into_iter().map(f).collect()),
            length: self.length,
            nodes_explored: self.nodes_explored,
        }
    }
}

impl<T> fmt::Display for PathResult<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.path {
            Some(path) => write!(
                f,
                "PathResult {{ success: true, waypoints: {}, length: {}, nodes_explored: {} }}",
                path.len(),
                self.length,
                self.nodes_explored
            ),
            None => write!(
                f,
                "PathResult {{ success: false, nodes_explored: {} }}",
                self.nodes_explored
            ),
        }
    }
}

/// A finished search together with the node states it left behind.
///
/// Meant for debug views that display per-cell costs.
#[derive(Debug, Clone)]
pub struct SearchTrace {
    nodes: GridIndex<PathNode>,
    result: PathResult,
}

impl SearchTrace {
    pub fn result(&self) -> &PathResult {
        &self.result
    }

    pub fn into_result(self) -> PathResult {
        self.result
    }

    /// Node state of `coord` at the end of the search.
    pub fn node(&self, coord: GridCoordinate) -> Result<&PathNode> {
        self.nodes.get(coord)
    }

    pub fn snapshot(&self, coord: GridCoordinate) -> Result<NodeSnapshot> {
        self.nodes.get(coord).map(PathNode::snapshot)
    }

    /// Snapshots of every cell in scan order.
    pub fn snapshots(&self) -> impl Iterator<Item = (GridCoordinate, NodeSnapshot)> + '_ {
        self.nodes.iter().map(|(coord, node)| (coord, node.snapshot()))
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
struct State {
    f_cost: u32,
    sequence: u64,
    position: GridCoordinate,
}

// The priority queue depends on `Ord`.
// Flip both comparisons so the max-heap pops the lowest f cost first, and
// among equal costs the entry pushed first.
impl Ord for State {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .f_cost
            .cmp(&self.f_cost)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

impl PartialOrd for State {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Nodes discovered but not yet expanded.
enum OpenSet {
    Linear(Vec<GridCoordinate>),
    Heap {
        heap: BinaryHeap<State>,
        members: HashSet<GridCoordinate>,
        sequence: u64,
    },
}

impl OpenSet {
    fn new(kind: OpenList) -> Self {
        match kind {
            OpenList::LinearScan => OpenSet::Linear(Vec::new()),
            OpenList::BinaryHeap => OpenSet::Heap {
                heap: BinaryHeap::new(),
                members: HashSet::new(),
                sequence: 0,
            },
        }
    }

    /// Adds `position`, or records its new f cost if it is already open.
    fn insert(&mut self, position: GridCoordinate, f_cost: u32) {
        match self {
            OpenSet::Linear(open) => {
                if !open.contains(&position) {
                    open.push(position);
                }
            }
            OpenSet::Heap {
                heap,
                members,
                sequence,
            } => {
                // Older entries for the same position become stale and are
                // skipped when popped.
                members.insert(position);
                heap.push(State {
                    f_cost,
                    sequence: *sequence,
                    position,
                });
                *sequence += 1;
            }
        }
    }

    /// Removes and returns the open node with the lowest f cost.
    fn pop_lowest(&mut self, nodes: &GridIndex<PathNode>) -> Option<GridCoordinate> {
        match self {
            OpenSet::Linear(open) => {
                let f_cost = |position: &GridCoordinate| {
                    nodes.get(*position).map_or(UNREACHED, PathNode::f_cost)
                };
                let mut lowest = 0;
                for (index, position) in open.iter().enumerate().skip(1) {
                    // Strictly less: the earliest of equal candidates wins.
                    if f_cost(position) < f_cost(&open[lowest]) {
                        lowest = index;
                    }
                }
                (!open.is_empty()).then(|| open.remove(lowest))
            }
            OpenSet::Heap { heap, members, .. } => {
                while let Some(State { position, .. }) = heap.pop() {
                    if members.remove(&position) {
                        return Some(position);
                    }
                }
                None
            }
        }
    }
}

/// A* pathfinder over a fixed grid.
///
/// # Examples
///
/// ```
/// use pathgrid_common::{GridCoordinate, WorldPosition};
/// use pathgrid_navigation::{Pathfinder, PathfinderConfig};
///
/// // Wall along x = 2 except for the top row.
/// let oracle = |p: &WorldPosition| p.x == 2.0 && p.z < 4.0;
/// let pathfinder = Pathfinder::new(PathfinderConfig::new(5, 5, 1.0), &oracle).unwrap();
///
/// let result = pathfinder
///     .find_path(GridCoordinate::new(0, 0), GridCoordinate::new(4, 0))
///     .unwrap();
/// assert!(result.is_success());
/// assert_eq!(result.length, 120);
/// ```
#[derive(Debug, Clone)]
pub struct Pathfinder {
    grid: GridIndex<PathNode>,
    probe_half_height: f32,
    heuristic: Heuristic,
    open_list: OpenList,
}

impl Pathfinder {
    /// Builds the grid and runs the walkability pass with `oracle`.
    ///
    /// # Errors
    /// * `InvalidDimensions` / `InvalidCellSize` for a bad grid shape.
    /// * `Obstruction` if the oracle fails for any cell.
    pub fn new<O>(config: PathfinderConfig, oracle: &O) -> Result<Self>
    where
        O: ObstructionOracle + ?Sized,
    {
        let mut pathfinder = Self::open(config)?;
        pathfinder.recompute_walkability(oracle)?;
        Ok(pathfinder)
    }

    /// Builds a grid on which every cell is walkable.
    pub fn open(config: PathfinderConfig) -> Result<Self> {
        let grid = GridIndex::new(config.width, config.height, config.cell_size, |_, coord| {
            let mut node = PathNode::new(coord);
            node.reset_search_state();
            node
        })?;

        Ok(Self {
            grid,
            probe_half_height: config.probe_half_height,
            heuristic: config.heuristic,
            open_list: config.open_list,
        })
    }

    /// Re-runs the walkability pass, probing every cell with `oracle`.
    ///
    /// Walkability is only updated once every cell has been probed; if the
    /// oracle fails the previous state is kept. Returns the number of blocked
    /// cells.
    pub fn recompute_walkability<O>(&mut self, oracle: &O) -> Result<usize>
    where
        O: ObstructionOracle + ?Sized,
    {
        let geometry = *self.grid.geometry();
        let walkable = geometry
            .coordinates()
            .map(|coord| {
                let probe = ColumnProbe::new(geometry.world_position(coord), self.probe_half_height);
                oracle
                    .is_obstructed(&probe)
                    .map(|obstructed| !obstructed)
                    .map_err(|fault| NavigationError::Obstruction(fault.into()))
            })
            .collect::<Result<Vec<bool>>>()?;

        let mut blocked = 0;
        for ((_, node), walkable) in self.grid.iter_mut().zip(walkable) {
            node.set_walkable(walkable);
            if !walkable {
                blocked += 1;
            }
        }

        info!(
            width = geometry.width(),
            height = geometry.height(),
            blocked,
            "Walkability pass complete"
        );
        Ok(blocked)
    }

    /// Finds a path from `start` to `goal`.
    ///
    /// An unreachable goal yields [`PathResult::failure`]; `start == goal`
    /// yields a single-cell path of length 0.
    ///
    /// # Errors
    /// * `OutOfBounds` if `start` or `goal` lies outside the grid.
    pub fn find_path(&self, start: GridCoordinate, goal: GridCoordinate) -> Result<PathResult> {
        self.search(start, goal).map(SearchTrace::into_result)
    }

    /// Like [`Pathfinder::find_path`] but keeps the per-node search state.
    pub fn search(&self, start: GridCoordinate, goal: GridCoordinate) -> Result<SearchTrace> {
        self.grid.get(start)?;
        self.grid.get(goal)?;

        let mut nodes = self.grid.clone();
        for (_, node) in nodes.iter_mut() {
            node.reset_search_state();
        }

        let start_node = nodes.get_mut(start)?;
        start_node.set_g_cost(0);
        start_node.set_h_cost(self.heuristic.estimate(start, goal));
        start_node.recompute_f_cost();

        let mut open = OpenSet::new(self.open_list);
        open.insert(start, start_node.f_cost());
        let mut closed: HashSet<GridCoordinate> = HashSet::new();
        let mut nodes_explored = 0;

        while let Some(current) = open.pop_lowest(&nodes) {
            nodes_explored += 1;

            if current == goal {
                let length = nodes.get(goal)?.g_cost();
                let path = reconstruct_path(&nodes, goal)?;
                debug!(%start, %goal, length, nodes_explored, "Path found");
                return Ok(SearchTrace {
                    nodes,
                    result: PathResult::success(path, length, nodes_explored),
                });
            }

            closed.insert(current);
            let current_g = nodes.get(current)?.g_cost();
            trace!(%current, g_cost = current_g, "Expanding node");

            for neighbour in self.neighbours(current) {
                if closed.contains(&neighbour) {
                    continue;
                }

                let node = nodes.get_mut(neighbour)?;
                if !node.is_walkable() {
                    closed.insert(neighbour);
                    continue;
                }

                let tentative_g = current_g.saturating_add(distance(current, neighbour));
                if tentative_g < node.g_cost() {
                    node.set_came_from(current);
                    node.set_g_cost(tentative_g);
                    node.set_h_cost(self.heuristic.estimate(neighbour, goal));
                    node.recompute_f_cost();
                    open.insert(neighbour, node.f_cost());
                }
            }
        }

        debug!(%start, %goal, nodes_explored, "No path found");
        Ok(SearchTrace {
            nodes,
            result: PathResult::failure(nodes_explored),
        })
    }

    /// Finds a path between two world positions, each snapped to its nearest
    /// cell. Waypoints are the world positions of the path's cells.
    ///
    /// # Errors
    /// * `NonFinitePosition` if either position has a NaN or infinite `x`/`z`.
    /// * `OutOfBounds` if either position snaps to a cell outside the grid.
    pub fn find_path_world(
        &self,
        start: &WorldPosition,
        goal: &WorldPosition,
    ) -> Result<PathResult<WorldPosition>> {
        for position in [start, goal] {
            if !position.x.is_finite() || !position.z.is_finite() {
                return Err(NavigationError::NonFinitePosition {
                    x: position.x,
                    z: position.z,
                });
            }
        }
        let result = self.find_path(self.world_to_grid(start), self.world_to_grid(goal))?;
        Ok(result.map_path(|coord| self.grid_to_world(coord)))
    }

    /// Returns true if `goal` can be reached from `start`.
    pub fn has_path(&self, start: GridCoordinate, goal: GridCoordinate) -> Result<bool> {
        Ok(self.find_path(start, goal)?.is_success())
    }

    /// Cost of the path from `start` to `goal`, 0 if there is none.
    pub fn path_length(&self, start: GridCoordinate, goal: GridCoordinate) -> Result<u32> {
        Ok(self.find_path(start, goal)?.length)
    }

    pub fn is_walkable(&self, coord: GridCoordinate) -> Result<bool> {
        self.grid.get(coord).map(PathNode::is_walkable)
    }

    /// Overrides the walkability of a single cell.
    pub fn set_walkable(&mut self, coord: GridCoordinate, walkable: bool) -> Result<()> {
        self.grid.get_mut(coord)?.set_walkable(walkable);
        Ok(())
    }

    /// Persistent node of `coord`. Its costs are always in the reset state;
    /// use [`Pathfinder::search`] to inspect costs after a query.
    pub fn node(&self, coord: GridCoordinate) -> Result<&PathNode> {
        self.grid.get(coord)
    }

    pub fn snapshot(&self, coord: GridCoordinate) -> Result<NodeSnapshot> {
        self.grid.get(coord).map(PathNode::snapshot)
    }

    pub fn grid(&self) -> &GridIndex<PathNode> {
        &self.grid
    }

    pub fn heuristic(&self) -> Heuristic {
        self.heuristic
    }

    pub fn open_list(&self) -> OpenList {
        self.open_list
    }

    /// Nearest cell to a world position, not bounds-checked.
    pub fn world_to_grid(&self, position: &WorldPosition) -> GridCoordinate {
        self.grid.grid_coordinate(position)
    }

    pub fn grid_to_world(&self, coord: GridCoordinate) -> WorldPosition {
        self.grid.world_position(coord)
    }

    /// In-bounds orthogonal neighbours in the order left, right, down, up.
    fn neighbours(&self, position: GridCoordinate) -> impl Iterator<Item = GridCoordinate> + '_ {
        [(-1, 0), (1, 0), (0, -1), (0, 1)]
            .into_iter()
            .map(move |(dx, dz)| position + GridCoordinate::new(dx, dz))
            .filter(|neighbour| self.grid.is_valid(*neighbour))
    }
}

/// Follows `came_from` links back from `goal` and returns the path in
/// start-to-goal order.
fn reconstruct_path(
    nodes: &GridIndex<PathNode>,
    goal: GridCoordinate,
) -> Result<Vec<GridCoordinate>> {
    let mut path = vec![goal];
    let mut current = nodes.get(goal)?;
    while let Some(previous) = current.came_from() {
        path.push(previous);
        current = nodes.get(previous)?;
    }
    path.reverse();
    Ok(path)
}
