use std::sync::Arc;

use anyhow::{Context, bail};
use parking_lot::RwLock;
use pathgrid_common::GridCoordinate;
use pathgrid_navigation::{Aabb, GridGeometry, ObstacleField, Pathfinder, PathfinderConfig};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::info;

use crate::settings::{RandomObstacles, Settings};

/// Pathfinder shared between query tasks. Queries take the read lock, world
/// changes take the write lock.
pub type SharedPathfinder = Arc<RwLock<Pathfinder>>;

/// Distance from a cell center to the faces of a cell-aligned box, in cells.
const CELL_BOX_HALF_EXTENT: f32 = 0.45;

/// Collects the configured and randomly placed obstacles.
pub fn build_obstacle_field(settings: &Settings) -> anyhow::Result<ObstacleField> {
    let mut field: ObstacleField = settings.obstacles.iter().map(|o| o.to_aabb()).collect();

    if let Some(random) = &settings.random_obstacles {
        let geometry = geometry_of(&settings.grid)?;
        for obstacle in scatter_obstacles(&geometry, random)? {
            field.push(obstacle);
        }
    }

    info!(obstacles = field.len(), "Obstacle field built");
    Ok(field)
}

/// Places `count` cell-aligned boxes of random size on the grid.
pub fn scatter_obstacles(geometry: &GridGeometry, random: &RandomObstacles) -> anyhow::Result<Vec<Aabb>> {
    if random.max_size < 1 {
        bail!("random_obstacles.max_size must be at least 1, got {}", random.max_size);
    }

    let seed = random.seed.unwrap_or_else(rand::random);
    info!(seed, count = random.count, "Scattering random obstacles");
    let mut rng = StdRng::seed_from_u64(seed);

    let obstacles = (0..random.count)
        .map(|_| {
            let corner = GridCoordinate::new(
                rng.random_range(0..geometry.width()),
                rng.random_range(0..geometry.height()),
            );
            let size = GridCoordinate::new(
                rng.random_range(1..=random.max_size),
                rng.random_range(1..=random.max_size),
            );
            cell_box(geometry, corner, corner + size - GridCoordinate::new(1, 1))
        })
        .collect();
    Ok(obstacles)
}

/// Box covering the cells from `first` to `last` inclusive and nothing else.
pub fn cell_box(geometry: &GridGeometry, first: GridCoordinate, last: GridCoordinate) -> Aabb {
    let margin = CELL_BOX_HALF_EXTENT * geometry.cell_size();
    let mut min = geometry.world_position(first);
    let mut max = geometry.world_position(last);
    min.x -= margin;
    min.z -= margin;
    max.x += margin;
    max.z += margin;
    max.y += geometry.cell_size();
    Aabb::from_corners(min, max)
}

/// Re-runs the walkability pass after the world changed.
pub fn apply_world_change(pathfinder: &SharedPathfinder, field: &ObstacleField) -> anyhow::Result<usize> {
    let blocked = pathfinder
        .write()
        .recompute_walkability(field)
        .context("Failed to recompute walkability")?;
    info!(blocked, "World change applied");
    Ok(blocked)
}

fn geometry_of(config: &PathfinderConfig) -> anyhow::Result<GridGeometry> {
    GridGeometry::new(config.width, config.height, config.cell_size).context("Invalid grid settings")
}
