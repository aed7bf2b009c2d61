use config::{Config, ConfigError, Environment, File, FileFormat};
use pathgrid_common::GridCoordinate;
use pathgrid_navigation::{Aabb, PathfinderConfig};
use serde::Deserialize;
use tracing::{error, info};

pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Everything the demo service needs to build its world and run queries.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub grid: PathfinderConfig,
    #[serde(default)]
    pub obstacles: Vec<ObstacleSettings>,
    pub random_obstacles: Option<RandomObstacles>,
    /// Obstacles that appear after the first round of queries.
    #[serde(default)]
    pub late_obstacles: Vec<ObstacleSettings>,
    #[serde(default)]
    pub queries: Vec<QuerySettings>,
}

/// World-space box given by two opposite corners.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct ObstacleSettings {
    pub min: [f32; 3],
    pub max: [f32; 3],
}

impl ObstacleSettings {
    pub fn to_aabb(&self) -> Aabb {
        Aabb::from_corners(self.min.into(), self.max.into())
    }
}

/// Cell-aligned boxes scattered over the grid.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct RandomObstacles {
    pub count: usize,
    /// Largest box side, in cells.
    pub max_size: i32,
    /// Fixed seed for reproducible layouts; random when absent.
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct QuerySettings {
    #[serde(default)]
    pub name: Option<String>,
    pub start: GridCoordinate,
    pub goal: GridCoordinate,
}

impl QuerySettings {
    /// Name for log lines, falling back to the endpoints.
    pub fn label(&self) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| format!("({}) -> ({})", self.start, self.goal))
    }
}

/// Loads settings from `path`, then applies `PATHGRID__*` environment
/// overrides (e.g. `PATHGRID__GRID__WIDTH=32`).
pub fn load_settings(path: &str) -> Result<Settings, ConfigError> {
    info!("Attempting to load configuration from {}", path);

    let settings = Config::builder()
        .add_source(File::new(path, FileFormat::Toml).required(true))
        .add_source(
            Environment::with_prefix("PATHGRID")
                .separator("__")
                .try_parsing(true),
        )
        .build()
        .and_then(|config| config.try_deserialize::<Settings>());

    match settings {
        Ok(settings) => {
            info!(
                width = settings.grid.width,
                height = settings.grid.height,
                obstacles = settings.obstacles.len(),
                queries = settings.queries.len(),
                "Successfully loaded configuration"
            );
            Ok(settings)
        }
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pathgrid_common::WorldPosition;
    use pathgrid_navigation::{Heuristic, OpenList};

    /// Parses settings from TOML text without consulting the environment.
    fn parse_settings(toml: &str) -> Result<Settings, ConfigError> {
        Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()?
            .try_deserialize()
    }

    #[test]
    fn test_parse_full_settings() {
        let settings = parse_settings(
            r#"
            [grid]
            width = 8
            height = 6
            cell_size = 0.5
            heuristic = "manhattan"
            open_list = "binary_heap"

            [[obstacles]]
            min = [1.0, 0.0, 1.0]
            max = [0.0, 2.0, 0.0]

            [random_obstacles]
            count = 3
            max_size = 2
            seed = 9

            [[queries]]
            name = "short"
            start = { x = 0, z = 0 }
            goal = { x = 7, z = 5 }
            "#,
        )
        .unwrap();

        assert_eq!(settings.grid.width, 8);
        assert_eq!(settings.grid.height, 6);
        assert_eq!(settings.grid.cell_size, 0.5);
        assert_eq!(settings.grid.heuristic, Heuristic::Manhattan);
        assert_eq!(settings.grid.open_list, OpenList::BinaryHeap);
        // Not given, so the default applies.
        assert_eq!(settings.grid.probe_half_height, 5.0);

        let aabb = settings.obstacles[0].to_aabb();
        assert_eq!(aabb.min, WorldPosition::new(0.0, 0.0, 0.0));
        assert_eq!(aabb.max, WorldPosition::new(1.0, 2.0, 1.0));

        assert_eq!(
            settings.random_obstacles,
            Some(RandomObstacles {
                count: 3,
                max_size: 2,
                seed: Some(9)
            })
        );
        assert_eq!(settings.queries[0].label(), "short");
        assert_eq!(settings.queries[0].goal, GridCoordinate::new(7, 5));
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let settings = parse_settings("").unwrap();
        assert_eq!(settings.grid, PathfinderConfig::default());
        assert!(settings.obstacles.is_empty());
        assert!(settings.random_obstacles.is_none());
        assert!(settings.queries.is_empty());
    }

    #[test]
    fn test_query_label_falls_back_to_endpoints() {
        let query = QuerySettings {
            name: None,
            start: GridCoordinate::new(1, 2),
            goal: GridCoordinate::new(3, 4),
        };
        assert_eq!(query.label(), "(x: 1 z: 2) -> (x: 3 z: 4)");
    }

    #[test]
    fn test_missing_file_is_an_error() {
        assert!(load_settings("config/does-not-exist.toml").is_err());
    }
}
