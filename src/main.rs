mod queries;  // concurrent path queries against the shared pathfinder
mod settings; // `config/default.toml` + `PATHGRID__*` overrides
mod world;    // obstacle field construction and world changes

use std::sync::Arc;

use anyhow::Context;
use parking_lot::RwLock;
use pathgrid_navigation::Pathfinder;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use settings::DEFAULT_CONFIG_PATH;
use world::SharedPathfinder;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    info!("Pathgrid started.");

    match run().await {
        Ok(_) => info!("All queries finished."),
        Err(e) => {
            error!("Pathgrid failed: {:?}", e);
            std::process::exit(1);
        }
    }
}

async fn run() -> anyhow::Result<()> {
    let path = std::env::args().nth(1).unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
    let settings = settings::load_settings(&path).context("Failed to load settings")?;

    let mut field = world::build_obstacle_field(&settings)?;
    let pathfinder = Pathfinder::new(settings.grid, &field).context("Failed to build pathfinder")?;
    let pathfinder: SharedPathfinder = Arc::new(RwLock::new(pathfinder));

    queries::run_queries(&pathfinder, &settings.queries).await?;

    if settings.late_obstacles.is_empty() {
        return Ok(());
    }

    info!(count = settings.late_obstacles.len(), "Adding late obstacles");
    for obstacle in &settings.late_obstacles {
        field.push(obstacle.to_aabb());
    }
    world::apply_world_change(&pathfinder, &field)?;
    queries::run_queries(&pathfinder, &settings.queries).await?;

    Ok(())
}
