//! Minimal end-to-end run: build a small terraced world, search it, and
//! print the annotated waypoints.
//!
//! ```sh
//! cargo run -p wayfarer-pathfinder --example corridor
//! ```

use std::sync::Arc;

use wayfarer_engine::world::position::BlockPos;
use wayfarer_engine::world::World;
use wayfarer_pathfinder::block;
use wayfarer_pathfinder::collision::Agent;
use wayfarer_pathfinder::goal::Goal;
use wayfarer_pathfinder::job::PathJob;
use wayfarer_pathfinder::options::{PathfinderConfig, PathingOptions};
use wayfarer_pathfinder::registry::PathingContext;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "debug".parse().unwrap()),
        )
        .init();

    let world = World::new();
    // A corridor with a one-block step up halfway and a drop at the end.
    for x in 0..=6 {
        world.set_block(BlockPos::new(x, 1, 0), block::STONE);
    }
    for x in 7..=12 {
        world.set_block(BlockPos::new(x, 2, 0), block::STONE);
    }
    for x in 13..=16 {
        world.set_block(BlockPos::new(x, 0, 0), block::STONE);
    }

    let start = BlockPos::new(0, 2, 0);
    let end = BlockPos::new(16, 1, 0);

    tracing::info!("searching from {start:?} to {end:?}");
    let mut job = PathJob::new(
        &world,
        start,
        end,
        32,
        Goal::to_point(end),
        Agent::default(),
        Arc::new(PathingContext::standard()),
        PathingOptions::default(),
        PathfinderConfig::default(),
    )
    .expect("window fits");

    match job.search() {
        Some(path) => {
            tracing::info!(
                length = path.len(),
                reaches = path.reaches_destination(),
                "search finished"
            );
            for (i, wp) in path.points().iter().enumerate() {
                println!(
                    "{i:3}  ({:3}, {:3}, {:3})  ladder={} rails={} swim={}",
                    wp.pos.x, wp.pos.y, wp.pos.z, wp.on_ladder, wp.on_rails, wp.swimming
                );
            }
        }
        None => tracing::warn!("search interrupted"),
    }
}
