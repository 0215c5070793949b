//! End-to-end search scenarios: corridors, jumps, drops, ladders, rails,
//! and swimming, each on a purpose-built little world.

use std::sync::Arc;

use wayfarer_engine::world::block::BlockId;
use wayfarer_engine::world::position::{BlockPos, Direction};
use wayfarer_engine::world::World;
use wayfarer_pathfinder::block;
use wayfarer_pathfinder::collision::Agent;
use wayfarer_pathfinder::goal::Goal;
use wayfarer_pathfinder::job::PathJob;
use wayfarer_pathfinder::options::{PathfinderConfig, PathingOptions};
use wayfarer_pathfinder::path::Path;
use wayfarer_pathfinder::registry::PathingContext;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Lay a line of blocks along +X at fixed y and z.
fn fill_row(world: &World, x0: i64, x1: i64, y: i64, z: i64, id: BlockId) {
    for x in x0..=x1 {
        world.set_block(BlockPos::new(x, y, z), id);
    }
}

/// Lay a full floor plane at the given y.
fn fill_floor(world: &World, x0: i64, x1: i64, z0: i64, z1: i64, y: i64) {
    for x in x0..=x1 {
        for z in z0..=z1 {
            world.set_block(BlockPos::new(x, y, z), block::STONE);
        }
    }
}

fn run_to_point(world: &World, start: BlockPos, end: BlockPos, range: i32) -> Path {
    run_with(world, start, end, range, PathingOptions::default(), PathfinderConfig::default()).0
}

fn run_with(
    world: &World,
    start: BlockPos,
    end: BlockPos,
    range: i32,
    options: PathingOptions,
    config: PathfinderConfig,
) -> (Path, PathJob) {
    let mut job = PathJob::new(
        world,
        start,
        end,
        range,
        Goal::to_point(end),
        Agent::default(),
        Arc::new(PathingContext::standard()),
        options,
        config,
    )
    .expect("job construction");
    let path = job.search().expect("search not interrupted");
    (path, job)
}

fn positions(path: &Path) -> Vec<BlockPos> {
    path.points().iter().map(|p| p.pos).collect()
}

/// Index of the first waypoint at `pos`.
fn index_of(path: &Path, pos: BlockPos) -> usize {
    positions(path)
        .iter()
        .position(|p| *p == pos)
        .unwrap_or_else(|| panic!("no waypoint at {pos:?} in {:?}", positions(path)))
}

// ---------------------------------------------------------------------------
// Scenario 1: flat corridor
// ---------------------------------------------------------------------------

#[test]
fn flat_corridor_walks_straight() {
    let world = World::new();
    fill_row(&world, 0, 9, 0, 0, block::STONE);

    let path = run_to_point(&world, BlockPos::new(0, 1, 0), BlockPos::new(9, 1, 0), 16);

    assert!(path.reaches_destination());
    assert_eq!(path.len(), 9);
    for (i, wp) in path.points().iter().enumerate() {
        assert_eq!(wp.pos, BlockPos::new(i as i64 + 1, 1, 0));
        assert!(!wp.on_ladder);
        assert!(!wp.swimming);
    }
    assert_eq!(path.target(), BlockPos::new(9, 1, 0));
    // The successor chain is the waypoint order itself.
    assert_eq!(
        path.successor_of(0).map(|wp| wp.pos),
        Some(BlockPos::new(2, 1, 0))
    );
    assert!(path.successor_of(8).is_none());
}

// ---------------------------------------------------------------------------
// Scenario 2: single-block jump
// ---------------------------------------------------------------------------

#[test]
fn single_block_jump_takes_the_corner_first() {
    let world = World::new();
    fill_row(&world, 0, 4, 1, 0, block::STONE);
    fill_row(&world, 5, 9, 2, 0, block::STONE);

    let path = run_to_point(&world, BlockPos::new(0, 2, 0), BlockPos::new(9, 3, 0), 16);

    assert!(path.reaches_destination());
    // The jump decomposes into a vertical corner step, then the horizontal
    // move onto the upper floor.
    let corner = index_of(&path, BlockPos::new(4, 3, 0));
    assert_eq!(path.points()[corner + 1].pos, BlockPos::new(5, 3, 0));
    assert_eq!(positions(&path)[corner - 1], BlockPos::new(4, 2, 0));
}

// ---------------------------------------------------------------------------
// Scenario 3: four-block drop
// ---------------------------------------------------------------------------

#[test]
fn four_block_drop_is_taken_in_one_step() {
    let world = World::new();
    fill_row(&world, 0, 4, 10, 0, block::STONE);
    fill_row(&world, 5, 10, 6, 0, block::STONE);

    let path = run_to_point(&world, BlockPos::new(0, 11, 0), BlockPos::new(10, 7, 0), 20);

    assert!(path.reaches_destination());
    let corner = index_of(&path, BlockPos::new(5, 11, 0));
    assert_eq!(path.points()[corner + 1].pos, BlockPos::new(5, 7, 0));
}

// ---------------------------------------------------------------------------
// Scenario 4: five-block drop is refused
// ---------------------------------------------------------------------------

#[test]
fn five_block_drop_is_refused() {
    let world = World::new();
    fill_row(&world, 0, 5, 10, 0, block::STONE);
    fill_row(&world, 5, 10, 5, 0, block::STONE);

    let path = run_to_point(&world, BlockPos::new(0, 11, 0), BlockPos::new(10, 6, 0), 20);

    assert!(!path.reaches_destination());
    // Best effort carries the agent to the platform edge and no further.
    assert_eq!(path.target(), BlockPos::new(5, 11, 0));
    for wp in path.points() {
        assert_eq!(wp.pos.y, 11);
    }
}

// ---------------------------------------------------------------------------
// Scenario 5: ladder climb
// ---------------------------------------------------------------------------

#[test]
fn ladder_climb_annotates_waypoints() {
    let world = World::new();
    // Lower floor, a west-facing ladder on a wall column, upper floor.
    fill_row(&world, 0, 3, 1, 0, block::STONE);
    for y in 2..=6 {
        world.set_block(BlockPos::new(3, y, 0), block::ladder(Direction::West));
    }
    for y in 2..=5 {
        world.set_block(BlockPos::new(4, y, 0), block::STONE);
    }
    fill_row(&world, 4, 6, 6, 0, block::STONE);

    let path = run_to_point(&world, BlockPos::new(0, 2, 0), BlockPos::new(6, 7, 0), 16);

    assert!(path.reaches_destination());
    let climbing: Vec<_> = path
        .points()
        .iter()
        .filter(|wp| wp.pos.x == 3 && (2..=6).contains(&wp.pos.y))
        .collect();
    assert_eq!(climbing.len(), 5, "expected one waypoint per rung");
    for wp in climbing {
        assert!(wp.on_ladder, "climb waypoint {:?} not on ladder", wp.pos);
        assert_eq!(wp.ladder_facing, Direction::West);
    }
    // Past the top of the ladder the path traverses the upper floor.
    let top = index_of(&path, BlockPos::new(3, 7, 0));
    assert!(positions(&path)[top..].iter().all(|p| p.y == 7));
}

#[test]
fn ladders_disabled_blocks_the_climb() {
    let world = World::new();
    fill_row(&world, 0, 3, 1, 0, block::STONE);
    for y in 2..=6 {
        world.set_block(BlockPos::new(3, y, 0), block::ladder(Direction::West));
    }
    for y in 2..=5 {
        world.set_block(BlockPos::new(4, y, 0), block::STONE);
    }
    fill_row(&world, 4, 6, 6, 0, block::STONE);

    let options = PathingOptions {
        can_use_ladders: false,
        ..PathingOptions::default()
    };
    let (path, _) = run_with(
        &world,
        BlockPos::new(0, 2, 0),
        BlockPos::new(6, 7, 0),
        16,
        options,
        PathfinderConfig::default(),
    );
    assert!(!path.reaches_destination());
}

// ---------------------------------------------------------------------------
// Scenario 6: swimming
// ---------------------------------------------------------------------------

/// A raised bank, a water pool two blocks deep at the bottom of a drop, and
/// a low bank on the far side.
fn pool_world() -> World {
    let world = World::new();
    fill_row(&world, 0, 2, 2, 0, block::STONE);
    for x in 3..=6 {
        world.set_block(BlockPos::new(x, 0, 0), block::WATER);
    }
    fill_row(&world, 7, 9, 0, 0, block::STONE);
    world
}

#[test]
fn swim_disabled_records_the_refusal() {
    let world = pool_world();
    let (path, job) = run_with(
        &world,
        BlockPos::new(0, 3, 0),
        BlockPos::new(9, 1, 0),
        16,
        PathingOptions::default(), // can_swim: false
        PathfinderConfig::default(),
    );

    assert!(!path.reaches_destination());
    let invalid = job.calculation_data().invalid_nodes();
    assert!(
        invalid.keys().any(|pos| pos.y == 1 && (3..=6).contains(&pos.x)),
        "expected a swimming refusal over the pool, got {invalid:?}"
    );
}

#[test]
fn swim_enabled_crosses_the_pool() {
    let world = pool_world();
    let options = PathingOptions {
        can_swim: true,
        ..PathingOptions::default()
    };
    let (path, _) = run_with(
        &world,
        BlockPos::new(0, 3, 0),
        BlockPos::new(9, 1, 0),
        16,
        options,
        PathfinderConfig::default(),
    );

    assert!(path.reaches_destination());
    let swimmers: Vec<_> = path.points().iter().filter(|wp| wp.swimming).collect();
    assert!(!swimmers.is_empty());
    for wp in &swimmers {
        assert!((3..=6).contains(&wp.pos.x), "swim waypoint off the pool: {:?}", wp.pos);
        assert_eq!(wp.pos.y, 1, "swim waypoints sit at the surface level");
    }
}

#[test]
fn lowered_swim_waypoints_emit_one_block_down() {
    let world = pool_world();
    let options = PathingOptions {
        can_swim: true,
        lower_swim_waypoints: true,
        ..PathingOptions::default()
    };
    let (path, _) = run_with(
        &world,
        BlockPos::new(0, 3, 0),
        BlockPos::new(9, 1, 0),
        16,
        options,
        PathfinderConfig::default(),
    );

    assert!(path.reaches_destination());
    for wp in path.points().iter().filter(|wp| wp.swimming) {
        assert_eq!(wp.pos.y, 0, "lowered swim waypoint: {:?}", wp.pos);
    }
}

// ---------------------------------------------------------------------------
// Rails
// ---------------------------------------------------------------------------

#[test]
fn rails_run_gets_entry_and_exit_markers() {
    let world = World::new();
    fill_row(&world, 0, 9, 0, 0, block::STONE);
    for x in 2..=7 {
        world.set_block(BlockPos::new(x, 1, 0), block::RAIL);
    }

    let config = PathfinderConfig {
        min_rails_run: 3,
        ..PathfinderConfig::default()
    };
    let (path, _) = run_with(
        &world,
        BlockPos::new(0, 1, 0),
        BlockPos::new(9, 1, 0),
        16,
        PathingOptions::default(),
        config,
    );

    assert!(path.reaches_destination());
    let entry = index_of(&path, BlockPos::new(2, 1, 0));
    assert!(path.points()[entry].on_rails);
    assert!(path.points()[entry].rails_entry);

    let exit = index_of(&path, BlockPos::new(8, 1, 0));
    assert!(!path.points()[exit].on_rails);
    assert!(path.points()[exit].rails_exit);

    for x in 2..=7 {
        let i = index_of(&path, BlockPos::new(x, 1, 0));
        assert!(path.points()[i].on_rails);
    }
}

#[test]
fn short_rails_run_is_not_annotated() {
    let world = World::new();
    fill_row(&world, 0, 9, 0, 0, block::STONE);
    world.set_block(BlockPos::new(4, 1, 0), block::RAIL);
    world.set_block(BlockPos::new(5, 1, 0), block::RAIL);

    let config = PathfinderConfig {
        min_rails_run: 3,
        ..PathfinderConfig::default()
    };
    let (path, _) = run_with(
        &world,
        BlockPos::new(0, 1, 0),
        BlockPos::new(9, 1, 0),
        16,
        PathingOptions::default(),
        config,
    );

    assert!(path.reaches_destination());
    assert!(path.points().iter().all(|wp| !wp.on_rails && !wp.rails_entry && !wp.rails_exit));
}
