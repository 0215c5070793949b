//! Invariants the search must hold regardless of terrain: determinism,
//! kinematic bounds, node budgets, restriction windows, interruption.

use std::sync::Arc;

use wayfarer_engine::world::position::BlockPos;
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

fn fill_floor(world: &World, x0: i64, x1: i64, z0: i64, z1: i64, y: i64) {
    for x in x0..=x1 {
        for z in z0..=z1 {
            world.set_block(BlockPos::new(x, y, z), block::STONE);
        }
    }
}

fn make_job(world: &World, start: BlockPos, end: BlockPos, range: i32) -> PathJob {
    make_job_with(world, start, end, range, PathfinderConfig::default())
}

fn make_job_with(
    world: &World,
    start: BlockPos,
    end: BlockPos,
    range: i32,
    config: PathfinderConfig,
) -> PathJob {
    PathJob::new(
        world,
        start,
        end,
        range,
        Goal::to_point(end),
        Agent::default(),
        Arc::new(PathingContext::standard()),
        PathingOptions::default(),
        config,
    )
    .expect("job construction")
}

/// Every step of a walkable path obeys the move model: at most one block up
/// per non-ladder step, at most four blocks down, never an exact 180-degree
/// reversal.
fn assert_kinematic_bounds(path: &Path) {
    let points = path.points();
    for pair in points.windows(2) {
        let d = pair[1].pos.minus(pair[0].pos);
        if !pair[0].on_ladder && !pair[1].on_ladder {
            assert!(d.y <= 1, "jump of {} at {:?}", d.y, pair[1].pos);
        }
        assert!(d.y >= -4, "drop of {} at {:?}", -d.y, pair[1].pos);
    }
    for triple in points.windows(3) {
        let a = triple[1].pos.minus(triple[0].pos);
        let b = triple[2].pos.minus(triple[1].pos);
        let on_ladder = triple.iter().any(|wp| wp.on_ladder);
        if !on_ladder {
            assert!(
                !(b.x == -a.x && b.y == -a.y && b.z == -a.z && (a.x != 0 || a.y != 0 || a.z != 0)),
                "reversal at {:?}",
                triple[1].pos
            );
        }
    }
}

// ---------------------------------------------------------------------------
// Optimality and determinism
// ---------------------------------------------------------------------------

#[test]
fn open_field_path_is_step_optimal() {
    let world = World::new();
    fill_floor(&world, 0, 11, 0, 11, 0);

    let start = BlockPos::new(1, 1, 1);
    let end = BlockPos::new(8, 1, 6);
    let path = make_job(&world, start, end, 16).search().unwrap();

    assert!(path.reaches_destination());
    // Axis-aligned moves at unit cost: an optimal path takes exactly the
    // manhattan distance in steps.
    assert_eq!(path.len() as i64, (end.x - start.x).abs() + (end.z - start.z).abs());
    assert_kinematic_bounds(&path);
}

#[test]
fn identical_jobs_produce_identical_paths() {
    let world = World::new();
    fill_floor(&world, 0, 15, 0, 15, 0);
    // Scatter obstacles so tie-breaking actually matters.
    for (x, z) in [(3, 2), (4, 4), (7, 5), (9, 9), (6, 10), (11, 3)] {
        world.set_block(BlockPos::new(x, 1, z), block::STONE);
        world.set_block(BlockPos::new(x, 2, z), block::STONE);
    }

    let start = BlockPos::new(0, 1, 0);
    let end = BlockPos::new(14, 1, 12);
    let a = make_job(&world, start, end, 24).search().unwrap();
    let b = make_job(&world, start, end, 24).search().unwrap();

    assert!(a.reaches_destination());
    assert_eq!(a, b);
    assert_kinematic_bounds(&a);
}

#[test]
fn bent_corridor_never_reverses() {
    let world = World::new();
    for x in 0..=5 {
        world.set_block(BlockPos::new(x, 0, 0), block::STONE);
    }
    for z in 0..=5 {
        world.set_block(BlockPos::new(5, 0, z), block::STONE);
    }

    let path = make_job(&world, BlockPos::new(0, 1, 0), BlockPos::new(5, 1, 5), 16)
        .search()
        .unwrap();
    assert!(path.reaches_destination());
    assert_kinematic_bounds(&path);
}

// ---------------------------------------------------------------------------
// Node budgets
// ---------------------------------------------------------------------------

#[test]
fn configured_node_budget_caps_the_search() {
    let world = World::new();
    fill_floor(&world, 0, 39, 0, 39, 0);

    let config = PathfinderConfig {
        max_nodes: 10,
        ..PathfinderConfig::default()
    };
    let mut job = make_job_with(
        &world,
        BlockPos::new(0, 1, 0),
        BlockPos::new(35, 1, 35),
        30,
        config,
    );
    let path = job.search().unwrap();

    assert!(!path.reaches_destination());
    assert!(
        job.calculation_data().consumed_nodes().len() <= 10,
        "visited {} nodes",
        job.calculation_data().consumed_nodes().len()
    );
}

#[test]
fn range_squared_caps_the_search() {
    let world = World::new();
    fill_floor(&world, 0, 39, 0, 39, 0);

    let mut job = make_job(&world, BlockPos::new(0, 1, 0), BlockPos::new(35, 1, 35), 3);
    let path = job.search().unwrap();

    assert!(!path.reaches_destination());
    assert!(job.calculation_data().consumed_nodes().len() <= 9);
}

// ---------------------------------------------------------------------------
// Restriction windows
// ---------------------------------------------------------------------------

#[test]
fn hard_restriction_confines_every_waypoint() {
    let world = World::new();
    fill_floor(&world, 0, 29, 0, 29, 0);

    let mut job = PathJob::restricted(
        &world,
        BlockPos::new(1, 1, 1),
        BlockPos::new(0, 1, 0),
        BlockPos::new(6, 1, 29),
        20,
        BlockPos::ZERO,
        true,
        Goal::to_point(BlockPos::new(20, 1, 15)),
        Agent::default(),
        Arc::new(PathingContext::standard()),
        PathingOptions::default(),
        PathfinderConfig::default(),
    )
    .expect("job construction");
    let path = job.search().unwrap();

    assert!(!path.reaches_destination());
    for wp in path.points() {
        assert!(
            (0..=6).contains(&wp.pos.x) && (0..=29).contains(&wp.pos.z),
            "waypoint {:?} escaped the hard restriction",
            wp.pos
        );
    }
}

#[test]
fn soft_restriction_still_explores_outside() {
    let world = World::new();
    fill_floor(&world, 0, 29, 0, 29, 0);

    let mut job = PathJob::restricted(
        &world,
        BlockPos::new(1, 1, 1),
        BlockPos::new(0, 1, 0),
        BlockPos::new(4, 1, 4),
        12,
        BlockPos::ZERO,
        false,
        Goal::to_point(BlockPos::new(20, 1, 15)),
        Agent::default(),
        Arc::new(PathingContext::standard()),
        PathingOptions::default(),
        PathfinderConfig::default(),
    )
    .expect("job construction");
    let path = job.search().unwrap();

    // The destination lies outside the window so it cannot be "reached",
    // but a soft search is free to wander beyond the window looking.
    assert!(!path.reaches_destination());
    assert!(job
        .calculation_data()
        .consumed_nodes()
        .iter()
        .any(|pos| pos.x > 4 || pos.z > 4));
}

// ---------------------------------------------------------------------------
// Interruption and degenerate starts
// ---------------------------------------------------------------------------

#[test]
fn interruption_before_first_pop_returns_no_path() {
    let world = World::new();
    fill_floor(&world, 0, 9, 0, 9, 0);

    let mut job = make_job(&world, BlockPos::new(0, 1, 0), BlockPos::new(9, 1, 9), 16);
    job.interrupt_flag().raise();

    assert!(job.search().is_none());
    assert!(!job.calculation_data().reaches_destination());
}

#[test]
fn start_with_no_viable_move_yields_empty_path() {
    let world = World::new(); // void: nothing to stand on anywhere

    let mut job = make_job(&world, BlockPos::new(0, 1, 0), BlockPos::new(5, 1, 0), 8);
    let path = job.search().unwrap();

    assert!(path.is_empty());
    assert!(!path.reaches_destination());
    assert_eq!(path.target(), BlockPos::new(0, 1, 0));
}

#[test]
fn zero_range_is_rejected() {
    let world = World::new();
    let result = PathJob::new(
        &world,
        BlockPos::ZERO,
        BlockPos::new(5, 0, 0),
        0,
        Goal::to_point(BlockPos::new(5, 0, 0)),
        Agent::default(),
        Arc::new(PathingContext::standard()),
        PathingOptions::default(),
        PathfinderConfig::default(),
    );
    assert!(result.is_err());
}

// ---------------------------------------------------------------------------
// Diagnostics
// ---------------------------------------------------------------------------

#[test]
fn calculation_data_mirrors_the_final_path() {
    let world = World::new();
    for x in 0..=6 {
        world.set_block(BlockPos::new(x, 0, 0), block::STONE);
    }

    let mut job = make_job(&world, BlockPos::new(0, 1, 0), BlockPos::new(6, 1, 0), 12);
    let path = job.search().unwrap();

    let data = job.calculation_data();
    assert!(data.reaches_destination());
    assert_eq!(
        data.path_positions(),
        path.points().iter().map(|p| p.pos).collect::<Vec<_>>()
    );
    // Every path position was also consumed by the driver.
    for pos in data.path_positions() {
        assert!(data.consumed_nodes().contains(pos), "{pos:?} not consumed");
    }
    // The walked-edge log covers the start.
    assert!(data.walked_edges().contains_key(&BlockPos::new(0, 1, 0)));
}
