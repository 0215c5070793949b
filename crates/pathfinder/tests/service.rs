//! Submitting jobs to blocking workers: result delivery, interruption, and
//! the completion hook.

use std::sync::{Arc, Mutex};

use wayfarer_engine::world::position::BlockPos;
use wayfarer_engine::world::World;
use wayfarer_pathfinder::block;
use wayfarer_pathfinder::collision::Agent;
use wayfarer_pathfinder::goal::Goal;
use wayfarer_pathfinder::job::PathJob;
use wayfarer_pathfinder::options::{PathfinderConfig, PathingOptions};
use wayfarer_pathfinder::registry::PathingContext;
use wayfarer_pathfinder::service;

fn corridor_job(world: &World) -> PathJob {
    for x in 0..=9 {
        world.set_block(BlockPos::new(x, 0, 0), block::STONE);
    }
    PathJob::new(
        world,
        BlockPos::new(0, 1, 0),
        BlockPos::new(9, 1, 0),
        16,
        Goal::to_point(BlockPos::new(9, 1, 0)),
        Agent::default(),
        Arc::new(PathingContext::standard()),
        PathingOptions::default(),
        PathfinderConfig::default(),
    )
    .expect("job construction")
}

#[tokio::test]
async fn submitted_job_delivers_its_path() {
    let world = World::new();
    let job = corridor_job(&world);

    let handle = service::submit(job);
    let path = handle.path().await.expect("path produced");

    assert!(path.reaches_destination());
    assert_eq!(path.len(), 9);
}

#[tokio::test]
async fn interrupted_job_resolves_to_none() {
    let world = World::new();
    let job = corridor_job(&world);
    // Raise before submission so the very first pop sees it.
    job.interrupt_flag().raise();

    let handle = service::submit(job);
    assert!(handle.path().await.is_none());
}

#[tokio::test]
async fn completion_hook_fires_with_the_diagnostics() {
    let world = World::new();
    let mut job = corridor_job(&world);

    let seen: Arc<Mutex<Option<(bool, usize)>>> = Arc::new(Mutex::new(None));
    let sink = Arc::clone(&seen);
    job.set_completion_hook(Box::new(move |data, path| {
        let mut slot = sink.lock().unwrap();
        *slot = Some((
            data.reaches_destination(),
            path.map(|p| p.len()).unwrap_or(0),
        ));
    }));

    let handle = service::submit(job);
    let path = handle.path().await.expect("path produced");

    let recorded = *seen.lock().unwrap();
    let (reaches, len) = recorded.expect("hook fired");
    assert!(reaches);
    assert_eq!(len, path.len());
}
