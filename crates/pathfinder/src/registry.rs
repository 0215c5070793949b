//! Pluggable block classification.
//!
//! Each decision the search makes about a block runs through an ordered
//! chain of callbacks; the first callback returning `Some` wins, and a
//! built-in fallback answers when none do. Hosts register callbacks to teach
//! the pathfinder about custom blocks without touching the search itself.
//!
//! A [`PathingContext`] is a plain value. Build one per process at startup,
//! share it via `Arc`, and never mutate it while searches run.

use wayfarer_engine::world::block::BlockId;
use wayfarer_engine::world::position::{BlockPos, MAX_Y};
use wayfarer_engine::world::BlockReader;

use crate::block::{self, Fluid};
use crate::collision::{default_agent_box, Aabb, Agent, Vec3};
use crate::options::PathingOptions;

/// How a block below a candidate cell supports an agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceKind {
    /// Can be stood upon.
    Walkable,
    /// Does not support the agent; a drop may continue through it.
    Droppable,
    /// Blocks the cell entirely (fences, fire, lava...).
    NotPassable,
}

pub type LadderCheck =
    dyn Fn(&Agent, BlockId, &dyn BlockReader, BlockPos) -> Option<bool> + Send + Sync;
pub type RoadCheck = dyn Fn(&Agent, BlockId) -> Option<bool> + Send + Sync;
pub type PassableCheck = dyn Fn(&Agent, BlockId) -> Option<bool> + Send + Sync;
pub type SurfaceCheck =
    dyn Fn(&PathingOptions, &Agent, BlockId, BlockPos) -> Option<SurfaceKind> + Send + Sync;
pub type BoxProducer = dyn Fn(&Agent, Vec3, Vec3, &dyn BlockReader) -> Option<Aabb> + Send + Sync;
pub type StartAdjuster =
    dyn Fn(&dyn BlockReader, &Agent, BlockPos) -> Option<BlockPos> + Send + Sync;

/// An ordered list of callbacks consulted front to back.
pub struct CallbackChain<F: ?Sized> {
    callbacks: Vec<Box<F>>,
}

impl<F: ?Sized> CallbackChain<F> {
    pub fn new() -> Self {
        Self {
            callbacks: Vec::new(),
        }
    }

    pub fn push(&mut self, callback: Box<F>) {
        self.callbacks.push(callback);
    }

    pub fn iter(&self) -> impl Iterator<Item = &F> {
        self.callbacks.iter().map(|c| c.as_ref())
    }
}

impl<F: ?Sized> Default for CallbackChain<F> {
    fn default() -> Self {
        Self::new()
    }
}

/// The six classification chains a search consults.
#[derive(Default)]
pub struct PathingContext {
    pub ladder: CallbackChain<LadderCheck>,
    pub road: CallbackChain<RoadCheck>,
    pub passable: CallbackChain<PassableCheck>,
    pub surface: CallbackChain<SurfaceCheck>,
    pub bounding_box: CallbackChain<BoxProducer>,
    pub start_adjuster: CallbackChain<StartAdjuster>,
}

impl PathingContext {
    /// An empty context: every decision falls through to the built-in
    /// defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// A context with the stock start adjusters registered: a start submerged
    /// in water floats to the surface, and a start buried in a solid block
    /// climbs out upward.
    pub fn standard() -> Self {
        let mut ctx = Self::new();
        ctx.start_adjuster.push(Box::new(float_to_surface));
        ctx.start_adjuster.push(Box::new(climb_out_of_solid));
        ctx
    }

    pub fn is_ladder(
        &self,
        agent: &Agent,
        id: BlockId,
        world: &dyn BlockReader,
        pos: BlockPos,
    ) -> bool {
        self.ladder
            .iter()
            .find_map(|c| c(agent, id, world, pos))
            .unwrap_or_else(|| block::is_ladder_block(id))
    }

    pub fn is_road(&self, agent: &Agent, id: BlockId) -> bool {
        self.road
            .iter()
            .find_map(|c| c(agent, id))
            .unwrap_or(false)
    }

    pub fn is_passable(&self, agent: &Agent, id: BlockId) -> bool {
        self.passable
            .iter()
            .find_map(|c| c(agent, id))
            .unwrap_or_else(|| block::collision_height(id) <= 0.0)
    }

    pub fn surface(
        &self,
        options: &PathingOptions,
        agent: &Agent,
        id: BlockId,
        pos: BlockPos,
    ) -> SurfaceKind {
        self.surface
            .iter()
            .find_map(|c| c(options, agent, id, pos))
            .unwrap_or_else(|| default_surface(id))
    }

    pub fn bounding_box(
        &self,
        agent: &Agent,
        center: Vec3,
        facing: Vec3,
        world: &dyn BlockReader,
    ) -> Aabb {
        self.bounding_box
            .iter()
            .find_map(|c| c(agent, center, facing, world))
            .unwrap_or_else(|| default_agent_box(agent, center))
    }

    /// Run the start-adjustment chain; the start itself is the fallback.
    pub fn adjust_start(&self, world: &dyn BlockReader, agent: &Agent, start: BlockPos) -> BlockPos {
        self.start_adjuster
            .iter()
            .find_map(|c| c(world, agent, start))
            .unwrap_or(start)
    }
}

/// Built-in walkable-surface classification.
fn default_surface(id: BlockId) -> SurfaceKind {
    if matches!(
        id,
        block::FENCE | block::FENCE_GATE | block::WALL | block::FIRE | block::CAMPFIRE | block::BAMBOO
    ) || block::collision_height(id) > 1.0
    {
        return SurfaceKind::NotPassable;
    }

    if block::fluid(id) == Fluid::Lava {
        return SurfaceKind::NotPassable;
    }

    let piled_snow = block::snow_layers(id).is_some_and(|layers| layers > 1);
    if block::is_solid(id) || piled_snow || id == block::CARPET {
        return SurfaceKind::Walkable;
    }

    SurfaceKind::Droppable
}

fn float_to_surface(world: &dyn BlockReader, _agent: &Agent, start: BlockPos) -> Option<BlockPos> {
    if !block::is_water(world.block_at(start)) {
        return None;
    }
    let mut pos = start;
    while block::is_water(world.block_at(pos)) && pos.y < MAX_Y {
        pos = pos.up();
    }
    Some(pos)
}

fn climb_out_of_solid(world: &dyn BlockReader, _agent: &Agent, start: BlockPos) -> Option<BlockPos> {
    if block::collision_height(world.block_at(start)) < 1.0 {
        return None;
    }
    let mut pos = start;
    for _ in 0..4 {
        pos = pos.up();
        if block::collision_height(world.block_at(pos)) < 1.0 {
            return Some(pos);
        }
    }
    None
}
