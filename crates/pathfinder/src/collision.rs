//! Does the agent fit here?
//!
//! The oracle probes a box against per-block collision shapes from the block
//! catalog. The default box is anchored at the agent's feet, which makes the
//! step thresholds below exact: a shape protruding a full block into the box
//! bottom can never be stepped onto, anything less can.

use wayfarer_engine::world::position::BlockPos;
use wayfarer_engine::world::BlockReader;

use crate::block;
use crate::registry::PathingContext;

/// Physical profile of the agent a job plans for.
#[derive(Debug, Clone, Copy)]
pub struct Agent {
    pub width: f64,
    pub height: f64,
    pub eye_height: f64,
}

impl Default for Agent {
    fn default() -> Self {
        Self {
            width: 0.6,
            height: 1.8,
            eye_height: 1.62,
        }
    }
}

/// Double-precision point, used for box placement and facing vectors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Center of the given block cell.
    pub fn centered(pos: BlockPos) -> Self {
        Self::new(pos.x as f64 + 0.5, pos.y as f64 + 0.5, pos.z as f64 + 0.5)
    }

    /// A facing vector from one block position toward another.
    pub fn between(from: BlockPos, to: BlockPos) -> Self {
        let d = to.minus(from);
        Self::new(d.x as f64, d.y as f64, d.z as f64)
    }
}

/// Axis-aligned box. Intersection is exclusive of touching faces, so a box
/// resting exactly on a block top does not collide with it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min_x: f64,
    pub min_y: f64,
    pub min_z: f64,
    pub max_x: f64,
    pub max_y: f64,
    pub max_z: f64,
}

impl Aabb {
    pub const fn new(min_x: f64, min_y: f64, min_z: f64, max_x: f64, max_y: f64, max_z: f64) -> Self {
        Self {
            min_x,
            min_y,
            min_z,
            max_x,
            max_y,
            max_z,
        }
    }

    pub fn offset(self, dx: f64, dy: f64, dz: f64) -> Self {
        Self::new(
            self.min_x + dx,
            self.min_y + dy,
            self.min_z + dz,
            self.max_x + dx,
            self.max_y + dy,
            self.max_z + dz,
        )
    }

    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min_x < other.max_x
            && self.max_x > other.min_x
            && self.min_y < other.max_y
            && self.max_y > other.min_y
            && self.min_z < other.max_z
            && self.max_z > other.min_z
    }
}

/// Default agent box: a square prism of side `max(0.75, width / 2)`, height
/// `height + 0.1`, with its bottom at the feet of an agent standing in the
/// cell `center` names.
pub fn default_agent_box(agent: &Agent, center: Vec3) -> Aabb {
    let side = f64::max(0.75, agent.width / 2.0);
    let half = side / 2.0;
    let feet = center.y - 0.5;
    Aabb::new(
        center.x - half,
        feet,
        center.z - half,
        center.x + half,
        feet + agent.height + 0.1,
        center.z + half,
    )
}

/// Whether the agent fits with its feet in the cell `center` names,
/// accounting for stepping up or down by less than one block.
pub fn can_fit(
    ctx: &PathingContext,
    agent: &Agent,
    center: Vec3,
    facing: Vec3,
    world: &dyn BlockReader,
) -> bool {
    let entity_box = ctx.bounding_box(agent, center, facing, world);

    if has_no_collisions(ctx, agent, world, &entity_box) {
        return true;
    }

    // Something is in the way. See whether it is only a partial block at the
    // bottom of the box that the agent can stand on top of.
    let bottom = Aabb {
        max_y: entity_box.min_y + 1.0,
        ..entity_box
    };
    let max_height_of_bottom = blocking_tops(ctx, agent, world, &bottom)
        .into_iter()
        .map(|top| top - bottom.min_y)
        .fold(0.0, f64::max);
    if max_height_of_bottom >= 1.0 {
        return false;
    }

    if max_height_of_bottom > 0.0 {
        let stepped_up = entity_box.offset(0.0, max_height_of_bottom, 0.0);
        if has_no_collisions(ctx, agent, world, &stepped_up) {
            return true;
        }
    }

    // Nothing to step onto. The floor below may be a partial block, letting
    // the agent sink to stand on it.
    let below = bottom.offset(0.0, -1.0, 0.0);
    let max_block_height_below = blocking_tops(ctx, agent, world, &below)
        .into_iter()
        .map(|top| top - below.min_y)
        .fold(f64::NEG_INFINITY, f64::max);
    let max_block_height_below = if max_block_height_below.is_finite() {
        max_block_height_below
    } else {
        1.0
    };

    let to_shift = 1.0 - max_block_height_below;
    if to_shift < 1e-4 {
        return false;
    }
    has_no_collisions(ctx, agent, world, &entity_box.offset(0.0, -to_shift, 0.0))
}

fn has_no_collisions(
    ctx: &PathingContext,
    agent: &Agent,
    world: &dyn BlockReader,
    probe: &Aabb,
) -> bool {
    blocking_tops(ctx, agent, world, probe).is_empty()
}

/// Top faces (absolute Y) of every non-passable block shape intersecting the
/// probe box.
fn blocking_tops(
    ctx: &PathingContext,
    agent: &Agent,
    world: &dyn BlockReader,
    probe: &Aabb,
) -> Vec<f64> {
    let mut tops = Vec::new();
    let x0 = probe.min_x.floor() as i64;
    let x1 = (probe.max_x - 1e-7).floor() as i64;
    let y0 = probe.min_y.floor() as i64;
    let y1 = (probe.max_y - 1e-7).floor() as i64;
    let z0 = probe.min_z.floor() as i64;
    let z1 = (probe.max_z - 1e-7).floor() as i64;

    for bx in x0..=x1 {
        for by in y0..=y1 {
            for bz in z0..=z1 {
                let pos = BlockPos::new(bx, by, bz);
                let id = world.block_at(pos);
                if ctx.is_passable(agent, id) {
                    continue;
                }
                let height = block::collision_height(id);
                if height <= 0.0 {
                    continue;
                }
                let shape = Aabb::new(
                    bx as f64,
                    by as f64,
                    bz as f64,
                    bx as f64 + 1.0,
                    by as f64 + height,
                    bz as f64 + 1.0,
                );
                if shape.intersects(probe) {
                    tops.push(shape.max_y);
                }
            }
        }
    }
    tops
}
