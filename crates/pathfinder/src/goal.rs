//! Goal shapes.
//!
//! A goal is a capability record: a heuristic, a destination test, and a
//! tie-break score for best-effort termination. The built-in constructors
//! cover the common shapes; hosts with exotic goals build the record
//! directly with [`Goal::new`].

use wayfarer_engine::world::position::BlockPos;

use crate::node::PathNode;

type Heuristic = Box<dyn Fn(BlockPos) -> f64 + Send + Sync>;
type DestinationTest = Box<dyn Fn(&PathNode) -> bool + Send + Sync>;
type ResultScore = Box<dyn Fn(&PathNode) -> f64 + Send + Sync>;

pub struct Goal {
    heuristic: Heuristic,
    is_destination: DestinationTest,
    result_score: ResultScore,
}

impl Goal {
    pub fn new(
        heuristic: impl Fn(BlockPos) -> f64 + Send + Sync + 'static,
        is_destination: impl Fn(&PathNode) -> bool + Send + Sync + 'static,
        result_score: impl Fn(&PathNode) -> f64 + Send + Sync + 'static,
    ) -> Self {
        Self {
            heuristic: Box::new(heuristic),
            is_destination: Box::new(is_destination),
            result_score: Box::new(result_score),
        }
    }

    /// Walk to one specific block.
    pub fn to_point(end: BlockPos) -> Self {
        Self::new(
            move |pos| pos.distance(end),
            move |node| node.pos == end,
            move |node| node.pos.distance_sq(end),
        )
    }

    /// Walk into an axis-aligned region (corners inclusive).
    pub fn to_region(a: BlockPos, b: BlockPos) -> Self {
        let min = BlockPos::new(a.x.min(b.x), a.y.min(b.y), a.z.min(b.z));
        let max = BlockPos::new(a.x.max(b.x), a.y.max(b.y), a.z.max(b.z));
        let clamp = move |pos: BlockPos| {
            BlockPos::new(
                pos.x.clamp(min.x, max.x),
                pos.y.clamp(min.y, max.y),
                pos.z.clamp(min.z, max.z),
            )
        };
        Self::new(
            move |pos| pos.distance(clamp(pos)),
            move |node| {
                let p = node.pos;
                p.x >= min.x
                    && p.x <= max.x
                    && p.y >= min.y
                    && p.y <= max.y
                    && p.z >= min.z
                    && p.z <= max.z
            },
            move |node| node.pos.distance_sq(clamp(node.pos)),
        )
    }

    /// Walk until at least `min_distance` blocks away from a position.
    pub fn away_from(avoid: BlockPos, min_distance: f64) -> Self {
        Self::new(
            move |pos| (min_distance - pos.distance(avoid)).max(0.0),
            move |node| node.pos.distance_sq(avoid) >= min_distance * min_distance,
            move |node| -node.pos.distance(avoid),
        )
    }

    pub fn heuristic(&self, pos: BlockPos) -> f64 {
        (self.heuristic)(pos)
    }

    pub fn is_destination(&self, node: &PathNode) -> bool {
        (self.is_destination)(node)
    }

    /// Lower is better; the best-scoring walkable node becomes the
    /// best-effort terminal when the destination is never reached.
    pub fn result_score(&self, node: &PathNode) -> f64 {
        (self.result_score)(node)
    }
}
