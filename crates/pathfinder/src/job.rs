//! A single path search: snapshot capture, the A* driver, the move
//! generator, and path finalization.
//!
//! A job is synchronous and single-threaded; everything it reads comes from
//! its own [`ChunkSnapshot`], so it can run concurrently with world ticks
//! and with other jobs. Cancellation is cooperative: raise the job's
//! [`InterruptFlag`] and the driver bails at the next node pop.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use wayfarer_engine::world::block::BlockId;
use wayfarer_engine::world::position::{BlockPos, Direction, MAX_Y, MIN_Y};
use wayfarer_engine::world::{BlockReader, World};

use crate::block::{self, Fluid};
use crate::calculation::{CalculationData, InvalidNodeReason};
use crate::collision::{self, Agent, Vec3};
use crate::goal::Goal;
use crate::node::{pack_key, NodeId, NodeStore, PathNode};
use crate::options::{PathfinderConfig, PathingOptions};
use crate::path::{Path, Waypoint};
use crate::registry::{PathingContext, SurfaceKind};
use crate::snapshot::ChunkSnapshot;
use crate::PathingError;

/// Cooperative cancellation token shared between a job and whoever may want
/// to stop it.
#[derive(Debug, Clone, Default)]
pub struct InterruptFlag(Arc<AtomicBool>);

impl InterruptFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raise(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_raised(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Invoked once after a search finishes (or is interrupted or panics), with
/// whatever diagnostic data exists. Hosts that need main-thread handling
/// marshal from here themselves.
pub type CompletionHook = Box<dyn FnOnce(&CalculationData, Option<&Path>) + Send>;

/// Axis-aligned XZ rectangle limiting where destinations may be found
/// (soft) or where the search may expand at all (hard).
#[derive(Debug, Clone, Copy)]
struct Restriction {
    min_x: i64,
    max_x: i64,
    min_z: i64,
    max_z: i64,
    hard: bool,
}

pub struct PathJob {
    snapshot: ChunkSnapshot,
    start: BlockPos,
    max_range: i32,
    goal: Goal,
    agent: Agent,
    context: Arc<PathingContext>,
    options: PathingOptions,
    config: PathfinderConfig,
    restriction: Option<Restriction>,
    store: NodeStore,
    data: CalculationData,
    interrupt: InterruptFlag,
    total_visited: u32,
    completion_hook: Option<CompletionHook>,
}

impl PathJob {
    /// A search from `start` toward `end`. The snapshot window covers the
    /// bounding box of both, expanded by half the range and padded by the
    /// range. `end` anchors the window; the goal decides what actually
    /// terminates the search.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        world: &World,
        start: BlockPos,
        end: BlockPos,
        range: i32,
        goal: Goal,
        agent: Agent,
        context: Arc<PathingContext>,
        options: PathingOptions,
        config: PathfinderConfig,
    ) -> Result<Self, PathingError> {
        if range <= 0 {
            return Err(PathingError::InvalidRange(range));
        }
        let half = (range / 2) as i64;
        let min = BlockPos::new(start.x.min(end.x) - half, MIN_Y, start.z.min(end.z) - half);
        let max = BlockPos::new(start.x.max(end.x) + half, MAX_Y, start.z.max(end.z) + half);
        let snapshot = ChunkSnapshot::capture(world, min, max, range as i64)?;

        let mut job = Self {
            snapshot,
            start,
            max_range: range,
            goal,
            agent,
            context,
            options,
            config,
            restriction: None,
            store: NodeStore::new(),
            data: CalculationData::new(),
            interrupt: InterruptFlag::new(),
            total_visited: 0,
            completion_hook: None,
        };
        job.prepare_start(world, min, max, range as i64)?;
        Ok(job)
    }

    /// A search whose destinations are restricted to the XZ rectangle
    /// spanned by `restriction_a` and `restriction_b`, grown by `grow`.
    /// With `hard` set the search may not even expand outside the
    /// rectangle; otherwise it may wander out and find its way back.
    #[allow(clippy::too_many_arguments)]
    pub fn restricted(
        world: &World,
        start: BlockPos,
        restriction_a: BlockPos,
        restriction_b: BlockPos,
        range: i32,
        grow: BlockPos,
        hard: bool,
        goal: Goal,
        agent: Agent,
        context: Arc<PathingContext>,
        options: PathingOptions,
        config: PathfinderConfig,
    ) -> Result<Self, PathingError> {
        if range <= 0 {
            return Err(PathingError::InvalidRange(range));
        }
        let restriction = Restriction {
            min_x: restriction_a.x.min(restriction_b.x) - grow.x,
            max_x: restriction_a.x.max(restriction_b.x) + grow.x,
            min_z: restriction_a.z.min(restriction_b.z) - grow.z,
            max_z: restriction_a.z.max(restriction_b.z) + grow.z,
            hard,
        };
        let min = BlockPos::new(restriction.min_x, MIN_Y, restriction.min_z);
        let max = BlockPos::new(restriction.max_x, MAX_Y, restriction.max_z);
        let snapshot = ChunkSnapshot::capture(world, min, max, range as i64)?;

        Ok(Self {
            snapshot,
            start,
            max_range: range,
            goal,
            agent,
            context,
            options,
            config,
            restriction: Some(restriction),
            store: NodeStore::new(),
            data: CalculationData::new(),
            interrupt: InterruptFlag::new(),
            total_visited: 0,
            completion_hook: None,
        })
    }

    /// Run the start-adjuster chain and make sure the result is inside the
    /// snapshot window; an adjuster near the window edge may push the start
    /// out, in which case the window is re-captured around it.
    fn prepare_start(
        &mut self,
        world: &World,
        min: BlockPos,
        max: BlockPos,
        padding: i64,
    ) -> Result<(), PathingError> {
        let adjusted = self
            .context
            .adjust_start(&self.snapshot, &self.agent, self.start);
        if !self.snapshot.contains(adjusted) {
            let min = BlockPos::new(min.x.min(adjusted.x), MIN_Y, min.z.min(adjusted.z));
            let max = BlockPos::new(max.x.max(adjusted.x), MAX_Y, max.z.max(adjusted.z));
            self.snapshot = ChunkSnapshot::capture(world, min, max, padding)?;
        }
        self.start = adjusted;
        Ok(())
    }

    /// Handle for cancelling this job from another thread.
    pub fn interrupt_flag(&self) -> InterruptFlag {
        self.interrupt.clone()
    }

    /// Register a hook to run when the search completes.
    pub fn set_completion_hook(&mut self, hook: CompletionHook) {
        self.completion_hook = Some(hook);
    }

    pub(crate) fn take_completion_hook(&mut self) -> Option<CompletionHook> {
        self.completion_hook.take()
    }

    pub fn calculation_data(&self) -> &CalculationData {
        &self.data
    }

    pub fn start(&self) -> BlockPos {
        self.start
    }

    pub fn snapshot(&self) -> &ChunkSnapshot {
        &self.snapshot
    }

    // ── A* driver ───────────────────────────────────────────────────────

    /// Run the search to completion. Returns `None` only on interruption;
    /// otherwise a path to the destination or a best-effort path toward it
    /// (possibly empty when not even one step was viable).
    pub fn search(&mut self) -> Option<Path> {
        let start_id = self.setup_start_node();
        let mut best = start_id;
        let mut best_score = f64::MAX;
        let budget = self
            .config
            .max_nodes
            .min((self.max_range as usize).pow(2)) as u32;

        while let Some(id) = self.store.pop_best() {
            if self.interrupt.is_raised() {
                tracing::debug!("path search interrupted");
                return None;
            }

            self.total_visited += 1;
            if self.total_visited > budget {
                tracing::debug!(budget, "node budget exhausted");
                break;
            }

            {
                let node = self.store.node_mut(id);
                node.counter_visited = self.total_visited;
                node.closed = true;
            }
            let node = *self.store.node(id);
            self.data.on_node_consumed(node.pos);

            let in_window = self.in_window(node.pos);

            // Inside a restriction, destinations outside the window do not
            // count.
            if in_window && self.goal.is_destination(&node) {
                best = id;
                break;
            }

            // Track the closest viable standing spot as the best-effort
            // terminal.
            let score = self.goal.result_score(&node);
            if in_window
                && score < best_score
                && !node.corner
                && self.surface_at(node.pos.down()) == SurfaceKind::Walkable
            {
                best = id;
                best_score = score;
            }

            // Soft restrictions allow walking outside the window to find a
            // way back in; hard restrictions do not.
            if !self.hard_restriction() || in_window {
                self.walk_current(id);
            }
        }

        let path = self.finalize_path(best);
        tracing::debug!(
            visited = self.total_visited,
            length = path.len(),
            reaches = path.reaches_destination(),
            "path search finished"
        );
        self.data.on_path_completed(&path);
        Some(path)
    }

    fn setup_start_node(&mut self) -> NodeId {
        let mut node = PathNode::start(self.start, self.goal.heuristic(self.start));
        if self.is_ladder(self.start) {
            node.ladder = true;
        } else if self.snapshot.fluid_at(self.start.down()) != Fluid::Empty {
            node.swimming = true;
        }
        node.rails =
            self.options.can_use_rails && block::is_rail(self.snapshot.block_at(self.start));

        let id = self.store.allocate(pack_key(self.start), node);
        self.store.push_open(id);
        self.data.on_node_walked(self.start, self.start);
        id
    }

    fn in_window(&self, pos: BlockPos) -> bool {
        match self.restriction {
            None => true,
            Some(r) => {
                pos.x >= r.min_x && pos.x <= r.max_x && pos.z >= r.min_z && pos.z <= r.max_z
            }
        }
    }

    fn hard_restriction(&self) -> bool {
        self.restriction.is_some_and(|r| r.hard)
    }

    // ── Move generation ─────────────────────────────────────────────────

    /// Expand a node in up to six directions, pruned against the incoming
    /// direction so the search never reverses 180 degrees (90-degree turns
    /// stay possible).
    fn walk_current(&mut self, id: NodeId) {
        let node = *self.store.node(id);
        let d = match node.parent {
            Some(p) => node.pos.minus(self.store.node(p).pos),
            None => BlockPos::ZERO,
        };

        // On a ladder we can go straight up.
        if self.options.can_use_ladders && node.ladder && (d.y >= 0 || d.x != 0 || d.z != 0) {
            self.walk(id, Direction::Up.delta());
        }

        // And down one, if the lower block is a ladder too.
        if self.options.can_use_ladders
            && (d.y <= 0 || d.x != 0 || d.z != 0)
            && self.is_ladder(node.pos.down())
        {
            self.walk(id, Direction::Down.delta());
        }

        // A drop corner explores only downward.
        let parent_directly_below =
            node.parent.map(|p| self.store.node(p).pos) == Some(node.pos.down());
        if node.corner && !parent_directly_below {
            self.walk(id, Direction::Down.delta());
            return;
        }

        if !self.is_not_passable(node.pos, node.pos.down()) {
            self.walk(id, Direction::Down.delta());
        }

        if d.z <= 0 {
            self.walk(id, Direction::North.delta());
        }
        if d.x >= 0 {
            self.walk(id, Direction::East.delta());
        }
        if d.z >= 0 {
            self.walk(id, Direction::South.delta());
        }
        if d.x <= 0 {
            self.walk(id, Direction::West.delta());
        }
    }

    /// Walk one step from `parent_id` along `d`, resolving the standing
    /// height at the target column and inserting or improving the node
    /// there.
    fn walk(&mut self, parent_id: NodeId, mut d: BlockPos) {
        let parent = *self.store.node(parent_id);
        let grandparent = parent.parent.map(|gp| self.store.node(gp).pos);
        let mut pos = parent.pos.offset(d.x, d.y, d.z);

        let Some(new_y) = self.ground_height(&parent, pos) else {
            return;
        };

        let mut corner = false;
        if pos.y != new_y {
            let dy = new_y - pos.y;
            if !parent.corner && dy > 0 && grandparent != Some(parent.pos.offset(0, dy, 0)) {
                // Jumping: take the cell directly above first.
                d = BlockPos::new(0, dy, 0);
                pos = parent.pos.offset(0, dy, 0);
                corner = true;
            } else if !parent.corner
                && dy < 0
                && (d.x != 0 || d.z != 0)
                && grandparent != Some(parent.pos.down())
            {
                // Dropping: take the air corner first; the drop itself is
                // the corner's own downward step.
                d = BlockPos::new(d.x, 0, d.z);
                pos = parent.pos.offset(d.x, 0, d.z);
                corner = true;
            } else {
                d = BlockPos::new(d.x, d.y + dy, d.z);
                pos = BlockPos::new(pos.x, new_y, pos.z);
            }
        }

        let key = pack_key(pos);
        let existing = self.store.lookup(key);
        if let Some(eid) = existing {
            // Closed means already expanded from; nothing can improve it.
            if self.store.node(eid).closed {
                return;
            }
        }

        let swimming = match existing {
            Some(eid) => self.store.node(eid).swimming,
            None => block::is_water(self.snapshot.block_at(pos.down())),
        };
        if swimming && !self.options.can_swim {
            self.data
                .on_invalid_node(pos, InvalidNodeReason::SwimmingNode);
            return;
        }
        let swim_start = swimming && !parent.swimming;
        let on_ladder = self.is_ladder(pos);
        let on_road = self
            .context
            .is_road(&self.agent, self.snapshot.block_at(pos.down()));
        let rail_probe = if corner { pos.down() } else { pos };
        let on_rails =
            self.options.can_use_rails && block::is_rail(self.snapshot.block_at(rail_probe));
        let rails_exit = !on_rails && parent.rails;

        let step = self.step_cost(
            d, swimming, on_ladder, on_road, on_rails, rails_exit, swim_start, pos, parent.pos,
        );
        let heuristic = self.goal.heuristic(pos);
        let cost = parent.cost + step;
        let score = cost + heuristic;

        let id = match existing {
            None => {
                let node = PathNode {
                    pos,
                    parent: Some(parent_id),
                    cost,
                    heuristic,
                    score,
                    steps: parent.steps + 1,
                    swimming: !on_ladder && swimming,
                    ladder: on_ladder,
                    rails: on_rails,
                    corner,
                    closed: false,
                    counter_added: 0,
                    counter_visited: 0,
                };
                self.store.allocate(key, node)
            }
            Some(eid) => {
                if score >= self.store.node(eid).score {
                    return;
                }
                let node = self.store.node_mut(eid);
                node.parent = Some(parent_id);
                node.steps = parent.steps + 1;
                node.cost = cost;
                node.heuristic = heuristic;
                node.score = score;
                eid
            }
        };
        self.store.push_open(id);
        self.data.on_node_walked(parent.pos, pos);

        // Jump-point-search-ish acceleration: if this step improved the
        // heuristic, keep going the same way.
        if self.config.allow_jump_point_search && heuristic <= parent.heuristic {
            self.walk(id, d);
        }
    }

    // ── Ground-height resolution ────────────────────────────────────────

    /// The Y at which the agent can stand in the target column, or `None`
    /// to reject the move.
    fn ground_height(&self, parent: &PathNode, pos: BlockPos) -> Option<i64> {
        let facing = Vec3::between(parent.pos, pos);
        if !collision::can_fit(
            &self.context,
            &self.agent,
            Vec3::centered(pos),
            facing,
            &self.snapshot,
        ) {
            return self.handle_target_not_passable(parent, pos);
        }

        let below = self.snapshot.block_at(pos.down());
        match self.surface(below, pos.down()) {
            SurfaceKind::Walkable => Some(pos.y),
            SurfaceKind::NotPassable => None,
            SurfaceKind::Droppable => self.handle_not_standing(parent, pos, below),
        }
    }

    /// The target cell is blocked; the only option left is a one-block
    /// jump, if there is headroom for it.
    fn handle_target_not_passable(&self, parent: &PathNode, pos: BlockPos) -> Option<i64> {
        if parent.ladder || parent.swimming {
            return None;
        }
        if self.is_not_passable(parent.pos, parent.pos.up()) {
            return None;
        }
        if !self.is_not_passable(parent.pos.up(), pos.up()) {
            Some(pos.y + 1)
        } else {
            None
        }
    }

    fn handle_not_standing(&self, parent: &PathNode, pos: BlockPos, below: BlockId) -> Option<i64> {
        let swimming = parent.swimming;

        if block::fluid(below) != Fluid::Empty {
            return self.handle_in_liquid(pos, below, swimming);
        }

        if self.is_ladder(pos.down()) {
            return Some(pos.y);
        }

        self.check_drop(parent, pos, swimming)
    }

    fn handle_in_liquid(&self, pos: BlockPos, below: BlockId, swimming: bool) -> Option<i64> {
        if swimming {
            // Already in the water; stay at the surface.
            return Some(pos.y);
        }
        if self.options.can_swim && block::is_water(below) {
            return Some(pos.y);
        }
        None
    }

    /// Nothing to stand on: scan downward for a landing. Walkable landings
    /// are accepted within the drop bound; liquid landings at any depth.
    fn check_drop(&self, parent: &PathNode, pos: BlockPos, swimming: bool) -> Option<i64> {
        if parent.ladder || swimming {
            return None;
        }
        let horizontal = parent.pos.x != pos.x || parent.pos.z != pos.z;
        if horizontal
            && !self.is_not_passable(parent.pos, parent.pos.down())
            && self.surface_at(parent.pos.down()) == SurfaceKind::Droppable
        {
            // The parent hovers over air itself; it has to take its own
            // vertical drop before stepping sideways.
            return None;
        }

        // A successful horizontal probe only creates the drop corner; the
        // real drop then starts one block lower, so probe one deeper to
        // keep the net descent bound at four.
        let max_walkable_depth = if horizontal { 5 } else { 4 };
        for i in 2..=10 {
            let probe = pos.down_by(i);
            let below = self.snapshot.block_at(probe);
            if self.surface(below, probe) == SurfaceKind::Walkable && i <= max_walkable_depth {
                return Some(pos.y - i + 1);
            }
            if block::fluid(below) != Fluid::Empty {
                return Some(pos.y - i + 1);
            }
            if below != block::AIR {
                return None;
            }
        }
        None
    }

    // ── Cost ────────────────────────────────────────────────────────────

    /// Immediate cost of moving by `d` into `target`: euclidean length
    /// times the modality multipliers.
    #[allow(clippy::too_many_arguments)]
    fn step_cost(
        &self,
        d: BlockPos,
        swimming: bool,
        on_ladder: bool,
        on_road: bool,
        on_rails: bool,
        rails_exit: bool,
        swim_start: bool,
        target: BlockPos,
        parent_pos: BlockPos,
    ) -> f64 {
        let mut cost = ((d.x * d.x + d.y * d.y + d.z * d.z) as f64).sqrt();

        // Tax jumping and dropping, except single steps on stairs.
        if d.y != 0
            && (d.x != 0 || d.z != 0)
            && !(d.y.abs() <= 1 && block::is_stairs(self.snapshot.block_at(parent_pos)))
        {
            cost *= self.options.jump_drop_cost * d.y.abs() as f64;
        }

        if block::has_open_property(self.snapshot.block_at(target)) {
            cost *= self.options.traverse_toggleable_cost;
        }
        if on_road {
            cost *= self.options.on_path_cost;
        }
        if on_rails {
            cost *= self.options.on_rail_cost;
        }
        if rails_exit {
            cost *= self.options.rails_exit_cost;
        }
        if on_ladder {
            cost *= self.options.on_ladder_cost;
        }
        if swimming {
            cost *= if swim_start {
                self.options.swim_cost_enter
            } else {
                self.options.swim_cost
            };
        }
        cost
    }

    // ── Classification helpers ──────────────────────────────────────────

    fn is_ladder(&self, pos: BlockPos) -> bool {
        self.context
            .is_ladder(&self.agent, self.snapshot.block_at(pos), &self.snapshot, pos)
    }

    fn surface(&self, id: BlockId, pos: BlockPos) -> SurfaceKind {
        self.context.surface(&self.options, &self.agent, id, pos)
    }

    fn surface_at(&self, pos: BlockPos) -> SurfaceKind {
        self.surface(self.snapshot.block_at(pos), pos)
    }

    fn is_not_passable(&self, from: BlockPos, pos: BlockPos) -> bool {
        !collision::can_fit(
            &self.context,
            &self.agent,
            Vec3::centered(pos),
            Vec3::between(from, pos),
            &self.snapshot,
        )
    }

    // ── Finalization ────────────────────────────────────────────────────

    /// Walk the parent chain from the terminal node and emit annotated
    /// waypoints in forward order.
    fn finalize_path(&self, target: NodeId) -> Path {
        let mut path_length = 0usize;
        let mut rails_length = 0usize;
        let mut cursor = target;
        while let Some(parent) = self.store.node(cursor).parent {
            path_length += 1;
            if self.store.node(cursor).rails {
                rails_length += 1;
            }
            cursor = parent;
        }

        let mut points = vec![Waypoint::at(BlockPos::ZERO); path_length];
        let mut next_in_path: Option<NodeId> = None;
        let mut idx = path_length;
        let mut cursor = target;
        while let Some(parent_id) = self.store.node(cursor).parent {
            idx -= 1;
            let node = *self.store.node(cursor);
            let parent = *self.store.node(parent_id);

            let mut emitted = node.pos;
            if node.swimming && self.options.lower_swim_waypoints {
                // Aiming below the surface keeps the agent from bobbing in
                // place at swim waypoints.
                emitted = emitted.down();
            }
            let mut wp = Waypoint::at(emitted);
            wp.swimming = node.swimming;

            if rails_length >= self.config.min_rails_run {
                wp.on_rails = node.rails;
                if wp.on_rails && (!parent.rails || parent.parent.is_none()) {
                    wp.rails_entry = true;
                } else if wp.on_rails {
                    if let Some(next) = points.get_mut(idx + 1) {
                        if !next.on_rails {
                            next.rails_exit = true;
                        }
                    }
                }
            }

            if let Some(next_id) = next_in_path {
                let next = self.store.node(next_id);
                if node.ladder && next.pos.x == node.pos.x && next.pos.z == node.pos.z {
                    wp.on_ladder = true;
                    if next.pos.y > node.pos.y {
                        // Facing only matters going up.
                        wp.ladder_facing = block::ladder_facing(self.snapshot.block_at(node.pos))
                            .unwrap_or(Direction::Up);
                    }
                }
            }
            if !wp.on_ladder && parent.ladder && parent.pos.x == node.pos.x && parent.pos.z == node.pos.z
            {
                wp.on_ladder = true;
            }

            points[idx] = wp;
            next_in_path = Some(cursor);
            cursor = parent_id;
        }

        let terminal = *self.store.node(target);
        Path::new(points, terminal.pos, self.goal.is_destination(&terminal))
    }
}
