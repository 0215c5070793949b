//! Per-search node state: the arena of visited nodes, the position index,
//! and the open set.
//!
//! Nodes are shared between the open set, the visited map, and parent
//! chains, so they live in a slotmap arena and everything else holds keys.
//! The open set is a binary heap with lazy invalidation: when a node's score
//! improves it is simply pushed again, and entries whose recorded score no
//! longer matches the node (or whose node has been closed) are discarded at
//! pop time.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

use slotmap::{new_key_type, SlotMap};
use wayfarer_engine::world::position::BlockPos;

new_key_type! {
    /// Handle to a node in the search arena.
    pub struct NodeId;
}

/// Pseudo-unique key for a node position: the low 12 bits of x and z and all
/// useful bits of y. Unique within a 4096x256x4096 region, which is far
/// larger than any sane search window (the snapshot enforces the bound).
pub fn pack_key(pos: BlockPos) -> u32 {
    (((pos.x & 0xFFF) << 20) | ((pos.y & 0xFF) << 12) | (pos.z & 0xFFF)) as u32
}

/// One visited grid cell.
#[derive(Debug, Clone, Copy)]
pub struct PathNode {
    pub pos: BlockPos,
    pub parent: Option<NodeId>,
    /// Accumulated cost from the start (g).
    pub cost: f64,
    /// Estimated cost to the goal (h).
    pub heuristic: f64,
    /// `cost + heuristic` (f); the open-set ordering key.
    pub score: f64,
    pub steps: u32,
    pub swimming: bool,
    pub ladder: bool,
    pub rails: bool,
    pub corner: bool,
    pub closed: bool,
    /// Ordinal of insertion into the open set; ties on score break toward
    /// the earlier insertion, which keeps searches deterministic.
    pub counter_added: u32,
    /// Ordinal of expansion, for diagnostics.
    pub counter_visited: u32,
}

impl PathNode {
    /// The start node: zero accumulated cost, no parent.
    pub fn start(pos: BlockPos, heuristic: f64) -> Self {
        Self {
            pos,
            parent: None,
            cost: 0.0,
            heuristic,
            score: heuristic,
            steps: 0,
            swimming: false,
            ladder: false,
            rails: false,
            corner: false,
            closed: false,
            counter_added: 0,
            counter_visited: 0,
        }
    }
}

struct OpenEntry {
    score: f64,
    ordinal: u32,
    node: NodeId,
}

impl PartialEq for OpenEntry {
    fn eq(&self, other: &Self) -> bool {
        self.ordinal == other.ordinal
    }
}

impl Eq for OpenEntry {}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed for min-heap behavior: smallest score is "greatest",
        // earliest insertion wins ties.
        other
            .score
            .total_cmp(&self.score)
            .then_with(|| other.ordinal.cmp(&self.ordinal))
    }
}

/// Owns every node of one search.
pub struct NodeStore {
    nodes: SlotMap<NodeId, PathNode>,
    visited: HashMap<u32, NodeId>,
    open: BinaryHeap<OpenEntry>,
    added: u32,
}

impl NodeStore {
    pub fn new() -> Self {
        Self {
            nodes: SlotMap::with_key(),
            visited: HashMap::new(),
            open: BinaryHeap::with_capacity(512),
            added: 0,
        }
    }

    /// Insert a fresh node into the arena and the visited map. The caller
    /// must have checked that `key` is unoccupied.
    pub fn allocate(&mut self, key: u32, mut node: PathNode) -> NodeId {
        self.added += 1;
        node.counter_added = self.added;
        let id = self.nodes.insert(node);
        self.visited.insert(key, id);
        id
    }

    pub fn lookup(&self, key: u32) -> Option<NodeId> {
        self.visited.get(&key).copied()
    }

    pub fn node(&self, id: NodeId) -> &PathNode {
        &self.nodes[id]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut PathNode {
        &mut self.nodes[id]
    }

    /// Queue a node at its current score.
    pub fn push_open(&mut self, id: NodeId) {
        self.added += 1;
        let entry = OpenEntry {
            score: self.nodes[id].score,
            ordinal: self.added,
            node: id,
        };
        self.open.push(entry);
    }

    /// Pop the best open node, discarding entries invalidated by a rescore
    /// or a close.
    pub fn pop_best(&mut self) -> Option<NodeId> {
        while let Some(entry) = self.open.pop() {
            let node = &self.nodes[entry.node];
            if node.closed || node.score != entry.score {
                continue;
            }
            return Some(entry.node);
        }
        None
    }

    /// Total nodes allocated (diagnostic).
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }
}

impl Default for NodeStore {
    fn default() -> Self {
        Self::new()
    }
}
