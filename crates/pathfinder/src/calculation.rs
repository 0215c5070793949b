//! Append-only record of the decisions a search made, for later inspection
//! or visualization by the host.

use std::collections::{HashMap, HashSet};

use wayfarer_engine::world::position::BlockPos;

use crate::path::Path;

/// Why a candidate cell was refused during expansion. Not errors; recorded
/// and suppressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InvalidNodeReason {
    /// The cell requires swimming and the agent cannot swim.
    SwimmingNode,
}

#[derive(Debug, Default)]
pub struct CalculationData {
    consumed: HashSet<BlockPos>,
    walked: HashMap<BlockPos, BlockPos>,
    invalid: HashMap<BlockPos, InvalidNodeReason>,
    path: Vec<BlockPos>,
    reaches_destination: bool,
}

impl CalculationData {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn on_node_consumed(&mut self, pos: BlockPos) {
        self.consumed.insert(pos);
    }

    pub(crate) fn on_node_walked(&mut self, source: BlockPos, target: BlockPos) {
        self.walked.insert(source, target);
    }

    pub(crate) fn on_invalid_node(&mut self, pos: BlockPos, reason: InvalidNodeReason) {
        self.invalid.insert(pos, reason);
    }

    pub(crate) fn on_path_completed(&mut self, path: &Path) {
        self.path = path.points().iter().map(|p| p.pos).collect();
        self.reaches_destination = path.reaches_destination();
    }

    /// Every node the driver popped and closed.
    pub fn consumed_nodes(&self) -> &HashSet<BlockPos> {
        &self.consumed
    }

    /// Expansion edges, keyed by source position.
    pub fn walked_edges(&self) -> &HashMap<BlockPos, BlockPos> {
        &self.walked
    }

    pub fn invalid_nodes(&self) -> &HashMap<BlockPos, InvalidNodeReason> {
        &self.invalid
    }

    /// Positions of the finalized path, in walk order.
    pub fn path_positions(&self) -> &[BlockPos] {
        &self.path
    }

    pub fn reaches_destination(&self) -> bool {
        self.reaches_destination
    }
}
