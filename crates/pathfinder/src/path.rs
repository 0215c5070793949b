//! The finalized result handed to a movement controller.

use wayfarer_engine::world::position::{BlockPos, Direction};

/// One step of a finalized path, annotated with the modality hints the
/// executor needs.
#[derive(Debug, Clone, PartialEq)]
pub struct Waypoint {
    pub pos: BlockPos,
    pub on_ladder: bool,
    /// Meaningful while `on_ladder` and climbing; `Up` otherwise.
    pub ladder_facing: Direction,
    pub on_rails: bool,
    /// First waypoint of a rails run; the executor should mount here.
    pub rails_entry: bool,
    /// First waypoint after a rails run; the executor should dismount here.
    pub rails_exit: bool,
    pub swimming: bool,
}

impl Waypoint {
    pub(crate) fn at(pos: BlockPos) -> Self {
        Self {
            pos,
            on_ladder: false,
            ladder_facing: Direction::Up,
            on_rails: false,
            rails_entry: false,
            rails_exit: false,
            swimming: false,
        }
    }
}

/// An ordered sequence of waypoints from just after the start to the
/// terminal position. Each waypoint's successor is the next element; the
/// last one has none.
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    points: Vec<Waypoint>,
    target: BlockPos,
    reaches_destination: bool,
}

impl Path {
    pub(crate) fn new(points: Vec<Waypoint>, target: BlockPos, reaches_destination: bool) -> Self {
        Self {
            points,
            target,
            reaches_destination,
        }
    }

    pub fn points(&self) -> &[Waypoint] {
        &self.points
    }

    /// Position of the terminal node (which for a best-effort path is not
    /// the requested destination).
    pub fn target(&self) -> BlockPos {
        self.target
    }

    /// Whether the terminal node satisfied the goal's destination test.
    pub fn reaches_destination(&self) -> bool {
        self.reaches_destination
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// The waypoint the executor heads for after finishing `index`.
    pub fn successor_of(&self, index: usize) -> Option<&Waypoint> {
        self.points.get(index + 1)
    }
}
