//! A*-based walking-path search for agents in a voxel world.
//!
//! A [`job::PathJob`] is built against the live world, captures a frozen
//! [`snapshot::ChunkSnapshot`] of the region it may search, and then runs a
//! synchronous best-first search whose move model understands jumping up one
//! block, dropping up to four, climbing ladders, swimming, and riding rails.
//! The result is a [`path::Path`] of annotated waypoints for an external
//! movement controller to execute.
//!
//! Block classification is pluggable: a [`registry::PathingContext`] carries
//! ordered callback chains (first `Some` answer wins) for ladder, road,
//! passability, walkable-surface, bounding-box, and start-adjustment
//! decisions, each with a built-in fallback.
//!
//! Jobs are plain values; run one inline with [`job::PathJob::search`], or
//! hand it to [`service::submit`] to run on a blocking worker with
//! cooperative interruption.

pub mod block;
pub mod calculation;
pub mod collision;
pub mod goal;
pub mod job;
pub mod node;
pub mod options;
pub mod path;
pub mod registry;
pub mod service;
pub mod snapshot;

use thiserror::Error;

/// Failures surfaced while constructing a search. The search itself does not
/// error: interruption yields no path, and an exhausted node budget yields a
/// best-effort path flagged as not reaching the destination.
#[derive(Debug, Error)]
pub enum PathingError {
    /// The requested snapshot window exceeds what a 32-bit packed node key
    /// can address without collisions.
    #[error("snapshot window of {width}x{depth} blocks exceeds the 4096-block packed-key bound")]
    WindowTooLarge { width: i64, depth: i64 },

    /// A search range must be at least one block.
    #[error("search range must be positive, got {0}")]
    InvalidRange(i32),
}
