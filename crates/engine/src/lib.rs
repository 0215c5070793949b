//! The spatial substrate for voxel agents: block positions, sparse chunks,
//! and the live, thread-safe [`world::World`].
//!
//! The engine stores opaque [`world::block::BlockId`] values and assigns them
//! no meaning beyond "AIR is empty". Higher layers (the pathfinder's block
//! catalog, a game's rule set) decide what an id *is*.

pub mod world;
