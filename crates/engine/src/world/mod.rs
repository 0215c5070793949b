pub mod block;
pub mod chunk;
pub mod position;

use block::BlockId;
use chunk::Chunk;
use dashmap::DashMap;
use position::{BlockPos, ChunkPos, MAX_Y, MIN_Y};

/// Read-only access to blocks, implemented by the live [`World`] and by
/// frozen snapshots of it. Everything downstream of the world (collision
/// probing, surface classification, path search) reads through this.
///
/// Implementations return [`BlockId::AIR`] for positions they do not cover.
pub trait BlockReader {
    fn block_at(&self, pos: BlockPos) -> BlockId;
}

/// The entire block world. Thread-safe, lock-sharded by chunk.
pub struct World {
    chunks: DashMap<ChunkPos, Chunk>,
}

impl World {
    pub fn new() -> Self {
        Self {
            chunks: DashMap::new(),
        }
    }

    /// Read a block at an absolute position. Returns AIR for unloaded chunks
    /// and for y outside `[MIN_Y, MAX_Y)`.
    pub fn get_block(&self, pos: BlockPos) -> BlockId {
        if pos.y < MIN_Y || pos.y >= MAX_Y {
            return BlockId::AIR;
        }
        match self.chunks.get(&pos.chunk()) {
            Some(chunk) => chunk.get_block(pos.local()),
            None => BlockId::AIR,
        }
    }

    /// Write a block at an absolute position. Creates the chunk if needed.
    ///
    /// Takes `&self` (not `&mut self`) because `DashMap` provides interior
    /// mutability via per-shard locking.
    pub fn set_block(&self, pos: BlockPos, block: BlockId) {
        self.chunks
            .entry(pos.chunk())
            .or_default()
            .set_block(pos.local(), block);
    }

    pub fn has_chunk(&self, pos: ChunkPos) -> bool {
        self.chunks.contains_key(&pos)
    }

    pub fn insert_chunk(&self, pos: ChunkPos, chunk: Chunk) {
        self.chunks.insert(pos, chunk);
    }

    /// Deep copy of one chunk, or `None` if it is not loaded. Snapshot
    /// captures use this so they hold no references into the live world.
    pub fn chunk_at(&self, pos: ChunkPos) -> Option<Chunk> {
        self.chunks.get(&pos).map(|c| c.value().clone())
    }

    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }
}

impl BlockReader for World {
    fn block_at(&self, pos: BlockPos) -> BlockId {
        self.get_block(pos)
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}
