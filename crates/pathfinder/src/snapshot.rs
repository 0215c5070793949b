//! Frozen rectangular window over the voxel world.
//!
//! A search must not observe live-world mutation, so the capture deep-copies
//! every loaded chunk in its window. After `capture` returns, the snapshot
//! shares nothing with the world it came from.

use wayfarer_engine::world::block::BlockId;
use wayfarer_engine::world::chunk::Chunk;
use wayfarer_engine::world::position::{BlockPos, ChunkPos, MAX_Y, MIN_Y};
use wayfarer_engine::world::{BlockReader, World};

use crate::block::{self, Fluid};
use crate::PathingError;

/// Widest window a 32-bit packed node key can address without collisions
/// (12 bits of x and z).
const MAX_WINDOW_BLOCKS: i64 = 4096;

/// A read-only copy of the chunks covering one search region. Reads outside
/// the window, of unloaded chunks, or of y outside `[MIN_Y, MAX_Y)` yield
/// AIR / empty fluid.
pub struct ChunkSnapshot {
    origin: ChunkPos,
    width: usize,
    depth: usize,
    /// Row-major by chunk offset: `chunks[dx * depth + dz]`.
    chunks: Vec<Option<Chunk>>,
    min: BlockPos,
    max: BlockPos,
}

impl ChunkSnapshot {
    /// Copy all loaded chunks in the window `(min - padding)..=(max + padding)`
    /// (in X and Z) out of the live world.
    pub fn capture(
        world: &World,
        min: BlockPos,
        max: BlockPos,
        padding: i64,
    ) -> Result<Self, PathingError> {
        let cx0 = (min.x.min(max.x) - padding) >> 4;
        let cz0 = (min.z.min(max.z) - padding) >> 4;
        let cx1 = (min.x.max(max.x) + padding) >> 4;
        let cz1 = (min.z.max(max.z) + padding) >> 4;

        let width = cx1 - cx0 + 1;
        let depth = cz1 - cz0 + 1;
        if width * 16 > MAX_WINDOW_BLOCKS || depth * 16 > MAX_WINDOW_BLOCKS {
            return Err(PathingError::WindowTooLarge {
                width: width * 16,
                depth: depth * 16,
            });
        }

        let mut chunks = Vec::with_capacity((width * depth) as usize);
        for cx in cx0..=cx1 {
            for cz in cz0..=cz1 {
                chunks.push(world.chunk_at(ChunkPos::new(cx as i32, cz as i32)));
            }
        }

        Ok(Self {
            origin: ChunkPos::new(cx0 as i32, cz0 as i32),
            width: width as usize,
            depth: depth as usize,
            chunks,
            min: BlockPos::new(min.x.min(max.x) - padding, MIN_Y, min.z.min(max.z) - padding),
            max: BlockPos::new(min.x.max(max.x) + padding, MAX_Y, min.z.max(max.z) + padding),
        })
    }

    /// Whether the window covers this position in X and Z.
    pub fn contains(&self, pos: BlockPos) -> bool {
        let dx = (pos.x >> 4) - self.origin.x as i64;
        let dz = (pos.z >> 4) - self.origin.z as i64;
        dx >= 0 && (dx as usize) < self.width && dz >= 0 && (dz as usize) < self.depth
    }

    /// Block min corner of the captured window (before chunk rounding).
    pub fn window_min(&self) -> BlockPos {
        self.min
    }

    /// Block max corner of the captured window (before chunk rounding).
    pub fn window_max(&self) -> BlockPos {
        self.max
    }

    pub fn fluid_at(&self, pos: BlockPos) -> Fluid {
        block::fluid(self.block_at(pos))
    }
}

impl BlockReader for ChunkSnapshot {
    fn block_at(&self, pos: BlockPos) -> BlockId {
        if pos.y < MIN_Y || pos.y >= MAX_Y {
            return BlockId::AIR;
        }
        let dx = (pos.x >> 4) - self.origin.x as i64;
        let dz = (pos.z >> 4) - self.origin.z as i64;
        if dx < 0 || dx as usize >= self.width || dz < 0 || dz as usize >= self.depth {
            return BlockId::AIR;
        }
        match &self.chunks[dx as usize * self.depth + dz as usize] {
            Some(chunk) => chunk.get_block(pos.local()),
            None => BlockId::AIR,
        }
    }
}
