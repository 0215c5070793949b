//! Block type definitions and property lookups.
//!
//! The engine stores opaque `BlockId` values. This module gives them meaning
//! for path planning: water is swimmable, ladders are climbable, fences are
//! taller than they look, snow piles up in layers, and so on.
//!
//! Blocks with a facing or a layer count occupy a contiguous id range so the
//! property functions stay simple arithmetic.

use wayfarer_engine::world::block::BlockId;
use wayfarer_engine::world::position::Direction;

pub const AIR: BlockId = BlockId(0);
pub const STONE: BlockId = BlockId(1);
pub const DIRT: BlockId = BlockId(2);
pub const GRASS: BlockId = BlockId(3);
pub const SAND: BlockId = BlockId(4);
pub const BEDROCK: BlockId = BlockId(5);
pub const PLANKS: BlockId = BlockId(6);
pub const WATER: BlockId = BlockId(7);
pub const LAVA: BlockId = BlockId(8);
pub const SLAB: BlockId = BlockId(9);
pub const STAIRS: BlockId = BlockId(10);
pub const FENCE: BlockId = BlockId(11);
pub const FENCE_GATE: BlockId = BlockId(12);
pub const WALL: BlockId = BlockId(13);
pub const FIRE: BlockId = BlockId(14);
pub const CAMPFIRE: BlockId = BlockId(15);
pub const BAMBOO: BlockId = BlockId(16);
pub const CARPET: BlockId = BlockId(17);
pub const RAIL: BlockId = BlockId(18);
pub const SCAFFOLDING: BlockId = BlockId(19);
pub const DOOR: BlockId = BlockId(20);
pub const TRAPDOOR: BlockId = BlockId(21);

const LADDER_BASE: u16 = 24; // 24..=27, facing N/E/S/W
const VINE_BASE: u16 = 28; // 28..=31, attached side N/E/S/W
const SNOW_BASE: u16 = 32; // 32..=39, layers 1..=8

const fn horizontal_index(dir: Direction) -> u16 {
    match dir {
        Direction::North => 0,
        Direction::East => 1,
        Direction::South => 2,
        Direction::West => 3,
        // Vertical facings do not occur on wall-mounted blocks.
        Direction::Up | Direction::Down => 0,
    }
}

const fn horizontal_from_index(i: u16) -> Direction {
    match i {
        0 => Direction::North,
        1 => Direction::East,
        2 => Direction::South,
        _ => Direction::West,
    }
}

/// A ladder mounted on a wall, facing away from it.
pub const fn ladder(facing: Direction) -> BlockId {
    BlockId(LADDER_BASE + horizontal_index(facing))
}

/// A vine hanging on the given side of its support block.
pub const fn vine(attached: Direction) -> BlockId {
    BlockId(VINE_BASE + horizontal_index(attached))
}

/// Layered snow, 1..=8 layers. One layer is cosmetic; more carries weight.
pub const fn snow(layers: u8) -> BlockId {
    let l = if layers == 0 {
        1
    } else if layers > 8 {
        8
    } else {
        layers
    };
    BlockId(SNOW_BASE + (l as u16 - 1))
}

pub fn snow_layers(id: BlockId) -> Option<u8> {
    if (SNOW_BASE..SNOW_BASE + 8).contains(&id.0) {
        Some((id.0 - SNOW_BASE) as u8 + 1)
    } else {
        None
    }
}

/// Fluid occupying a cell. Derived from the block id: this world model does
/// not track flow levels separately from the block itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fluid {
    Empty,
    Water,
    Lava,
}

pub fn fluid(id: BlockId) -> Fluid {
    match id {
        WATER => Fluid::Water,
        LAVA => Fluid::Lava,
        _ => Fluid::Empty,
    }
}

pub fn is_water(id: BlockId) -> bool {
    id == WATER
}

pub fn is_lava(id: BlockId) -> bool {
    id == LAVA
}

/// Fully solid material that can bear weight.
pub fn is_solid(id: BlockId) -> bool {
    matches!(
        id,
        STONE | DIRT | GRASS | SAND | BEDROCK | PLANKS | SLAB | STAIRS
    )
}

/// Climbable blocks: ladders, vines, scaffolding.
pub fn is_ladder_block(id: BlockId) -> bool {
    (LADDER_BASE..VINE_BASE + 4).contains(&id.0) || id == SCAFFOLDING
}

/// Which way a climbable block faces. Vines face away from the side they
/// hang on; scaffolding has no facing and reads as Up.
pub fn ladder_facing(id: BlockId) -> Option<Direction> {
    if (LADDER_BASE..LADDER_BASE + 4).contains(&id.0) {
        return Some(horizontal_from_index(id.0 - LADDER_BASE));
    }
    if (VINE_BASE..VINE_BASE + 4).contains(&id.0) {
        return Some(horizontal_from_index(id.0 - VINE_BASE).opposite());
    }
    if id == SCAFFOLDING {
        return Some(Direction::Up);
    }
    None
}

pub fn is_rail(id: BlockId) -> bool {
    id == RAIL
}

pub fn is_stairs(id: BlockId) -> bool {
    id == STAIRS
}

/// Blocks with an open/closed state an agent can toggle while passing.
pub fn has_open_property(id: BlockId) -> bool {
    matches!(id, DOOR | TRAPDOOR | FENCE_GATE)
}

/// Height of the block's collision shape above its cell floor, in blocks.
/// Zero means the cell is free to move through.
pub fn collision_height(id: BlockId) -> f64 {
    if let Some(layers) = snow_layers(id) {
        // A single layer compresses underfoot.
        return (layers.saturating_sub(1)) as f64 * 0.125;
    }
    match id {
        AIR | WATER | LAVA | FIRE | RAIL | SCAFFOLDING | DOOR | TRAPDOOR => 0.0,
        CARPET => 0.0625,
        CAMPFIRE => 0.4375,
        SLAB => 0.5,
        FENCE | FENCE_GATE | WALL => 1.5,
        id if is_ladder_block(id) => 0.0,
        _ => 1.0,
    }
}
