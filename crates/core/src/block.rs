//! The closed block palette and its static per-id flags.
//!
//! The palette is deliberately a dense array indexed by the numeric id
//! rather than a `match`: lookups are hot (every face considered during
//! meshing, every cell considered during collision) and the table fits in a
//! couple of cache lines.

/// A block identifier. Small enough to fit in one byte; the palette below is
/// closed and never grows at runtime.
pub type BlockId = u8;

/// `AIR` - empty space, non-solid, transparent.
pub const AIR: BlockId = 0;
/// `GRASS` - solid, opaque surface block.
pub const GRASS: BlockId = 1;
/// `DIRT` - solid, opaque subsurface block.
pub const DIRT: BlockId = 2;
/// `STONE` - solid, opaque bulk terrain block.
pub const STONE: BlockId = 3;
/// `SAND` - solid, opaque desert/beach block.
pub const SAND: BlockId = 4;
/// `WATER` - non-solid, transparent; a block, not a fluid simulation.
pub const WATER: BlockId = 5;
/// `OAK_LOG` - solid, opaque tree trunk.
pub const OAK_LOG: BlockId = 6;
/// `OAK_LEAVES` - solid but transparent tree foliage.
pub const OAK_LEAVES: BlockId = 7;
/// `BEDROCK` - solid, opaque, unbreakable; always fills `y = 0`.
pub const BEDROCK: BlockId = 8;
/// `GRAVEL` - solid, opaque, generated as a rare ore-adjacent deposit.
pub const GRAVEL: BlockId = 9;
/// `COAL_ORE` - solid, opaque ore vein block.
pub const COAL_ORE: BlockId = 10;
/// `IRON_ORE` - solid, opaque ore vein block.
pub const IRON_ORE: BlockId = 11;
/// `COBBLESTONE` - solid, opaque structure-building block.
pub const COBBLESTONE: BlockId = 12;
/// `OAK_PLANKS` - solid, opaque structure-building block.
pub const OAK_PLANKS: BlockId = 13;
/// `SNOW` - solid, opaque cold-biome surface block.
pub const SNOW: BlockId = 14;
/// `GLASS` - solid but transparent; windows and lamp caps.
pub const GLASS: BlockId = 15;
/// `BRICK` - solid, opaque structure-building block.
pub const BRICK: BlockId = 16;

/// Number of entries in the closed palette.
pub const PALETTE_LEN: usize = 17;

/// Static flags attached to a block id: whether it participates in
/// collision and opaque occlusion (`solid`), and whether its faces fail to
/// occlude same-id neighbors and belong to a transparent mesh stream
/// (`transparent`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockFlags {
    /// Participates in collision and opaque occlusion.
    pub solid: bool,
    /// Belongs to a transparent mesh stream and never occludes a same-id neighbor.
    pub transparent: bool,
}

const fn flags(solid: bool, transparent: bool) -> BlockFlags {
    BlockFlags { solid, transparent }
}

/// Dense lookup table, indexed by [`BlockId`], of every palette entry's flags.
pub const BLOCK_FLAGS: [BlockFlags; PALETTE_LEN] = [
    flags(false, true),  // AIR
    flags(true, false),  // GRASS
    flags(true, false),  // DIRT
    flags(true, false),  // STONE
    flags(true, false),  // SAND
    flags(false, true),  // WATER
    flags(true, false),  // OAK_LOG
    flags(true, true),   // OAK_LEAVES
    flags(true, false),  // BEDROCK
    flags(true, false),  // GRAVEL
    flags(true, false),  // COAL_ORE
    flags(true, false),  // IRON_ORE
    flags(true, false),  // COBBLESTONE
    flags(true, false),  // OAK_PLANKS
    flags(true, false),  // SNOW
    flags(true, true),   // GLASS
    flags(true, false),  // BRICK
];

/// Look up the flags for a block id. Ids outside the closed palette are
/// treated as `AIR`, matching the chunk store's "unknown resolves to air"
/// philosophy.
pub fn flags_of(id: BlockId) -> BlockFlags {
    BLOCK_FLAGS
        .get(id as usize)
        .copied()
        .unwrap_or(BLOCK_FLAGS[AIR as usize])
}

/// Shorthand for `flags_of(id).solid`.
pub fn is_solid(id: BlockId) -> bool {
    flags_of(id).solid
}

/// Shorthand for `flags_of(id).transparent`.
pub fn is_transparent(id: BlockId) -> bool {
    flags_of(id).transparent
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_flags_match_spec() {
        assert_eq!(flags_of(AIR), flags(false, true));
        assert_eq!(flags_of(WATER), flags(false, true));
        assert_eq!(flags_of(OAK_LEAVES), flags(true, true));
        assert_eq!(flags_of(GLASS), flags(true, true));
        for &id in &[
            GRASS, DIRT, STONE, SAND, OAK_LOG, BEDROCK, GRAVEL, COAL_ORE, IRON_ORE, COBBLESTONE,
            OAK_PLANKS, SNOW, BRICK,
        ] {
            assert_eq!(flags_of(id), flags(true, false), "id {id} should be solid/opaque");
        }
    }

    #[test]
    fn unknown_id_resolves_to_air() {
        assert_eq!(flags_of(200), flags_of(AIR));
    }
}
