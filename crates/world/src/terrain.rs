//! Column-based terrain generation: height field, biome surface dressing,
//! strata fill, cave carving, ore seeding, and tree placement.
//!
//! Everything here is a pure function of `(world_seed, world coordinate)`:
//! generating the same chunk position twice, even across process restarts,
//! produces byte-identical blocks.

use tracing::instrument;
use voxelcraft_core::block;

use crate::chunk::{Chunk, ChunkPos, CHUNK_SIZE_X, CHUNK_SIZE_Z};
use crate::noise::Noise;
use crate::trees;

const SEA_LEVEL: i32 = 40;
const MAX_HEIGHT: i32 = 126;
const MIN_HEIGHT: i32 = 1;

/// Per-column biome classification used to pick the surface block and
/// decide whether oak trees may grow there.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BiomeFlags {
    /// Hot, dry: sand surface, no trees.
    pub desert: bool,
    /// Cold: snow surface, no trees.
    pub snowy: bool,
    /// Low-lying column adjacent to sea level: sand surface, no trees.
    pub beach: bool,
}

impl BiomeFlags {
    fn surface_block(self) -> block::BlockId {
        if self.desert || self.beach {
            block::SAND
        } else if self.snowy {
            block::SNOW
        } else {
            block::GRASS
        }
    }

    /// Whether an oak tree may be rooted on this column's surface block.
    pub fn allows_trees(self) -> bool {
        !self.desert && !self.snowy && !self.beach
    }
}

fn derive_seed(world_seed: u64, domain: u64) -> u64 {
    world_seed ^ domain.wrapping_mul(0x9E37_79B9_7F4A_7C15)
}

fn column_domain(wx: i32, wz: i32) -> u64 {
    (wx as i64 as u64).wrapping_mul(0x1000_0001).wrapping_add(wz as i64 as u64)
}

/// Deterministically generates chunks from a world seed.
pub struct TerrainGenerator {
    world_seed: u64,
    continental: Noise,
    hills: Noise,
    roughness: Noise,
    temperature: Noise,
    moisture: Noise,
    caves_a: Noise,
    caves_b: Noise,
    ore_iron: Noise,
    ore_coal: Noise,
    ore_gravel: Noise,
    tree: Noise,
}

impl TerrainGenerator {
    /// Build a generator for `world_seed`. Every noise channel is derived
    /// from a distinct domain offset so channels never accidentally
    /// correlate with each other.
    pub fn new(world_seed: u64) -> Self {
        Self {
            world_seed,
            continental: Noise::new(derive_seed(world_seed, 1)),
            hills: Noise::new(derive_seed(world_seed, 2)),
            roughness: Noise::new(derive_seed(world_seed, 3)),
            temperature: Noise::new(derive_seed(world_seed, 4)),
            moisture: Noise::new(derive_seed(world_seed, 5)),
            caves_a: Noise::new(derive_seed(world_seed, 6)),
            caves_b: Noise::new(derive_seed(world_seed, 7)),
            ore_iron: Noise::new(derive_seed(world_seed, 8)),
            ore_coal: Noise::new(derive_seed(world_seed, 9)),
            ore_gravel: Noise::new(derive_seed(world_seed, 10)),
            tree: Noise::new(derive_seed(world_seed, 11)),
        }
    }

    /// The world seed this generator was built from.
    pub fn world_seed(&self) -> u64 {
        self.world_seed
    }

    /// Surface height at a world column, per `height = 40 + continental*12
    /// + hills*6 + roughness*3`, floored and clamped to `[1, 126]`.
    pub fn height_at(&self, wx: i32, wz: i32) -> i32 {
        let x = wx as f64;
        let z = wz as f64;
        let continental = self.continental.fbm2d(x * 0.001, z * 0.001, 4, 2.0, 0.5);
        let hills = self.hills.fbm2d(x * 0.004, z * 0.004, 3, 2.0, 0.5);
        let roughness = self.roughness.fbm2d(x * 0.02, z * 0.02, 2, 2.0, 0.5);
        let height = 40.0 + continental * 12.0 + hills * 6.0 + roughness * 3.0;
        (height.floor() as i32).clamp(MIN_HEIGHT, MAX_HEIGHT)
    }

    /// Biome classification at a world column.
    pub fn biome_at(&self, wx: i32, wz: i32, height: i32) -> BiomeFlags {
        let x = wx as f64;
        let z = wz as f64;
        let temperature = self.temperature.fbm2d(x * 0.001, z * 0.001, 2, 2.0, 0.5);
        let moisture = self.moisture.fbm2d(x * 0.001 + 100.0, z * 0.001 + 100.0, 2, 2.0, 0.5);
        let desert = temperature > 0.3 && moisture < -0.2;
        let snowy = temperature < -0.3;
        let beach = !desert && !snowy && height <= SEA_LEVEL + 2;
        BiomeFlags { desert, snowy, beach }
    }

    fn is_cave(&self, wx: i32, wy: i32, wz: i32) -> bool {
        let x = wx as f64 * 0.08;
        let y = wy as f64 * 0.08;
        let z = wz as f64 * 0.08;
        let a = self.caves_a.noise3d(x, y, z);
        let b = self.caves_b.noise3d(x + 50.0, y + 50.0, z + 50.0);
        (a * b).abs() > 0.82
    }

    /// Generate a fully-dressed chunk at `pos`: strata, caves, ores, water,
    /// and oak trees whose canopy stays inside this chunk's columns.
    #[instrument(skip(self), fields(cx = pos.x, cz = pos.z))]
    pub fn generate_chunk(&self, pos: ChunkPos) -> Chunk {
        let mut chunk = Chunk::new(pos);
        let (ox, oz) = pos.origin();

        let mut surface_y = [[0i32; CHUNK_SIZE_Z]; CHUNK_SIZE_X];
        let mut grows_trees = [[false; CHUNK_SIZE_Z]; CHUNK_SIZE_X];

        for lx in 0..CHUNK_SIZE_X {
            for lz in 0..CHUNK_SIZE_Z {
                let wx = ox + lx as i32;
                let wz = oz + lz as i32;
                let height = self.height_at(wx, wz);
                let biome = self.biome_at(wx, wz, height);
                surface_y[lx][lz] = height;
                grows_trees[lx][lz] = biome.allows_trees();

                for y in 1..=height {
                    let block = if y == height {
                        biome.surface_block()
                    } else if y >= height - 3 {
                        if biome.desert || biome.beach {
                            block::SAND
                        } else {
                            block::DIRT
                        }
                    } else {
                        block::STONE
                    };
                    chunk.set_voxel(lx, y as usize, lz, block);
                }

                if height < SEA_LEVEL {
                    for y in (height + 1)..=SEA_LEVEL {
                        chunk.set_voxel(lx, y as usize, lz, block::WATER);
                    }
                }
            }
        }

        for lx in 0..CHUNK_SIZE_X {
            for lz in 0..CHUNK_SIZE_Z {
                let wx = ox + lx as i32;
                let wz = oz + lz as i32;
                for y in 2..(surface_y[lx][lz] - 1).max(2) {
                    if chunk.voxel(lx, y as usize, lz) != block::STONE {
                        continue;
                    }
                    if self.is_cave(wx, y, wz) {
                        chunk.set_voxel(lx, y as usize, lz, block::AIR);
                    }
                }
            }
        }

        for lx in 0..CHUNK_SIZE_X {
            for lz in 0..CHUNK_SIZE_Z {
                let wx = ox + lx as i32;
                let wz = oz + lz as i32;
                for y in 1..surface_y[lx][lz] {
                    if chunk.voxel(lx, y as usize, lz) != block::STONE {
                        continue;
                    }
                    if let Some(ore) = self.ore_block_at(wx, y, wz) {
                        chunk.set_voxel(lx, y as usize, lz, ore);
                    }
                }
            }
        }

        for lx in 2..(CHUNK_SIZE_X - 2) {
            for lz in 2..(CHUNK_SIZE_Z - 2) {
                if !grows_trees[lx][lz] {
                    continue;
                }
                let wx = ox + lx as i32;
                let wz = oz + lz as i32;
                let sample = self.tree.noise2d(wx as f64 * 0.5, wz as f64 * 0.5);
                if sample <= 0.72 {
                    continue;
                }
                let mut rng =
                    voxelcraft_core::scoped_rng(self.world_seed, column_domain(wx, wz));
                trees::place_oak_tree(&mut chunk, lx, surface_y[lx][lz] as usize, lz, &mut rng);
            }
        }

        chunk
    }

    fn ore_block_at(&self, wx: i32, wy: i32, wz: i32) -> Option<block::BlockId> {
        let x = wx as f64 * 0.2;
        let y = wy as f64 * 0.2;
        let z = wz as f64 * 0.2;
        if (5..=60).contains(&wy) && self.ore_iron.noise3d(x, y, z) > 0.78 {
            return Some(block::IRON_ORE);
        }
        if (5..=100).contains(&wy) && self.ore_coal.noise3d(x + 7.0, y + 7.0, z + 7.0) > 0.72 {
            return Some(block::COAL_ORE);
        }
        if (5..=80).contains(&wy) && self.ore_gravel.noise3d(x - 7.0, y - 7.0, z - 7.0) > 0.85 {
            return Some(block::GRAVEL);
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn height_is_always_in_range() {
        let gen = TerrainGenerator::new(42);
        for i in -50..50 {
            let h = gen.height_at(i * 13, i * 7);
            assert!((MIN_HEIGHT..=MAX_HEIGHT).contains(&h));
        }
    }

    #[test]
    fn same_seed_generates_identical_chunk() {
        let a = TerrainGenerator::new(12345).generate_chunk(ChunkPos::new(2, -3));
        let b = TerrainGenerator::new(12345).generate_chunk(ChunkPos::new(2, -3));
        for x in 0..CHUNK_SIZE_X {
            for y in 0..crate::chunk::CHUNK_SIZE_Y {
                for z in 0..CHUNK_SIZE_Z {
                    assert_eq!(a.voxel(x, y, z), b.voxel(x, y, z));
                }
            }
        }
    }

    #[test]
    fn different_seeds_diverge() {
        let a = TerrainGenerator::new(1).generate_chunk(ChunkPos::new(0, 0));
        let b = TerrainGenerator::new(2).generate_chunk(ChunkPos::new(0, 0));
        let mut differs = false;
        for x in 0..CHUNK_SIZE_X {
            for y in 0..crate::chunk::CHUNK_SIZE_Y {
                for z in 0..CHUNK_SIZE_Z {
                    if a.voxel(x, y, z) != b.voxel(x, y, z) {
                        differs = true;
                    }
                }
            }
        }
        assert!(differs);
    }

    #[test]
    fn row_zero_is_always_bedrock() {
        let chunk = TerrainGenerator::new(7).generate_chunk(ChunkPos::new(5, 5));
        for x in 0..CHUNK_SIZE_X {
            for z in 0..CHUNK_SIZE_Z {
                assert_eq!(chunk.voxel(x, 0, z), block::BEDROCK);
            }
        }
    }

    #[test]
    fn ore_blocks_respect_their_y_bounds() {
        let gen = TerrainGenerator::new(99);
        for wy in 0..128 {
            if let Some(block) = gen.ore_block_at(10, wy, 10) {
                match block {
                    block::IRON_ORE => assert!((5..=60).contains(&wy)),
                    block::COAL_ORE => assert!((5..=100).contains(&wy)),
                    block::GRAVEL => assert!((5..=80).contains(&wy)),
                    other => panic!("unexpected ore block {other}"),
                }
            }
        }
    }
}
