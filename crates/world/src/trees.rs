//! Oak tree placement: a single tree archetype, stamped after terrain and
//! cave carving so it only ever grows on top of solid ground.

use rand::{rngs::StdRng, Rng};

use voxelcraft_core::block;

use crate::chunk::Chunk;

/// Stamp an oak tree whose base sits at local `(lx, surface_y, lz)`.
///
/// The trunk is 4-6 logs; the canopy is two 5x5 leaf rings (corners
/// skipped) followed by two 3x3 rings (corners skipped) above the trunk
/// top. Leaves never overwrite a non-air block, and the caller is
/// responsible for keeping `lx`/`lz` at least 2 blocks from every chunk
/// edge so the canopy never needs a neighbor chunk.
pub fn place_oak_tree(chunk: &mut Chunk, lx: usize, surface_y: usize, lz: usize, rng: &mut StdRng) {
    let trunk_height = rng.gen_range(4..=6);
    let base = surface_y + 1;

    for i in 0..trunk_height {
        chunk.set_voxel(lx, base + i, lz, block::OAK_LOG);
    }
    let top = base + trunk_height - 1;

    place_leaf_ring(chunk, lx, lz, top.saturating_sub(1), 2, true);
    place_leaf_ring(chunk, lx, lz, top, 2, true);
    place_leaf_ring(chunk, lx, lz, top + 1, 1, false);
    place_leaf_ring(chunk, lx, lz, top + 2, 1, false);
}

fn place_leaf_ring(chunk: &mut Chunk, cx: usize, cz: usize, y: usize, radius: i32, skip_corners: bool) {
    for dx in -radius..=radius {
        for dz in -radius..=radius {
            if skip_corners && dx.abs() == radius && dz.abs() == radius {
                continue;
            }
            let x = cx as i32 + dx;
            let z = cz as i32 + dz;
            if x < 0 || z < 0 {
                continue;
            }
            let (x, z) = (x as usize, z as usize);
            if chunk.voxel(x, y, z) == block::AIR {
                chunk.set_voxel(x, y, z, block::OAK_LEAVES);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunk::ChunkPos;
    use rand::SeedableRng;

    #[test]
    fn tree_places_a_trunk_of_logs() {
        let mut chunk = Chunk::new(ChunkPos::new(0, 0));
        let mut rng = StdRng::seed_from_u64(1);
        place_oak_tree(&mut chunk, 8, 40, 8, &mut rng);
        assert_eq!(chunk.voxel(8, 41, 8), block::OAK_LOG);
    }

    #[test]
    fn leaves_never_overwrite_existing_blocks() {
        let mut chunk = Chunk::new(ChunkPos::new(0, 0));
        chunk.set_voxel(9, 42, 9, block::STONE);
        let mut rng = StdRng::seed_from_u64(2);
        place_oak_tree(&mut chunk, 8, 40, 8, &mut rng);
        assert_eq!(chunk.voxel(9, 42, 9), block::STONE);
    }

    #[test]
    fn same_seed_places_identical_tree() {
        let mut a = Chunk::new(ChunkPos::new(0, 0));
        let mut b = Chunk::new(ChunkPos::new(0, 0));
        place_oak_tree(&mut a, 8, 40, 8, &mut StdRng::seed_from_u64(9));
        place_oak_tree(&mut b, 8, 40, 8, &mut StdRng::seed_from_u64(9));
        for x in 0..16 {
            for y in 0..60 {
                for z in 0..16 {
                    assert_eq!(a.voxel(x, y, z), b.voxel(x, y, z));
                }
            }
        }
    }
}
