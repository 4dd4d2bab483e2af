//! Chunk store: the single source of truth for block data, keyed by 2D
//! chunk coordinate.

use std::collections::{BTreeMap, BTreeSet};

use voxelcraft_core::{block, BlockId};

use crate::chunk::{world_to_local, Chunk, ChunkPos, CHUNK_SIZE_X, CHUNK_SIZE_Z};
use crate::terrain::TerrainGenerator;

/// Owns all loaded chunks plus the set of structure anchors already stamped
/// this session, so stamping stays idempotent across chunk reload.
pub struct ChunkStore {
    chunks: BTreeMap<ChunkPos, Chunk>,
    terrain: TerrainGenerator,
    placed_anchors: BTreeSet<(i32, i32)>,
}

impl ChunkStore {
    /// Create an empty store whose terrain generator is seeded by `world_seed`.
    pub fn new(world_seed: u64) -> Self {
        Self {
            chunks: BTreeMap::new(),
            terrain: TerrainGenerator::new(world_seed),
            placed_anchors: BTreeSet::new(),
        }
    }

    /// Read a block at world coordinates. Out-of-range `y` and unloaded
    /// chunks both resolve to [`block::AIR`] — never an error.
    pub fn get_block(&self, x: i32, y: i32, z: i32) -> BlockId {
        if !(0..128).contains(&y) {
            return block::AIR;
        }
        let cpos = ChunkPos::containing(x, z);
        match self.chunks.get(&cpos) {
            Some(chunk) => chunk.voxel(
                world_to_local(x, CHUNK_SIZE_X as i32),
                y as usize,
                world_to_local(z, CHUNK_SIZE_Z as i32),
            ),
            None => block::AIR,
        }
    }

    /// Write a block at world coordinates. No-op if `y` is out of range or
    /// the owning chunk is not loaded. Marks the owning chunk dirty, and
    /// additionally dirties the adjacent chunk when the local `x`/`z`
    /// touches a chunk boundary, since that neighbor's boundary faces depend
    /// on this block.
    pub fn set_block(&mut self, x: i32, y: i32, z: i32, id: BlockId) {
        if !(0..128).contains(&y) {
            return;
        }
        let cpos = ChunkPos::containing(x, z);
        let lx = world_to_local(x, CHUNK_SIZE_X as i32);
        let lz = world_to_local(z, CHUNK_SIZE_Z as i32);

        let changed = match self.chunks.get_mut(&cpos) {
            Some(chunk) => chunk.set_voxel(lx, y as usize, lz, id),
            None => return,
        };
        if !changed {
            return;
        }
        if let Some(chunk) = self.chunks.get_mut(&cpos) {
            chunk.mark_dirty();
        }

        for (dx, dz) in boundary_neighbors(lx, lz) {
            let neighbor = ChunkPos::new(cpos.x + dx, cpos.z + dz);
            if let Some(chunk) = self.chunks.get_mut(&neighbor) {
                chunk.mark_dirty();
            }
        }
    }

    /// Whether the block at `(x, y, z)` is solid; unloaded/out-of-range is `AIR`.
    pub fn is_solid(&self, x: i32, y: i32, z: i32) -> bool {
        block::is_solid(self.get_block(x, y, z))
    }

    /// Whether the block at `(x, y, z)` is transparent; unloaded/out-of-range is `AIR`.
    pub fn is_transparent(&self, x: i32, y: i32, z: i32) -> bool {
        block::is_transparent(self.get_block(x, y, z))
    }

    /// Fetch a loaded chunk, if present.
    pub fn get_chunk(&self, pos: ChunkPos) -> Option<&Chunk> {
        self.chunks.get(&pos)
    }

    /// Fetch a loaded chunk mutably, if present.
    pub fn get_chunk_mut(&mut self, pos: ChunkPos) -> Option<&mut Chunk> {
        self.chunks.get_mut(&pos)
    }

    /// Whether a chunk is currently resident.
    pub fn is_loaded(&self, pos: ChunkPos) -> bool {
        self.chunks.contains_key(&pos)
    }

    /// Fetch a chunk, generating it from terrain first if it is not yet
    /// resident. Generation is explicit and driven by the world loop, never
    /// triggered implicitly by a read.
    pub fn generate_or_get(&mut self, pos: ChunkPos) -> &mut Chunk {
        self.chunks
            .entry(pos)
            .or_insert_with(|| self.terrain.generate_chunk(pos))
    }

    /// Drop a chunk and its meshes.
    pub fn unload(&mut self, pos: ChunkPos) {
        self.chunks.remove(&pos);
    }

    /// Deterministic iteration over every resident chunk position.
    pub fn loaded_positions(&self) -> impl Iterator<Item = ChunkPos> + '_ {
        self.chunks.keys().copied()
    }

    /// Deterministic iteration over every dirty chunk's position.
    pub fn dirty_positions(&self) -> Vec<ChunkPos> {
        self.chunks
            .iter()
            .filter(|(_, c)| c.is_dirty())
            .map(|(p, _)| *p)
            .collect()
    }

    /// Topmost `y` at world column `(x, z)` whose block is not air, water,
    /// leaves, or log. Used by structure placement to find ground level.
    pub fn surface_height(&self, x: i32, z: i32) -> i32 {
        for y in (0..128).rev() {
            let id = self.get_block(x, y, z);
            if id != block::AIR
                && id != block::WATER
                && id != block::OAK_LEAVES
                && id != block::OAK_LOG
            {
                return y;
            }
        }
        0
    }

    /// Whether a structure anchor (keyed by its world-space center) has
    /// already been stamped this session.
    pub fn is_anchor_stamped(&self, anchor: (i32, i32)) -> bool {
        self.placed_anchors.contains(&anchor)
    }

    /// Record an anchor as stamped so it is never revisited this session.
    pub fn mark_anchor_stamped(&mut self, anchor: (i32, i32)) {
        self.placed_anchors.insert(anchor);
    }
}

/// The neighbor chunk offsets dirtied by a boundary write at local `(lx, lz)`.
fn boundary_neighbors(lx: usize, lz: usize) -> Vec<(i32, i32)> {
    let mut out = Vec::new();
    if lx == 0 {
        out.push((-1, 0));
    } else if lx == CHUNK_SIZE_X - 1 {
        out.push((1, 0));
    }
    if lz == 0 {
        out.push((0, -1));
    } else if lz == CHUNK_SIZE_Z - 1 {
        out.push((0, 1));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_block_on_unloaded_chunk_is_air() {
        let store = ChunkStore::new(1);
        assert_eq!(store.get_block(0, 5, 0), block::AIR);
    }

    #[test]
    fn get_block_out_of_range_y_is_air() {
        let mut store = ChunkStore::new(1);
        store.generate_or_get(ChunkPos::new(0, 0));
        assert_eq!(store.get_block(0, 500, 0), block::AIR);
        assert_eq!(store.get_block(0, -1, 0), block::AIR);
    }

    #[test]
    fn set_block_out_of_range_is_noop() {
        let mut store = ChunkStore::new(1);
        store.generate_or_get(ChunkPos::new(0, 0));
        store.set_block(0, 500, 0, block::STONE);
        assert_eq!(store.get_block(0, 500, 0), block::AIR);
    }

    #[test]
    fn set_block_marks_owning_chunk_dirty() {
        let mut store = ChunkStore::new(1);
        let pos = ChunkPos::new(0, 0);
        store.generate_or_get(pos);
        store.get_chunk_mut(pos).unwrap().clear_dirty();
        store.set_block(5, 10, 5, block::STONE);
        assert!(store.get_chunk(pos).unwrap().is_dirty());
    }

    #[test]
    fn set_block_at_x_boundary_dirties_neighbor() {
        let mut store = ChunkStore::new(1);
        let origin = ChunkPos::new(0, 0);
        let neighbor = ChunkPos::new(-1, 0);
        store.generate_or_get(origin);
        store.generate_or_get(neighbor);
        store.get_chunk_mut(origin).unwrap().clear_dirty();
        store.get_chunk_mut(neighbor).unwrap().clear_dirty();

        store.set_block(0, 10, 5, block::STONE);

        assert!(store.get_chunk(origin).unwrap().is_dirty());
        assert!(store.get_chunk(neighbor).unwrap().is_dirty());
    }

    #[test]
    fn set_block_interior_does_not_dirty_neighbor() {
        let mut store = ChunkStore::new(1);
        let origin = ChunkPos::new(0, 0);
        let neighbor = ChunkPos::new(-1, 0);
        store.generate_or_get(origin);
        store.generate_or_get(neighbor);
        store.get_chunk_mut(origin).unwrap().clear_dirty();
        store.get_chunk_mut(neighbor).unwrap().clear_dirty();

        store.set_block(5, 10, 5, block::STONE);

        assert!(!store.get_chunk(neighbor).unwrap().is_dirty());
    }

    #[test]
    fn anchor_stamping_is_idempotent() {
        let mut store = ChunkStore::new(1);
        assert!(!store.is_anchor_stamped((40, 40)));
        store.mark_anchor_stamped((40, 40));
        assert!(store.is_anchor_stamped((40, 40)));
    }

    #[test]
    fn loaded_positions_are_deterministically_ordered() {
        let mut store = ChunkStore::new(1);
        store.generate_or_get(ChunkPos::new(2, -1));
        store.generate_or_get(ChunkPos::new(-1, 2));
        store.generate_or_get(ChunkPos::new(0, 0));
        let positions: Vec<_> = store.loaded_positions().collect();
        let mut sorted = positions.clone();
        sorted.sort();
        assert_eq!(positions, sorted);
    }
}
