//! Per-frame world orchestration: keeps a radius of chunks loaded around
//! the player, drives structure stamping once a village's neighborhood is
//! complete, and reports which chunks need remeshing.

use tracing::instrument;

use crate::chunk::ChunkPos;
use crate::storage::ChunkStore;
use crate::structures;

/// Chunk-radius of the area kept loaded around the player.
pub const LOAD_RADIUS: i32 = 8;

/// Owns the chunk store and seed, and runs the load/unload/stamp cycle.
pub struct WorldLoop {
    store: ChunkStore,
    world_seed: u64,
}

impl WorldLoop {
    /// Create a world loop for `world_seed` with no chunks yet loaded.
    pub fn new(world_seed: u64) -> Self {
        Self {
            store: ChunkStore::new(world_seed),
            world_seed,
        }
    }

    /// Shared access to the chunk store, e.g. for raycasting or rendering.
    pub fn store(&self) -> &ChunkStore {
        &self.store
    }

    /// Mutable access to the chunk store, e.g. for applying player edits.
    pub fn store_mut(&mut self) -> &mut ChunkStore {
        &mut self.store
    }

    /// Run one load/unload/stamp cycle centered on `player_chunk`. Returns
    /// the positions of chunks whose meshes need rebuilding this frame.
    #[instrument(skip(self), fields(cx = player_chunk.x, cz = player_chunk.z))]
    pub fn tick(&mut self, player_chunk: ChunkPos) -> Vec<ChunkPos> {
        let mut newly_generated = Vec::new();
        for dx in -LOAD_RADIUS..=LOAD_RADIUS {
            for dz in -LOAD_RADIUS..=LOAD_RADIUS {
                if dx * dx + dz * dz > LOAD_RADIUS * LOAD_RADIUS {
                    continue;
                }
                let pos = ChunkPos::new(player_chunk.x + dx, player_chunk.z + dz);
                if !self.store.is_loaded(pos) {
                    self.store.generate_or_get(pos);
                    newly_generated.push(pos);
                }
            }
        }

        for pos in &newly_generated {
            structures::try_stamp_ready_structures(&mut self.store, self.world_seed, *pos);
        }

        let to_unload: Vec<ChunkPos> = self
            .store
            .loaded_positions()
            .filter(|p| {
                let dx = p.x - player_chunk.x;
                let dz = p.z - player_chunk.z;
                dx * dx + dz * dz > LOAD_RADIUS * LOAD_RADIUS
            })
            .collect();
        for pos in to_unload {
            self.store.unload(pos);
        }

        let dirty = self.store.dirty_positions();
        for pos in &dirty {
            if let Some(chunk) = self.store.get_chunk_mut(*pos) {
                chunk.clear_dirty();
            }
        }
        dirty
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tick_loads_chunks_within_radius() {
        let mut loop_ = WorldLoop::new(1);
        loop_.tick(ChunkPos::new(0, 0));
        assert!(loop_.store().is_loaded(ChunkPos::new(0, 0)));
        assert!(loop_.store().is_loaded(ChunkPos::new(LOAD_RADIUS, 0)));
        assert!(!loop_.store().is_loaded(ChunkPos::new(LOAD_RADIUS + 5, 0)));
    }

    #[test]
    fn tick_unloads_chunks_outside_radius_after_moving() {
        let mut loop_ = WorldLoop::new(1);
        loop_.tick(ChunkPos::new(0, 0));
        assert!(loop_.store().is_loaded(ChunkPos::new(0, 0)));

        loop_.tick(ChunkPos::new(100, 100));
        assert!(!loop_.store().is_loaded(ChunkPos::new(0, 0)));
        assert!(loop_.store().is_loaded(ChunkPos::new(100, 100)));
    }

    #[test]
    fn tick_reports_newly_generated_chunks_as_dirty() {
        let mut loop_ = WorldLoop::new(1);
        let dirty = loop_.tick(ChunkPos::new(0, 0));
        assert!(dirty.contains(&ChunkPos::new(0, 0)));
    }

    #[test]
    fn second_tick_at_same_position_reports_no_new_dirty_chunks() {
        let mut loop_ = WorldLoop::new(1);
        loop_.tick(ChunkPos::new(0, 0));
        let dirty = loop_.tick(ChunkPos::new(0, 0));
        assert!(dirty.is_empty());
    }
}
