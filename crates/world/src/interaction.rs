//! Player block interaction: a fixed-step marching raycast and the
//! break/place edits it drives, gated by a short cooldown so one click
//! edits exactly one block.

use glam::Vec3;

use voxelcraft_core::{block, BlockId};

use crate::storage::ChunkStore;

const RAY_MAX_DISTANCE: f32 = 6.0;
const RAY_STEP: f32 = 0.02;
const INTERACTION_COOLDOWN_SECS: f32 = 0.25;

/// The outcome of a successful raycast: the solid block it hit and the
/// last empty cell the ray passed through before hitting it, used as the
/// placement target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RaycastHit {
    /// World-space cell of the solid block the ray struck.
    pub block_pos: (i32, i32, i32),
    /// World-space cell immediately before `block_pos` along the ray.
    pub prev_pos: (i32, i32, i32),
    /// The id of the struck block.
    pub block_id: BlockId,
}

/// March a ray from `origin` along `direction` (need not be normalized) in
/// fixed `0.02`-block steps, up to 6 blocks, stopping at the first solid
/// voxel.
pub fn raycast(store: &ChunkStore, origin: Vec3, direction: Vec3) -> Option<RaycastHit> {
    let direction = direction.normalize_or_zero();
    if direction == Vec3::ZERO {
        return None;
    }

    let mut prev_cell = cell_of(origin);
    let steps = (RAY_MAX_DISTANCE / RAY_STEP) as u32;

    for i in 0..=steps {
        let t = i as f32 * RAY_STEP;
        let point = origin + direction * t;
        let cell = cell_of(point);
        if cell != prev_cell {
            if store.is_solid(cell.0, cell.1, cell.2) {
                return Some(RaycastHit {
                    block_pos: cell,
                    prev_pos: prev_cell,
                    block_id: store.get_block(cell.0, cell.1, cell.2),
                });
            }
            prev_cell = cell;
        }
    }
    None
}

fn cell_of(p: Vec3) -> (i32, i32, i32) {
    (p.x.floor() as i32, p.y.floor() as i32, p.z.floor() as i32)
}

/// Tracks the per-player interaction cooldown so a held mouse button edits
/// at most one block every [`INTERACTION_COOLDOWN_SECS`].
#[derive(Debug, Clone, Copy, Default)]
pub struct InteractionState {
    cooldown_remaining: f32,
}

impl InteractionState {
    /// A fresh, ready-to-interact state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the cooldown timer by `dt` seconds.
    pub fn tick(&mut self, dt: f32) {
        self.cooldown_remaining = (self.cooldown_remaining - dt).max(0.0);
    }

    /// Whether an interaction may fire this frame.
    pub fn is_ready(&self) -> bool {
        self.cooldown_remaining <= 0.0
    }

    fn consume(&mut self) {
        self.cooldown_remaining = INTERACTION_COOLDOWN_SECS;
    }

    /// Break the block the ray hits, if the cooldown allows it. `BEDROCK`
    /// cannot be broken. Returns the hit that was acted on.
    pub fn try_break(&mut self, store: &mut ChunkStore, origin: Vec3, direction: Vec3) -> Option<RaycastHit> {
        if !self.is_ready() {
            return None;
        }
        let hit = raycast(store, origin, direction)?;
        if hit.block_id == block::BEDROCK {
            return None;
        }
        store.set_block(hit.block_pos.0, hit.block_pos.1, hit.block_pos.2, block::AIR);
        self.consume();
        Some(hit)
    }

    /// Place `block_id` into the empty cell immediately before whatever the
    /// ray hits, if the cooldown allows it. Suppressed if the target cell
    /// overlaps the player's own AABB (`player_min`/`player_max`, world
    /// space) or if the struck block is `BEDROCK`.
    pub fn try_place(
        &mut self,
        store: &mut ChunkStore,
        origin: Vec3,
        direction: Vec3,
        block_id: BlockId,
        player_min: Vec3,
        player_max: Vec3,
    ) -> Option<RaycastHit> {
        if !self.is_ready() {
            return None;
        }
        let hit = raycast(store, origin, direction)?;
        if hit.block_id == block::BEDROCK {
            return None;
        }
        if cell_overlaps_aabb(hit.prev_pos, player_min, player_max) {
            return None;
        }
        store.set_block(hit.prev_pos.0, hit.prev_pos.1, hit.prev_pos.2, block_id);
        self.consume();
        Some(hit)
    }
}

/// Whether the unit block cell at `cell` overlaps the axis-aligned box
/// `[min, max]`.
fn cell_overlaps_aabb(cell: (i32, i32, i32), min: Vec3, max: Vec3) -> bool {
    let (cx, cy, cz) = (cell.0 as f32, cell.1 as f32, cell.2 as f32);
    cx < max.x && cx + 1.0 > min.x && cy < max.y && cy + 1.0 > min.y && cz < max.z && cz + 1.0 > min.z
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunk::ChunkPos;
    use voxelcraft_core::block;

    #[test]
    fn ray_hits_solid_block_straight_ahead() {
        let mut store = ChunkStore::new(1);
        store.generate_or_get(ChunkPos::new(0, 0));
        store.set_block(5, 10, 5, block::STONE);

        let hit = raycast(&store, Vec3::new(5.5, 10.5, 2.0), Vec3::new(0.0, 0.0, 1.0));
        let hit = hit.expect("ray should hit the placed stone block");
        assert_eq!(hit.block_pos, (5, 10, 5));
        assert_eq!(hit.block_id, block::STONE);
        assert_eq!(hit.prev_pos, (5, 10, 4));
    }

    #[test]
    fn ray_misses_when_nothing_in_range() {
        let mut store = ChunkStore::new(1);
        store.generate_or_get(ChunkPos::new(0, 0));
        let hit = raycast(&store, Vec3::new(5.5, 100.5, 5.5), Vec3::new(0.0, 1.0, 0.0));
        assert!(hit.is_none());
    }

    #[test]
    fn cooldown_blocks_rapid_repeat_interactions() {
        let mut store = ChunkStore::new(1);
        store.generate_or_get(ChunkPos::new(0, 0));
        store.set_block(5, 10, 5, block::STONE);
        let mut state = InteractionState::new();

        let first = state.try_break(&mut store, Vec3::new(5.5, 10.5, 2.0), Vec3::new(0.0, 0.0, 1.0));
        assert!(first.is_some());
        assert!(!state.is_ready());

        store.set_block(5, 10, 5, block::STONE);
        let second = state.try_break(&mut store, Vec3::new(5.5, 10.5, 2.0), Vec3::new(0.0, 0.0, 1.0));
        assert!(second.is_none());

        state.tick(INTERACTION_COOLDOWN_SECS);
        assert!(state.is_ready());
    }

    #[test]
    fn place_targets_the_cell_before_the_hit() {
        let mut store = ChunkStore::new(1);
        store.generate_or_get(ChunkPos::new(0, 0));
        store.set_block(5, 10, 5, block::STONE);
        let mut state = InteractionState::new();

        let hit = state
            .try_place(
                &mut store,
                Vec3::new(5.5, 10.5, 2.0),
                Vec3::new(0.0, 0.0, 1.0),
                block::COBBLESTONE,
                Vec3::new(-100.0, -100.0, -100.0),
                Vec3::new(-99.0, -99.0, -99.0),
            )
            .unwrap();
        assert_eq!(store.get_block(hit.prev_pos.0, hit.prev_pos.1, hit.prev_pos.2), block::COBBLESTONE);
    }

    #[test]
    fn bedrock_cannot_be_broken_or_placed_into() {
        let mut store = ChunkStore::new(1);
        store.generate_or_get(ChunkPos::new(0, 0));
        store.set_block(5, 0, 5, block::BEDROCK);
        let mut state = InteractionState::new();

        let broke = state.try_break(&mut store, Vec3::new(5.5, 2.5, 5.5), Vec3::new(0.0, -1.0, 0.0));
        assert!(broke.is_none());
        assert_eq!(store.get_block(5, 0, 5), block::BEDROCK);
    }

    #[test]
    fn place_is_suppressed_when_the_target_cell_overlaps_the_player() {
        let mut store = ChunkStore::new(1);
        store.generate_or_get(ChunkPos::new(0, 0));
        store.set_block(5, 10, 5, block::STONE);
        let mut state = InteractionState::new();

        let placed = state.try_place(
            &mut store,
            Vec3::new(5.5, 10.5, 2.0),
            Vec3::new(0.0, 0.0, 1.0),
            block::COBBLESTONE,
            Vec3::new(5.0, 10.0, 3.5),
            Vec3::new(6.0, 11.0, 4.5),
        );
        assert!(placed.is_none());
        assert_eq!(store.get_block(5, 10, 4), block::AIR);
    }
}
