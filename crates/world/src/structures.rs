//! Structure placement grid: divides the world into 256-block cells and
//! decides, deterministically per cell, whether a village anchor exists
//! there.

use voxelcraft_core::scoped_rng;
use rand::Rng;

use crate::chunk::ChunkPos;
use crate::storage::ChunkStore;
use crate::village;

/// Width/depth of a structure placement cell, in blocks.
pub const CELL_SIZE: i32 = 256;
/// Chance, per non-spawn cell, that a village anchor is placed in it.
pub const VILLAGE_CHANCE: f64 = 0.6;
/// The anchor of the village guaranteed to exist at world spawn.
pub const SPAWN_VILLAGE_ANCHOR: (i32, i32) = (40, 40);

/// The grid cell containing world column `(wx, wz)`.
pub fn cell_of(wx: i32, wz: i32) -> (i32, i32) {
    (wx.div_euclid(CELL_SIZE), wz.div_euclid(CELL_SIZE))
}

fn cell_domain(cell: (i32, i32)) -> u64 {
    (cell.0 as i64 as u64)
        .wrapping_mul(0x9E37_79B9)
        .wrapping_add(cell.1 as i64 as u64)
}

/// Decide the village anchor for a structure cell, if any.
///
/// The cell containing `(40, 40)` always resolves to the fixed spawn
/// village anchor, independent of the RNG roll, so a fresh world always has
/// somewhere for the player to start exploring. Every other cell rolls
/// `VILLAGE_CHANCE` and, on success, places its anchor at a pseudo-random
/// point inside the cell (margined so the village footprint stays clear of
/// the cell edge).
pub fn anchor_for_cell(world_seed: u64, cell: (i32, i32)) -> Option<(i32, i32)> {
    if cell == cell_of(SPAWN_VILLAGE_ANCHOR.0, SPAWN_VILLAGE_ANCHOR.1) {
        return Some(SPAWN_VILLAGE_ANCHOR);
    }
    let mut rng = scoped_rng(world_seed, cell_domain(cell));
    if !rng.gen_bool(VILLAGE_CHANCE) {
        return None;
    }
    let margin = 32;
    let base_x = cell.0 * CELL_SIZE;
    let base_z = cell.1 * CELL_SIZE;
    let ax = rng.gen_range((base_x + margin)..(base_x + CELL_SIZE - margin));
    let az = rng.gen_range((base_z + margin)..(base_z + CELL_SIZE - margin));
    Some((ax, az))
}

/// The 5x5 chunk neighborhood (in chunk coordinates) centered on `anchor`.
fn neighborhood(anchor: (i32, i32)) -> Vec<ChunkPos> {
    let center = ChunkPos::containing(anchor.0, anchor.1);
    let mut out = Vec::with_capacity(25);
    for dx in -2..=2 {
        for dz in -2..=2 {
            out.push(ChunkPos::new(center.x + dx, center.z + dz));
        }
    }
    out
}

/// Check whether any structure cell touching `pos` is ready to stamp: its
/// anchor's full 5x5 chunk neighborhood must be loaded, and it must not
/// already have been stamped this session. Called by the world loop after
/// every chunk generation.
pub fn try_stamp_ready_structures(store: &mut ChunkStore, world_seed: u64, pos: ChunkPos) {
    let (ox, oz) = pos.origin();
    let mut cells = Vec::new();
    for &(wx, wz) in &[(ox, oz), (ox + 15, oz), (ox, oz + 15), (ox + 15, oz + 15)] {
        let cell = cell_of(wx, wz);
        if !cells.contains(&cell) {
            cells.push(cell);
        }
    }

    for cell in cells {
        let Some(anchor) = anchor_for_cell(world_seed, cell) else {
            continue;
        };
        if store.is_anchor_stamped(anchor) {
            continue;
        }
        let neighbors = neighborhood(anchor);
        if !neighbors.iter().all(|&p| store.is_loaded(p)) {
            continue;
        }
        let mut rng = scoped_rng(world_seed, cell_domain(cell) ^ 0xABCD);
        village::stamp_village(store, anchor, &mut rng);
        store.mark_anchor_stamped(anchor);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spawn_cell_always_has_a_village() {
        let cell = cell_of(0, 0);
        assert_eq!(anchor_for_cell(1, cell), Some(SPAWN_VILLAGE_ANCHOR));
        assert_eq!(anchor_for_cell(999, cell), Some(SPAWN_VILLAGE_ANCHOR));
    }

    #[test]
    fn anchor_choice_is_deterministic() {
        let cell = (3, -2);
        assert_eq!(anchor_for_cell(42, cell), anchor_for_cell(42, cell));
    }

    #[test]
    fn cell_of_matches_manual_division() {
        assert_eq!(cell_of(255, 255), (0, 0));
        assert_eq!(cell_of(256, 0), (1, 0));
        assert_eq!(cell_of(-1, -1), (-1, -1));
    }
}
