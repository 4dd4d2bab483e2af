//! Village stamping: a well, a mix of houses and a farm scattered on a
//! jittered ring around a fixed anchor, gravel paths connecting each back to
//! the well, and a lamp at every path's midpoint.

use rand::{rngs::StdRng, Rng};

use voxelcraft_core::block;

use crate::chunk::ChunkPos;
use crate::storage::ChunkStore;

/// Half-width of the well's 3x3 ring, i.e. the ring sits at `|dx| == 1 ||
/// |dz| == 1`.
const WELL_HALF: i32 = 1;

/// Radius, in blocks, of the footprint cleared of trees before anything is
/// stamped, and of the chunk-neighborhood the caller must keep loaded.
const FOOTPRINT_HALF: i32 = 30;
/// How far above the surface a column is scrubbed to `AIR` during clearing;
/// tall enough to remove a fully grown oak tree's canopy.
const CLEAR_HEIGHT: i32 = 15;

const MIN_BUILDINGS: i32 = 4;
const MAX_BUILDINGS: i32 = 7;
const BUILDING_RING_MIN: f64 = 10.0;
const BUILDING_RING_MAX: f64 = 22.0;
/// A candidate site is rejected if the surface there is at or below this
/// height, or differs from the village's own ground level by more than
/// [`MAX_SITE_HEIGHT_DELTA`].
const MIN_SITE_HEIGHT: i32 = 40;
const MAX_SITE_HEIGHT_DELTA: i32 = 5;
/// How many jittered candidates to try per building slot before giving up
/// on it.
const SITE_ATTEMPTS: u32 = 8;

/// The three building archetypes a village can scatter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Archetype {
    SmallHouse,
    LargeHouse,
    Farm,
}

/// Stamp a full village into `store`, centered on `anchor`. Every chunk the
/// footprint touches must already be loaded; blocks outside a loaded chunk
/// are silently dropped by [`ChunkStore::set_block`].
pub fn stamp_village(store: &mut ChunkStore, anchor: (i32, i32), rng: &mut StdRng) {
    let base_y = ground_y(store, anchor.0, anchor.1);

    clear_trees(store, anchor);
    stamp_well(store, anchor, base_y);

    let sites = place_buildings(store, anchor, base_y, rng);
    for &(site, archetype) in &sites {
        match archetype {
            Archetype::SmallHouse => stamp_small_house(store, site, rng),
            Archetype::LargeHouse => stamp_large_house(store, site, rng),
            Archetype::Farm => stamp_farm(store, site),
        }
        let midpoint = stamp_path(store, anchor, site);
        stamp_lamp(store, midpoint);
    }
}

fn ground_y(store: &ChunkStore, x: i32, z: i32) -> i32 {
    store.surface_height(x, z)
}

/// Overwrite the 15 blocks above each column's current surface with `AIR`
/// across the village's 61x61 footprint, so any tree generated by the
/// terrain pass is gone before buildings are stamped on top of it.
fn clear_trees(store: &mut ChunkStore, anchor: (i32, i32)) {
    for dx in -FOOTPRINT_HALF..=FOOTPRINT_HALF {
        for dz in -FOOTPRINT_HALF..=FOOTPRINT_HALF {
            let x = anchor.0 + dx;
            let z = anchor.1 + dz;
            let surface = ground_y(store, x, z);
            for dy in 1..=CLEAR_HEIGHT {
                store.set_block(x, surface + dy, z, block::AIR);
            }
        }
    }
}

/// A 3x3 cobblestone ring at `base_y` and `base_y + 1`, a single `WATER`
/// block at the center of the upper ring, four oak-log corner pillars at
/// `base_y + 2`, and a 3x3 oak-plank roof at `base_y + 3`.
fn stamp_well(store: &mut ChunkStore, anchor: (i32, i32), base_y: i32) {
    let y0 = base_y + 1;
    for dx in -WELL_HALF..=WELL_HALF {
        for dz in -WELL_HALF..=WELL_HALF {
            let x = anchor.0 + dx;
            let z = anchor.1 + dz;
            let on_ring = dx.abs() == WELL_HALF || dz.abs() == WELL_HALF;
            if on_ring {
                store.set_block(x, y0, z, block::COBBLESTONE);
                store.set_block(x, y0 + 1, z, block::COBBLESTONE);
            } else {
                store.set_block(x, y0 + 1, z, block::WATER);
            }
        }
    }

    for &(dx, dz) in &[(-1, -1), (-1, 1), (1, -1), (1, 1)] {
        store.set_block(anchor.0 + dx, y0 + 2, anchor.1 + dz, block::OAK_LOG);
    }

    for dx in -WELL_HALF..=WELL_HALF {
        for dz in -WELL_HALF..=WELL_HALF {
            store.set_block(anchor.0 + dx, y0 + 3, anchor.1 + dz, block::OAK_PLANKS);
        }
    }
}

/// Pick 4-7 building sites jittered on a ring at radius 10-22 around
/// `anchor`, rejecting candidates whose surface is too low or too uneven
/// relative to the village's own ground level, and assign each an archetype.
fn place_buildings(
    store: &ChunkStore,
    anchor: (i32, i32),
    base_y: i32,
    rng: &mut StdRng,
) -> Vec<((i32, i32), Archetype)> {
    let count = rng.gen_range(MIN_BUILDINGS..=MAX_BUILDINGS);
    let mut sites = Vec::with_capacity(count as usize);

    for i in 0..count {
        let base_angle = std::f64::consts::TAU * (i as f64) / (count as f64);
        let mut chosen = None;
        for _ in 0..SITE_ATTEMPTS {
            let angle = base_angle + rng.gen_range(-0.35..0.35);
            let radius = rng.gen_range(BUILDING_RING_MIN..=BUILDING_RING_MAX);
            let x = anchor.0 + (angle.cos() * radius).round() as i32;
            let z = anchor.1 + (angle.sin() * radius).round() as i32;
            let surface = ground_y(store, x, z);
            if surface <= MIN_SITE_HEIGHT {
                continue;
            }
            if (surface - base_y).abs() > MAX_SITE_HEIGHT_DELTA {
                continue;
            }
            chosen = Some((x, z));
            break;
        }
        let Some(site) = chosen else { continue };
        let archetype = match rng.gen_range(0..3) {
            0 => Archetype::SmallHouse,
            1 => Archetype::LargeHouse,
            _ => Archetype::Farm,
        };
        sites.push((site, archetype));
    }
    sites
}

/// 7x5x4 cobble-or-plank house with one doorway and three glass windows.
fn stamp_small_house(store: &mut ChunkStore, center: (i32, i32), rng: &mut StdRng) {
    const HALF_W: i32 = 3;
    const HALF_D: i32 = 2;
    const HEIGHT: i32 = 4;

    let y0 = ground_y(store, center.0, center.1) + 1;
    let wall_block = if rng.gen_bool(0.5) { block::COBBLESTONE } else { block::OAK_PLANKS };

    let windows = [(-2, -HALF_D, 1), (2, -HALF_D, 1), (0, HALF_D, 1)];

    for dy in 0..HEIGHT {
        for dx in -HALF_W..=HALF_W {
            for dz in -HALF_D..=HALF_D {
                if dx.abs() != HALF_W && dz.abs() != HALF_D {
                    continue;
                }
                let is_doorway = dy < 2 && dx == 0 && dz == -HALF_D;
                let is_window = windows.contains(&(dx, dz, dy));
                let block_id = if is_doorway {
                    block::AIR
                } else if is_window {
                    block::GLASS
                } else {
                    wall_block
                };
                store.set_block(center.0 + dx, y0 + dy, center.1 + dz, block_id);
            }
        }
    }

    stamp_flat(store, center, HALF_W, HALF_D, y0 - 1, block::OAK_PLANKS);
    stamp_flat(store, center, HALF_W, HALF_D, y0 + HEIGHT, block::OAK_PLANKS);
}

/// 9x11x5 brick house with a two-wide doorway and two rows of glass windows.
fn stamp_large_house(store: &mut ChunkStore, center: (i32, i32), _rng: &mut StdRng) {
    const HALF_W: i32 = 4;
    const HALF_D: i32 = 5;
    const HEIGHT: i32 = 5;

    let y0 = ground_y(store, center.0, center.1) + 1;

    for dy in 0..HEIGHT {
        for dx in -HALF_W..=HALF_W {
            for dz in -HALF_D..=HALF_D {
                if dx.abs() != HALF_W && dz.abs() != HALF_D {
                    continue;
                }
                let is_doorway = dy < 3 && dz == -HALF_D && (dx == 0 || dx == 1);
                let is_window_row = (dy == 1 || dy == 3)
                    && !is_doorway
                    && ((dx.abs() == HALF_W && dz % 3 == 0) || (dz.abs() == HALF_D && dx % 3 == 0));
                let block_id = if is_doorway {
                    block::AIR
                } else if is_window_row {
                    block::GLASS
                } else {
                    block::BRICK
                };
                store.set_block(center.0 + dx, y0 + dy, center.1 + dz, block_id);
            }
        }
    }

    stamp_flat(store, center, HALF_W, HALF_D, y0 - 1, block::OAK_PLANKS);
    stamp_flat(store, center, HALF_W, HALF_D, y0 + HEIGHT, block::OAK_PLANKS);
}

fn stamp_flat(store: &mut ChunkStore, center: (i32, i32), half_w: i32, half_d: i32, y: i32, id: u8) {
    for dx in -half_w..=half_w {
        for dz in -half_d..=half_d {
            store.set_block(center.0 + dx, y, center.1 + dz, id);
        }
    }
}

/// A 3x3 tillable plot (a `WATER` moisture row flanked by `DIRT` rows) with
/// oak-log fence posts at the corners of the surrounding 5x5 footprint.
fn stamp_farm(store: &mut ChunkStore, center: (i32, i32)) {
    let y0 = ground_y(store, center.0, center.1);

    for dx in -1..=1 {
        for dz in -1..=1 {
            let id = if dz == 0 { block::WATER } else { block::DIRT };
            store.set_block(center.0 + dx, y0, center.1 + dz, id);
        }
    }

    for &(dx, dz) in &[(-2, -2), (-2, 2), (2, -2), (2, 2)] {
        store.set_block(center.0 + dx, y0 + 1, center.1 + dz, block::OAK_LOG);
    }
}

/// A 3-wide gravel strip along a Bresenham line from `from` to `to`,
/// oriented across whichever axis the line travels least along. Returns the
/// path's midpoint, in world columns, for the caller to plant a lamp on.
fn stamp_path(store: &mut ChunkStore, from: (i32, i32), to: (i32, i32)) -> (i32, i32) {
    let line = bresenham_line(from, to);
    let dx = (to.0 - from.0).abs();
    let dz = (to.1 - from.1).abs();
    let across_x = dz >= dx;

    for &(x, z) in &line {
        for offset in -1..=1 {
            let (px, pz) = if across_x { (x + offset, z) } else { (x, z + offset) };
            let y = ground_y(store, px, pz);
            store.set_block(px, y, pz, block::GRAVEL);
        }
    }

    line[line.len() / 2]
}

/// A 3-tall oak-log post capped with `GLASS`.
fn stamp_lamp(store: &mut ChunkStore, pos: (i32, i32)) {
    let y0 = ground_y(store, pos.0, pos.1) + 1;
    for dy in 0..3 {
        store.set_block(pos.0, y0 + dy, pos.1, block::OAK_LOG);
    }
    store.set_block(pos.0, y0 + 3, pos.1, block::GLASS);
}

/// Integer Bresenham line from `from` to `to`, inclusive of both endpoints.
fn bresenham_line(from: (i32, i32), to: (i32, i32)) -> Vec<(i32, i32)> {
    let (mut x0, mut z0) = from;
    let (x1, z1) = to;
    let dx = (x1 - x0).abs();
    let dz = -(z1 - z0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sz = if z0 < z1 { 1 } else { -1 };
    let mut err = dx + dz;

    let mut points = Vec::new();
    loop {
        points.push((x0, z0));
        if x0 == x1 && z0 == z1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dz {
            err += dz;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            z0 += sz;
        }
    }
    points
}

/// Chunks a village footprint touches, given its anchor. Used by tests and
/// by structure-readiness checks that want an explicit bounds rather than a
/// fixed 5x5 neighborhood.
pub fn footprint_chunks(anchor: (i32, i32)) -> Vec<ChunkPos> {
    let center = ChunkPos::containing(anchor.0, anchor.1);
    (-2..=2)
        .flat_map(|dx| (-2..=2).map(move |dz| ChunkPos::new(center.x + dx, center.z + dz)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunk::ChunkPos;
    use rand::SeedableRng;

    fn loaded_store_around(anchor: (i32, i32)) -> ChunkStore {
        let mut store = ChunkStore::new(1);
        let center = ChunkPos::containing(anchor.0, anchor.1);
        for dx in -3..=3 {
            for dz in -3..=3 {
                store.generate_or_get(ChunkPos::new(center.x + dx, center.z + dz));
            }
        }
        store
    }

    #[test]
    fn well_has_a_3x3_ring_and_a_single_center_water_block() {
        let mut store = loaded_store_around((40, 40));
        let base_y = store.surface_height(40, 40);
        stamp_well(&mut store, (40, 40), base_y);

        assert_eq!(store.get_block(40 + WELL_HALF, base_y + 1, 40), block::COBBLESTONE);
        assert_eq!(store.get_block(40 + WELL_HALF, base_y + 2, 40), block::COBBLESTONE);
        assert_eq!(store.get_block(40, base_y + 2, 40), block::WATER);
        assert_eq!(store.get_block(40 - 1, base_y + 3, 40 - 1), block::OAK_LOG);
        assert_eq!(store.get_block(40, base_y + 4, 40), block::OAK_PLANKS);
    }

    #[test]
    fn tree_clearing_removes_a_trunk_above_the_village_anchor() {
        let mut store = loaded_store_around((40, 40));
        let surface = store.surface_height(45, 45);
        store.set_block(45, surface + 1, 45, block::OAK_LOG);
        store.set_block(45, surface + 5, 45, block::OAK_LEAVES);

        clear_trees(&mut store, (40, 40));

        assert_eq!(store.get_block(45, surface + 1, 45), block::AIR);
        assert_eq!(store.get_block(45, surface + 5, 45), block::AIR);
    }

    #[test]
    fn building_sites_land_within_the_jittered_ring_and_respect_height_rules() {
        let mut store = loaded_store_around((40, 40));
        let base_y = store.surface_height(40, 40);
        let mut rng = StdRng::seed_from_u64(5);
        let sites = place_buildings(&store, (40, 40), base_y, &mut rng);

        assert!((MIN_BUILDINGS as usize..=MAX_BUILDINGS as usize).contains(&sites.len()));
        for &((x, z), _) in &sites {
            let d = (((x - 40).pow(2) + (z - 40).pow(2)) as f64).sqrt();
            assert!(d >= BUILDING_RING_MIN - 1.0 && d <= BUILDING_RING_MAX + 1.0);
            let surface = store.surface_height(x, z);
            assert!(surface > MIN_SITE_HEIGHT);
            assert!((surface - base_y).abs() <= MAX_SITE_HEIGHT_DELTA);
        }
    }

    #[test]
    fn small_house_has_one_doorway_and_three_windows() {
        let mut store = loaded_store_around((40, 40));
        let y0 = store.surface_height(40, 40) + 1;
        let mut rng = StdRng::seed_from_u64(1);
        stamp_small_house(&mut store, (40, 40), &mut rng);

        assert_eq!(store.get_block(40, y0, 38), block::AIR);
        assert_eq!(store.get_block(40, y0 + 1, 38), block::AIR);
        assert_eq!(store.get_block(38, y0 + 1, 38), block::GLASS);
        assert_eq!(store.get_block(42, y0 + 1, 38), block::GLASS);
        assert_eq!(store.get_block(40, y0 + 1, 42), block::GLASS);
        assert!(matches!(store.get_block(37, y0, 40), block::COBBLESTONE | block::OAK_PLANKS));
    }

    #[test]
    fn farm_has_a_water_moisture_row_flanked_by_dirt() {
        let mut store = loaded_store_around((40, 40));
        let y0 = store.surface_height(40, 40);
        stamp_farm(&mut store, (40, 40));
        assert_eq!(store.get_block(40, y0, 40), block::WATER);
        assert_eq!(store.get_block(40, y0, 39), block::DIRT);
        assert_eq!(store.get_block(40, y0, 41), block::DIRT);
        assert_eq!(store.get_block(38, y0 + 1, 38), block::OAK_LOG);
    }

    #[test]
    fn path_runs_between_center_and_building_and_lamp_sits_at_its_midpoint() {
        let mut store = loaded_store_around((40, 40));
        let midpoint = stamp_path(&mut store, (40, 40), (40, 55));
        assert_eq!(midpoint, (40, 48));
        let y = store.surface_height(40, 48);
        assert_eq!(store.get_block(40, y, 48), block::GRAVEL);

        stamp_lamp(&mut store, midpoint);
        let ly = store.surface_height(midpoint.0, midpoint.1) + 1;
        assert_eq!(store.get_block(midpoint.0, ly, midpoint.1), block::OAK_LOG);
        assert_eq!(store.get_block(midpoint.0, ly + 3, midpoint.1), block::GLASS);
    }

    #[test]
    fn bresenham_line_reaches_both_endpoints() {
        let line = bresenham_line((0, 0), (5, 3));
        assert_eq!(line.first(), Some(&(0, 0)));
        assert_eq!(line.last(), Some(&(5, 3)));
    }

    #[test]
    fn stamping_is_deterministic_for_same_rng_seed() {
        let mut store_a = loaded_store_around((40, 40));
        let mut store_b = loaded_store_around((40, 40));
        stamp_village(&mut store_a, (40, 40), &mut StdRng::seed_from_u64(3));
        stamp_village(&mut store_b, (40, 40), &mut StdRng::seed_from_u64(3));
        for pos in footprint_chunks((40, 40)) {
            let (ca, cb) = (store_a.get_chunk(pos), store_b.get_chunk(pos));
            assert_eq!(ca.is_some(), cb.is_some());
        }
    }
}
