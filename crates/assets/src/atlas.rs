//! Procedural placeholder texture atlas.
//!
//! There is no art pipeline: every block gets one deterministically
//! generated tile (a base color plus a small per-pixel speckle derived from
//! the block id) so the renderer always has *something* to sample, and the
//! same seed-free atlas is reproduced identically on every run.

use thiserror::Error;

use voxelcraft_core::block::{self, BlockId, PALETTE_LEN};

/// Tile edge length, in pixels.
pub const TILE_SIZE: u32 = 16;
/// Atlas grid width, in tiles. Chosen so every palette entry fits with room
/// to spare.
pub const TILES_PER_ROW: u32 = 8;
/// Atlas grid height, in tiles.
pub const ROWS: u32 = (PALETTE_LEN as u32 + TILES_PER_ROW - 1) / TILES_PER_ROW;

/// Errors that can occur while looking up atlas coordinates.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AtlasError {
    /// The requested block id has no tile (outside the closed palette).
    #[error("block id {0} has no atlas tile")]
    UnknownBlock(BlockId),
}

/// A procedurally generated RGBA8 texture atlas, one tile per block id.
#[derive(Debug, Clone)]
pub struct TextureAtlas {
    width: u32,
    height: u32,
    pixels: Vec<[u8; 4]>,
}

impl TextureAtlas {
    /// Generate the atlas. Deterministic: calling this twice produces byte-
    /// identical pixel data.
    pub fn generate() -> Self {
        let width = TILES_PER_ROW * TILE_SIZE;
        let height = ROWS * TILE_SIZE;
        let mut pixels = vec![[0u8, 0, 0, 255]; (width * height) as usize];

        for id in 0..PALETTE_LEN as BlockId {
            let (tile_x, tile_y) = tile_origin_pixels(id);
            let base = base_color(id);
            for py in 0..TILE_SIZE {
                for px in 0..TILE_SIZE {
                    let speckle = speckle(id, px, py);
                    let color = [
                        base[0].saturating_add(speckle),
                        base[1].saturating_add(speckle),
                        base[2].saturating_add(speckle),
                        if block::is_transparent(id) { 200 } else { 255 },
                    ];
                    let idx = ((tile_y + py) * width + (tile_x + px)) as usize;
                    pixels[idx] = color;
                }
            }
        }

        Self { width, height, pixels }
    }

    /// Atlas pixel width.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Atlas pixel height.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Flattened RGBA8 pixel buffer, row-major from the top-left.
    pub fn pixels(&self) -> &[[u8; 4]] {
        &self.pixels
    }

    /// Normalized `[u0, v0, u1, v1]` UV rect for `block_id`.
    pub fn uv_rect(&self, block_id: BlockId) -> Result<[f32; 4], AtlasError> {
        if block_id as usize >= PALETTE_LEN {
            return Err(AtlasError::UnknownBlock(block_id));
        }
        let (tile_x, tile_y) = tile_origin_pixels(block_id);
        let u0 = tile_x as f32 / self.width as f32;
        let v0 = tile_y as f32 / self.height as f32;
        let u1 = (tile_x + TILE_SIZE) as f32 / self.width as f32;
        let v1 = (tile_y + TILE_SIZE) as f32 / self.height as f32;
        Ok([u0, v0, u1, v1])
    }
}

fn tile_origin_pixels(block_id: BlockId) -> (u32, u32) {
    let index = block_id as u32;
    ((index % TILES_PER_ROW) * TILE_SIZE, (index / TILES_PER_ROW) * TILE_SIZE)
}

/// A small, hand-picked base color per palette entry so the placeholder
/// atlas is at least visually distinguishable block-to-block.
fn base_color(id: BlockId) -> [u8; 3] {
    match id {
        block::AIR => [0, 0, 0],
        block::GRASS => [86, 148, 58],
        block::DIRT => [121, 85, 58],
        block::STONE => [128, 128, 128],
        block::SAND => [219, 205, 144],
        block::WATER => [64, 110, 196],
        block::OAK_LOG => [102, 76, 43],
        block::OAK_LEAVES => [63, 122, 50],
        block::BEDROCK => [40, 40, 40],
        block::GRAVEL => [140, 135, 130],
        block::COAL_ORE => [60, 60, 65],
        block::IRON_ORE => [176, 145, 125],
        block::COBBLESTONE => [120, 120, 120],
        block::OAK_PLANKS => [164, 128, 78],
        block::SNOW => [240, 240, 245],
        block::GLASS => [200, 225, 230],
        block::BRICK => [150, 80, 65],
        _ => [255, 0, 255],
    }
}

/// Deterministic per-pixel brightness jitter in `[-10, 10]`, built from a
/// cheap integer hash rather than the world crate's simplex noise (the
/// atlas has no reason to depend on world generation).
fn speckle(id: BlockId, px: u32, py: u32) -> u8 {
    let mut h = id as u32;
    h = h.wrapping_mul(0x9E3779B1).wrapping_add(px);
    h = h.wrapping_mul(0x85EBCA6B).wrapping_add(py);
    h ^= h >> 13;
    ((h % 21) as u8).saturating_sub(10)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generate_is_deterministic() {
        let a = TextureAtlas::generate();
        let b = TextureAtlas::generate();
        assert_eq!(a.pixels(), b.pixels());
    }

    #[test]
    fn every_palette_entry_has_a_distinct_uv_rect() {
        let atlas = TextureAtlas::generate();
        let mut rects = Vec::new();
        for id in 0..PALETTE_LEN as BlockId {
            rects.push(atlas.uv_rect(id).unwrap());
        }
        for i in 0..rects.len() {
            for j in (i + 1)..rects.len() {
                assert_ne!(rects[i], rects[j]);
            }
        }
    }

    #[test]
    fn unknown_block_id_is_an_error() {
        let atlas = TextureAtlas::generate();
        assert_eq!(atlas.uv_rect(250), Err(AtlasError::UnknownBlock(250)));
    }

    #[test]
    fn atlas_dimensions_cover_every_tile() {
        let atlas = TextureAtlas::generate();
        assert_eq!(atlas.width(), TILES_PER_ROW * TILE_SIZE);
        assert_eq!(atlas.pixels().len(), (atlas.width() * atlas.height()) as usize);
    }
}
