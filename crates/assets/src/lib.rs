#![warn(missing_docs)]
//! Procedural placeholder texture atlas: no art pipeline, no disk I/O, one
//! deterministically generated tile per block id.

mod atlas;

pub use atlas::{AtlasError, TextureAtlas, ROWS, TILES_PER_ROW, TILE_SIZE};
