//! Chunk storage, procedural terrain, structure placement, and player block
//! interaction — the deterministic simulation core. Nothing in this crate
//! touches rendering or windowing; it is pure data plus pure functions of
//! `(world_seed, coordinate)`.

pub mod chunk;
pub mod interaction;
pub mod noise;
pub mod storage;
pub mod structures;
pub mod terrain;
pub mod trees;
pub mod village;
pub mod worldloop;

pub use chunk::{Chunk, ChunkPos, CHUNK_SIZE_X, CHUNK_SIZE_Y, CHUNK_SIZE_Z, CHUNK_VOLUME};
pub use interaction::{raycast, InteractionState, RaycastHit};
pub use noise::Noise;
pub use storage::ChunkStore;
pub use structures::{anchor_for_cell, cell_of, SPAWN_VILLAGE_ANCHOR};
pub use terrain::{BiomeFlags, TerrainGenerator};
pub use worldloop::{WorldLoop, LOAD_RADIUS};
