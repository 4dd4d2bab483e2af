#![warn(missing_docs)]
//! wgpu rendering: per-face chunk meshing, GPU upload, and the pipeline
//! that draws the three mesh streams (opaque, water, glass).

mod chunk_manager;
mod driver;
mod gpu_mesh;
mod mesh;
mod pipeline;
mod texture_atlas;
mod window;

pub use chunk_manager::{ChunkManager, Frustum};
pub use driver::remesh_dirty_chunks;
pub use gpu_mesh::{ChunkGpuMeshes, GpuMesh};
pub use mesh::{mesh_chunk, ChunkMeshes, MeshBuffers, MeshHash, MeshVertex};
pub use pipeline::{CameraUniform, ChunkUniforms, RenderCategory, RenderContext, VoxelPipeline};
pub use texture_atlas::GpuAtlas;
pub use window::{WindowConfig, WindowManager};
