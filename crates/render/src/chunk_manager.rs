//! Per-chunk GPU mesh bookkeeping and frustum culling.

use std::collections::HashMap;

use voxelcraft_world::{ChunkPos, CHUNK_SIZE_X, CHUNK_SIZE_Y, CHUNK_SIZE_Z};

use crate::gpu_mesh::ChunkGpuMeshes;

/// Tracks the GPU meshes currently uploaded for every loaded chunk.
pub struct ChunkManager {
    chunks: HashMap<ChunkPos, ChunkGpuMeshes>,
}

impl ChunkManager {
    /// Create a new empty chunk manager.
    pub fn new() -> Self {
        Self { chunks: HashMap::new() }
    }

    /// Replace (or insert) a chunk's GPU meshes.
    pub fn insert(&mut self, chunk_pos: ChunkPos, meshes: ChunkGpuMeshes) {
        self.chunks.insert(chunk_pos, meshes);
    }

    /// Drop a chunk's GPU meshes, e.g. once it unloads.
    pub fn remove(&mut self, chunk_pos: &ChunkPos) -> bool {
        self.chunks.remove(chunk_pos).is_some()
    }

    /// Iterate every loaded chunk's GPU meshes alongside its position.
    pub fn iter(&self) -> impl Iterator<Item = (&ChunkPos, &ChunkGpuMeshes)> {
        self.chunks.iter()
    }

    /// Number of chunks currently tracked.
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Drop every tracked chunk.
    pub fn clear(&mut self) {
        self.chunks.clear();
    }
}

impl Default for ChunkManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Frustum culling helper: six planes extracted from a view-projection
/// matrix via the Gribb-Hartmann method.
pub struct Frustum {
    planes: [glam::Vec4; 6],
}

impl Frustum {
    /// Build a frustum from a camera's combined view-projection matrix.
    pub fn from_matrix(vp_matrix: &glam::Mat4) -> Self {
        let m = vp_matrix.to_cols_array();

        let left = glam::Vec4::new(m[3] + m[0], m[7] + m[4], m[11] + m[8], m[15] + m[12]).normalize();
        let right = glam::Vec4::new(m[3] - m[0], m[7] - m[4], m[11] - m[8], m[15] - m[12]).normalize();
        let bottom = glam::Vec4::new(m[3] + m[1], m[7] + m[5], m[11] + m[9], m[15] + m[13]).normalize();
        let top = glam::Vec4::new(m[3] - m[1], m[7] - m[5], m[11] - m[9], m[15] - m[13]).normalize();
        let near = glam::Vec4::new(m[3] + m[2], m[7] + m[6], m[11] + m[10], m[15] + m[14]).normalize();
        let far = glam::Vec4::new(m[3] - m[2], m[7] - m[6], m[11] - m[10], m[15] - m[14]).normalize();

        Self { planes: [left, right, bottom, top, near, far] }
    }

    /// Whether a chunk's bounding box intersects or lies inside the frustum.
    pub fn is_chunk_visible(&self, chunk_pos: ChunkPos) -> bool {
        let (ox, oz) = chunk_pos.origin();
        let min = glam::Vec3::new(ox as f32, 0.0, oz as f32);
        let max = glam::Vec3::new(
            min.x + CHUNK_SIZE_X as f32,
            CHUNK_SIZE_Y as f32,
            min.z + CHUNK_SIZE_Z as f32,
        );

        for plane in &self.planes {
            let normal = plane.truncate();
            let d = plane.w;
            let p = glam::Vec3::new(
                if normal.x >= 0.0 { max.x } else { min.x },
                if normal.y >= 0.0 { max.y } else { min.y },
                if normal.z >= 0.0 { max.z } else { min.z },
            );
            if normal.dot(p) + d < 0.0 {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_manager_has_no_chunks() {
        let manager = ChunkManager::new();
        assert_eq!(manager.chunk_count(), 0);
    }

    #[test]
    fn identity_frustum_contains_the_origin_chunk() {
        let frustum = Frustum::from_matrix(&glam::Mat4::IDENTITY);
        assert!(frustum.is_chunk_visible(ChunkPos::new(0, 0)));
    }
}
