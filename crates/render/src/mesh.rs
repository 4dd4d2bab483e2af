//! Per-face chunk mesher: unlike a greedy mesher, every visible face becomes
//! its own quad so each of its four corners can carry its own per-vertex
//! ambient occlusion term. Produces three independent streams — opaque,
//! water, glass — so the renderer can draw them with different blend
//! states.

use blake3::Hasher;

use voxelcraft_assets::TextureAtlas;
use voxelcraft_core::{block, BlockId, Face};
use voxelcraft_world::{ChunkPos, ChunkStore, CHUNK_SIZE_X, CHUNK_SIZE_Y, CHUNK_SIZE_Z};

/// Packed vertex layout produced by the mesher.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MeshVertex {
    /// Position in chunk-local coordinates.
    pub position: [f32; 3],
    /// Face normal (unit length).
    pub normal: [f32; 3],
    /// Atlas UV coordinate.
    pub uv: [f32; 2],
    /// Combined ambient-occlusion x face-direction shade, applied as a
    /// multiplicative tint on the sampled texture color.
    pub shade: f32,
}

/// Hash of a stream's combined vertex/index buffers, used to skip
/// re-uploading a chunk's mesh to the GPU when nothing changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeshHash(pub [u8; 32]);

/// One mesh stream: a vertex/index buffer pair plus its content hash.
#[derive(Debug, Clone)]
pub struct MeshBuffers {
    /// Vertex buffer used for draw submission.
    pub vertices: Vec<MeshVertex>,
    /// Index buffer (triangle list) referencing the vertex buffer.
    pub indices: Vec<u32>,
    /// Stable hash of the vertex + index buffers for cache comparisons.
    pub hash: MeshHash,
}

impl MeshBuffers {
    /// An empty stream.
    pub fn empty() -> Self {
        Self { vertices: Vec::new(), indices: Vec::new(), hash: MeshHash([0; 32]) }
    }
}

/// The three mesh streams produced for a single chunk.
#[derive(Debug, Clone)]
pub struct ChunkMeshes {
    /// Fully opaque blocks: depth-tested, no blending.
    pub opaque: MeshBuffers,
    /// Water surfaces: alpha-blended.
    pub water: MeshBuffers,
    /// Glass and leaves: alpha-blended, double-sided.
    pub glass: MeshBuffers,
}

/// Mesh the chunk at `pos`. Neighbor lookups cross chunk boundaries through
/// `store` directly (an unloaded neighbor reads as air), so chunks at the
/// edge of the loaded area never grow a phantom face where a neighbor will
/// appear later — they just re-mesh once that neighbor loads and dirties
/// them.
pub fn mesh_chunk(store: &ChunkStore, pos: ChunkPos, atlas: &TextureAtlas) -> ChunkMeshes {
    let mut opaque = MeshBuilder::default();
    let mut water = MeshBuilder::default();
    let mut glass = MeshBuilder::default();

    let (ox, oz) = pos.origin();

    for lx in 0..CHUNK_SIZE_X as i32 {
        for ly in 0..CHUNK_SIZE_Y as i32 {
            for lz in 0..CHUNK_SIZE_Z as i32 {
                let wx = ox + lx;
                let wz = oz + lz;
                let id = store.get_block(wx, ly, wz);
                if id == block::AIR {
                    continue;
                }

                for &face in &Face::ALL {
                    let [nx, ny, nz] = face.normal();
                    let neighbor = store.get_block(wx + nx, ly + ny, wz + nz);
                    if !should_render_face(id, neighbor) {
                        continue;
                    }

                    let (builder, skip_ao) = if id == block::WATER {
                        (&mut water, true)
                    } else if block::is_transparent(id) {
                        (&mut glass, true)
                    } else {
                        (&mut opaque, false)
                    };
                    builder.push_face(
                        store,
                        id,
                        face,
                        [wx, ly, wz],
                        [lx as f32, ly as f32, lz as f32],
                        atlas,
                        skip_ao,
                    );
                }
            }
        }
    }

    ChunkMeshes { opaque: opaque.finish(), water: water.finish(), glass: glass.finish() }
}

/// Whether the face between `id` and `neighbor` should be emitted.
///
/// Any pair of identical block ids hides their shared face (this is what
/// lets two adjacent water or glass cubes merge into one surface instead of
/// rendering a visible seam); otherwise a fully opaque neighbor occludes
/// the face outright.
fn should_render_face(id: BlockId, neighbor: BlockId) -> bool {
    if neighbor == id {
        return false;
    }
    let nf = block::flags_of(neighbor);
    !(nf.solid && !nf.transparent)
}

#[derive(Default)]
struct MeshBuilder {
    vertices: Vec<MeshVertex>,
    indices: Vec<u32>,
}

impl MeshBuilder {
    fn push_face(
        &mut self,
        store: &ChunkStore,
        id: BlockId,
        face: Face,
        world: [i32; 3],
        local: [f32; 3],
        atlas: &TextureAtlas,
        skip_ao: bool,
    ) {
        let axis = axis_of(face);
        let u_axis = (axis + 1) % 3;
        let v_axis = (axis + 2) % 3;
        let [nx, ny, nz] = face.normal();
        let normal = [nx as f32, ny as f32, nz as f32];

        let mut face_origin = local;
        if face.is_positive() {
            face_origin[axis] += 1.0;
        }

        let corner_signs = [(-1, -1), (1, -1), (1, 1), (-1, 1)];
        let mut corners = [[0f32; 3]; 4];
        let mut shades = [0f32; 4];

        for (i, &(su, sv)) in corner_signs.iter().enumerate() {
            let mut corner = face_origin;
            corner[u_axis] += if su > 0 { 1.0 } else { 0.0 };
            corner[v_axis] += if sv > 0 { 1.0 } else { 0.0 };
            corners[i] = corner;

            let ao = if skip_ao {
                3
            } else {
                corner_ao(store, world, [nx, ny, nz], u_axis, v_axis, su, sv)
            };
            shades[i] = ao_shade(ao) * face.direction_term();
        }

        let uv_rect = atlas.uv_rect(id).unwrap_or([0.0, 0.0, 1.0, 1.0]);
        let uvs = [
            [uv_rect[0], uv_rect[3]],
            [uv_rect[2], uv_rect[3]],
            [uv_rect[2], uv_rect[1]],
            [uv_rect[0], uv_rect[1]],
        ];

        let base = self.vertices.len() as u32;
        for i in 0..4 {
            self.vertices.push(MeshVertex {
                position: corners[i],
                normal,
                uv: uvs[i],
                shade: shades[i],
            });
        }

        // Flip the diagonal when it reduces AO interpolation error across
        // the quad, the standard fix for the "wrong diagonal" artifact.
        let flip = shades[0] + shades[2] < shades[1] + shades[3];
        let winding: [u32; 6] = if face.is_positive() {
            if flip { [1, 2, 3, 1, 3, 0] } else { [0, 1, 2, 0, 2, 3] }
        } else if flip {
            [3, 2, 1, 3, 1, 0]
        } else {
            [2, 1, 0, 3, 2, 0]
        };
        for idx in winding {
            self.indices.push(base + idx);
        }
    }

    fn finish(self) -> MeshBuffers {
        let MeshBuilder { vertices, indices } = self;
        let mut hasher = Hasher::new();
        for vertex in &vertices {
            hasher.update(bytemuck::cast_slice(&vertex.position));
            hasher.update(bytemuck::cast_slice(&vertex.normal));
            hasher.update(bytemuck::cast_slice(&vertex.uv));
            hasher.update(&vertex.shade.to_le_bytes());
        }
        hasher.update(bytemuck::cast_slice(&indices));
        MeshBuffers { vertices, indices, hash: MeshHash(*hasher.finalize().as_bytes()) }
    }
}

fn axis_of(face: Face) -> usize {
    match face {
        Face::PosX | Face::NegX => 0,
        Face::PosY | Face::NegY => 1,
        Face::PosZ | Face::NegZ => 2,
    }
}

/// `ao = 3 - (side1 + side2 + corner)`, each term 1 if that neighbor cell is
/// solid, 0 otherwise; if both edge-adjacent sides are solid the corner is
/// fully occluded regardless of the diagonal, so `ao = 0`.
fn corner_ao(
    store: &ChunkStore,
    world: [i32; 3],
    normal: [i32; 3],
    u_axis: usize,
    v_axis: usize,
    su: i32,
    sv: i32,
) -> i32 {
    let mut u_offset = [0i32; 3];
    u_offset[u_axis] = su;
    let mut v_offset = [0i32; 3];
    v_offset[v_axis] = sv;

    let side1 = offset_solid(store, world, add3(normal, u_offset));
    let side2 = offset_solid(store, world, add3(normal, v_offset));
    if side1 == 1 && side2 == 1 {
        return 0;
    }
    let corner = offset_solid(store, world, add3(add3(normal, u_offset), v_offset));
    3 - (side1 + side2 + corner)
}

fn offset_solid(store: &ChunkStore, world: [i32; 3], offset: [i32; 3]) -> i32 {
    let p = add3(world, offset);
    store.is_solid(p[0], p[1], p[2]) as i32
}

fn add3(a: [i32; 3], b: [i32; 3]) -> [i32; 3] {
    [a[0] + b[0], a[1] + b[1], a[2] + b[2]]
}

fn ao_shade(ao: i32) -> f32 {
    (ao.clamp(0, 3) as f32 + 1.0) / 4.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with(blocks: &[(i32, i32, i32, BlockId)]) -> ChunkStore {
        let mut store = ChunkStore::new(1);
        store.generate_or_get(ChunkPos::new(0, 0));
        for y in 0..CHUNK_SIZE_Y as i32 {
            for x in 0..CHUNK_SIZE_X as i32 {
                for z in 0..CHUNK_SIZE_Z as i32 {
                    store.set_block(x, y, z, block::AIR);
                }
            }
        }
        for &(x, y, z, id) in blocks {
            store.set_block(x, y, z, id);
        }
        store
    }

    #[test]
    fn isolated_opaque_cube_has_six_quads() {
        let store = store_with(&[(5, 10, 5, block::STONE)]);
        let atlas = TextureAtlas::generate();
        let mesh = mesh_chunk(&store, ChunkPos::new(0, 0), &atlas);
        assert_eq!(mesh.opaque.indices.len(), 6 * 6);
        assert_eq!(mesh.opaque.vertices.len(), 6 * 4);
    }

    #[test]
    fn isolated_leaves_cube_has_six_quads_in_glass_stream() {
        let store = store_with(&[(5, 10, 5, block::OAK_LEAVES)]);
        let atlas = TextureAtlas::generate();
        let mesh = mesh_chunk(&store, ChunkPos::new(0, 0), &atlas);
        assert_eq!(mesh.glass.indices.len(), 6 * 6);
        assert!(mesh.opaque.indices.is_empty());
    }

    #[test]
    fn two_adjacent_opaque_cubes_hide_their_shared_face() {
        let store = store_with(&[(5, 10, 5, block::STONE), (6, 10, 5, block::STONE)]);
        let atlas = TextureAtlas::generate();
        let mesh = mesh_chunk(&store, ChunkPos::new(0, 0), &atlas);
        assert_eq!(mesh.opaque.indices.len(), 10 * 6);
    }

    #[test]
    fn two_adjacent_glass_cubes_hide_their_shared_face() {
        let store = store_with(&[(5, 10, 5, block::GLASS), (6, 10, 5, block::GLASS)]);
        let atlas = TextureAtlas::generate();
        let mesh = mesh_chunk(&store, ChunkPos::new(0, 0), &atlas);
        assert_eq!(mesh.glass.indices.len(), 10 * 6);
    }

    #[test]
    fn adjacent_glass_and_water_both_render_their_shared_face() {
        let store = store_with(&[(5, 10, 5, block::GLASS), (6, 10, 5, block::WATER)]);
        let atlas = TextureAtlas::generate();
        let mesh = mesh_chunk(&store, ChunkPos::new(0, 0), &atlas);
        assert_eq!(mesh.glass.indices.len(), 6 * 6);
        assert_eq!(mesh.water.indices.len(), 6 * 6);
    }

    #[test]
    fn mesh_hash_changes_when_a_voxel_changes() {
        let mut store = store_with(&[(5, 10, 5, block::STONE)]);
        let atlas = TextureAtlas::generate();
        let before = mesh_chunk(&store, ChunkPos::new(0, 0), &atlas);
        store.set_block(5, 10, 5, block::AIR);
        let after = mesh_chunk(&store, ChunkPos::new(0, 0), &atlas);
        assert_ne!(before.opaque.hash, after.opaque.hash);
    }
}
