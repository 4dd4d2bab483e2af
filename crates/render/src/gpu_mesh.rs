use wgpu::util::DeviceExt;
use crate::mesh::MeshBuffers;

/// GPU-side representation of a chunk mesh.
pub struct GpuMesh {
    /// Vertex buffer on GPU.
    pub vertex_buffer: wgpu::Buffer,
    /// Index buffer on GPU.
    pub index_buffer: wgpu::Buffer,
    /// Number of indices to draw.
    pub index_count: u32,
    /// Bind group for chunk-specific uniforms.
    pub bind_group: wgpu::BindGroup,
}

impl GpuMesh {
    /// Upload one mesh stream (opaque, water, or glass) to the GPU. Returns
    /// `None` for an empty stream — chunks with no water in them, say,
    /// should not submit a draw call for an empty water buffer.
    pub fn from_mesh_buffers(
        device: &wgpu::Device,
        mesh: &MeshBuffers,
        chunk_offset: [f32; 3],
        chunk_bind_group_layout: &wgpu::BindGroupLayout,
    ) -> Option<Self> {
        if mesh.indices.is_empty() {
            return None;
        }

        let vertex_data = bytemuck::cast_slice(&mesh.vertices);
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Chunk Vertex Buffer"),
            contents: vertex_data,
            usage: wgpu::BufferUsages::VERTEX,
        });

        let index_data = bytemuck::cast_slice(&mesh.indices);
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Chunk Index Buffer"),
            contents: index_data,
            usage: wgpu::BufferUsages::INDEX,
        });

        // Create chunk uniform buffer
        let chunk_uniforms = crate::pipeline::ChunkUniforms {
            offset: chunk_offset,
            _padding: 0.0,
        };
        let chunk_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Chunk Uniform Buffer"),
            contents: bytemuck::cast_slice(&[chunk_uniforms]),
            usage: wgpu::BufferUsages::UNIFORM,
        });

        // Create bind group for this chunk
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Chunk Bind Group"),
            layout: chunk_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: chunk_buffer.as_entire_binding(),
            }],
        });

        Some(Self {
            vertex_buffer,
            index_buffer,
            index_count: mesh.indices.len() as u32,
            bind_group,
        })
    }
}

/// The up-to-three GPU meshes backing one loaded chunk's draw calls.
pub struct ChunkGpuMeshes {
    /// Opaque-stream draw data, if the chunk has any opaque faces.
    pub opaque: Option<GpuMesh>,
    /// Water-stream draw data.
    pub water: Option<GpuMesh>,
    /// Glass-stream draw data.
    pub glass: Option<GpuMesh>,
}

impl ChunkGpuMeshes {
    /// Upload all three streams of a [`crate::mesh::ChunkMeshes`] at once.
    pub fn upload(
        device: &wgpu::Device,
        meshes: &crate::mesh::ChunkMeshes,
        chunk_offset: [f32; 3],
        chunk_bind_group_layout: &wgpu::BindGroupLayout,
    ) -> Self {
        Self {
            opaque: GpuMesh::from_mesh_buffers(device, &meshes.opaque, chunk_offset, chunk_bind_group_layout),
            water: GpuMesh::from_mesh_buffers(device, &meshes.water, chunk_offset, chunk_bind_group_layout),
            glass: GpuMesh::from_mesh_buffers(device, &meshes.glass, chunk_offset, chunk_bind_group_layout),
        }
    }
}
