//! Uploads the procedurally generated [`voxelcraft_assets::TextureAtlas`] to
//! the GPU. There is no disk I/O and nothing to fail: generation is pure and
//! total, so this module has no error type of its own.

use voxelcraft_assets::TextureAtlas;

/// The atlas texture, its view, and the sampler the chunk pipeline binds it
/// with.
pub struct GpuAtlas {
    /// Backing GPU texture.
    pub texture: wgpu::Texture,
    /// Shader resource view over the whole atlas.
    pub view: wgpu::TextureView,
    /// Nearest-neighbor sampler — voxel textures stay crisp, not blurred.
    pub sampler: wgpu::Sampler,
}

impl GpuAtlas {
    /// Generate the placeholder atlas and upload it as an `Rgba8UnormSrgb`
    /// texture.
    pub fn upload(device: &wgpu::Device, queue: &wgpu::Queue) -> Self {
        let atlas = TextureAtlas::generate();
        let size = wgpu::Extent3d {
            width: atlas.width(),
            height: atlas.height(),
            depth_or_array_layers: 1,
        };

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("block atlas"),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        let pixels: &[u8] = bytemuck::cast_slice(atlas.pixels());
        queue.write_texture(
            wgpu::ImageCopyTexture {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            pixels,
            wgpu::ImageDataLayout {
                offset: 0,
                bytes_per_row: Some(4 * atlas.width()),
                rows_per_image: Some(atlas.height()),
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("block atlas sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        Self { texture, view, sampler }
    }
}
