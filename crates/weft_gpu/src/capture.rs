//! Offscreen frame chain for the post-process passes
//!
//! The mesh pass renders into an offscreen target; the glass pass samples
//! that capture while writing the next, and the grain pass ping-pongs the
//! other way. Textures are allocated lazily once and resized in place
//! (never reallocated per frame) to bound allocation churn. The texture
//! holding the final composited frame is retained between frames so export
//! always has pixels to read.

/// One offscreen color target
pub struct FrameTarget {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
}

/// Two ping-pong frame textures plus the sampler the passes read with
pub struct FrameCapture {
    targets: [FrameTarget; 2],
    width: u32,
    height: u32,
    format: wgpu::TextureFormat,
    sampler: wgpu::Sampler,
}

impl FrameCapture {
    pub fn new(device: &wgpu::Device, width: u32, height: u32, format: wgpu::TextureFormat) -> Self {
        let targets = [
            Self::create_target(device, width, height, format, 0),
            Self::create_target(device, width, height, format, 1),
        ];

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Frame Capture Sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        Self {
            targets,
            width,
            height,
            format,
            sampler,
        }
    }

    fn create_target(
        device: &wgpu::Device,
        width: u32,
        height: u32,
        format: wgpu::TextureFormat,
        index: usize,
    ) -> FrameTarget {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(&format!("Frame Target {}", index)),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT
                | wgpu::TextureUsages::TEXTURE_BINDING
                | wgpu::TextureUsages::COPY_SRC,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        FrameTarget { texture, view }
    }

    /// Resize in place; a no-op when the size is unchanged
    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        if self.width == width && self.height == height {
            return;
        }
        self.width = width;
        self.height = height;
        self.targets = [
            Self::create_target(device, width, height, self.format, 0),
            Self::create_target(device, width, height, self.format, 1),
        ];
    }

    pub fn target(&self, index: usize) -> &FrameTarget {
        &self.targets[index]
    }

    pub fn sampler(&self) -> &wgpu::Sampler {
        &self.sampler
    }

    pub fn format(&self) -> wgpu::TextureFormat {
        self.format
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}
