//! Multisampled color target for the scene pass.
//!
//! The scene draws into a multisampled texture that resolves into the surface
//! texture at the end of the pass. Overlays drawn afterwards target the
//! resolved surface directly.

/// Sample count requested when the config does not say otherwise.
pub const DEFAULT_SAMPLE_COUNT: u32 = 4;

/// Pipeline multisample state for `sample_count` samples per pixel.
pub fn multisample_state(sample_count: u32) -> wgpu::MultisampleState {
    wgpu::MultisampleState {
        count: sample_count.max(1),
        mask: !0,
        alpha_to_coverage_enabled: false,
    }
}

/// Multisampled color attachment sized to the surface.
pub struct MsaaTarget {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    format: wgpu::TextureFormat,
    sample_count: u32,
    width: u32,
    height: u32,
}

impl MsaaTarget {
    /// `None` when `sample_count` is 1, in which case the scene renders
    /// straight into the surface.
    pub fn new(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        width: u32,
        height: u32,
        sample_count: u32,
    ) -> Option<Self> {
        if sample_count <= 1 {
            return None;
        }
        let width = width.max(1);
        let height = height.max(1);
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("msaa-color"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        Some(Self {
            texture,
            view,
            format,
            sample_count,
            width,
            height,
        })
    }

    /// Recreate the texture for a new surface size. No-op if unchanged.
    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        if self.width == width.max(1) && self.height == height.max(1) {
            return;
        }
        if let Some(target) = Self::new(device, self.format, width, height, self.sample_count) {
            *self = target;
        }
    }

    pub fn sample_count(&self) -> u32 {
        self.sample_count
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }
}
