//! Reverse-Z depth buffer.
//!
//! The near plane maps to 1.0 and the far plane to 0.0. With stars a thousand
//! units out and the camera a few hundred from the planet, the float precision
//! near zero keeps the distant shell from z-fighting.

/// Depth attachment sized to the surface.
pub struct DepthBuffer {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    sample_count: u32,
    width: u32,
    height: u32,
}

impl DepthBuffer {
    pub const FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

    /// Far plane under reverse-Z.
    pub const CLEAR_VALUE: f32 = 0.0;

    /// Closer fragments carry larger depth values.
    pub const COMPARE_FUNCTION: wgpu::CompareFunction = wgpu::CompareFunction::GreaterEqual;

    pub fn new(device: &wgpu::Device, width: u32, height: u32) -> Self {
        Self::multisampled(device, width, height, 1)
    }

    /// Depth buffer matching a color target with `sample_count` samples.
    pub fn multisampled(
        device: &wgpu::Device,
        width: u32,
        height: u32,
        sample_count: u32,
    ) -> Self {
        let sample_count = sample_count.max(1);
        let width = width.max(1);
        let height = height.max(1);
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("depth-buffer"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count,
            dimension: wgpu::TextureDimension::D2,
            format: Self::FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        Self {
            texture,
            view,
            sample_count,
            width,
            height,
        }
    }

    /// Recreate the texture for a new surface size. No-op if unchanged.
    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        if self.width == width.max(1) && self.height == height.max(1) {
            return;
        }
        *self = Self::multisampled(device, width, height, self.sample_count);
    }

    /// Depth-stencil state for a pipeline that tests against this buffer.
    pub fn stencil_state(depth_write: bool) -> wgpu::DepthStencilState {
        wgpu::DepthStencilState {
            format: Self::FORMAT,
            depth_write_enabled: depth_write,
            depth_compare: Self::COMPARE_FUNCTION,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
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

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_device() -> Option<wgpu::Device> {
        // None on headless CI
        pollster::block_on(async {
            let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
                backends: wgpu::Backends::all(),
                ..Default::default()
            });
            let adapter = instance
                .request_adapter(&wgpu::RequestAdapterOptions::default())
                .await
                .ok()?;
            let (device, _queue) = adapter
                .request_device(&wgpu::DeviceDescriptor::default())
                .await
                .ok()?;
            Some(device)
        })
    }

    #[test]
    fn test_reverse_z_constants() {
        assert_eq!(DepthBuffer::FORMAT, wgpu::TextureFormat::Depth32Float);
        assert_eq!(DepthBuffer::CLEAR_VALUE, 0.0);
        assert_eq!(
            DepthBuffer::COMPARE_FUNCTION,
            wgpu::CompareFunction::GreaterEqual
        );
    }

    #[test]
    fn test_stencil_state_respects_depth_write() {
        assert!(DepthBuffer::stencil_state(true).depth_write_enabled);
        let state = DepthBuffer::stencil_state(false);
        assert!(!state.depth_write_enabled);
        assert_eq!(state.depth_compare, DepthBuffer::COMPARE_FUNCTION);
    }

    #[test]
    fn test_resize_updates_dimensions() {
        let Some(device) = create_test_device() else {
            return;
        };
        let mut depth = DepthBuffer::new(&device, 800, 600);
        depth.resize(&device, 1920, 1080);
        assert_eq!(depth.width(), 1920);
        assert_eq!(depth.height(), 1080);
    }

    #[test]
    fn test_resize_keeps_sample_count() {
        let Some(device) = create_test_device() else {
            return;
        };
        let mut depth = DepthBuffer::multisampled(&device, 320, 240, 4);
        depth.resize(&device, 640, 480);
        assert_eq!(depth.sample_count(), 4);
        assert_eq!(depth.width(), 640);
    }

    #[test]
    fn test_zero_size_clamped() {
        let Some(device) = create_test_device() else {
            return;
        };
        let depth = DepthBuffer::new(&device, 0, 0);
        assert_eq!(depth.width(), 1);
        assert_eq!(depth.height(), 1);
    }
}
