//! Window surface bookkeeping shared by the 3D view and the control overlay.
//!
//! The GPU surface wants physical pixels, the camera wants an aspect ratio and
//! the overlay wants a pixels-per-point factor. [`SurfaceWrapper`] keeps all
//! three consistent and never reports a zero dimension.

/// Smallest dimension ever handed to the GPU.
pub const MIN_SURFACE_DIMENSION: u32 = 1;

/// Physical pixel dimensions of a surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PhysicalSize {
    pub width: u32,
    pub height: u32,
}

impl PhysicalSize {
    /// Width divided by height. Both sides are at least 1, so this is finite.
    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height as f32
    }
}

/// Produced when the drawable size or scale factor changes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceResizeEvent {
    /// New physical dimensions, clamped to at least 1×1.
    pub physical: PhysicalSize,
    /// Physical pixels per logical point.
    pub scale_factor: f64,
}

/// Tracks the drawable size of the window.
///
/// Wayland reports 0×0 before the compositor assigns a size and minimizing on
/// Windows does the same; both are clamped so the surface stays configurable.
#[derive(Debug)]
pub struct SurfaceWrapper {
    physical_width: u32,
    physical_height: u32,
    scale_factor: f64,
    configured: bool,
}

impl SurfaceWrapper {
    /// Creates a wrapper from the window's initial inner size.
    pub fn new(physical_width: u32, physical_height: u32, scale_factor: f64) -> Self {
        Self {
            physical_width: physical_width.max(MIN_SURFACE_DIMENSION),
            physical_height: physical_height.max(MIN_SURFACE_DIMENSION),
            scale_factor,
            configured: physical_width > 0 && physical_height > 0,
        }
    }

    /// Records a resize. Returns `None` when the clamped size is unchanged.
    pub fn handle_resize(
        &mut self,
        physical_width: u32,
        physical_height: u32,
    ) -> Option<SurfaceResizeEvent> {
        let width = physical_width.max(MIN_SURFACE_DIMENSION);
        let height = physical_height.max(MIN_SURFACE_DIMENSION);

        if width == self.physical_width && height == self.physical_height {
            return None;
        }

        self.physical_width = width;
        self.physical_height = height;
        self.configured = true;

        Some(self.event())
    }

    /// Records a DPI change. Always produces an event since the overlay
    /// scale changes even when the pixel size does not.
    pub fn handle_scale_factor_changed(
        &mut self,
        new_scale_factor: f64,
        new_physical_width: u32,
        new_physical_height: u32,
    ) -> SurfaceResizeEvent {
        self.scale_factor = new_scale_factor;
        self.physical_width = new_physical_width.max(MIN_SURFACE_DIMENSION);
        self.physical_height = new_physical_height.max(MIN_SURFACE_DIMENSION);
        self.configured = true;
        self.event()
    }

    pub fn physical_size(&self) -> PhysicalSize {
        PhysicalSize {
            width: self.physical_width,
            height: self.physical_height,
        }
    }

    pub fn scale_factor(&self) -> f64 {
        self.scale_factor
    }

    /// Whether a real (non-zero) size has been seen at least once.
    pub fn is_configured(&self) -> bool {
        self.configured
    }

    fn event(&self) -> SurfaceResizeEvent {
        SurfaceResizeEvent {
            physical: self.physical_size(),
            scale_factor: self.scale_factor,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_size_is_clamped_and_unconfigured() {
        let wrapper = SurfaceWrapper::new(0, 0, 1.0);
        assert_eq!(
            wrapper.physical_size(),
            PhysicalSize {
                width: 1,
                height: 1
            }
        );
        assert!(!wrapper.is_configured());
    }

    #[test]
    fn test_first_real_resize_configures() {
        let mut wrapper = SurfaceWrapper::new(0, 0, 1.0);
        let event = wrapper.handle_resize(1920, 1080).unwrap();
        assert_eq!(event.physical.width, 1920);
        assert_eq!(event.physical.height, 1080);
        assert!(wrapper.is_configured());
    }

    #[test]
    fn test_no_event_on_same_dimensions() {
        let mut wrapper = SurfaceWrapper::new(800, 600, 1.0);
        assert!(wrapper.handle_resize(800, 600).is_none());
    }

    #[test]
    fn test_resize_to_zero_clamps_to_one() {
        let mut wrapper = SurfaceWrapper::new(800, 600, 1.0);
        let event = wrapper.handle_resize(0, 0).unwrap();
        assert_eq!(event.physical.width, 1);
        assert_eq!(event.physical.height, 1);
        assert!(event.physical.aspect_ratio().is_finite());
    }

    #[test]
    fn test_scale_factor_change_always_reports() {
        let mut wrapper = SurfaceWrapper::new(1920, 1080, 1.0);
        let event = wrapper.handle_scale_factor_changed(2.0, 1920, 1080);
        assert_eq!(event.scale_factor, 2.0);
        assert_eq!(wrapper.scale_factor(), 2.0);
    }

    #[test]
    fn test_aspect_ratio() {
        let size = PhysicalSize {
            width: 1600,
            height: 800,
        };
        assert_eq!(size.aspect_ratio(), 2.0);
    }
}
