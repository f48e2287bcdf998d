//! Window size state shared by the camera and the renderer.

/// Device pixel ratios above this are not rendered at full density.
pub const MAX_PIXEL_RATIO: f64 = 2.0;

/// Logical output size plus the device scale factor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    width: u32,
    height: u32,
    scale_factor: f64,
}

impl Viewport {
    pub fn new(width: u32, height: u32, scale_factor: f64) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
            scale_factor: if scale_factor > 0.0 { scale_factor } else { 1.0 },
        }
    }

    /// Build from a physical window size as reported by winit.
    pub fn from_physical(width: u32, height: u32, scale_factor: f64) -> Self {
        let scale = if scale_factor > 0.0 { scale_factor } else { 1.0 };
        Self::new(
            (width as f64 / scale).round() as u32,
            (height as f64 / scale).round() as u32,
            scale,
        )
    }

    /// Apply a resize. Zero-sized requests (minimized windows) are ignored
    /// and reported as `false`.
    pub fn resize(&mut self, width: u32, height: u32, scale_factor: f64) -> bool {
        if width == 0 || height == 0 {
            return false;
        }
        *self = Self::new(width, height, scale_factor);
        true
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn scale_factor(&self) -> f64 {
        self.scale_factor
    }

    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    /// Scale factor capped at [`MAX_PIXEL_RATIO`].
    pub fn pixel_ratio(&self) -> f64 {
        self.scale_factor.min(MAX_PIXEL_RATIO)
    }

    /// Logical renderer output size.
    pub fn output_size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Size of the backing render target in pixels.
    pub fn drawing_buffer_size(&self) -> (u32, u32) {
        let ratio = self.pixel_ratio();
        (
            ((self.width as f64 * ratio).round() as u32).max(1),
            ((self.height as f64 * ratio).round() as u32).max(1),
        )
    }

    /// Surface pixels per drawing-buffer pixel for a surface `surface_height`
    /// pixels tall. Above the pixel-ratio cap the window has more physical
    /// pixels than the drawing buffer, and fixed-size points grow to match.
    pub fn pixel_scale(&self, surface_height: u32) -> f32 {
        let (_, buffer_height) = self.drawing_buffer_size();
        surface_height.max(1) as f32 / buffer_height as f32
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280, 720, 1.0)
    }
}
