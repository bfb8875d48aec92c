use serde::{Deserialize, Serialize};

/// Errors from viewport construction.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ViewportError {
    #[error("viewport dimensions must be positive and finite, got {width}x{height}")]
    InvalidSize { width: f64, height: f64 },
    #[error("device pixel ratio must be positive and finite, got {0}")]
    InvalidPixelRatio(f64),
}

/// Visible area of the host window in logical (CSS-style) pixels, plus the
/// ratio between physical and logical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    width: f64,
    height: f64,
    device_pixel_ratio: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64, device_pixel_ratio: f64) -> Result<Self, ViewportError> {
        let valid = |v: f64| v.is_finite() && v > 0.0;
        if !valid(width) || !valid(height) {
            return Err(ViewportError::InvalidSize { width, height });
        }
        if !valid(device_pixel_ratio) {
            return Err(ViewportError::InvalidPixelRatio(device_pixel_ratio));
        }
        Ok(Self {
            width,
            height,
            device_pixel_ratio,
        })
    }

    /// Build from a physical pixel size and the scale factor reported by the
    /// window system.
    pub fn from_physical(width: u32, height: u32, scale_factor: f64) -> Result<Self, ViewportError> {
        if !(scale_factor.is_finite() && scale_factor > 0.0) {
            return Err(ViewportError::InvalidPixelRatio(scale_factor));
        }
        Self::new(
            width as f64 / scale_factor,
            height as f64 / scale_factor,
            scale_factor,
        )
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn device_pixel_ratio(&self) -> f64 {
        self.device_pixel_ratio
    }

    /// Width over height of the logical viewport.
    pub fn aspect(&self) -> f32 {
        (self.width / self.height) as f32
    }

    /// Backing resolution: logical size scaled by the pixel ratio.
    pub fn surface_size(&self) -> SurfaceSize {
        let scale = |v: f64| ((v * self.device_pixel_ratio).round() as u32).max(1);
        SurfaceSize {
            width: scale(self.width),
            height: scale(self.height),
        }
    }
}

/// Backing resolution of a render surface, in physical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SurfaceSize {
    pub width: u32,
    pub height: u32,
}

impl SurfaceSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
        }
    }
}

impl std::fmt::Display for SurfaceSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}
