use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Linear RGB color.
///
/// Hex values such as `0xd3e2e9` are authored in sRGB and converted to linear
/// on construction, so shading math can use the components directly.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const BLACK: Self = Self::linear(0.0, 0.0, 0.0);
    pub const WHITE: Self = Self::linear(1.0, 1.0, 1.0);

    pub const fn linear(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Build a color from a packed `0xRRGGBB` sRGB value.
    pub fn from_hex(hex: u32) -> Self {
        let channel = |shift: u32| srgb_to_linear(((hex >> shift) & 0xff) as f32 / 255.0);
        Self {
            r: channel(16),
            g: channel(8),
            b: channel(0),
        }
    }

    /// Pack back into `0xRRGGBB` sRGB.
    pub fn to_hex(self) -> u32 {
        let channel = |c: f32| (linear_to_srgb(c).clamp(0.0, 1.0) * 255.0).round() as u32;
        (channel(self.r) << 16) | (channel(self.g) << 8) | channel(self.b)
    }

    pub fn to_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }

    pub fn from_array(rgb: [f32; 3]) -> Self {
        Self::linear(rgb[0], rgb[1], rgb[2])
    }

    pub fn to_vec3(self) -> Vec3 {
        Vec3::new(self.r, self.g, self.b)
    }

    /// Clamp every component into `[0, 1]`.
    pub fn saturate(self) -> Self {
        Self::linear(
            self.r.clamp(0.0, 1.0),
            self.g.clamp(0.0, 1.0),
            self.b.clamp(0.0, 1.0),
        )
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

fn srgb_to_linear(c: f32) -> f32 {
    if c < 0.04045 {
        c * 0.0773993808
    } else {
        (c * 0.9478672986 + 0.0521327014).powf(2.4)
    }
}

fn linear_to_srgb(c: f32) -> f32 {
    if c < 0.0031308 {
        c * 12.92
    } else {
        1.055 * c.powf(0.41666) - 0.055
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn white_and_black_are_exact() {
        assert_eq!(Color::from_hex(0xffffff), Color::WHITE);
        assert_eq!(Color::from_hex(0x000000), Color::BLACK);
    }

    #[test]
    fn hex_survives_linear_conversion() {
        for hex in [0xd3e2e9, 0x856b38, 0x111111] {
            assert_eq!(Color::from_hex(hex).to_hex(), hex);
        }
    }

    #[test]
    fn mid_grey_is_darker_in_linear() {
        let c = Color::from_hex(0x808080);
        assert!(c.r < 0.5 && c.r > 0.2);
    }

    #[test]
    fn saturate_clamps() {
        let c = Color::linear(-1.0, 0.5, 3.0).saturate();
        assert_eq!(c, Color::linear(0.0, 0.5, 1.0));
    }
}
