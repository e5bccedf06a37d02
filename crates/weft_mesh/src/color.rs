//! Color types and sRGB transfer functions

use serde::{Deserialize, Serialize};

/// RGBA color with f32 components
///
/// Channels are nominally 0.0 to 1.0 but are not hard-clamped at the data
/// level; clamping happens at evaluation time in the shading pipeline.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[repr(C)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color {
        r: 1.0,
        g: 1.0,
        b: 1.0,
        a: 1.0,
    };
    pub const BLACK: Color = Color {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 1.0,
    };
    pub const TRANSPARENT: Color = Color {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 0.0,
    };

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Create from u8 components (0-255)
    pub fn from_rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
            a: a as f32 / 255.0,
        }
    }

    /// Create from hex value (0xRRGGBB or 0xRRGGBBAA)
    pub fn from_hex(hex: u32) -> Self {
        if hex > 0xFFFFFF {
            // 0xRRGGBBAA format
            Self::from_rgba8(
                ((hex >> 24) & 0xFF) as u8,
                ((hex >> 16) & 0xFF) as u8,
                ((hex >> 8) & 0xFF) as u8,
                (hex & 0xFF) as u8,
            )
        } else {
            // 0xRRGGBB format
            Self::from_rgba8(
                ((hex >> 16) & 0xFF) as u8,
                ((hex >> 8) & 0xFF) as u8,
                (hex & 0xFF) as u8,
                255,
            )
        }
    }

    /// Set alpha and return new color
    pub fn with_alpha(self, alpha: f32) -> Self {
        Self { a: alpha, ..self }
    }

    /// Clamp all channels to [0, 1]
    pub fn clamped(self) -> Self {
        Self {
            r: self.r.clamp(0.0, 1.0),
            g: self.g.clamp(0.0, 1.0),
            b: self.b.clamp(0.0, 1.0),
            a: self.a.clamp(0.0, 1.0),
        }
    }

    /// Convert to u8 array [r, g, b, a]
    pub fn to_rgba8(&self) -> [u8; 4] {
        [
            (self.r * 255.0) as u8,
            (self.g * 255.0) as u8,
            (self.b * 255.0) as u8,
            (self.a * 255.0) as u8,
        ]
    }

    /// Interpret RGB as display-encoded sRGB and decode to linear light.
    /// Alpha is passed through.
    pub fn to_linear(self) -> Self {
        Self {
            r: srgb_to_linear(self.r),
            g: srgb_to_linear(self.g),
            b: srgb_to_linear(self.b),
            a: self.a,
        }
    }

    /// Encode linear RGB back to display sRGB. Alpha is passed through.
    pub fn to_srgb(self) -> Self {
        Self {
            r: linear_to_srgb(self.r),
            g: linear_to_srgb(self.g),
            b: linear_to_srgb(self.b),
            a: self.a,
        }
    }
}

/// Standard piecewise sRGB decode: linear segment below 0.04045, power law above
#[inline]
pub fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// Standard piecewise sRGB encode: linear segment below 0.0031308, power law above
#[inline]
pub fn linear_to_srgb(c: f32) -> f32 {
    if c <= 0.0031308 {
        c * 12.92
    } else {
        1.055 * c.powf(1.0 / 2.4) - 0.055
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_hex_rgb() {
        let c = Color::from_hex(0xFF8000);
        assert!((c.r - 1.0).abs() < 1e-3);
        assert!((c.g - 0.502).abs() < 1e-3);
        assert!((c.b - 0.0).abs() < 1e-3);
        assert_eq!(c.a, 1.0);
    }

    #[test]
    fn from_hex_rgba() {
        let c = Color::from_hex(0xFF800080);
        assert!((c.a - 0.502).abs() < 1e-3);
    }

    #[test]
    fn clamped_bounds_channels() {
        let c = Color::new(1.5, -0.25, 0.5, 2.0).clamped();
        assert_eq!(c, Color::new(1.0, 0.0, 0.5, 1.0));
    }

    #[test]
    fn srgb_round_trip() {
        // linearToSrgb(srgbToLinear(c)) == c across the full range,
        // including both sides of the piecewise threshold
        let mut c = 0.0_f32;
        while c <= 1.0 {
            let rt = linear_to_srgb(srgb_to_linear(c));
            assert!((rt - c).abs() < 1e-5, "round trip failed at {c}: {rt}");
            c += 1.0 / 256.0;
        }
    }

    #[test]
    fn srgb_threshold_continuity() {
        let below = srgb_to_linear(0.04044);
        let above = srgb_to_linear(0.04046);
        assert!((above - below).abs() < 1e-4);
    }

    #[test]
    fn linear_conversion_preserves_alpha() {
        let c = Color::new(0.5, 0.5, 0.5, 0.3).to_linear();
        assert_eq!(c.a, 0.3);
        assert!(c.r < 0.5); // mid-gray is darker in linear light
    }
}
