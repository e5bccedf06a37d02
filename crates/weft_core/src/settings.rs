//! Settings families consumed by the shading pipeline
//!
//! Each family is a tagged variant matched exhaustively wherever behavior
//! depends on the active variant, so an unhandled variant is a compile-time
//! error. Numeric fields carry documented valid ranges; the store's setters
//! clamp at write time (change-triggered, never retroactive).

use serde::{Deserialize, Serialize};
use weft_mesh::Color;

/// Subdivision level bounds (quads per patch edge)
pub const SUBDIVISION_MIN: u32 = 1;
pub const SUBDIVISION_MAX: u32 = 64;

/// Temporal animation style applied to the interpolated base color
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnimationStyle {
    /// No change
    #[default]
    Static,
    /// Domain-warped 4-octave fbm drives additive RGB drift plus a
    /// multiplicative breathing term
    Fluid,
    /// Low-frequency sine combinations along x, y, and the diagonal;
    /// tuned for slow calm motion with its own numeric ranges
    Smooth,
    /// Radial distance drives a temporal sine brightening in rings
    Pulse,
    /// Product of two orthogonal phase-shifted spatial sines adds a
    /// directional color shift
    Wave,
}

impl AnimationStyle {
    /// Valid speed range for this style. Smooth's formula has a different
    /// natural operating range than the others.
    pub fn speed_range(self) -> (f32, f32) {
        match self {
            AnimationStyle::Smooth => (2.0, 6.0),
            AnimationStyle::Static
            | AnimationStyle::Fluid
            | AnimationStyle::Pulse
            | AnimationStyle::Wave => (0.1, 4.0),
        }
    }

    /// Valid strength range for this style
    pub fn strength_range(self) -> (f32, f32) {
        match self {
            AnimationStyle::Smooth => (0.5, 2.0),
            AnimationStyle::Static
            | AnimationStyle::Fluid
            | AnimationStyle::Pulse
            | AnimationStyle::Wave => (0.0, 1.0),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnimationSettings {
    pub style: AnimationStyle,
    pub speed: f32,
    pub strength: f32,
}

impl Default for AnimationSettings {
    fn default() -> Self {
        Self {
            style: AnimationStyle::Static,
            speed: 1.0,
            strength: 0.5,
        }
    }
}

/// Stylized overlay pattern kinds
///
/// Each is a deterministic function of screen-pixel coordinates, a cell
/// size, an optional rotation, and the fill/accent color pair. The zigzag
/// stripe family ships in two fixed angle sets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PatternKind {
    /// Concentric rings with an angular wobble
    WavyRings,
    /// Zigzag stripes, horizontal run
    Zigzag,
    /// Zigzag stripes at the rotated angle set
    ZigzagAngled,
    /// Zigzag with a 3D bevel shading the two flanks
    ZigzagBevel,
    /// Concentric rings with multiplicative ring banding
    Rings,
    /// Isometric cube grid built from six overlaid oriented edge masks
    IsoGrid,
    /// Rotatable polka dots
    Dots,
    /// Rotatable stripes
    Stripes,
    /// Bordered boxes
    Boxes,
    /// Triangular tiling
    Triangles,
    /// Rotated-diamond checker
    Diamonds,
}

/// Active overlay effect
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum EffectKind {
    #[default]
    None,
    Pattern(PatternKind),
    Glass,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EffectSettings {
    pub kind: EffectKind,
    /// Pattern cell/scale size in pixels, [4, 128]
    pub scale: f32,
    /// Rotation in radians
    pub rotation: f32,
    pub fill: Color,
    pub accent: Color,
    /// Overlay blend opacity, [0, 1]
    pub opacity: f32,
}

impl Default for EffectSettings {
    fn default() -> Self {
        Self {
            kind: EffectKind::None,
            scale: 32.0,
            rotation: 0.0,
            fill: Color::from_hex(0x1A1A2E),
            accent: Color::from_hex(0xE8E8F0),
            opacity: 0.5,
        }
    }
}

impl EffectSettings {
    pub const SCALE_MIN: f32 = 4.0;
    pub const SCALE_MAX: f32 = 128.0;

    pub fn clamped(mut self) -> Self {
        self.scale = self.scale.clamp(Self::SCALE_MIN, Self::SCALE_MAX);
        self.opacity = self.opacity.clamp(0.0, 1.0);
        self
    }
}

/// Glass refraction cell layout
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GlassShape {
    #[default]
    Off,
    /// Vertical bands with a 1D sinusoidal cross-section
    Strips,
    /// 2D cells with a rounded-box distance field
    Grid,
    /// Grid machinery with circular mapping and a ring thickness
    Circle,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GlassSettings {
    pub shape: GlassShape,
    /// Cell-field rotation in radians
    pub rotation: f32,
    /// Index of refraction, [1, 2.5]
    pub ior: f32,
    /// Refraction offset scale, [0, 2]
    pub distortion: f32,
    /// Cells across the viewport, [2, 64]
    pub cells: f32,
    /// Grid-cell corner rounding, [0, 1]
    pub corner_radius: f32,
    /// Edge falloff width, [0, 1]
    pub bevel: f32,
    /// Frosted blur amount, [0, 1]
    pub frost: f32,
    /// Chromatic aberration amount, [0, 1]
    pub aberration: f32,
    /// Fresnel edge lightening, [0, 1]
    pub fresnel: f32,
    /// Circle shape ring thickness, [0.05, 0.5]
    pub ring_thickness: f32,
}

impl Default for GlassSettings {
    fn default() -> Self {
        Self {
            shape: GlassShape::Off,
            rotation: 0.0,
            ior: 1.45,
            distortion: 0.5,
            cells: 12.0,
            corner_radius: 0.25,
            bevel: 0.2,
            frost: 0.0,
            aberration: 0.3,
            fresnel: 0.4,
            ring_thickness: 0.2,
        }
    }
}

impl GlassSettings {
    pub fn clamped(mut self) -> Self {
        self.ior = self.ior.clamp(1.0, 2.5);
        self.distortion = self.distortion.clamp(0.0, 2.0);
        self.cells = self.cells.clamp(2.0, 64.0);
        self.corner_radius = self.corner_radius.clamp(0.0, 1.0);
        self.bevel = self.bevel.clamp(0.0, 1.0);
        self.frost = self.frost.clamp(0.0, 1.0);
        self.aberration = self.aberration.clamp(0.0, 1.0);
        self.fresnel = self.fresnel.clamp(0.0, 1.0);
        self.ring_thickness = self.ring_thickness.clamp(0.05, 0.5);
        self
    }
}

/// Film-grain overlay settings
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct NoiseSettings {
    /// Grain magnitude, [0, 1]; 0 disables the pass
    pub intensity: f32,
    /// Grain cell size in pixels, [1, 8]
    pub size: f32,
    /// Re-hash every frame when true; frozen at frame 0 when false
    pub animated: bool,
    /// Tint pushed into highlights/shadows by the grain magnitude
    pub color: Color,
}

impl Default for NoiseSettings {
    fn default() -> Self {
        Self {
            intensity: 0.0,
            size: 2.0,
            animated: true,
            color: Color::WHITE,
        }
    }
}

impl NoiseSettings {
    pub fn clamped(mut self) -> Self {
        self.intensity = self.intensity.clamp(0.0, 1.0);
        self.size = self.size.clamp(1.0, 8.0);
        self
    }
}

/// Background fill for canvas regions the mesh patches do not cover
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BackgroundSettings {
    pub color: Color,
    /// Independent fill opacity, [0, 1]
    pub opacity: f32,
}

impl Default for BackgroundSettings {
    fn default() -> Self {
        Self {
            color: Color::from_hex(0x101018),
            opacity: 1.0,
        }
    }
}

impl BackgroundSettings {
    pub fn clamped(mut self) -> Self {
        self.opacity = self.opacity.clamp(0.0, 1.0);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn smooth_style_has_shifted_ranges() {
        assert_eq!(AnimationStyle::Smooth.speed_range(), (2.0, 6.0));
        assert_eq!(AnimationStyle::Fluid.speed_range(), (0.1, 4.0));
        assert_eq!(AnimationStyle::Smooth.strength_range(), (0.5, 2.0));
        assert_eq!(AnimationStyle::Wave.strength_range(), (0.0, 1.0));
    }

    #[test]
    fn effect_clamp_bounds_scale_and_opacity() {
        let s = EffectSettings {
            scale: 1000.0,
            opacity: -3.0,
            ..Default::default()
        }
        .clamped();
        assert_eq!(s.scale, EffectSettings::SCALE_MAX);
        assert_eq!(s.opacity, 0.0);
    }

    #[test]
    fn glass_clamp_bounds_every_field() {
        let g = GlassSettings {
            ior: 10.0,
            distortion: -1.0,
            cells: 1000.0,
            corner_radius: 2.0,
            bevel: -0.5,
            frost: 7.0,
            aberration: 2.0,
            fresnel: -1.0,
            ring_thickness: 0.0,
            ..Default::default()
        }
        .clamped();
        assert_eq!(g.ior, 2.5);
        assert_eq!(g.distortion, 0.0);
        assert_eq!(g.cells, 64.0);
        assert_eq!(g.corner_radius, 1.0);
        assert_eq!(g.bevel, 0.0);
        assert_eq!(g.frost, 1.0);
        assert_eq!(g.aberration, 1.0);
        assert_eq!(g.fresnel, 0.0);
        assert_eq!(g.ring_thickness, 0.05);
    }

    #[test]
    fn settings_serialize_round_trip() {
        let e = EffectSettings {
            kind: EffectKind::Pattern(PatternKind::IsoGrid),
            ..Default::default()
        };
        let json = serde_json::to_string(&e).unwrap();
        let back: EffectSettings = serde_json::from_str(&json).unwrap();
        assert_eq!(e, back);
    }
}
