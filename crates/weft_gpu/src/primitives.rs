//! GPU-ready data: uniform structs and uploaded mesh buffers
//!
//! Every uniform struct here mirrors a WGSL struct in `shaders.rs`
//! byte-for-byte. WGSL uniform layout rules pad structs to their alignment,
//! so the Rust side carries explicit `_pad` fields to keep
//! `std::mem::size_of` equal to the shader-visible size.

use wgpu::util::DeviceExt;

use weft_core::{
    AnimationSettings, AnimationStyle, EffectKind, EffectSettings, GlassSettings, GlassShape,
    NoiseSettings, PatternKind,
};
use weft_mesh::{IndexData, Tessellation};

/// Shader id for the active animation style
fn animation_style_id(style: AnimationStyle) -> u32 {
    match style {
        AnimationStyle::Static => 0,
        AnimationStyle::Fluid => 1,
        AnimationStyle::Smooth => 2,
        AnimationStyle::Pulse => 3,
        AnimationStyle::Wave => 4,
    }
}

/// Shader id for the active overlay pattern; 0 disables the overlay.
/// Glass renders in its own pass, so it contributes no pattern here.
fn pattern_kind_id(kind: EffectKind) -> u32 {
    match kind {
        EffectKind::None | EffectKind::Glass => 0,
        EffectKind::Pattern(p) => match p {
            PatternKind::WavyRings => 1,
            PatternKind::Zigzag => 2,
            PatternKind::ZigzagAngled => 3,
            PatternKind::ZigzagBevel => 4,
            PatternKind::Rings => 5,
            PatternKind::IsoGrid => 6,
            PatternKind::Dots => 7,
            PatternKind::Stripes => 8,
            PatternKind::Boxes => 9,
            PatternKind::Triangles => 10,
            PatternKind::Diamonds => 11,
        },
    }
}

fn glass_shape_id(shape: GlassShape) -> u32 {
    match shape {
        GlassShape::Off => 0,
        GlassShape::Strips => 1,
        GlassShape::Grid => 2,
        GlassShape::Circle => 3,
    }
}

/// Uniforms for the mesh shading pass
///
/// Layout matches the WGSL `MeshUniforms` struct exactly:
/// - viewport_size: `vec2<f32>` (8 bytes)
/// - time: f32 (4 bytes)
/// - anim_style: u32 (4 bytes)
/// - anim_speed, anim_strength: f32 (8 bytes)
/// - pattern_kind: u32 (4 bytes)
/// - pattern_scale, pattern_rotation, pattern_opacity: f32 (12 bytes)
/// - _pad0: 8 bytes to align the vec4s
/// - fill_color, accent_color: `vec4<f32>` (32 bytes)
///   Total: 80 bytes
#[repr(C)]
#[derive(Clone, Copy, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MeshUniforms {
    pub viewport_size: [f32; 2],
    pub time: f32,
    pub anim_style: u32,
    pub anim_speed: f32,
    pub anim_strength: f32,
    pub pattern_kind: u32,
    pub pattern_scale: f32,
    pub pattern_rotation: f32,
    pub pattern_opacity: f32,
    pub _pad0: [f32; 2],
    pub fill_color: [f32; 4],
    pub accent_color: [f32; 4],
}

impl MeshUniforms {
    pub fn new(
        width: f32,
        height: f32,
        time: f32,
        animation: &AnimationSettings,
        effect: &EffectSettings,
    ) -> Self {
        Self {
            viewport_size: [width, height],
            time,
            anim_style: animation_style_id(animation.style),
            anim_speed: animation.speed,
            anim_strength: animation.strength,
            pattern_kind: pattern_kind_id(effect.kind),
            pattern_scale: effect.scale,
            pattern_rotation: effect.rotation,
            pattern_opacity: effect.opacity,
            _pad0: [0.0; 2],
            fill_color: [effect.fill.r, effect.fill.g, effect.fill.b, effect.fill.a],
            accent_color: [
                effect.accent.r,
                effect.accent.g,
                effect.accent.b,
                effect.accent.a,
            ],
        }
    }
}

/// Uniforms for the glass refraction pass
///
/// Layout matches the WGSL `GlassUniforms` struct exactly:
/// - viewport_size: `vec2<f32>` (8 bytes)
/// - shape: u32 (4 bytes)
/// - ior: f32 (4 bytes)
/// - distortion, cells, corner_radius, bevel: f32 (16 bytes)
/// - frost, aberration, fresnel_strength, ring_thickness: f32 (16 bytes)
/// - rotation: f32 (4 bytes)
/// - _pad0.._pad2: 12 bytes
///   Total: 64 bytes
#[repr(C)]
#[derive(Clone, Copy, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GlassUniforms {
    pub viewport_size: [f32; 2],
    pub shape: u32,
    pub ior: f32,
    pub distortion: f32,
    pub cells: f32,
    pub corner_radius: f32,
    pub bevel: f32,
    pub frost: f32,
    pub aberration: f32,
    pub fresnel_strength: f32,
    pub ring_thickness: f32,
    pub rotation: f32,
    pub _pad0: f32,
    pub _pad1: f32,
    pub _pad2: f32,
}

impl GlassUniforms {
    pub fn new(width: f32, height: f32, glass: &GlassSettings) -> Self {
        Self {
            viewport_size: [width, height],
            shape: glass_shape_id(glass.shape),
            ior: glass.ior,
            distortion: glass.distortion,
            cells: glass.cells,
            corner_radius: glass.corner_radius,
            bevel: glass.bevel,
            frost: glass.frost,
            aberration: glass.aberration,
            fresnel_strength: glass.fresnel,
            ring_thickness: glass.ring_thickness,
            rotation: glass.rotation,
            _pad0: 0.0,
            _pad1: 0.0,
            _pad2: 0.0,
        }
    }
}

/// Uniforms for the film-grain pass
///
/// Layout matches the WGSL `GrainUniforms` struct exactly:
/// - viewport_size: `vec2<f32>` (8 bytes)
/// - frame: f32 (4 bytes) - fractional frame counter, 0 when static
/// - intensity: f32 (4 bytes)
/// - grain_size: f32 (4 bytes)
/// - animated: u32 (4 bytes)
/// - _pad0: 8 bytes to align the vec4
/// - tint: `vec4<f32>` (16 bytes)
///   Total: 48 bytes
#[repr(C)]
#[derive(Clone, Copy, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GrainUniforms {
    pub viewport_size: [f32; 2],
    pub frame: f32,
    pub intensity: f32,
    pub grain_size: f32,
    pub animated: u32,
    pub _pad0: [f32; 2],
    pub tint: [f32; 4],
}

impl GrainUniforms {
    pub fn new(width: f32, height: f32, frame: f32, noise: &NoiseSettings) -> Self {
        Self {
            viewport_size: [width, height],
            frame: if noise.animated { frame } else { 0.0 },
            intensity: noise.intensity,
            grain_size: noise.size,
            animated: noise.animated as u32,
            _pad0: [0.0; 2],
            tint: [noise.color.r, noise.color.g, noise.color.b, noise.color.a],
        }
    }
}

/// GPU-resident mesh buffers for one tessellation
pub struct MeshBuffers {
    pub positions: wgpu::Buffer,
    pub colors: wgpu::Buffer,
    pub indices: wgpu::Buffer,
    pub index_format: wgpu::IndexFormat,
    pub index_count: u32,
    pub vertex_count: u32,
}

impl MeshBuffers {
    /// Upload a tessellation, picking the index format the tessellator
    /// selected for the vertex count.
    pub fn from_tessellation(device: &wgpu::Device, tess: &Tessellation) -> Self {
        let positions = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Mesh Position Buffer"),
            contents: bytemuck::cast_slice(&tess.positions),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let colors = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Mesh Color Buffer"),
            contents: bytemuck::cast_slice(&tess.colors),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let (index_bytes, index_format): (&[u8], wgpu::IndexFormat) = match &tess.indices {
            IndexData::U16(v) => (bytemuck::cast_slice(v), wgpu::IndexFormat::Uint16),
            IndexData::U32(v) => (bytemuck::cast_slice(v), wgpu::IndexFormat::Uint32),
        };
        let indices = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Mesh Index Buffer"),
            contents: index_bytes,
            usage: wgpu::BufferUsages::INDEX,
        });

        Self {
            positions,
            colors,
            indices,
            index_format,
            index_count: tess.indices.len() as u32,
            vertex_count: tess.vertex_count as u32,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use weft_core::{GlassSettings, NoiseSettings};

    #[test]
    fn uniform_sizes_match_wgsl_layout() {
        assert_eq!(std::mem::size_of::<MeshUniforms>(), 80);
        assert_eq!(std::mem::size_of::<GlassUniforms>(), 64);
        assert_eq!(std::mem::size_of::<GrainUniforms>(), 48);
    }

    #[test]
    fn glass_pattern_contributes_no_overlay() {
        assert_eq!(pattern_kind_id(EffectKind::Glass), 0);
        assert_eq!(pattern_kind_id(EffectKind::None), 0);
        assert_eq!(
            pattern_kind_id(EffectKind::Pattern(PatternKind::Diamonds)),
            11
        );
    }

    #[test]
    fn static_noise_pins_frame_to_zero() {
        let noise = NoiseSettings {
            animated: false,
            intensity: 0.5,
            ..Default::default()
        };
        let u = GrainUniforms::new(800.0, 600.0, 123.75, &noise);
        assert_eq!(u.frame, 0.0);
        assert_eq!(u.animated, 0);

        let animated = NoiseSettings {
            animated: true,
            ..noise
        };
        let u = GrainUniforms::new(800.0, 600.0, 123.75, &animated);
        assert_eq!(u.frame, 123.75);
    }

    #[test]
    fn glass_uniforms_carry_settings() {
        let glass = GlassSettings {
            shape: weft_core::GlassShape::Grid,
            ior: 1.8,
            ..Default::default()
        };
        let u = GlassUniforms::new(640.0, 480.0, &glass);
        assert_eq!(u.shape, 2);
        assert_eq!(u.ior, 1.8);
        assert_eq!(u.viewport_size, [640.0, 480.0]);
    }
}
