//! WGSL shaders for the mesh rendering pipeline
//!
//! Four passes:
//! - `MESH_SHADER`: tessellated surface shading — animation modulation,
//!   stylized pattern overlay, sRGB round trip
//! - `GLASS_SHADER`: screen-space refraction over a capture of the frame
//! - `GRAIN_SHADER`: temporally coherent film grain, overlay-blended
//! - `BLIT_SHADER`: fullscreen copy to the presentation surface

/// Mesh surface shader.
///
/// Vertices arrive pre-transformed in clip space with raw interpolated
/// colors; all shaping happens per fragment. The sRGB→linear→sRGB round
/// trip is a deliberate no-op in exact arithmetic so that linear-space
/// blending can be inserted between the conversions.
pub const MESH_SHADER: &str = r#"
struct MeshUniforms {
    viewport_size: vec2<f32>,
    time: f32,
    anim_style: u32,
    anim_speed: f32,
    anim_strength: f32,
    pattern_kind: u32,
    pattern_scale: f32,
    pattern_rotation: f32,
    pattern_opacity: f32,
    _pad0: vec2<f32>,
    fill_color: vec4<f32>,
    accent_color: vec4<f32>,
}

@group(0) @binding(0) var<uniform> u: MeshUniforms;

const PI: f32 = 3.14159265;

struct VertexOutput {
    @builtin(position) position: vec4<f32>,
    @location(0) color: vec4<f32>,
}

@vertex
fn vs_main(
    @location(0) position: vec3<f32>,
    @location(1) color: vec4<f32>,
) -> VertexOutput {
    var out: VertexOutput;
    out.position = vec4<f32>(position, 1.0);
    out.color = color;
    return out;
}

// ── noise ────────────────────────────────────────────────────────────────

fn hash21(p: vec2<f32>) -> f32 {
    var q = fract(p * vec2<f32>(123.34, 456.21));
    q = q + dot(q, q + 45.32);
    return fract(q.x * q.y);
}

fn value_noise(p: vec2<f32>) -> f32 {
    let i = floor(p);
    let f = fract(p);
    let s = f * f * (3.0 - 2.0 * f);
    let a = hash21(i);
    let b = hash21(i + vec2<f32>(1.0, 0.0));
    let c = hash21(i + vec2<f32>(0.0, 1.0));
    let d = hash21(i + vec2<f32>(1.0, 1.0));
    return mix(mix(a, b, s.x), mix(c, d, s.x), s.y);
}

// 4-octave fbm with the fixed rotation/scale matrix between octaves
fn fbm(p_in: vec2<f32>) -> f32 {
    let rot = mat2x2<f32>(1.6, 1.2, -1.2, 1.6);
    var p = p_in;
    var amp = 0.5;
    var sum = 0.0;
    for (var i = 0; i < 4; i = i + 1) {
        sum = sum + amp * value_noise(p);
        p = rot * p;
        amp = amp * 0.5;
    }
    return sum;
}

// ── animation styles ─────────────────────────────────────────────────────

// Domain-warped fbm: additive RGB drift plus multiplicative breathing
fn animate_fluid(color: vec3<f32>, px: vec2<f32>, t: f32, strength: f32) -> vec3<f32> {
    let p = px / 220.0;
    let q = vec2<f32>(fbm(p), fbm(p + vec2<f32>(5.2, 1.3)));
    let r = vec2<f32>(
        fbm(p + 4.0 * q + vec2<f32>(1.7, 9.2) + 0.15 * t),
        fbm(p + 4.0 * q + vec2<f32>(8.3, 2.8) + 0.126 * t),
    );
    let n = fbm(p + 4.0 * r);
    let drift = (vec3<f32>(r.x, n, r.y) - 0.5) * 0.2 * strength;
    let breathing = 1.0 + 0.15 * strength * (n * 2.0 - 1.0);
    return color * breathing + drift;
}

// Low-frequency sines along x, y, and the diagonal; slow calm motion
fn animate_smooth(color: vec3<f32>, px: vec2<f32>, t: f32, strength: f32) -> vec3<f32> {
    let p = px / u.viewport_size;
    let wave_x = sin(p.x * 3.1 + t * 0.4);
    let wave_y = sin(p.y * 2.7 - t * 0.31);
    let diag = sin((p.x + p.y) * 2.3 + t * 0.23);
    let drift = vec3<f32>(wave_x, wave_y, diag) * 0.04 * strength;
    let lift = 1.0 + 0.05 * strength * (wave_x * wave_y + diag);
    return color * lift + drift;
}

// Concentric temporal rings brightening/darkening from the center
fn animate_pulse(color: vec3<f32>, px: vec2<f32>, t: f32, strength: f32) -> vec3<f32> {
    let centered = (px - 0.5 * u.viewport_size) / min(u.viewport_size.x, u.viewport_size.y);
    let ring = sin(length(centered) * 12.0 - t * 2.0);
    return color * (1.0 + 0.25 * strength * ring);
}

// Product of orthogonal phase-shifted sines adds a directional shift
fn animate_wave(color: vec3<f32>, px: vec2<f32>, t: f32, strength: f32) -> vec3<f32> {
    let p = px / u.viewport_size;
    let w = sin(p.x * 2.0 * PI + t) * sin(p.y * 2.0 * PI - t);
    return color + vec3<f32>(w, w * 0.5, -w) * 0.15 * strength;
}

// ── patterns ─────────────────────────────────────────────────────────────

fn rotate2(p: vec2<f32>, angle: f32) -> vec2<f32> {
    let s = sin(angle);
    let c = cos(angle);
    return vec2<f32>(c * p.x - s * p.y, s * p.x + c * p.y);
}

fn half_mask(band: f32) -> f32 {
    return smoothstep(0.47, 0.53, band);
}

fn pattern_wavy_rings(px: vec2<f32>) -> f32 {
    let c = px - 0.5 * u.viewport_size;
    let r = length(c) + u.pattern_scale * 0.35 * sin(atan2(c.y, c.x) * 6.0);
    return half_mask(fract(r / u.pattern_scale));
}

fn pattern_zigzag(px: vec2<f32>, angle: f32) -> f32 {
    let q = rotate2(px, angle);
    let s = u.pattern_scale;
    let tri = abs(fract(q.x / s) - 0.5) * 2.0;
    return half_mask(fract((q.y + tri * s * 0.5) / s));
}

fn pattern_zigzag_bevel(px: vec2<f32>) -> vec3<f32> {
    let q = rotate2(px, u.pattern_rotation);
    let s = u.pattern_scale;
    let x = fract(q.x / s);
    let tri = abs(x - 0.5) * 2.0;
    let band = fract((q.y + tri * s * 0.5) / s);
    let mask = half_mask(band);
    // flank lighting: ascending runs catch light, descending fall to shadow
    let slope = sign(x - 0.5);
    let ridge = 1.0 - abs(band - 0.5) * 2.0;
    let shade = 1.0 + 0.35 * slope * ridge;
    return mix(u.fill_color.rgb, u.accent_color.rgb, mask) * shade;
}

fn pattern_rings(px: vec2<f32>) -> vec3<f32> {
    let c = px - 0.5 * u.viewport_size;
    let r = length(c) / u.pattern_scale;
    let mask = half_mask(fract(r));
    // multiplicative ring banding keyed to the ring index
    let banding = 0.8 + 0.2 * fract(floor(r) * 0.618034);
    return mix(u.fill_color.rgb, u.accent_color.rgb, mask) * banding;
}

fn edge_mask(p: vec2<f32>, angle: f32, phase: f32) -> f32 {
    let d = dot(p, vec2<f32>(cos(angle), sin(angle)));
    let line = fract(d / u.pattern_scale + phase);
    let dist = min(line, 1.0 - line);
    return 1.0 - smoothstep(0.0, 0.06, dist);
}

// Isometric cube grid: six oriented edge masks, three axes in two phases
fn pattern_iso_grid(px: vec2<f32>) -> f32 {
    let p = rotate2(px, u.pattern_rotation);
    var mask = edge_mask(p, PI / 6.0, 0.0);
    mask = max(mask, edge_mask(p, PI / 6.0, 0.5));
    mask = max(mask, edge_mask(p, PI / 2.0, 0.0));
    mask = max(mask, edge_mask(p, PI / 2.0, 0.5));
    mask = max(mask, edge_mask(p, 5.0 * PI / 6.0, 0.0));
    mask = max(mask, edge_mask(p, 5.0 * PI / 6.0, 0.5));
    return mask;
}

fn pattern_dots(px: vec2<f32>) -> f32 {
    let q = rotate2(px, u.pattern_rotation);
    let cell = fract(q / u.pattern_scale) - 0.5;
    return 1.0 - smoothstep(0.28, 0.34, length(cell));
}

fn pattern_stripes(px: vec2<f32>) -> f32 {
    let q = rotate2(px, u.pattern_rotation);
    return half_mask(fract(q.x / u.pattern_scale));
}

fn pattern_boxes(px: vec2<f32>) -> f32 {
    let q = rotate2(px, u.pattern_rotation);
    let cell = fract(q / u.pattern_scale) - 0.5;
    let b = max(abs(cell.x), abs(cell.y));
    return smoothstep(0.36, 0.4, b);
}

fn pattern_triangles(px: vec2<f32>) -> f32 {
    let q = rotate2(px, u.pattern_rotation) / u.pattern_scale;
    let skew = vec2<f32>(q.x + q.y * 0.5, q.y);
    let i = floor(skew);
    let f = fract(skew);
    let d = step(f.x + f.y, 1.0);
    let parity = i.x + i.y + d;
    return parity - 2.0 * floor(parity * 0.5);
}

fn pattern_diamonds(px: vec2<f32>) -> f32 {
    let q = rotate2(px, u.pattern_rotation + PI / 4.0) / u.pattern_scale;
    let parity = floor(q.x) + floor(q.y);
    return parity - 2.0 * floor(parity * 0.5);
}

fn pattern_color(kind: u32, px: vec2<f32>) -> vec3<f32> {
    let fill = u.fill_color.rgb;
    let accent = u.accent_color.rgb;
    var out = fill;
    switch kind {
        case 1u: { out = mix(fill, accent, pattern_wavy_rings(px)); }
        case 2u: { out = mix(fill, accent, pattern_zigzag(px, u.pattern_rotation)); }
        case 3u: { out = mix(fill, accent, pattern_zigzag(px, u.pattern_rotation + PI / 4.0)); }
        case 4u: { out = pattern_zigzag_bevel(px); }
        case 5u: { out = pattern_rings(px); }
        case 6u: { out = mix(fill, accent, pattern_iso_grid(px)); }
        case 7u: { out = mix(fill, accent, pattern_dots(px)); }
        case 8u: { out = mix(fill, accent, pattern_stripes(px)); }
        case 9u: { out = mix(fill, accent, pattern_boxes(px)); }
        case 10u: { out = mix(fill, accent, pattern_triangles(px)); }
        case 11u: { out = mix(fill, accent, pattern_diamonds(px)); }
        default: {}
    }
    return out;
}

// ── sRGB transfer (standard piecewise, both directions) ──────────────────

fn srgb_to_linear(c: vec3<f32>) -> vec3<f32> {
    let lo = c / 12.92;
    let hi = pow((c + 0.055) / 1.055, vec3<f32>(2.4));
    return select(hi, lo, c <= vec3<f32>(0.04045));
}

fn linear_to_srgb(c: vec3<f32>) -> vec3<f32> {
    let lo = c * 12.92;
    let hi = 1.055 * pow(c, vec3<f32>(1.0 / 2.4)) - 0.055;
    return select(hi, lo, c <= vec3<f32>(0.0031308));
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let px = in.position.xy;
    var color = clamp(in.color.rgb, vec3<f32>(0.0), vec3<f32>(1.0));

    let t = u.time * u.anim_speed;
    switch u.anim_style {
        case 1u: { color = animate_fluid(color, px, t, u.anim_strength); }
        case 2u: { color = animate_smooth(color, px, t, u.anim_strength); }
        case 3u: { color = animate_pulse(color, px, t, u.anim_strength); }
        case 4u: { color = animate_wave(color, px, t, u.anim_strength); }
        default: {}
    }

    if (u.pattern_kind != 0u) {
        let pat = pattern_color(u.pattern_kind, px);
        color = mix(color, pat, u.pattern_opacity);
    }

    color = clamp(color, vec3<f32>(0.0), vec3<f32>(1.0));
    color = linear_to_srgb(srgb_to_linear(color));

    return vec4<f32>(color, in.color.a);
}
"#;

/// Glass refraction pass.
///
/// Samples a capture of the rendered base surface through a procedural
/// cell field. Uses `textureSampleLevel` throughout: sampling happens in
/// data-dependent control flow.
pub const GLASS_SHADER: &str = r#"
struct GlassUniforms {
    viewport_size: vec2<f32>,
    shape: u32,
    ior: f32,
    distortion: f32,
    cells: f32,
    corner_radius: f32,
    bevel: f32,
    frost: f32,
    aberration: f32,
    fresnel_strength: f32,
    ring_thickness: f32,
    rotation: f32,
    _pad0: f32,
    _pad1: f32,
    _pad2: f32,
}

@group(0) @binding(0) var<uniform> u: GlassUniforms;
@group(0) @binding(1) var t_scene: texture_2d<f32>;
@group(0) @binding(2) var s_scene: sampler;

const PI: f32 = 3.14159265;

struct VsOut {
    @builtin(position) position: vec4<f32>,
    @location(0) uv: vec2<f32>,
}

@vertex
fn vs_main(@builtin(vertex_index) idx: u32) -> VsOut {
    // fullscreen triangle
    let xy = vec2<f32>(f32((idx << 1u) & 2u), f32(idx & 2u));
    var out: VsOut;
    out.position = vec4<f32>(xy * 2.0 - 1.0, 0.0, 1.0);
    out.uv = vec2<f32>(xy.x, 1.0 - xy.y);
    return out;
}

fn rotate2(p: vec2<f32>, angle: f32) -> vec2<f32> {
    let s = sin(angle);
    let c = cos(angle);
    return vec2<f32>(c * p.x - s * p.y, s * p.x + c * p.y);
}

fn hash11(n: f32) -> f32 {
    return fract(sin(n * 127.1) * 43758.5453);
}

fn hash21(p: vec2<f32>) -> f32 {
    var q = fract(p * vec2<f32>(123.34, 456.21));
    q = q + dot(q, q + 45.32);
    return fract(q.x * q.y);
}

// One cell of the refraction field: a 2D pseudo-normal, an edge-distance
// value in [0,1], and a per-cell brightness multiplier
struct CellSample {
    normal: vec2<f32>,
    edge: f32,
    brightness: f32,
}

// Vertical bands with a sinusoidal cross-section
fn cell_strips(p: vec2<f32>) -> CellSample {
    let x = p.x * u.cells;
    let band = floor(x);
    let fx = fract(x);
    let slope = cos(PI * fx) * PI;
    var s: CellSample;
    s.normal = vec2<f32>(-slope * 0.35, 0.0);
    s.edge = smoothstep(0.3, 0.5, abs(fx - 0.5));
    s.brightness = 0.85 + 0.3 * hash11(band);
    return s;
}

// Per-cell rounded-box field; rounding via a log-sum-exp smooth max
fn cell_grid(p: vec2<f32>) -> CellSample {
    let g = p * u.cells;
    let id = floor(g);
    let f = fract(g) - 0.5;
    let k = mix(24.0, 4.0, u.corner_radius);
    let ex = exp(k * abs(f.x));
    let ey = exp(k * abs(f.y));
    let d = log(ex + ey) / k;
    let falloff = max(u.bevel, 0.04) * 0.5;
    let edge = smoothstep(0.5 - falloff, 0.5, d);
    var s: CellSample;
    s.normal = vec2<f32>(sign(f.x) * ex, sign(f.y) * ey) / (ex + ey) * edge;
    s.edge = edge;
    s.brightness = 0.85 + 0.3 * hash21(id);
    return s;
}

// Grid machinery with circular mapping and a ring thickness
fn cell_circle(p: vec2<f32>) -> CellSample {
    let g = p * u.cells;
    let id = floor(g);
    let f = fract(g) - 0.5;
    let r = length(f);
    let d = abs(r - 0.35);
    let half_thick = u.ring_thickness * 0.5;
    let ring = 1.0 - smoothstep(max(half_thick - 0.02, 0.0), half_thick, d);
    var s: CellSample;
    var dir = vec2<f32>(0.0);
    if (r > 1e-4) {
        dir = f / r;
    }
    s.normal = dir * ring * sign(r - 0.35);
    s.edge = ring;
    s.brightness = 0.85 + 0.3 * hash21(id);
    return s;
}

// Snell's-law 2D refract with reflection fallback on a negative
// discriminant (total internal reflection)
fn refract_offset(n2: vec2<f32>, eta: f32) -> vec2<f32> {
    let n = normalize(vec3<f32>(n2, 1.0));
    let i = vec3<f32>(0.0, 0.0, -1.0);
    let cosi = -dot(i, n);
    let k = 1.0 - eta * eta * (1.0 - cosi * cosi);
    if (k < 0.0) {
        return reflect(i, n).xy;
    }
    let r = eta * i + (eta * cosi - sqrt(k)) * n;
    return r.xy;
}

// Frosted sampling: box taps at increasing radii, weighted-summed,
// applied before any aberration sampling
fn sample_frosted(uv: vec2<f32>) -> vec3<f32> {
    let base = textureSampleLevel(t_scene, s_scene, uv, 0.0).rgb;
    if (u.frost < 0.001) {
        return base;
    }
    let texel = 1.0 / u.viewport_size;
    var acc = base;
    var wsum = 1.0;
    for (var j = 1; j <= 4; j = j + 1) {
        let o = texel * (f32(j) * u.frost * 6.0);
        var ring = textureSampleLevel(t_scene, s_scene, uv + vec2<f32>(o.x, o.y), 0.0).rgb;
        ring = ring + textureSampleLevel(t_scene, s_scene, uv + vec2<f32>(-o.x, o.y), 0.0).rgb;
        ring = ring + textureSampleLevel(t_scene, s_scene, uv + vec2<f32>(o.x, -o.y), 0.0).rgb;
        ring = ring + textureSampleLevel(t_scene, s_scene, uv + vec2<f32>(-o.x, -o.y), 0.0).rgb;
        let w = 1.0 / f32(j + 1);
        acc = acc + ring * 0.25 * w;
        wsum = wsum + w;
    }
    return acc / wsum;
}

// Schlick's approximation of the Fresnel reflectance term
fn fresnel_schlick(cos_theta: f32) -> f32 {
    let f0 = 0.04;
    return f0 + (1.0 - f0) * pow(1.0 - cos_theta, 5.0);
}

@fragment
fn fs_main(in: VsOut) -> @location(0) vec4<f32> {
    let aspect = u.viewport_size.x / u.viewport_size.y;
    let p = rotate2(vec2<f32>(in.uv.x * aspect, in.uv.y), u.rotation);

    var cs: CellSample;
    switch u.shape {
        case 1u: { cs = cell_strips(p); }
        case 2u: { cs = cell_grid(p); }
        case 3u: { cs = cell_circle(p); }
        default: {
            return textureSampleLevel(t_scene, s_scene, in.uv, 0.0);
        }
    }

    let eta = 1.0 / u.ior;
    var offset = refract_offset(cs.normal, eta) * u.distortion * 0.08;
    // refraction is boosted near cell edges
    offset = offset * (1.0 + cs.edge * 1.5);
    // undo the cell-space transforms so the offset lands in uv space
    offset = rotate2(offset, -u.rotation);
    offset.x = offset.x / aspect;

    var rgb: vec3<f32>;
    if (u.aberration > 0.001) {
        // dispersion: weighted samples along the offset direction with
        // per-channel Gaussian-like weights
        var acc = vec3<f32>(0.0);
        var wsum = vec3<f32>(0.0);
        for (var i = 0; i < 24; i = i + 1) {
            let ft = f32(i) / 23.0;
            let suv = in.uv + offset * (0.5 + ft * u.aberration);
            let c = sample_frosted(suv);
            let w = vec3<f32>(
                exp(-pow((ft - 0.15) * 2.2, 2.0)),
                exp(-pow((ft - 0.5) * 2.2, 2.0)),
                exp(-pow((ft - 0.85) * 2.2, 2.0)),
            );
            acc = acc + c * w;
            wsum = wsum + w;
        }
        rgb = acc / wsum;
    } else {
        rgb = sample_frosted(in.uv + offset);
    }

    // grazing-edge lightening
    let n3 = normalize(vec3<f32>(cs.normal, 1.0));
    let fres = fresnel_schlick(clamp(n3.z, 0.0, 1.0));
    rgb = rgb * mix(1.0, cs.brightness, 0.5) + fres * u.fresnel_strength;

    let alpha = textureSampleLevel(t_scene, s_scene, in.uv, 0.0).a;
    return vec4<f32>(rgb, alpha);
}
"#;

/// Film-grain overlay pass.
///
/// Grain cells are hashed against adjacent integer frames and blended by
/// the fractional frame time, giving temporally coherent noise; a frame of
/// 0 yields static grain.
pub const GRAIN_SHADER: &str = r#"
struct GrainUniforms {
    viewport_size: vec2<f32>,
    frame: f32,
    intensity: f32,
    grain_size: f32,
    animated: u32,
    _pad0: vec2<f32>,
    tint: vec4<f32>,
}

@group(0) @binding(0) var<uniform> u: GrainUniforms;
@group(0) @binding(1) var t_scene: texture_2d<f32>;
@group(0) @binding(2) var s_scene: sampler;

struct VsOut {
    @builtin(position) position: vec4<f32>,
    @location(0) uv: vec2<f32>,
}

@vertex
fn vs_main(@builtin(vertex_index) idx: u32) -> VsOut {
    let xy = vec2<f32>(f32((idx << 1u) & 2u), f32(idx & 2u));
    var out: VsOut;
    out.position = vec4<f32>(xy * 2.0 - 1.0, 0.0, 1.0);
    out.uv = vec2<f32>(xy.x, 1.0 - xy.y);
    return out;
}

fn hash13(p: vec3<f32>) -> f32 {
    var q = fract(p * 0.1031);
    q = q + dot(q, q.zyx + 31.32);
    return fract((q.x + q.y) * q.z);
}

@fragment
fn fs_main(in: VsOut) -> @location(0) vec4<f32> {
    let base = textureSampleLevel(t_scene, s_scene, in.uv, 0.0);

    let cell = floor(in.position.xy / u.grain_size);
    var frame = 0.0;
    if (u.animated == 1u) {
        frame = u.frame;
    }
    let f0 = floor(frame);
    let h0 = hash13(vec3<f32>(cell, f0));
    let h1 = hash13(vec3<f32>(cell, f0 + 1.0));
    let g = mix(h0, h1, fract(frame));
    let magnitude = (g * 2.0 - 1.0) * u.intensity;

    // overlay blend: 2·b·g below 0.5, 1-2(1-b)(1-g) above
    let blend = clamp(u.tint.rgb * (0.5 + magnitude), vec3<f32>(0.0), vec3<f32>(1.0));
    let lo = 2.0 * base.rgb * blend;
    let hi = 1.0 - 2.0 * (1.0 - base.rgb) * (1.0 - blend);
    let overlaid = select(hi, lo, base.rgb < vec3<f32>(0.5));

    let coverage = abs(magnitude);
    let rgb = mix(base.rgb, overlaid, coverage);
    return vec4<f32>(rgb, base.a);
}
"#;

/// Fullscreen copy of the final offscreen frame to the surface
pub const BLIT_SHADER: &str = r#"
@group(0) @binding(0) var t_frame: texture_2d<f32>;
@group(0) @binding(1) var s_frame: sampler;

struct VsOut {
    @builtin(position) position: vec4<f32>,
    @location(0) uv: vec2<f32>,
}

@vertex
fn vs_main(@builtin(vertex_index) idx: u32) -> VsOut {
    let xy = vec2<f32>(f32((idx << 1u) & 2u), f32(idx & 2u));
    var out: VsOut;
    out.position = vec4<f32>(xy * 2.0 - 1.0, 0.0, 1.0);
    out.uv = vec2<f32>(xy.x, 1.0 - xy.y);
    return out;
}

@fragment
fn fs_main(in: VsOut) -> @location(0) vec4<f32> {
    return textureSample(t_frame, s_frame, in.uv);
}
"#;
