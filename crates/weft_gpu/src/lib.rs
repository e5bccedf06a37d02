//! Weft GPU renderer
//!
//! Draws the tessellated gradient-mesh surface through a multi-pass
//! pipeline: base mesh shading (animation modulation + pattern overlay +
//! sRGB round trip) into an offscreen frame, an optional glass refraction
//! pass over a capture of that frame, an optional film-grain overlay, and
//! a final blit to the presentation surface.

pub mod capture;
pub mod driver;
pub mod primitives;
pub mod renderer;
pub mod shaders;

pub use driver::FrameDriver;
pub use renderer::{MeshRenderer, RendererConfig, RendererError};
