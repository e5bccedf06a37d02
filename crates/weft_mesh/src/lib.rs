//! Weft mesh core
//!
//! The evaluation engine behind the gradient-mesh editor: a sparse control
//! grid of points with Bézier tangent handles is expanded into a dense
//! triangulated surface with smoothly interpolated position and color.
//!
//! # Pipeline
//!
//! ```text
//! MeshGrid (control points + handles)
//!        │
//!        ▼
//! ┌──────────────┐
//! │ Patch        │  ← Coons patch position/color at (u, v)
//! └──────┬───────┘
//!        │
//!        ▼
//! ┌──────────────┐
//! │ Tessellation │  ← clip-space vertex/color/index buffers
//! └──────────────┘
//! ```

pub mod color;
pub mod geometry;
pub mod grid;
pub mod patch;
pub mod tessellator;

pub use color::Color;
pub use geometry::{cubic_bezier, cubic_bezier_vec2, Vec2};
pub use grid::{HandleKind, HandleName, Handles, MeshGrid, MeshPoint, PointId};
pub use patch::Patch;
pub use tessellator::{tessellate, IndexData, Tessellation};
