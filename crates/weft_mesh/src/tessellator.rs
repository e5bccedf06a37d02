//! Grid tessellation
//!
//! Walks every adjacent 2×2 block of control points and samples the Coons
//! evaluator on an `(S+1)×(S+1)` lattice per patch, emitting flat vertex,
//! color, and index buffers ready for GPU upload. This is the dominant
//! per-update cost; any change to topology, points, or subdivision level
//! triggers a full rebuild — no incremental update is attempted.

use crate::grid::MeshGrid;
use crate::patch::Patch;

/// Largest vertex count addressable with 16-bit indices
const U16_VERTEX_LIMIT: usize = 65535;

/// Index buffer with the narrowest integer width covering the vertex count
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IndexData {
    U16(Vec<u16>),
    U32(Vec<u32>),
}

impl IndexData {
    /// Pick 16-bit indices when every vertex is addressable, else 32-bit.
    /// A compactness/compatibility optimization, not a correctness one.
    pub fn for_vertex_count(total_vertices: usize, index_capacity: usize) -> Self {
        if total_vertices <= U16_VERTEX_LIMIT {
            IndexData::U16(Vec::with_capacity(index_capacity))
        } else {
            IndexData::U32(Vec::with_capacity(index_capacity))
        }
    }

    pub fn push(&mut self, index: usize) {
        match self {
            IndexData::U16(v) => v.push(index as u16),
            IndexData::U32(v) => v.push(index as u32),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            IndexData::U16(v) => v.len(),
            IndexData::U32(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_u16(&self) -> bool {
        matches!(self, IndexData::U16(_))
    }
}

/// Tessellated mesh buffers
///
/// `positions` holds 3 floats per vertex (x, y, z=0) in clip space;
/// `colors` holds 4 floats per vertex, raw interpolated RGBA, unclamped.
#[derive(Clone, Debug)]
pub struct Tessellation {
    pub positions: Vec<f32>,
    pub colors: Vec<f32>,
    pub indices: IndexData,
    pub vertex_count: usize,
}

impl Tessellation {
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// Sample every patch of `grid` at `subdivision` quads per patch edge.
///
/// Produces `(rows-1)(cols-1)(S+1)²` vertices and twice as many triangles
/// per unit quad. Pixel-space positions are normalized into the symmetric
/// `[-1, 1]` clip range with the vertical axis flipped (pixel-space down is
/// positive, clip-space up is positive).
pub fn tessellate(grid: &MeshGrid, subdivision: u32) -> Tessellation {
    assert!(subdivision >= 1, "subdivision must be at least 1");

    let (patch_rows, patch_cols) = grid.patch_counts();
    let samples = subdivision as usize + 1;
    let verts_per_patch = samples * samples;
    let total_vertices = patch_rows * patch_cols * verts_per_patch;
    let quads_per_patch = (subdivision as usize) * (subdivision as usize);
    let total_indices = patch_rows * patch_cols * quads_per_patch * 6;

    let mut positions = Vec::with_capacity(total_vertices * 3);
    let mut colors = Vec::with_capacity(total_vertices * 4);
    let mut indices = IndexData::for_vertex_count(total_vertices, total_indices);

    let inv_s = 1.0 / subdivision as f32;
    let mut base = 0usize;

    for pr in 0..patch_rows {
        for pc in 0..patch_cols {
            let patch = Patch::from_grid(grid, pr, pc);

            for iy in 0..samples {
                let v = iy as f32 * inv_s;
                for ix in 0..samples {
                    let u = ix as f32 * inv_s;

                    let pos = patch.position(u, v, grid.width, grid.height);
                    positions.push(pos.x / grid.width * 2.0 - 1.0);
                    positions.push(-(pos.y / grid.height * 2.0 - 1.0));
                    positions.push(0.0);

                    let color = patch.color(u, v);
                    colors.push(color.r);
                    colors.push(color.g);
                    colors.push(color.b);
                    colors.push(color.a);
                }
            }

            // Fixed diagonal split per unit quad; this ordering sets the
            // front-face winding and must be preserved exactly
            for iy in 0..subdivision as usize {
                for ix in 0..subdivision as usize {
                    let v0 = base + iy * samples + ix;
                    let v1 = v0 + 1;
                    let v2 = v0 + samples;
                    let v3 = v2 + 1;

                    indices.push(v0);
                    indices.push(v2);
                    indices.push(v1);

                    indices.push(v1);
                    indices.push(v2);
                    indices.push(v3);
                }
            }

            base += verts_per_patch;
        }
    }

    tracing::debug!(
        "tessellated {}x{} patches at S={}: {} vertices, {} triangles ({} indices)",
        patch_rows,
        patch_cols,
        subdivision,
        total_vertices,
        total_indices / 3,
        total_indices
    );

    Tessellation {
        positions,
        colors,
        indices,
        vertex_count: total_vertices,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::MeshGrid;

    #[test]
    fn vertex_and_triangle_counts() {
        // (R-1)(C-1)(S+1)² vertices, (R-1)(C-1)·S²·2 triangles
        let grid = MeshGrid::default_grid(3, 4, 800.0, 600.0);
        let tess = tessellate(&grid, 8);
        assert_eq!(tess.vertex_count, 2 * 3 * 81);
        assert_eq!(tess.triangle_count(), 2 * 3 * 64 * 2);
        assert_eq!(tess.positions.len(), tess.vertex_count * 3);
        assert_eq!(tess.colors.len(), tess.vertex_count * 4);
    }

    #[test]
    fn index_width_boundary() {
        // Exact-boundary behavior of the width selection itself
        assert!(IndexData::for_vertex_count(65535, 0).is_u16());
        assert!(!IndexData::for_vertex_count(65536, 0).is_u16());
    }

    #[test]
    fn small_mesh_uses_u16_indices() {
        let grid = MeshGrid::default_grid(2, 2, 800.0, 600.0);
        let tess = tessellate(&grid, 4);
        assert!(tess.indices.is_u16());
    }

    #[test]
    fn large_mesh_spills_to_u32_indices() {
        // 16x16 patches at S=15 is exactly 256·256 = 65536 vertices,
        // one past the 16-bit limit
        let grid = MeshGrid::default_grid(17, 17, 800.0, 600.0);
        let tess = tessellate(&grid, 15);
        assert_eq!(tess.vertex_count, 65536);
        assert!(!tess.indices.is_u16());

        // One patch fewer stays under the limit
        let grid = MeshGrid::default_grid(16, 18, 800.0, 600.0);
        let tess = tessellate(&grid, 15);
        assert_eq!(tess.vertex_count, 65280);
        assert!(tess.indices.is_u16());
    }

    #[test]
    fn diagonal_split_winding() {
        let grid = MeshGrid::default_grid(2, 2, 800.0, 600.0);
        let tess = tessellate(&grid, 1);
        // One quad: v0=0 v1=1 v2=2 v3=3, split (v0,v2,v1) then (v1,v2,v3)
        match tess.indices {
            IndexData::U16(ref idx) => assert_eq!(idx, &[0, 2, 1, 1, 2, 3]),
            IndexData::U32(_) => panic!("tiny mesh must use u16 indices"),
        }
    }

    #[test]
    fn clip_space_corners_with_y_flip() {
        let grid = MeshGrid::default_grid(2, 2, 800.0, 600.0);
        let tess = tessellate(&grid, 1);
        // Sample order: top-left first. Pixel-space top (y=0) maps to
        // clip-space +1
        assert!((tess.positions[0] - -1.0).abs() < 1e-5);
        assert!((tess.positions[1] - 1.0).abs() < 1e-5);
        // Last vertex is bottom-right
        let last = (tess.vertex_count - 1) * 3;
        assert!((tess.positions[last] - 1.0).abs() < 1e-5);
        assert!((tess.positions[last + 1] - -1.0).abs() < 1e-5);
    }

    #[test]
    fn colors_are_raw_unclamped() {
        let mut grid = MeshGrid::default_grid(2, 2, 800.0, 600.0);
        grid.set_point_color(0, 0, crate::color::Color::new(1.8, -0.2, 0.5, 1.0));
        let tess = tessellate(&grid, 1);
        assert!((tess.colors[0] - 1.8).abs() < 1e-5);
        assert!((tess.colors[1] - -0.2).abs() < 1e-5);
    }
}
