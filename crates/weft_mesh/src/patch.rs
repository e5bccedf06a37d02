//! Coons patch evaluation
//!
//! A patch is one grid cell: four corner control points whose tangent
//! handles define the four boundary Bézier curves. The Coons formula
//! `Lc + Ld - B` interpolates the interior so that the surface passes
//! exactly through all four corners and matches the boundary curves along
//! all four edges.

use crate::color::Color;
use crate::geometry::{cubic_bezier_vec2, Vec2};
use crate::grid::{MeshGrid, MeshPoint};

/// Four corners of one grid cell
#[derive(Clone, Copy)]
pub struct Patch<'a> {
    pub tl: &'a MeshPoint,
    pub tr: &'a MeshPoint,
    pub bl: &'a MeshPoint,
    pub br: &'a MeshPoint,
}

impl<'a> Patch<'a> {
    /// The patch whose top-left corner is grid point `(row, col)`
    pub fn from_grid(grid: &'a MeshGrid, row: usize, col: usize) -> Self {
        Self {
            tl: grid.point(row, col),
            tr: grid.point(row, col + 1),
            bl: grid.point(row + 1, col),
            br: grid.point(row + 1, col + 1),
        }
    }

    /// Surface position at parametric `(u, v)` in pixel space.
    ///
    /// Corners and handles are converted from normalized to pixel space
    /// with `(width, height)`, then the four boundary curves are blended:
    /// ruled surfaces `Lc` (left→right at u) and `Ld` (top→bottom at v)
    /// minus the bilinear corner blend `B`.
    pub fn position(&self, u: f32, v: f32, width: f32, height: f32) -> Vec2 {
        let size = Vec2::new(width, height);

        let tl = self.tl.position.scale(size);
        let tr = self.tr.position.scale(size);
        let bl = self.bl.position.scale(size);
        let br = self.br.position.scale(size);

        let top = cubic_bezier_vec2(
            tl,
            tl + self.tl.handles.right.scale(size),
            tr + self.tr.handles.left.scale(size),
            tr,
            u,
        );
        let bottom = cubic_bezier_vec2(
            bl,
            bl + self.bl.handles.right.scale(size),
            br + self.br.handles.left.scale(size),
            br,
            u,
        );
        let left = cubic_bezier_vec2(
            tl,
            tl + self.tl.handles.down.scale(size),
            bl + self.bl.handles.up.scale(size),
            bl,
            v,
        );
        let right = cubic_bezier_vec2(
            tr,
            tr + self.tr.handles.down.scale(size),
            br + self.br.handles.up.scale(size),
            br,
            v,
        );

        let bilinear = Vec2::lerp(Vec2::lerp(tl, tr, u), Vec2::lerp(bl, br, u), v);
        let lc = Vec2::lerp(left, right, u);
        let ld = Vec2::lerp(top, bottom, v);

        lc + ld - bilinear
    }

    /// Surface color at `(u, v)`: plain bilinear interpolation of the four
    /// corner colors. Color has no tangent concept.
    pub fn color(&self, u: f32, v: f32) -> Color {
        let w00 = (1.0 - u) * (1.0 - v);
        let w10 = u * (1.0 - v);
        let w01 = (1.0 - u) * v;
        let w11 = u * v;

        let (tl, tr, bl, br) = (self.tl.color, self.tr.color, self.bl.color, self.br.color);
        Color::new(
            tl.r * w00 + tr.r * w10 + bl.r * w01 + br.r * w11,
            tl.g * w00 + tr.g * w10 + bl.g * w01 + br.g * w11,
            tl.b * w00 + tr.b * w10 + bl.b * w01 + br.b * w11,
            tl.a * w00 + tr.a * w10 + bl.a * w01 + br.a * w11,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::MeshGrid;

    const W: f32 = 800.0;
    const H: f32 = 600.0;

    fn warped_grid() -> MeshGrid {
        let mut grid = MeshGrid::default_grid(3, 3, W, H);
        // Break symmetry so the identities are exercised on a non-trivial
        // surface, not an axis-aligned lattice
        grid.move_point(1, 1, 0.13, -0.07);
        grid.move_handle(0, 0, crate::grid::HandleName::Right, 0.05, 0.09);
        grid.move_handle(1, 1, crate::grid::HandleName::Down, -0.04, 0.02);
        grid
    }

    fn assert_close(a: Vec2, b: Vec2) {
        assert!((a.x - b.x).abs() < 1e-3, "{a:?} != {b:?}");
        assert!((a.y - b.y).abs() < 1e-3, "{a:?} != {b:?}");
    }

    #[test]
    fn corners_are_exact() {
        let grid = warped_grid();
        let patch = Patch::from_grid(&grid, 0, 0);
        let size = Vec2::new(W, H);

        assert_close(patch.position(0.0, 0.0, W, H), patch.tl.position.scale(size));
        assert_close(patch.position(1.0, 0.0, W, H), patch.tr.position.scale(size));
        assert_close(patch.position(0.0, 1.0, W, H), patch.bl.position.scale(size));
        assert_close(patch.position(1.0, 1.0, W, H), patch.br.position.scale(size));
    }

    #[test]
    fn top_edge_matches_boundary_curve() {
        let grid = warped_grid();
        let patch = Patch::from_grid(&grid, 0, 0);
        let size = Vec2::new(W, H);

        let tl = patch.tl.position.scale(size);
        let tr = patch.tr.position.scale(size);
        for i in 0..=10 {
            let u = i as f32 / 10.0;
            let expected = cubic_bezier_vec2(
                tl,
                tl + patch.tl.handles.right.scale(size),
                tr + patch.tr.handles.left.scale(size),
                tr,
                u,
            );
            assert_close(patch.position(u, 0.0, W, H), expected);
        }
    }

    #[test]
    fn left_edge_matches_boundary_curve() {
        let grid = warped_grid();
        let patch = Patch::from_grid(&grid, 1, 1);
        let size = Vec2::new(W, H);

        let tl = patch.tl.position.scale(size);
        let bl = patch.bl.position.scale(size);
        for i in 0..=10 {
            let v = i as f32 / 10.0;
            let expected = cubic_bezier_vec2(
                tl,
                tl + patch.tl.handles.down.scale(size),
                bl + patch.bl.handles.up.scale(size),
                bl,
                v,
            );
            assert_close(patch.position(0.0, v, W, H), expected);
        }
    }

    #[test]
    fn color_corners_are_exact() {
        let grid = warped_grid();
        let patch = Patch::from_grid(&grid, 0, 1);

        assert_eq!(patch.color(0.0, 0.0), patch.tl.color);
        assert_eq!(patch.color(1.0, 0.0), patch.tr.color);
        assert_eq!(patch.color(0.0, 1.0), patch.bl.color);
        assert_eq!(patch.color(1.0, 1.0), patch.br.color);
    }

    #[test]
    fn color_is_affine_along_edges() {
        let grid = warped_grid();
        let patch = Patch::from_grid(&grid, 0, 0);

        // Holding v = 0, color must be linear between tl and tr
        for i in 0..=8 {
            let u = i as f32 / 8.0;
            let c = patch.color(u, 0.0);
            let expected_r = patch.tl.color.r + (patch.tr.color.r - patch.tl.color.r) * u;
            assert!((c.r - expected_r).abs() < 1e-5);
        }
    }
}
