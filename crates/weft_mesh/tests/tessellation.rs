//! End-to-end tessellation scenarios over factory-built grids

use weft_mesh::{tessellate, MeshGrid};

#[test]
fn default_3x3_grid_at_subdivision_16() {
    let grid = MeshGrid::default_grid(3, 3, 800.0, 600.0);
    let tess = tessellate(&grid, 16);

    // 2x2 patches, 17x17 samples each
    assert_eq!(tess.vertex_count, 2 * 2 * 17 * 17);
    assert_eq!(tess.vertex_count, 1156);
    assert_eq!(tess.triangle_count(), 2 * 2 * 16 * 16 * 2);
    assert_eq!(tess.triangle_count(), 1024);
    assert_eq!(tess.indices.len(), 1024 * 3);
}

#[test]
fn patch_seams_share_geometry() {
    // Adjacent patches sample their shared edge from the same boundary
    // curve, so the duplicated seam vertices must coincide
    let mut grid = MeshGrid::default_grid(3, 2, 640.0, 480.0);
    grid.move_point(1, 0, 0.1, 0.05);
    grid.move_point(1, 1, -0.07, 0.12);

    let s = 4usize;
    let tess = tessellate(&grid, s as u32);
    let samples = s + 1;
    let verts_per_patch = samples * samples;

    // Patch 0 bottom row vs patch 1 top row
    for ix in 0..samples {
        let top_patch_vertex = (samples - 1) * samples + ix;
        let bottom_patch_vertex = verts_per_patch + ix;
        let a = &tess.positions[top_patch_vertex * 3..top_patch_vertex * 3 + 3];
        let b = &tess.positions[bottom_patch_vertex * 3..bottom_patch_vertex * 3 + 3];
        assert!((a[0] - b[0]).abs() < 1e-5);
        assert!((a[1] - b[1]).abs() < 1e-5);
    }
}

#[test]
fn rebuild_is_deterministic() {
    let grid = MeshGrid::default_grid(4, 4, 800.0, 600.0);
    let a = tessellate(&grid, 8);
    let b = tessellate(&grid, 8);
    assert_eq!(a.positions, b.positions);
    assert_eq!(a.colors, b.colors);
    assert_eq!(a.indices, b.indices);
}

#[test]
fn higher_subdivision_scales_quadratically() {
    let grid = MeshGrid::default_grid(3, 3, 800.0, 600.0);
    let coarse = tessellate(&grid, 4);
    let fine = tessellate(&grid, 8);
    assert_eq!(coarse.triangle_count() * 4, fine.triangle_count());
}
