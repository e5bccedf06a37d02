//! Control grid model and factory
//!
//! A `MeshGrid` is a rectangular lattice of control points, each carrying a
//! position, a color, and four Bézier tangent handles. Row/col arguments are
//! pre-validated by the hit-testing layer; out-of-range access is a
//! programming error, not a recoverable condition.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::geometry::Vec2;

/// Handles shorter than this are skipped during mirroring to avoid
/// normalizing a near-zero vector into NaN.
pub const MIRROR_EPSILON: f32 = 1e-4;

/// Dragged points may leave the [0,1] canvas by this much in normalized
/// units on either side. The background fill covers vacated regions.
pub const POSITION_MIN: f32 = -1.5;
pub const POSITION_MAX: f32 = 2.5;

/// Default tangent handle magnitude in normalized units
const DEFAULT_HANDLE_LENGTH: f32 = 0.15;

/// Fixed 3×3 startup palette, tiled over the grid by (row % 3, col % 3)
const DEFAULT_PALETTE: [[u32; 3]; 3] = [
    [0x6A5CFF, 0x4DA6FF, 0x3DDCFF],
    [0xFF5E8A, 0x9B6BFF, 0x41E8C8],
    [0xFFB357, 0xFF7847, 0xF94F6D],
];

/// Stable opaque identifier for a control point, assigned at creation and
/// never reused within a grid's lifetime.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PointId(pub u64);

/// Tangent handle coupling behavior
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum HandleKind {
    /// Editing one handle of an opposing pair forces the other antiparallel,
    /// preserving its length
    #[default]
    MirrorAngle,
    /// Reserved for symmetric-length behavior
    MirrorLength,
    /// Handles move independently
    Free,
}

/// Names the four tangent handles of a point
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum HandleName {
    Left,
    Right,
    Up,
    Down,
}

impl HandleName {
    /// The handle on the other side of the owning point
    pub fn opposite(self) -> HandleName {
        match self {
            HandleName::Left => HandleName::Right,
            HandleName::Right => HandleName::Left,
            HandleName::Up => HandleName::Down,
            HandleName::Down => HandleName::Up,
        }
    }
}

/// Four tangent vectors relative to their owning point's position
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Handles {
    pub left: Vec2,
    pub right: Vec2,
    pub up: Vec2,
    pub down: Vec2,
    pub kind: HandleKind,
}

impl Handles {
    /// Symmetric axis-aligned handles of the default magnitude
    pub fn axis_aligned() -> Self {
        Self {
            left: Vec2::new(-DEFAULT_HANDLE_LENGTH, 0.0),
            right: Vec2::new(DEFAULT_HANDLE_LENGTH, 0.0),
            up: Vec2::new(0.0, -DEFAULT_HANDLE_LENGTH),
            down: Vec2::new(0.0, DEFAULT_HANDLE_LENGTH),
            kind: HandleKind::MirrorAngle,
        }
    }

    pub fn get(&self, name: HandleName) -> Vec2 {
        match name {
            HandleName::Left => self.left,
            HandleName::Right => self.right,
            HandleName::Up => self.up,
            HandleName::Down => self.down,
        }
    }

    pub fn set(&mut self, name: HandleName, value: Vec2) {
        match name {
            HandleName::Left => self.left = value,
            HandleName::Right => self.right = value,
            HandleName::Up => self.up = value,
            HandleName::Down => self.down = value,
        }
    }

    /// Move one handle by a delta, applying the coupling rule.
    ///
    /// Under `MirrorAngle` the opposite handle is recomputed as
    /// `-normalize(edited) * length(opposite)`. The mirror step is skipped
    /// when the edited handle is numerically near zero.
    pub fn nudge(&mut self, name: HandleName, delta: Vec2) {
        let edited = self.get(name) + delta;
        self.set(name, edited);

        if self.kind == HandleKind::MirrorAngle && edited.length() >= MIRROR_EPSILON {
            let opp = name.opposite();
            let opp_len = self.get(opp).length();
            self.set(opp, -edited.normalized() * opp_len);
        }
    }
}

/// One control point of the mesh
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MeshPoint {
    pub id: PointId,
    /// Normalized (0..1) canvas position; may overscan after dragging
    pub position: Vec2,
    pub color: Color,
    pub handles: Handles,
}

/// Rectangular control grid
///
/// Invariants: every row has exactly `cols` entries; `rows, cols >= 2`
/// (a patch needs 2×2 corners). `width`/`height` are the target raster size
/// in device pixels used to convert normalized positions into pixel space
/// during evaluation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MeshGrid {
    pub rows: usize,
    pub cols: usize,
    pub points: Vec<Vec<MeshPoint>>,
    pub width: f32,
    pub height: f32,
    next_id: u64,
}

impl MeshGrid {
    /// Build the default grid: a uniform lattice colored from the fixed
    /// 3×3 palette, every point with symmetric axis-aligned handles.
    pub fn default_grid(rows: usize, cols: usize, width: f32, height: f32) -> Self {
        assert!(rows >= 2 && cols >= 2, "a mesh grid needs at least 2x2 points");

        let mut next_id = 0u64;
        let points = (0..rows)
            .map(|row| {
                (0..cols)
                    .map(|col| {
                        let id = PointId(next_id);
                        next_id += 1;
                        MeshPoint {
                            id,
                            position: Vec2::new(
                                col as f32 / (cols - 1) as f32,
                                row as f32 / (rows - 1) as f32,
                            ),
                            color: Color::from_hex(DEFAULT_PALETTE[row % 3][col % 3]),
                            handles: Handles::axis_aligned(),
                        }
                    })
                    .collect()
            })
            .collect();

        tracing::debug!("built default grid: {rows}x{cols} at {width}x{height}");

        Self {
            rows,
            cols,
            points,
            width,
            height,
            next_id,
        }
    }

    pub fn point(&self, row: usize, col: usize) -> &MeshPoint {
        &self.points[row][col]
    }

    pub fn point_mut(&mut self, row: usize, col: usize) -> &mut MeshPoint {
        &mut self.points[row][col]
    }

    /// Number of horizontal × vertical patches (cells between control points)
    pub fn patch_counts(&self) -> (usize, usize) {
        (self.rows - 1, self.cols - 1)
    }

    /// Drag a point by a delta in normalized units, clamped to the
    /// overscan bound.
    pub fn move_point(&mut self, row: usize, col: usize, dx: f32, dy: f32) {
        let p = &mut self.points[row][col];
        p.position.x = (p.position.x + dx).clamp(POSITION_MIN, POSITION_MAX);
        p.position.y = (p.position.y + dy).clamp(POSITION_MIN, POSITION_MAX);
    }

    /// Drag a tangent handle by a delta. Unclamped apart from the mirror
    /// guard inside `Handles::nudge`.
    pub fn move_handle(&mut self, row: usize, col: usize, name: HandleName, dx: f32, dy: f32) {
        self.points[row][col].handles.nudge(name, Vec2::new(dx, dy));
    }

    pub fn set_point_color(&mut self, row: usize, col: usize, color: Color) {
        self.points[row][col].color = color;
    }

    pub fn set_point_opacity(&mut self, row: usize, col: usize, opacity: f32) {
        self.points[row][col].color.a = opacity;
    }

    pub fn set_handle_kind(&mut self, row: usize, col: usize, kind: HandleKind) {
        self.points[row][col].handles.kind = kind;
    }

    pub fn set_canvas_size(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
    }

    /// Reassign every point an opaque uniform-random RGB color, preserving
    /// positions and handles.
    pub fn randomize<R: Rng>(&mut self, rng: &mut R) {
        for row in &mut self.points {
            for point in row {
                point.color = Color::rgb(rng.random(), rng.random(), rng.random());
            }
        }
    }

    /// Tile a caller-supplied color matrix over the grid by
    /// `(row % matrix_rows, col % matrix_cols)`, preserving positions and
    /// handles. An empty matrix is ignored.
    pub fn apply_preset(&mut self, matrix: &[Vec<Color>]) {
        if matrix.is_empty() || matrix.iter().any(|r| r.is_empty()) {
            tracing::warn!("ignoring empty preset matrix");
            return;
        }
        for (row, points) in self.points.iter_mut().enumerate() {
            for (col, point) in points.iter_mut().enumerate() {
                let preset_row = &matrix[row % matrix.len()];
                point.color = preset_row[col % preset_row.len()];
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_grid_lattice_positions() {
        let grid = MeshGrid::default_grid(3, 3, 800.0, 600.0);
        assert_eq!(grid.point(0, 0).position, Vec2::new(0.0, 0.0));
        assert_eq!(grid.point(1, 1).position, Vec2::new(0.5, 0.5));
        assert_eq!(grid.point(2, 2).position, Vec2::new(1.0, 1.0));
    }

    #[test]
    fn default_grid_ids_are_unique() {
        let grid = MeshGrid::default_grid(4, 5, 800.0, 600.0);
        let mut seen = std::collections::HashSet::new();
        for row in &grid.points {
            for p in row {
                assert!(seen.insert(p.id), "duplicate id {:?}", p.id);
            }
        }
        assert_eq!(seen.len(), 20);
    }

    #[test]
    fn palette_tiles_by_mod_3() {
        let grid = MeshGrid::default_grid(5, 5, 800.0, 600.0);
        assert_eq!(grid.point(0, 0).color, grid.point(3, 3).color);
        assert_eq!(grid.point(1, 2).color, grid.point(4, 2).color);
    }

    #[test]
    fn mirror_angle_edit_is_antiparallel_and_length_preserving() {
        let mut handles = Handles::axis_aligned();
        let right_len_before = handles.right.length();

        // Move left handle to an arbitrary non-zero vector
        handles.nudge(HandleName::Left, Vec2::new(-0.1, 0.2));

        let left = handles.left;
        let right = handles.right;
        // Direction exactly antiparallel
        let cos = left.normalized().dot(right.normalized());
        assert!((cos + 1.0).abs() < 1e-5, "not antiparallel: cos={cos}");
        // Opposite handle's length preserved
        assert!((right.length() - right_len_before).abs() < 1e-5);
    }

    #[test]
    fn near_zero_edit_skips_mirror() {
        let mut handles = Handles::axis_aligned();
        let right_before = handles.right;

        // Collapse the left handle to (0, 0): mirroring would normalize a
        // zero vector, so it must be skipped
        handles.nudge(HandleName::Left, Vec2::new(DEFAULT_HANDLE_LENGTH, 0.0));

        assert_eq!(handles.left, Vec2::ZERO);
        assert_eq!(handles.right, right_before);
    }

    #[test]
    fn free_handles_do_not_mirror() {
        let mut handles = Handles::axis_aligned();
        handles.kind = HandleKind::Free;
        let right_before = handles.right;
        handles.nudge(HandleName::Left, Vec2::new(-0.3, 0.1));
        assert_eq!(handles.right, right_before);
    }

    #[test]
    fn move_point_clamps_to_overscan() {
        let mut grid = MeshGrid::default_grid(3, 3, 800.0, 600.0);
        grid.move_point(0, 0, -100.0, 100.0);
        assert_eq!(grid.point(0, 0).position, Vec2::new(POSITION_MIN, POSITION_MAX));
    }

    #[test]
    fn randomize_preserves_geometry() {
        let mut grid = MeshGrid::default_grid(3, 3, 800.0, 600.0);
        let before = grid.clone();
        let mut rng = rand::rng();
        grid.randomize(&mut rng);
        for row in 0..3 {
            for col in 0..3 {
                assert_eq!(grid.point(row, col).position, before.point(row, col).position);
                assert_eq!(grid.point(row, col).handles, before.point(row, col).handles);
                assert_eq!(grid.point(row, col).color.a, 1.0);
            }
        }
    }

    #[test]
    fn preset_tiles_over_grid() {
        let mut grid = MeshGrid::default_grid(4, 4, 800.0, 600.0);
        let matrix = vec![
            vec![Color::rgb(1.0, 0.0, 0.0), Color::rgb(0.0, 1.0, 0.0)],
            vec![Color::rgb(0.0, 0.0, 1.0), Color::rgb(1.0, 1.0, 0.0)],
        ];
        grid.apply_preset(&matrix);
        assert_eq!(grid.point(0, 0).color, matrix[0][0]);
        assert_eq!(grid.point(2, 2).color, matrix[0][0]);
        assert_eq!(grid.point(1, 3).color, matrix[1][1]);
    }

    #[test]
    fn empty_preset_is_ignored() {
        let mut grid = MeshGrid::default_grid(3, 3, 800.0, 600.0);
        let before = grid.clone();
        grid.apply_preset(&[]);
        assert_eq!(grid, before);
    }

    #[test]
    fn snapshot_round_trips_through_json() {
        let mut grid = MeshGrid::default_grid(3, 4, 1024.0, 768.0);
        grid.move_point(1, 2, 0.05, -0.03);
        grid.move_handle(0, 0, HandleName::Right, 0.02, 0.07);

        let json = serde_json::to_string(&grid).unwrap();
        let restored: MeshGrid = serde_json::from_str(&json).unwrap();
        assert_eq!(grid, restored);
    }
}
