//! Bounded snapshot history
//!
//! The UI commits a deep copy of the grid after each discrete gesture (not
//! on every drag sample) and restores wholesale on undo/redo. Snapshots are
//! owned value copies — a restored grid never aliases the live one.

use std::collections::VecDeque;
use weft_mesh::MeshGrid;

/// Most recent snapshots retained; the oldest is dropped on overflow
pub const MAX_SNAPSHOTS: usize = 50;

pub struct History {
    states: VecDeque<MeshGrid>,
    /// Index of the current state within `states`
    cursor: usize,
}

impl History {
    /// Start history at an initial grid state
    pub fn new(initial: &MeshGrid) -> Self {
        let mut states = VecDeque::with_capacity(MAX_SNAPSHOTS);
        states.push_back(initial.clone());
        Self { states, cursor: 0 }
    }

    /// Record a new state after a committed gesture.
    ///
    /// Truncates any redo tail, then enforces the snapshot bound.
    pub fn commit(&mut self, grid: &MeshGrid) {
        self.states.truncate(self.cursor + 1);
        self.states.push_back(grid.clone());
        self.cursor += 1;

        if self.states.len() > MAX_SNAPSHOTS {
            self.states.pop_front();
            self.cursor -= 1;
            tracing::trace!("history full, dropped oldest snapshot");
        }
    }

    /// Step back one snapshot, returning the grid to restore
    pub fn undo(&mut self) -> Option<MeshGrid> {
        if self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        Some(self.states[self.cursor].clone())
    }

    /// Step forward one snapshot, returning the grid to restore
    pub fn redo(&mut self) -> Option<MeshGrid> {
        if self.cursor + 1 >= self.states.len() {
            return None;
        }
        self.cursor += 1;
        Some(self.states[self.cursor].clone())
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.states.len()
    }

    /// Number of retained snapshots (including the current state)
    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use weft_mesh::MeshGrid;

    fn grid() -> MeshGrid {
        MeshGrid::default_grid(3, 3, 800.0, 600.0)
    }

    #[test]
    fn undo_round_trip_restores_original() {
        let mut g = grid();
        let original = g.clone();
        let mut history = History::new(&g);

        // N sequential committed edits, then N undos
        for i in 0..5 {
            g.move_point(1, 1, 0.01 * (i + 1) as f32, 0.0);
            history.commit(&g);
        }
        let mut restored = g.clone();
        for _ in 0..5 {
            restored = history.undo().expect("undo available");
        }
        assert_eq!(restored, original);
        assert!(!history.can_undo());
    }

    #[test]
    fn redo_restores_pre_undo_state() {
        let mut g = grid();
        let mut history = History::new(&g);

        g.move_point(0, 0, 0.1, 0.1);
        history.commit(&g);
        let pre_undo = g.clone();

        let undone = history.undo().unwrap();
        assert_ne!(undone, pre_undo);

        let redone = history.redo().unwrap();
        assert_eq!(redone, pre_undo);
    }

    #[test]
    fn commit_truncates_redo_tail() {
        let mut g = grid();
        let mut history = History::new(&g);

        g.move_point(0, 0, 0.1, 0.0);
        history.commit(&g);
        history.undo().unwrap();

        g.move_point(0, 0, -0.1, 0.0);
        history.commit(&g);
        assert!(!history.can_redo());
    }

    #[test]
    fn bound_retains_most_recent_50() {
        let mut g = grid();
        let mut history = History::new(&g);

        for i in 0..60 {
            g.move_point(1, 1, 0.001, 0.0);
            g.set_point_opacity(0, 0, (i as f32) / 60.0);
            history.commit(&g);
        }

        assert_eq!(history.len(), MAX_SNAPSHOTS);

        // Undo cannot go back further than the 50th-from-last state
        let mut undos = 0;
        while history.undo().is_some() {
            undos += 1;
        }
        assert_eq!(undos, MAX_SNAPSHOTS - 1);
    }

    #[test]
    fn snapshot_owns_its_points() {
        let mut g = grid();
        let mut history = History::new(&g);

        g.set_point_color(0, 0, weft_mesh::Color::BLACK);
        history.commit(&g);

        // Mutating the live grid must not leak into the stored snapshot
        g.set_point_color(0, 0, weft_mesh::Color::WHITE);
        history.undo().unwrap();
        let committed = history.redo().unwrap();
        assert_eq!(committed.point(0, 0).color, weft_mesh::Color::BLACK);
    }
}
