//! Editor store
//!
//! The single owner of editor state: the control grid plus every settings
//! family, behind setters that clamp to their documented ranges and fire a
//! no-payload change signal. Constructed and injected explicitly — there is
//! no global instance.
//!
//! The per-frame driver re-reads full state on each signal; subscribers
//! receive no deltas. Row/col arguments are pre-validated by the caller's
//! hit testing (out-of-range is a programming error, per the grid model).

use rand::Rng;
use slotmap::{new_key_type, SlotMap};
use thiserror::Error;

use weft_mesh::{Color, HandleKind, HandleName, MeshGrid};

use crate::presets::PresetLibrary;
use crate::settings::{
    AnimationSettings, AnimationStyle, BackgroundSettings, EffectKind, EffectSettings,
    GlassSettings, GlassShape, NoiseSettings, SUBDIVISION_MAX, SUBDIVISION_MIN,
};

new_key_type! {
    /// Handle returned by `subscribe`, used to unsubscribe
    pub struct SubscriberId;
}

type Subscriber = Box<dyn FnMut()>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("unknown preset: {0}")]
    UnknownPreset(String),
}

/// Editor state container with an owned change-notification channel
pub struct EditorStore {
    grid: MeshGrid,
    subdivision: u32,
    animation: AnimationSettings,
    effect: EffectSettings,
    glass: GlassSettings,
    noise: NoiseSettings,
    background: BackgroundSettings,
    presets: PresetLibrary,
    /// Bumped on every mutation; the driver compares against its last-seen
    /// value to decide whether to re-derive tessellation
    revision: u64,
    subscribers: SlotMap<SubscriberId, Subscriber>,
}

impl EditorStore {
    /// Store over a caller-built grid
    pub fn new(grid: MeshGrid) -> Self {
        Self {
            grid,
            subdivision: 16,
            animation: AnimationSettings::default(),
            effect: EffectSettings::default(),
            glass: GlassSettings::default(),
            noise: NoiseSettings::default(),
            background: BackgroundSettings::default(),
            presets: PresetLibrary::new(),
            revision: 0,
            subscribers: SlotMap::with_key(),
        }
    }

    /// Store over a freshly built default grid
    pub fn with_default_grid(rows: usize, cols: usize, width: f32, height: f32) -> Self {
        Self::new(MeshGrid::default_grid(rows, cols, width, height))
    }

    // ─────────────────────────────────────────────────────────────────────
    // Read access
    // ─────────────────────────────────────────────────────────────────────

    pub fn grid(&self) -> &MeshGrid {
        &self.grid
    }

    pub fn subdivision(&self) -> u32 {
        self.subdivision
    }

    pub fn animation(&self) -> AnimationSettings {
        self.animation
    }

    pub fn effect(&self) -> EffectSettings {
        self.effect
    }

    pub fn glass(&self) -> GlassSettings {
        self.glass
    }

    pub fn noise(&self) -> NoiseSettings {
        self.noise
    }

    pub fn background(&self) -> BackgroundSettings {
        self.background
    }

    pub fn presets(&self) -> &PresetLibrary {
        &self.presets
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    // ─────────────────────────────────────────────────────────────────────
    // Change notification
    // ─────────────────────────────────────────────────────────────────────

    /// Register a no-payload change callback
    pub fn subscribe(&mut self, callback: impl FnMut() + 'static) -> SubscriberId {
        self.subscribers.insert(Box::new(callback))
    }

    pub fn unsubscribe(&mut self, id: SubscriberId) {
        self.subscribers.remove(id);
    }

    fn touch(&mut self) {
        self.revision += 1;
        for (_, subscriber) in self.subscribers.iter_mut() {
            subscriber();
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Grid mutation
    // ─────────────────────────────────────────────────────────────────────

    pub fn move_point(&mut self, row: usize, col: usize, dx: f32, dy: f32) {
        self.grid.move_point(row, col, dx, dy);
        self.touch();
    }

    pub fn move_handle(&mut self, row: usize, col: usize, name: HandleName, dx: f32, dy: f32) {
        self.grid.move_handle(row, col, name, dx, dy);
        self.touch();
    }

    pub fn set_point_color(&mut self, row: usize, col: usize, color: Color) {
        self.grid.set_point_color(row, col, color);
        self.touch();
    }

    pub fn set_point_opacity(&mut self, row: usize, col: usize, opacity: f32) {
        self.grid.set_point_opacity(row, col, opacity.clamp(0.0, 1.0));
        self.touch();
    }

    pub fn set_handle_kind(&mut self, row: usize, col: usize, kind: HandleKind) {
        self.grid.set_handle_kind(row, col, kind);
        self.touch();
    }

    /// Discard the grid and rebuild the default at the current canvas size
    pub fn reset_grid(&mut self, rows: usize, cols: usize) {
        tracing::debug!("resetting grid to {rows}x{cols}");
        self.grid = MeshGrid::default_grid(rows, cols, self.grid.width, self.grid.height);
        self.touch();
    }

    /// Restore a snapshot wholesale (undo/redo navigation)
    pub fn restore_grid(&mut self, grid: MeshGrid) {
        self.grid = grid;
        self.touch();
    }

    pub fn set_canvas_size(&mut self, width: f32, height: f32) {
        self.grid.set_canvas_size(width, height);
        self.touch();
    }

    pub fn apply_preset(&mut self, matrix: &[Vec<Color>]) {
        self.grid.apply_preset(matrix);
        self.touch();
    }

    pub fn apply_named_preset(&mut self, name: &str) -> Result<(), StoreError> {
        let preset = self
            .presets
            .get(name)
            .ok_or_else(|| StoreError::UnknownPreset(name.to_string()))?;
        let colors = preset.colors.clone();
        self.grid.apply_preset(&colors);
        self.touch();
        Ok(())
    }

    pub fn randomize(&mut self) {
        let mut rng = rand::rng();
        self.randomize_with(&mut rng);
    }

    pub fn randomize_with<R: Rng>(&mut self, rng: &mut R) {
        self.grid.randomize(rng);
        self.touch();
    }

    // ─────────────────────────────────────────────────────────────────────
    // Settings
    // ─────────────────────────────────────────────────────────────────────

    pub fn set_subdivision(&mut self, n: u32) {
        self.subdivision = n.clamp(SUBDIVISION_MIN, SUBDIVISION_MAX);
        self.touch();
    }

    /// Select the animation style. Stored speed/strength are NOT reclamped
    /// here — clamping is change-triggered, applied by the speed/strength
    /// setters against the style current at their write time.
    pub fn set_animation_style(&mut self, style: AnimationStyle) {
        self.animation.style = style;
        self.touch();
    }

    pub fn set_animation_speed(&mut self, speed: f32) {
        let (min, max) = self.animation.style.speed_range();
        self.animation.speed = speed.clamp(min, max);
        self.touch();
    }

    pub fn set_animation_strength(&mut self, strength: f32) {
        let (min, max) = self.animation.style.strength_range();
        self.animation.strength = strength.clamp(min, max);
        self.touch();
    }

    pub fn set_effect_kind(&mut self, kind: EffectKind) {
        self.effect.kind = kind;
        self.touch();
    }

    pub fn set_effect_settings(&mut self, settings: EffectSettings) {
        self.effect = settings.clamped();
        self.touch();
    }

    pub fn set_glass_shape(&mut self, shape: GlassShape) {
        self.glass.shape = shape;
        self.touch();
    }

    pub fn set_glass_settings(&mut self, settings: GlassSettings) {
        self.glass = settings.clamped();
        self.touch();
    }

    pub fn set_noise_settings(&mut self, settings: NoiseSettings) {
        self.noise = settings.clamped();
        self.touch();
    }

    pub fn set_background(&mut self, settings: BackgroundSettings) {
        self.background = settings.clamped();
        self.touch();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    fn store() -> EditorStore {
        EditorStore::with_default_grid(3, 3, 800.0, 600.0)
    }

    #[test]
    fn setters_bump_revision_and_notify() {
        let mut s = store();
        let fired = Rc::new(Cell::new(0u32));
        let observer = Rc::clone(&fired);
        s.subscribe(move || observer.set(observer.get() + 1));

        let r0 = s.revision();
        s.set_subdivision(8);
        s.move_point(1, 1, 0.01, 0.0);
        assert_eq!(s.revision(), r0 + 2);
        assert_eq!(fired.get(), 2);
    }

    #[test]
    fn unsubscribe_stops_delivery() {
        let mut s = store();
        let fired = Rc::new(Cell::new(0u32));
        let observer = Rc::clone(&fired);
        let id = s.subscribe(move || observer.set(observer.get() + 1));

        s.set_subdivision(4);
        s.unsubscribe(id);
        s.set_subdivision(5);
        assert_eq!(fired.get(), 1);
    }

    #[test]
    fn subdivision_clamps_to_range() {
        let mut s = store();
        s.set_subdivision(0);
        assert_eq!(s.subdivision(), SUBDIVISION_MIN);
        s.set_subdivision(1000);
        assert_eq!(s.subdivision(), SUBDIVISION_MAX);
    }

    #[test]
    fn smooth_speed_clamps_to_smooth_max() {
        let mut s = store();
        s.set_animation_style(AnimationStyle::Smooth);
        s.set_animation_speed(10.0);
        assert_eq!(s.animation().speed, 6.0);
    }

    #[test]
    fn style_switch_does_not_reclamp_retroactively() {
        let mut s = store();
        s.set_animation_style(AnimationStyle::Smooth);
        s.set_animation_speed(6.0);

        // Switching to fluid leaves the stored 6.0 in place (out of fluid's
        // [0.1, 4] range) until the speed setter is next written
        s.set_animation_style(AnimationStyle::Fluid);
        assert_eq!(s.animation().speed, 6.0);

        s.set_animation_speed(6.0);
        assert_eq!(s.animation().speed, 4.0);
    }

    #[test]
    fn point_opacity_clamps() {
        let mut s = store();
        s.set_point_opacity(0, 0, 4.0);
        assert_eq!(s.grid().point(0, 0).color.a, 1.0);
    }

    #[test]
    fn named_preset_applies_and_unknown_errors() {
        let mut s = store();
        assert!(s.apply_named_preset("Aurora").is_ok());
        let expected = s.presets().get("Aurora").unwrap().colors[0][0];
        assert_eq!(s.grid().point(0, 0).color, expected);

        assert!(matches!(
            s.apply_named_preset("Nope"),
            Err(StoreError::UnknownPreset(_))
        ));
    }

    #[test]
    fn reset_grid_rebuilds_at_current_canvas_size() {
        let mut s = store();
        s.set_canvas_size(1024.0, 512.0);
        s.reset_grid(4, 5);
        assert_eq!(s.grid().rows, 4);
        assert_eq!(s.grid().cols, 5);
        assert_eq!(s.grid().width, 1024.0);
        assert_eq!(s.grid().height, 512.0);
    }

    #[test]
    fn randomize_notifies_and_keeps_positions() {
        let mut s = store();
        let before = s.grid().clone();
        let r0 = s.revision();
        s.randomize();
        assert_eq!(s.revision(), r0 + 1);
        assert_eq!(s.grid().point(1, 1).position, before.point(1, 1).position);
    }
}
