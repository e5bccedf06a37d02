//! Weft state layer
//!
//! Owns everything between the UI shell and the renderer: the editor store
//! (control grid + settings families behind clamped setters), a no-payload
//! change-notification channel, the bounded snapshot history, and the named
//! preset library.
//!
//! Concurrency model: cooperative single-threaded. Mutations and frame
//! evaluation are serialized in time by the driver loop; there is exactly
//! one mutator context and one reader context, so no locking is involved.

pub mod history;
pub mod presets;
pub mod settings;
pub mod store;

pub use history::{History, MAX_SNAPSHOTS};
pub use presets::{Preset, PresetLibrary};
pub use settings::{
    AnimationSettings, AnimationStyle, BackgroundSettings, EffectKind, EffectSettings,
    GlassSettings, GlassShape, NoiseSettings, PatternKind, SUBDIVISION_MAX, SUBDIVISION_MIN,
};
pub use store::{EditorStore, StoreError, SubscriberId};
