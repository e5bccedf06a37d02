//! Cooperative frame driver
//!
//! One driver instance ties a store to a renderer. Each `tick` is one
//! logical frame: check the cancellation flag, pull latest state,
//! re-derive the tessellation when the store revision moved, then issue
//! one frame's draw calls. State mutation and frame evaluation never
//! overlap in time; the host re-arms `tick` once per display refresh.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Instant;

use weft_core::EditorStore;
use weft_mesh::tessellate;

use crate::renderer::{MeshRenderer, RendererError};

/// Grain frames advance at this rate; sub-frame fractions blend adjacent
/// hashes in the shader
const GRAIN_FPS: f32 = 24.0;

pub struct FrameDriver {
    store: Rc<RefCell<EditorStore>>,
    renderer: MeshRenderer,
    /// Store revision of the currently uploaded tessellation
    last_revision: Option<u64>,
    clock: Instant,
    cancelled: bool,
}

impl FrameDriver {
    pub fn new(store: Rc<RefCell<EditorStore>>, renderer: MeshRenderer) -> Self {
        Self {
            store,
            renderer,
            last_revision: None,
            clock: Instant::now(),
            cancelled: false,
        }
    }

    pub fn renderer(&self) -> &MeshRenderer {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut MeshRenderer {
        &mut self.renderer
    }

    /// Request loop shutdown; checked at the top of each tick
    pub fn cancel(&mut self) {
        self.cancelled = true;
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    /// Run one frame. Returns `Ok(false)` once cancelled.
    ///
    /// Tessellation is re-derived fully and synchronously whenever the
    /// store revision moved — a long rebuild blocks this tick, and a newer
    /// revision simply supersedes the buffers on the next call.
    pub fn tick(&mut self) -> Result<bool, RendererError> {
        if self.cancelled {
            return Ok(false);
        }

        let store = self.store.borrow();
        let revision = store.revision();
        if self.last_revision != Some(revision) {
            let tess = tessellate(store.grid(), store.subdivision());
            self.renderer.upload(&tess);
            self.last_revision = Some(revision);
        }

        let time = self.clock.elapsed().as_secs_f32();
        self.renderer.render_frame(&store, time, time * GRAIN_FPS)?;
        Ok(true)
    }
}
