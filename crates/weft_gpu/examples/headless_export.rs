//! Render a few frames without a window and write the result as PNG.
//!
//! Run with: cargo run -p weft_gpu --example headless_export

use std::cell::RefCell;
use std::rc::Rc;

use weft_core::{AnimationStyle, EditorStore, NoiseSettings};
use weft_gpu::{FrameDriver, MeshRenderer, RendererConfig};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let store = Rc::new(RefCell::new(EditorStore::with_default_grid(
        4, 4, 800.0, 600.0,
    )));
    {
        let mut s = store.borrow_mut();
        s.set_animation_style(AnimationStyle::Fluid);
        s.set_animation_speed(1.5);
        s.set_noise_settings(NoiseSettings {
            intensity: 0.15,
            ..Default::default()
        });
    }

    let renderer = MeshRenderer::new_headless(800, 600, RendererConfig::default())?;
    let mut driver = FrameDriver::new(Rc::clone(&store), renderer);

    for _ in 0..3 {
        driver.tick()?;
    }

    let png = driver.renderer().export_png()?;
    std::fs::write("mesh.png", &png)?;
    println!("wrote mesh.png ({} bytes)", png.len());
    Ok(())
}
