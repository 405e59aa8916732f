//! # Snapshot
//!
//! Runs a field headless for a number of frames and writes the last frame
//! to a PNG. Handy for checking a config without opening a window.
//!
//! Run with: `cargo run --example snapshot -- [ambient|ember|config.json] [frames] [out.png]`

use emberfield::prelude::*;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let config = match args.next().as_deref() {
        None | Some("ember") => FieldConfig::ember(),
        Some("ambient") => FieldConfig::ambient(),
        Some(path) => FieldConfig::load(path)?,
    };
    let frames: u32 = args.next().and_then(|s| s.parse().ok()).unwrap_or(240);
    let out = args
        .next()
        .unwrap_or_else(|| format!("{}.png", config.style.name()));

    let (width, height) = (1280, 720);
    let mut field = ParticleField::with_context(config, width as f32, height as f32, SpawnContext::seeded(7));
    let mut canvas = Canvas::new(width, height);

    // Sweep the pointer across the middle so its effect shows up in the frame
    for i in 0..frames {
        let t = i as f32 / frames.max(1) as f32;
        field.set_pointer(t * width as f32, height as f32 * 0.5);
        field.frame(&mut canvas, i as f64 * 1000.0 / 60.0);
    }

    canvas.save_png(&out)?;
    println!("{} bodies, {} frames -> {}", field.len(), frames, out);
    Ok(())
}
