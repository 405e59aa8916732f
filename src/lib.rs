//! # emberfield
//!
//! Animated particle backgrounds for web pages, runnable in the browser
//! (wasm32, canvas 2D) or natively (winit + wgpu).
//!
//! A [`ParticleField`] keeps a fixed number of bodies sized to the surface,
//! advances them once per animation frame, and draws them onto any
//! [`Surface`]. Two variants ship:
//!
//! - **Ambient**: drifting dots that bounce off the edges, joined by faint
//!   lines when close, softly pulled toward the pointer.
//! - **Ember**: warm sparks rising from below the page with a limited
//!   lifespan, fading in and out, flickering and glowing, pushed away and
//!   brightened by the pointer.
//!
//! ## Quick Start
//!
//! ```ignore
//! use emberfield::prelude::*;
//!
//! fn main() -> Result<(), HostError> {
//!     emberfield::run(FieldConfig::ember())
//! }
//! ```
//!
//! Headless, into a pixel buffer:
//!
//! ```ignore
//! use emberfield::prelude::*;
//!
//! let mut field = ParticleField::new(FieldConfig::ambient(), 800.0, 600.0);
//! let mut canvas = Canvas::new(800, 600);
//! for i in 0..120 {
//!     field.frame(&mut canvas, i as f64 * 16.0);
//! }
//! canvas.save_png("ambient.png")?;
//! ```
//!
//! ## Population
//!
//! | Variant | Cap | Square pixels per body | Pointer radius |
//! |---------|-----|------------------------|----------------|
//! | ambient | 80 | 15 000 | 120 |
//! | ember | 60 | 25 000 | 100 |
//!
//! All of these, and every sampling range, can be overridden through
//! [`FieldConfig`] builders or a JSON document.

pub mod color;
pub mod config;
pub mod connections;
pub mod error;
pub mod field;
pub mod input;
pub mod interactions;
pub mod particle;
pub mod raster;
pub mod spawn;
pub mod surface;
pub mod time;

#[cfg(not(target_arch = "wasm32"))]
mod gpu;
#[cfg(not(target_arch = "wasm32"))]
mod window;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use color::Color;
pub use config::{AmbientStyle, EmberStyle, FieldConfig, Population, Style};
pub use connections::{ConnectionConfig, SpatialGrid};
pub use error::{isolate, ConfigError, HostError};
pub use field::{ParticleField, Swarm};
pub use glam::{Vec2, Vec4};
pub use input::Pointer;
pub use interactions::{PointerConfig, PointerResponse};
pub use particle::{Ember, Particle};
pub use raster::Canvas;
pub use spawn::SpawnContext;
pub use surface::{DrawCommand, Gradient, RecordingSurface, Surface};
pub use time::FrameClock;

#[cfg(not(target_arch = "wasm32"))]
pub use error::GpuError;
#[cfg(not(target_arch = "wasm32"))]
pub use window::run;

/// Convenient re-exports for common usage.
///
/// ```ignore
/// use emberfield::prelude::*;
/// ```
pub mod prelude {
    pub use crate::color::Color;
    pub use crate::config::{AmbientStyle, EmberStyle, FieldConfig, Style};
    pub use crate::connections::ConnectionConfig;
    pub use crate::error::{isolate, ConfigError, HostError};
    pub use crate::field::ParticleField;
    pub use crate::interactions::PointerResponse;
    pub use crate::raster::Canvas;
    pub use crate::spawn::SpawnContext;
    pub use crate::surface::{RecordingSurface, Surface};
    pub use crate::{Vec2, Vec4};
}
