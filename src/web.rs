//! Browser host.
//!
//! Draws a field onto a page's `<canvas>` through the 2D context and drives
//! it from `requestAnimationFrame`. The canvas is sized to the viewport, the
//! pointer follows `mousemove` on the window, and scheduling stops while the
//! page is hidden.
//!
//! From JavaScript:
//!
//! ```js
//! import init, { startField } from "./emberfield.js";
//!
//! await init();
//! startField("particles-canvas");                                   // embers
//! startField("hero-canvas", JSON.stringify({ style: { variant: "ambient" } }));
//! ```

use std::cell::RefCell;
use std::f64::consts::TAU;
use std::rc::Rc;

use glam::Vec2;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, Window};

use crate::color::Color;
use crate::config::FieldConfig;
use crate::error::{isolate, HostError};
use crate::field::ParticleField;
use crate::surface::{Gradient, Surface};

/// A [`Surface`] backed by a canvas 2D context.
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, HostError> {
        let ctx = canvas
            .get_context("2d")
            .map_err(script)?
            .ok_or_else(|| HostError::Script("2d context unavailable".into()))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| HostError::Script("context is not a CanvasRenderingContext2d".into()))?;
        Ok(Self { canvas, ctx })
    }

    /// Set the canvas backing store size in pixels.
    pub fn set_size(&self, width: u32, height: u32) {
        self.canvas.set_width(width);
        self.canvas.set_height(height);
    }

    fn circle_path(&self, center: Vec2, radius: f32) -> bool {
        self.ctx.begin_path();
        self.ctx
            .arc(center.x as f64, center.y as f64, radius as f64, 0.0, TAU)
            .is_ok()
    }
}

impl Surface for CanvasSurface {
    fn width(&self) -> f32 {
        self.canvas.width() as f32
    }

    fn height(&self) -> f32 {
        self.canvas.height() as f32
    }

    fn clear(&mut self) {
        self.ctx
            .clear_rect(0.0, 0.0, self.canvas.width() as f64, self.canvas.height() as f64);
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        if radius > 0.0 && self.circle_path(center, radius) {
            self.ctx.set_fill_style_str(&color.css());
            self.ctx.fill();
        }
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Color) {
        self.ctx.begin_path();
        self.ctx.move_to(from.x as f64, from.y as f64);
        self.ctx.line_to(to.x as f64, to.y as f64);
        self.ctx.set_stroke_style_str(&color.css());
        self.ctx.set_line_width(width as f64);
        self.ctx.stroke();
    }

    fn fill_radial_gradient(&mut self, center: Vec2, radius: f32, gradient: &Gradient) {
        if !(radius > 0.0) {
            return;
        }
        let (x, y, r) = (center.x as f64, center.y as f64, radius as f64);
        let Ok(fill) = self.ctx.create_radial_gradient(x, y, 0.0, x, y, r) else {
            return;
        };
        for (offset, color) in gradient.stops() {
            if fill.add_color_stop(*offset, &color.css()).is_err() {
                return;
            }
        }
        if self.circle_path(center, radius) {
            self.ctx.set_fill_style_canvas_gradient(&fill);
            self.ctx.fill();
        }
    }
}

struct Host {
    field: ParticleField,
    surface: CanvasSurface,
    /// Whether an animation frame is currently scheduled.
    running: bool,
}

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

/// Run `config` on the canvas with id `canvas_id` for the lifetime of the page.
pub fn start(canvas_id: &str, config: FieldConfig) -> Result<(), HostError> {
    let window = web_sys::window().ok_or_else(|| HostError::Script("no window".into()))?;
    let document = window
        .document()
        .ok_or_else(|| HostError::Script("no document".into()))?;

    let canvas = document
        .get_element_by_id(canvas_id)
        .ok_or_else(|| HostError::MissingSurface(canvas_id.to_string()))?
        .dyn_into::<HtmlCanvasElement>()
        .map_err(|_| HostError::MissingSurface(canvas_id.to_string()))?;

    let surface = CanvasSurface::new(canvas)?;
    let (width, height) = viewport(&window);
    surface.set_size(width, height);

    let host = Rc::new(RefCell::new(Host {
        field: ParticleField::new(config, width as f32, height as f32),
        surface,
        running: true,
    }));

    {
        let host = host.clone();
        let win = window.clone();
        let on_resize = Closure::<dyn FnMut()>::new(move || {
            let (width, height) = viewport(&win);
            let mut host = host.borrow_mut();
            host.surface.set_size(width, height);
            host.field.resize(width as f32, height as f32);
        });
        window
            .add_event_listener_with_callback("resize", on_resize.as_ref().unchecked_ref())
            .map_err(script)?;
        on_resize.forget();
    }

    {
        let host = host.clone();
        let on_move = Closure::<dyn FnMut(MouseEvent)>::new(move |e: MouseEvent| {
            host.borrow_mut()
                .field
                .set_pointer(e.client_x() as f32, e.client_y() as f32);
        });
        window
            .add_event_listener_with_callback("mousemove", on_move.as_ref().unchecked_ref())
            .map_err(script)?;
        on_move.forget();
    }

    let frame: FrameCallback = Rc::new(RefCell::new(None));

    {
        let host = host.clone();
        let frame_handle = frame.clone();
        let win = window.clone();
        let doc = document.clone();
        *frame.borrow_mut() = Some(Closure::new(move |timestamp: f64| {
            {
                let mut guard = host.borrow_mut();
                let Host {
                    field,
                    surface,
                    running,
                } = &mut *guard;

                if doc.hidden() {
                    field.pause();
                    *running = false;
                    return;
                }
                field.frame(surface, timestamp);
            }
            if let Err(e) = request_frame(&win, &frame_handle) {
                log::error!("animation stopped: {}", e);
                host.borrow_mut().running = false;
            }
        }));
    }

    {
        let host = host.clone();
        let frame = frame.clone();
        let win = window.clone();
        let doc = document.clone();
        let on_visibility = Closure::<dyn FnMut()>::new(move || {
            if doc.hidden() {
                return;
            }
            let restart = {
                let mut host = host.borrow_mut();
                let restart = !host.running;
                host.field.resume();
                host.running = true;
                restart
            };
            if restart {
                if let Err(e) = request_frame(&win, &frame) {
                    log::error!("could not resume animation: {}", e);
                }
            }
        });
        document
            .add_event_listener_with_callback("visibilitychange", on_visibility.as_ref().unchecked_ref())
            .map_err(script)?;
        on_visibility.forget();
    }

    request_frame(&window, &frame)?;
    log::info!("started {} field on #{}", host.borrow().field.config().style.name(), canvas_id);
    Ok(())
}

/// JavaScript entry point: start a field on `canvas_id`, optionally from a JSON config.
///
/// A failure is logged to the console and reported as `false`, so the rest of
/// the page's scripts keep running.
#[wasm_bindgen(js_name = startField)]
pub fn start_field(canvas_id: &str, config_json: Option<String>) -> bool {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();

    isolate("Particles", || {
        let config = match config_json {
            Some(json) => FieldConfig::from_json(&json).map_err(|e| HostError::Script(e.to_string()))?,
            None => FieldConfig::ember(),
        };
        start(canvas_id, config)
    })
}

fn request_frame(window: &Window, frame: &FrameCallback) -> Result<(), HostError> {
    let callback = frame.borrow();
    let callback = callback
        .as_ref()
        .ok_or_else(|| HostError::Script("animation callback missing".into()))?;
    window
        .request_animation_frame(callback.as_ref().unchecked_ref())
        .map_err(script)?;
    Ok(())
}

/// Viewport size in CSS pixels.
fn viewport(window: &Window) -> (u32, u32) {
    let dim = |v: Result<JsValue, JsValue>| v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0).max(0.0) as u32;
    (dim(window.inner_width()), dim(window.inner_height()))
}

fn script(e: JsValue) -> HostError {
    HostError::Script(e.as_string().unwrap_or_else(|| format!("{:?}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn start_field_reports_missing_canvas() {
        assert!(!start_field("no-such-canvas", None));
    }

    #[wasm_bindgen_test]
    fn start_field_tolerates_logger_already_installed() {
        // The first call installs the console logger, later calls keep it
        assert!(!start_field("no-such-canvas", None));
        assert!(!start_field("no-such-canvas", Some("{}".into())));
        assert!(log::log_enabled!(log::Level::Info));
        assert!(!log::log_enabled!(log::Level::Debug));
    }

    #[wasm_bindgen_test]
    fn start_field_rejects_bad_config() {
        assert!(!start_field("no-such-canvas", Some("{ not json".into())));
    }
}
