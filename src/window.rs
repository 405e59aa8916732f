//! Native window host.
//!
//! Runs a field in a winit window: every redraw renders one frame into a
//! software [`Canvas`] and hands it to the GPU [`Presenter`].
//!
//! | Input | Effect |
//! |-------|--------|
//! | cursor move | pointer position |
//! | resize | canvas and field repopulated at the new size |
//! | `S` | save the current frame as a PNG |
//! | `Escape` / close | exit |

use std::sync::Arc;
use std::time::Instant;

use glam::Vec4;
use winit::{
    application::ApplicationHandler,
    event::{ElementState, KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use crate::color::Color;
use crate::config::FieldConfig;
use crate::error::HostError;
use crate::field::ParticleField;
use crate::gpu::Presenter;
use crate::input::cursor_position;
use crate::raster::Canvas;
use crate::time::FrameClock;

/// Page background behind the field.
fn backdrop() -> Vec4 {
    Color::rgb8(10, 10, 15, 1.0).to_rgba()
}

/// Every 300th counted frame; never before the first one.
fn fps_report_due(clock: &FrameClock) -> bool {
    clock.frame() > 0 && clock.frame() % FPS_REPORT_INTERVAL == 0
}

const FPS_REPORT_INTERVAL: u64 = 300;

/// Open a window and run `config` until it is closed.
pub fn run(config: FieldConfig) -> Result<(), HostError> {
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = App::new(config);
    event_loop.run_app(&mut app)?;

    match app.error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

struct App {
    config: FieldConfig,
    window: Option<Arc<Window>>,
    presenter: Option<Presenter>,
    field: Option<ParticleField>,
    canvas: Canvas,
    start: Instant,
    occluded: bool,
    snapshots: u32,
    error: Option<HostError>,
}

impl App {
    fn new(config: FieldConfig) -> Self {
        Self {
            config,
            window: None,
            presenter: None,
            field: None,
            canvas: Canvas::new(0, 0),
            start: Instant::now(),
            occluded: false,
            snapshots: 0,
            error: None,
        }
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<(), HostError> {
        let window_attrs = Window::default_attributes()
            .with_title(format!("emberfield - {}", self.config.style.name()))
            .with_inner_size(winit::dpi::LogicalSize::new(1280, 720));

        let window = Arc::new(event_loop.create_window(window_attrs)?);
        let size = window.inner_size();

        let presenter = pollster::block_on(Presenter::new(window.clone(), backdrop()))?;

        self.canvas.resize(size.width, size.height);
        self.field = Some(ParticleField::new(
            self.config.clone(),
            size.width as f32,
            size.height as f32,
        ));
        self.presenter = Some(presenter);
        self.window = Some(window.clone());
        self.start = Instant::now();

        window.request_redraw();
        Ok(())
    }

    fn resize(&mut self, width: u32, height: u32) {
        if let Some(presenter) = &mut self.presenter {
            presenter.resize(width, height);
        }
        self.canvas.resize(width, height);
        if let Some(field) = &mut self.field {
            field.resize(width as f32, height as f32);
        }
    }

    fn set_occluded(&mut self, occluded: bool) {
        self.occluded = occluded;
        if let Some(field) = &mut self.field {
            if occluded {
                field.pause();
            } else {
                field.resume();
            }
        }
        if !occluded {
            if let Some(window) = &self.window {
                window.request_redraw();
            }
        }
    }

    fn save_snapshot(&mut self) {
        self.snapshots += 1;
        let path = format!("emberfield-{:03}.png", self.snapshots);
        match self.canvas.save_png(&path) {
            Ok(()) => log::info!("saved {}", path),
            Err(e) => log::warn!("could not save {}: {}", path, e),
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let (Some(field), Some(presenter)) = (&mut self.field, &mut self.presenter) else {
            return;
        };

        let timestamp = self.start.elapsed().as_secs_f64() * 1000.0;
        field.frame(&mut self.canvas, timestamp);

        let clock = field.clock();
        if fps_report_due(clock) {
            log::debug!("{:.1} fps, {} bodies", clock.fps(), field.len());
        }

        match presenter.render(&self.canvas) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => presenter.reconfigure(),
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("surface out of memory");
                event_loop.exit();
                return;
            }
            Err(e) => log::warn!("render error: {:?}", e),
        }

        if !self.occluded {
            if let Some(window) = &self.window {
                window.request_redraw();
            }
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            if let Err(e) = self.init(event_loop) {
                self.error = Some(e);
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        if let Some(pos) = cursor_position(&event) {
            if let Some(field) = &mut self.field {
                field.set_pointer(pos.x, pos.y);
            }
            return;
        }

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                self.resize(size.width, size.height);
            }
            WindowEvent::Occluded(occluded) => {
                self.set_occluded(occluded);
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state: ElementState::Pressed,
                        repeat: false,
                        ..
                    },
                ..
            } => match code {
                KeyCode::Escape => event_loop.exit(),
                KeyCode::KeyS => self.save_snapshot(),
                _ => {}
            },
            WindowEvent::RedrawRequested => {
                self.redraw(event_loop);
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fps_report_skips_uncounted_start() {
        let mut clock = FrameClock::new();
        assert!(!fps_report_due(&clock));

        for i in 1..=600u64 {
            clock.tick(i as f64 * 16.0);
            assert_eq!(fps_report_due(&clock), i == 300 || i == 600);
        }
    }

    #[test]
    fn test_fps_report_waits_while_paused() {
        let mut clock = FrameClock::new();
        clock.pause();
        clock.tick(16.0);
        assert_eq!(clock.frame(), 0);
        assert!(!fps_report_due(&clock));
    }
}
