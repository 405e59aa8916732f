//! The particle field simulator.
//!
//! A [`ParticleField`] owns a fixed-size collection of bodies sized to the
//! surface, evolves it once per animation frame, and draws it onto any
//! [`Surface`]. Each frame runs the same sequence:
//!
//! 1. Clear the surface.
//! 2. Advance every body (ambient: move and reflect; ember: age, drift, rise).
//! 3. Apply the pointer's proximity force.
//! 4. Ambient: damp velocity.
//! 5. Ember: compute opacity from the age envelope and flicker, then let the
//!    pointer brighten it up to the cap.
//! 6. Ambient: draw connection lines between close pairs.
//! 7. Draw each body.
//! 8. Ember: replace expired embers in place.
//!
//! The collection size only changes on [`resize`](ParticleField::resize),
//! which repopulates from scratch.
//!
//! # Example
//!
//! ```ignore
//! use emberfield::prelude::*;
//!
//! let mut field = ParticleField::new(FieldConfig::ember(), 1280.0, 720.0);
//! let mut canvas = Canvas::new(1280, 720);
//!
//! field.set_pointer(640.0, 360.0);
//! field.frame(&mut canvas, 16.0);
//! ```

use crate::config::{AmbientStyle, EmberStyle, FieldConfig, Style};
use crate::connections::{self, SpatialGrid};
use crate::input::Pointer;
use crate::interactions::PointerConfig;
use crate::particle::{Ember, Particle};
use crate::spawn::{particle_count, SpawnContext};
use crate::surface::Surface;
use crate::time::FrameClock;
use glam::Vec2;

/// The bodies of a field, one collection per variant.
#[derive(Debug, Clone)]
pub enum Swarm {
    Ambient(Vec<Particle>),
    Ember(Vec<Ember>),
}

impl Swarm {
    pub fn len(&self) -> usize {
        match self {
            Swarm::Ambient(p) => p.len(),
            Swarm::Ember(e) => e.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A particle field bound to a surface size.
#[derive(Debug)]
pub struct ParticleField {
    config: FieldConfig,
    width: f32,
    height: f32,
    swarm: Swarm,
    pointer: Pointer,
    clock: FrameClock,
    rng: SpawnContext,
    /// Opacity each body was drawn with in the last frame.
    alphas: Vec<f32>,
    /// Scratch positions for the connection pass.
    points: Vec<Vec2>,
    grid: SpatialGrid,
}

impl ParticleField {
    /// Create and populate a field for a `width` x `height` surface.
    pub fn new(config: FieldConfig, width: f32, height: f32) -> Self {
        Self::with_context(config, width, height, SpawnContext::from_entropy())
    }

    /// Like [`new`](Self::new) with a caller-provided random source.
    pub fn with_context(config: FieldConfig, width: f32, height: f32, ctx: SpawnContext) -> Self {
        let mut field = Self {
            swarm: empty_swarm(&config.style),
            config,
            width,
            height,
            pointer: Pointer::new(),
            clock: FrameClock::new(),
            rng: ctx,
            alphas: Vec::new(),
            points: Vec::new(),
            grid: SpatialGrid::new(),
        };
        field.populate();
        field
    }

    /// Adopt new surface dimensions and repopulate the whole field.
    pub fn resize(&mut self, width: f32, height: f32) {
        log::debug!("resize {}x{} -> {}x{}", self.width, self.height, width, height);
        self.width = width;
        self.height = height;
        self.populate();
    }

    /// Swap in a different config and repopulate.
    pub fn reconfigure(&mut self, config: FieldConfig) {
        self.config = config;
        self.populate();
    }

    fn populate(&mut self) {
        let count = particle_count(self.width, self.height, &self.config.population);
        let (w, h) = (self.width, self.height);
        let rng = &mut self.rng;

        self.swarm = match &self.config.style {
            Style::Ambient(style) => {
                Swarm::Ambient((0..count).map(|_| Particle::spawn(rng, w, h, style)).collect())
            }
            Style::Ember(style) => {
                Swarm::Ember((0..count).map(|_| Ember::spawn(rng, w, h, style)).collect())
            }
        };
        self.alphas.clear();
        self.alphas.resize(count, 0.0);

        log::info!(
            "{} field: {} bodies on {}x{}",
            self.config.style.name(),
            count,
            w,
            h
        );
    }

    /// Record the pointer position in surface pixels.
    #[inline]
    pub fn set_pointer(&mut self, x: f32, y: f32) {
        self.pointer.move_to(x, y);
    }

    /// Forget the pointer so it no longer affects any body.
    #[inline]
    pub fn clear_pointer(&mut self) {
        self.pointer.reset();
    }

    #[inline]
    pub fn pointer(&self) -> Vec2 {
        self.pointer.position()
    }

    /// Render one animation frame at `timestamp` (milliseconds).
    ///
    /// While the clock is paused the current state is redrawn without
    /// advancing.
    pub fn frame<S: Surface + ?Sized>(&mut self, surface: &mut S, timestamp: f64) {
        surface.clear();
        if !self.clock.is_paused() {
            let time = self.clock.tick(timestamp);
            self.advance(time);
        }
        self.draw(surface);
        self.recycle();
    }

    /// Evolve the field by one frame without drawing.
    pub fn step(&mut self, timestamp: f64) {
        if self.clock.is_paused() {
            return;
        }
        let time = self.clock.tick(timestamp);
        self.advance(time);
        self.recycle();
    }

    /// Stop advancing, e.g. while the surface is hidden.
    pub fn pause(&mut self) {
        self.clock.pause();
    }

    pub fn resume(&mut self) {
        self.clock.resume();
    }

    fn advance(&mut self, time: f64) {
        let Self {
            config,
            width,
            height,
            swarm,
            pointer,
            alphas,
            ..
        } = self;
        let target = pointer.position();
        alphas.clear();

        match (swarm, &config.style) {
            (Swarm::Ambient(particles), Style::Ambient(style)) => {
                for p in particles.iter_mut() {
                    advance_particle(p, *width, *height, style, &config.pointer, target);
                    alphas.push(p.opacity);
                }
            }
            (Swarm::Ember(embers), Style::Ember(style)) => {
                for e in embers.iter_mut() {
                    alphas.push(advance_ember(e, time, style, &config.pointer, target));
                }
            }
            _ => unreachable!("swarm is always rebuilt with the style"),
        }
    }

    fn draw<S: Surface + ?Sized>(&mut self, surface: &mut S) {
        let Self {
            config,
            width,
            height,
            swarm,
            alphas,
            points,
            grid,
            ..
        } = self;

        match (&*swarm, &config.style) {
            (Swarm::Ambient(particles), Style::Ambient(style)) => {
                if let Some(conn) = &style.connections {
                    points.clear();
                    points.extend(particles.iter().map(|p| p.position));
                    let points = &points[..];

                    let mut line = |i: usize, j: usize, d: f32| {
                        if let Some(a) = conn.alpha(d) {
                            surface.stroke_line(points[i], points[j], conn.width, conn.color.with_alpha(a));
                        }
                    };
                    if conn.spatial_grid {
                        grid.rebuild(points, conn.distance, *width, *height);
                        grid.for_each_pair(points, conn.distance, &mut line);
                    } else {
                        connections::for_each_pair(points, conn.distance, &mut line);
                    }
                }

                for (p, &alpha) in particles.iter().zip(alphas.iter()) {
                    surface.fill_circle(p.position, p.radius, style.color.with_alpha(alpha));
                }
            }
            (Swarm::Ember(embers), Style::Ember(style)) => {
                for (e, &alpha) in embers.iter().zip(alphas.iter()) {
                    surface.fill_radial_gradient(e.position, e.radius * style.glow_scale, &e.glow(alpha));
                    surface.fill_circle(e.position, e.radius * style.core_scale, e.core_color(alpha));
                }
            }
            _ => unreachable!("swarm is always rebuilt with the style"),
        }
    }

    fn recycle(&mut self) {
        let (w, h) = (self.width, self.height);
        if let (Swarm::Ember(embers), Style::Ember(style)) = (&mut self.swarm, &self.config.style) {
            for e in embers.iter_mut() {
                if e.expired(style.escape_margin) {
                    *e = Ember::spawn(&mut self.rng, w, h, style);
                }
            }
        }
    }

    /// Number of bodies.
    #[inline]
    pub fn len(&self) -> usize {
        self.swarm.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.swarm.is_empty()
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    pub fn swarm(&self) -> &Swarm {
        &self.swarm
    }

    pub fn clock(&self) -> &FrameClock {
        &self.clock
    }

    /// Ambient particles, empty for an ember field.
    pub fn particles(&self) -> &[Particle] {
        match &self.swarm {
            Swarm::Ambient(p) => p,
            Swarm::Ember(_) => &[],
        }
    }

    /// Embers, empty for an ambient field.
    pub fn embers(&self) -> &[Ember] {
        match &self.swarm {
            Swarm::Ember(e) => e,
            Swarm::Ambient(_) => &[],
        }
    }

    pub fn particles_mut(&mut self) -> &mut [Particle] {
        match &mut self.swarm {
            Swarm::Ambient(p) => p,
            Swarm::Ember(_) => &mut [],
        }
    }

    pub fn embers_mut(&mut self) -> &mut [Ember] {
        match &mut self.swarm {
            Swarm::Ember(e) => e,
            Swarm::Ambient(_) => &mut [],
        }
    }

    /// Opacity each body was drawn with in the last advanced frame.
    pub fn rendered_opacity(&self) -> &[f32] {
        &self.alphas
    }
}

fn empty_swarm(style: &Style) -> Swarm {
    match style {
        Style::Ambient(_) => Swarm::Ambient(Vec::new()),
        Style::Ember(_) => Swarm::Ember(Vec::new()),
    }
}

#[inline]
fn advance_particle(
    p: &mut Particle,
    width: f32,
    height: f32,
    style: &AmbientStyle,
    pointer: &PointerConfig,
    target: Vec2,
) {
    p.advance(width, height);
    if let Some(inf) = pointer.influence(p.position, target) {
        p.velocity += inf.direction(pointer.response) * inf.force * pointer.strength;
    }
    p.velocity *= style.damping;
}

/// Advance one ember and return the opacity it is drawn with.
#[inline]
fn advance_ember(e: &mut Ember, time: f64, style: &EmberStyle, pointer: &PointerConfig, target: Vec2) -> f32 {
    e.age = e.age.saturating_add(1);
    e.position.x += e.velocity.x + e.drift_offset(time, style.drift_amplitude);
    e.position.y += e.velocity.y;

    let mut alpha = e.opacity * e.envelope(style.fade_in, style.fade_out) * e.flicker(time);

    if let Some(inf) = pointer.influence(e.position, target) {
        e.position += inf.delta(pointer.response) * inf.force * pointer.strength;
        alpha = (alpha * (1.0 + inf.force)).min(style.opacity_cap);
    }
    alpha
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{DrawCommand, RecordingSurface};

    fn seeded(config: FieldConfig, w: f32, h: f32) -> ParticleField {
        ParticleField::with_context(config, w, h, SpawnContext::seeded(11))
    }

    fn still_particle(x: f32, y: f32) -> Particle {
        Particle {
            position: Vec2::new(x, y),
            velocity: Vec2::ZERO,
            radius: 1.0,
            opacity: 0.5,
        }
    }

    #[test]
    fn test_population() {
        assert_eq!(seeded(FieldConfig::ambient(), 1920.0, 1080.0).len(), 80);
        assert_eq!(seeded(FieldConfig::ember(), 400.0, 300.0).len(), 4);
        assert!(seeded(FieldConfig::ember(), 0.0, 0.0).is_empty());
    }

    #[test]
    fn test_count_constant_across_frames() {
        let mut field = seeded(FieldConfig::ember(), 800.0, 600.0);
        let n = field.len();
        for i in 0..2000 {
            field.step(i as f64 * 16.0);
            assert_eq!(field.len(), n);
        }
    }

    #[test]
    fn test_ambient_stays_in_bounds() {
        let mut field = seeded(FieldConfig::ambient(), 640.0, 480.0);
        field.set_pointer(320.0, 240.0);
        for i in 0..3000 {
            field.step(i as f64 * 16.0);
        }
        for p in field.particles() {
            assert!((0.0..=640.0).contains(&p.position.x));
            assert!((0.0..=480.0).contains(&p.position.y));
        }
    }

    #[test]
    fn test_ages_increment() {
        let mut field = seeded(FieldConfig::ember(), 800.0, 600.0);
        assert!(field.embers().iter().all(|e| e.age == 0));
        field.step(0.0);
        assert!(field.embers().iter().all(|e| e.age == 1));
    }

    #[test]
    fn test_expired_ember_is_replaced_in_place() {
        let mut field = seeded(FieldConfig::ember(), 800.0, 600.0);
        let n = field.len();
        {
            let e = &mut field.embers_mut()[0];
            e.max_life = 400.0;
            e.age = 399;
        }
        field.step(0.0);

        assert_eq!(field.len(), n);
        let e = field.embers()[0];
        assert_eq!(e.age, 0);
        assert!((300.0..700.0).contains(&e.max_life));
        assert!(e.position.y >= 600.0);
    }

    #[test]
    fn test_escaped_ember_is_replaced() {
        let mut field = seeded(FieldConfig::ember(), 800.0, 600.0);
        field.embers_mut()[1].position.y = -60.0;
        field.step(0.0);
        assert_eq!(field.embers()[1].age, 0);
        assert!(field.embers()[1].position.y >= 600.0);
    }

    #[test]
    fn test_resize_repopulates() {
        let mut field = seeded(FieldConfig::ember(), 400.0, 300.0);
        field.step(0.0);
        field.resize(1920.0, 1080.0);
        assert_eq!(field.len(), 60);
        assert!(field.embers().iter().all(|e| e.age == 0));

        field.resize(0.0, 0.0);
        assert!(field.is_empty());
    }

    #[test]
    fn test_zero_surface_frame_only_clears() {
        let mut field = seeded(FieldConfig::ambient(), 0.0, 0.0);
        let mut surface = RecordingSurface::new(0.0, 0.0);
        field.frame(&mut surface, 0.0);
        assert_eq!(surface.commands(), &[DrawCommand::Clear]);
    }

    #[test]
    fn test_untracked_pointer_has_no_effect() {
        let mut a = seeded(FieldConfig::ambient(), 800.0, 600.0);
        let mut b = seeded(FieldConfig::ambient(), 800.0, 600.0);
        b.set_pointer(-1000.0, -1000.0);
        for i in 0..100 {
            a.step(i as f64 * 16.0);
            b.step(i as f64 * 16.0);
        }
        assert_eq!(a.particles(), b.particles());
    }

    #[test]
    fn test_ambient_pointer_attracts() {
        let mut field = seeded(FieldConfig::ambient().with_cap(1), 800.0, 600.0);
        field.particles_mut()[0] = still_particle(400.0, 300.0);
        field.set_pointer(460.0, 300.0);
        field.step(0.0);

        let p = field.particles()[0];
        // force = (120 - 60) / 120, scaled by 0.02 and damped
        assert!((p.velocity.x - 0.5 * 0.02 * 0.999).abs() < 1e-6);
        assert_eq!(p.velocity.y, 0.0);
    }

    #[test]
    fn test_ember_pointer_repels_and_caps_opacity() {
        let mut field = seeded(FieldConfig::ember().with_cap(1), 800.0, 600.0);
        {
            let e = &mut field.embers_mut()[0];
            e.position = Vec2::new(200.0, 200.0);
            e.velocity = Vec2::new(0.0, -0.5);
            e.drift = 0.0;
            e.opacity = 1.0;
            e.age = 249;
            e.max_life = 500.0;
        }
        field.set_pointer(210.0, 199.5);
        field.step(0.0);

        let e = field.embers()[0];
        assert!(e.position.x < 200.0);
        assert_eq!(field.rendered_opacity()[0], 0.7);
    }

    #[test]
    fn test_ember_opacity_never_exceeds_cap() {
        let mut field = seeded(FieldConfig::ember(), 1280.0, 720.0);
        field.set_pointer(640.0, 500.0);
        for i in 0..1500 {
            field.step(i as f64 * 16.0);
            for &a in field.rendered_opacity() {
                assert!((0.0..=0.7).contains(&a));
            }
        }
    }

    #[test]
    fn test_ember_opacity_recomputed_each_frame() {
        let mut field = seeded(FieldConfig::ember(), 1366.0, 768.0);
        for i in 0..=50 {
            let t = i as f64 * 16.6;
            field.step(t);
            for (e, &alpha) in field.embers().iter().zip(field.rendered_opacity()) {
                // Respawned this frame, rendered before recycling
                if e.age == 0 {
                    continue;
                }
                let expected = e.opacity * e.envelope(0.1, 0.3) * e.flicker(t);
                assert!((alpha - expected).abs() < 1e-6);
            }
        }

        // Nothing is carried over: a zero base opacity shows up on the next frame
        {
            let e = &mut field.embers_mut()[0];
            e.position = Vec2::new(400.0, 300.0);
            e.age = 10;
            e.max_life = 500.0;
            e.opacity = 0.0;
        }
        field.step(1000.0);
        assert_eq!(field.rendered_opacity()[0], 0.0);

        field.embers_mut()[0].opacity = 0.4;
        field.step(1016.0);
        assert!(field.rendered_opacity()[0] > 0.0);
    }

    #[test]
    fn test_ambient_damping_without_pointer() {
        let mut field = seeded(FieldConfig::ambient().with_cap(1), 800.0, 600.0);
        field.particles_mut()[0] = Particle {
            velocity: Vec2::new(0.2, -0.1),
            ..still_particle(400.0, 300.0)
        };
        assert_eq!(field.pointer(), Vec2::new(-1000.0, -1000.0));

        field.step(0.0);
        let p = field.particles()[0];
        assert!((p.velocity.x - 0.2 * 0.999).abs() < 1e-7);
        assert!((p.velocity.y + 0.1 * 0.999).abs() < 1e-7);
        assert!((p.position.x - 400.2).abs() < 1e-4);

        field.step(16.0);
        let p = field.particles()[0];
        assert!((p.velocity.x - 0.2 * 0.999 * 0.999).abs() < 1e-7);
    }

    #[test]
    fn test_connection_lines_below_threshold() {
        let config = FieldConfig::ambient().with_cap(3);
        let mut field = seeded(config, 800.0, 600.0);
        let layout = [(100.0, 100.0), (200.0, 100.0), (100.0, 260.0)];
        for (p, (x, y)) in field.particles_mut().iter_mut().zip(layout) {
            *p = still_particle(x, y);
        }

        let mut surface = RecordingSurface::new(800.0, 600.0);
        field.frame(&mut surface, 0.0);
        assert_eq!(surface.lines(), 1);
        assert_eq!(surface.circles(), 3);

        // Lines are drawn beneath the dots
        assert!(matches!(surface.commands()[1], DrawCommand::Line { .. }));
    }

    #[test]
    fn test_spatial_grid_draws_same_lines() {
        let mut grid_conn = crate::connections::ConnectionConfig::default();
        grid_conn.spatial_grid = true;

        let mut brute = seeded(FieldConfig::ambient(), 1920.0, 1080.0);
        let mut bucketed = seeded(FieldConfig::ambient().with_connections(Some(grid_conn)), 1920.0, 1080.0);

        let mut a = RecordingSurface::new(1920.0, 1080.0);
        let mut b = RecordingSurface::new(1920.0, 1080.0);
        brute.frame(&mut a, 0.0);
        bucketed.frame(&mut b, 0.0);

        assert_eq!(a.lines(), b.lines());
        assert_eq!(a.circles(), b.circles());
    }

    #[test]
    fn test_ember_draws_glow_and_core() {
        let mut field = seeded(FieldConfig::ember(), 400.0, 300.0);
        let mut surface = RecordingSurface::new(400.0, 300.0);
        field.frame(&mut surface, 0.0);
        assert_eq!(surface.gradients(), 4);
        assert_eq!(surface.circles(), 4);
        assert_eq!(surface.lines(), 0);
    }

    #[test]
    fn test_paused_field_does_not_advance() {
        let mut field = seeded(FieldConfig::ember(), 800.0, 600.0);
        field.step(0.0);
        let before = field.embers().to_vec();

        field.pause();
        field.step(16.0);
        assert_eq!(field.embers(), &before[..]);

        field.resume();
        field.step(32.0);
        assert!(field.embers().iter().all(|e| e.age == 2 || e.age == 0));
    }
}
