//! Body types for the two field variants.
//!
//! | Type | Variant | Lifespan | Boundary |
//! |------|---------|----------|----------|
//! | [`Particle`] | ambient | none | reflects off every edge |
//! | [`Ember`] | ember | `max_life` frames | respawned once it leaves through the top |
//!
//! Only position, velocity and an ember's age carry over between frames.
//! Everything that affects opacity (fade, flicker, pointer boost) is
//! recomputed from those each frame.

use crate::color::Color;
use crate::config::{AmbientStyle, EmberStyle};
use crate::spawn::SpawnContext;
use crate::surface::Gradient;
use glam::Vec2;

/// A drifting dot of the ambient field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub position: Vec2,
    /// Pixels per frame.
    pub velocity: Vec2,
    pub radius: f32,
    pub opacity: f32,
}

impl Particle {
    /// Sample a particle anywhere on the surface.
    pub fn spawn(ctx: &mut SpawnContext, width: f32, height: f32, style: &AmbientStyle) -> Self {
        Self {
            position: ctx.position_in(width, height),
            velocity: Vec2::new(ctx.sample(&style.speed), ctx.sample(&style.speed)),
            radius: ctx.sample(&style.radius),
            opacity: ctx.sample(&style.opacity),
        }
    }

    /// Move one frame and bounce off the surface edges.
    ///
    /// A particle that crosses an edge is put back on it with the velocity
    /// on that axis pointing inward, so it never leaves `[0, width] x [0, height]`.
    pub fn advance(&mut self, width: f32, height: f32) {
        self.position += self.velocity;
        reflect(&mut self.position.x, &mut self.velocity.x, width);
        reflect(&mut self.position.y, &mut self.velocity.y, height);
    }
}

#[inline]
fn reflect(position: &mut f32, velocity: &mut f32, extent: f32) {
    if *position < 0.0 {
        *position = 0.0;
        *velocity = velocity.abs();
    } else if *position > extent {
        *position = extent.max(0.0);
        *velocity = -velocity.abs();
    }
}

/// A rising, flickering ember.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ember {
    pub position: Vec2,
    /// Pixels per frame; `y` is negative (upward).
    pub velocity: Vec2,
    pub radius: f32,
    /// Base opacity before fade, flicker and pointer boost.
    pub opacity: f32,
    /// Frames lived so far.
    pub age: u32,
    /// Lifespan in frames.
    pub max_life: f32,
    /// Degrees.
    pub hue: f32,
    /// Radians per millisecond.
    pub flicker_rate: f32,
    /// Radians.
    pub flicker_phase: f32,
    /// Radians per millisecond.
    pub drift: f32,
}

impl Ember {
    /// Sample a fresh ember somewhere below the bottom edge.
    pub fn spawn(ctx: &mut SpawnContext, width: f32, height: f32, style: &EmberStyle) -> Self {
        Self {
            position: Vec2::new(
                ctx.sample(&(0.0..width.max(0.0))),
                height + ctx.sample(&(0.0..style.spawn_depth)),
            ),
            velocity: Vec2::new(ctx.sample(&style.speed_x), -ctx.sample(&style.rise_speed)),
            radius: ctx.sample(&style.radius),
            opacity: ctx.sample(&style.opacity),
            age: 0,
            max_life: ctx.sample(&style.life),
            hue: ctx.sample(&style.hue),
            flicker_rate: ctx.sample(&style.flicker_rate),
            flicker_phase: ctx.angle(),
            drift: ctx.sample(&style.drift),
        }
    }

    /// Fraction of the lifespan used so far.
    #[inline]
    pub fn life_fraction(&self) -> f32 {
        if self.max_life > 0.0 {
            self.age as f32 / self.max_life
        } else {
            1.0
        }
    }

    /// Age-based opacity multiplier in `0.0..=1.0`.
    ///
    /// Ramps up linearly over the first `fade_in` of the lifespan, holds at
    /// 1, then ramps down over the last `fade_out`.
    pub fn envelope(&self, fade_in: f32, fade_out: f32) -> f32 {
        let f = self.life_fraction();
        let mut k = 1.0_f32;
        if fade_in > 0.0 && f < fade_in {
            k *= f / fade_in;
        }
        if fade_out > 0.0 && f > 1.0 - fade_out {
            k *= (1.0 - f) / fade_out;
        }
        k.clamp(0.0, 1.0)
    }

    /// Flicker multiplier in `0.4..=1.0` at frame time `time` (milliseconds).
    #[inline]
    pub fn flicker(&self, time: f64) -> f32 {
        0.7 + 0.3 * (time * self.flicker_rate as f64 + self.flicker_phase as f64).sin() as f32
    }

    /// Sideways displacement for this frame.
    #[inline]
    pub fn drift_offset(&self, time: f64, amplitude: f32) -> f32 {
        (time * self.drift as f64).sin() as f32 * amplitude
    }

    /// Whether the ember has outlived its lifespan or risen past the top edge.
    #[inline]
    pub fn expired(&self, escape_margin: f32) -> bool {
        self.age as f32 >= self.max_life || self.position.y < -escape_margin
    }

    /// Soft glow: bright core, mid falloff at 30%, transparent edge.
    pub fn glow(&self, alpha: f32) -> Gradient {
        Gradient::new()
            .with_stop(0.0, Color::hsla(self.hue, 0.9, 0.6, alpha))
            .with_stop(0.3, Color::hsla(self.hue, 0.9, 0.55, alpha * 0.4))
            .with_stop(1.0, Color::hsla(self.hue, 0.9, 0.5, 0.0))
    }

    /// Color of the small bright core drawn over the glow.
    pub fn core_color(&self, alpha: f32) -> Color {
        Color::hsla(self.hue, 1.0, 0.8, (alpha * 1.8).min(1.0))
    }
}
