//! Drawing surface abstraction.
//!
//! The particle field draws through the [`Surface`] trait so the same
//! simulation can target a browser 2D context, the software [`Canvas`]
//! presented by the native host, or a [`RecordingSurface`] in tests.
//!
//! [`Canvas`]: crate::raster::Canvas

use crate::color::Color;
use glam::{Vec2, Vec4};

/// A drawable target bound to the current viewport size.
pub trait Surface {
    /// Width in pixels.
    fn width(&self) -> f32;

    /// Height in pixels.
    fn height(&self) -> f32;

    /// Clear the entire surface to transparent.
    fn clear(&mut self);

    /// Fill a circle.
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color);

    /// Stroke a straight line segment.
    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Color);

    /// Fill a circle of `radius` with a gradient running from the center outward.
    fn fill_radial_gradient(&mut self, center: Vec2, radius: f32, gradient: &Gradient);
}

/// A radial gradient: color stops at offsets in `0.0..=1.0` from the center.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Gradient {
    stops: Vec<(f32, Color)>,
}

impl Gradient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a color stop. Offsets are clamped to `0.0..=1.0` and kept sorted.
    pub fn with_stop(mut self, offset: f32, color: Color) -> Self {
        let offset = offset.clamp(0.0, 1.0);
        let index = self.stops.partition_point(|(o, _)| *o <= offset);
        self.stops.insert(index, (offset, color));
        self
    }

    pub fn stops(&self) -> &[(f32, Color)] {
        &self.stops
    }

    /// Straight-alpha RGBA at offset `t`, interpolated between neighbouring stops.
    ///
    /// Offsets before the first stop take its color, offsets after the last
    /// take the last one. A gradient without stops is transparent.
    pub fn sample(&self, t: f32) -> Vec4 {
        let (first, last) = match (self.stops.first(), self.stops.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return Vec4::ZERO,
        };
        if t <= first.0 {
            return first.1.to_rgba();
        }
        if t >= last.0 {
            return last.1.to_rgba();
        }
        for pair in self.stops.windows(2) {
            let (o0, c0) = pair[0];
            let (o1, c1) = pair[1];
            if t <= o1 {
                let span = o1 - o0;
                let k = if span > 0.0 { (t - o0) / span } else { 1.0 };
                return c0.to_rgba().lerp(c1.to_rgba(), k);
            }
        }
        last.1.to_rgba()
    }
}

/// One call made against a [`RecordingSurface`].
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear,
    Circle {
        center: Vec2,
        radius: f32,
        color: Color,
    },
    Line {
        from: Vec2,
        to: Vec2,
        width: f32,
        color: Color,
    },
    RadialGradient {
        center: Vec2,
        radius: f32,
        gradient: Gradient,
    },
}

/// A surface that records draw calls instead of rasterizing them.
///
/// Useful for headless inspection of what a frame would draw.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    width: f32,
    height: f32,
    commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            commands: Vec::new(),
        }
    }

    /// Every command since construction or the last [`take`](Self::take).
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Drain the recorded commands.
    pub fn take(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
    }

    pub fn circles(&self) -> usize {
        self.count(|c| matches!(c, DrawCommand::Circle { .. }))
    }

    pub fn lines(&self) -> usize {
        self.count(|c| matches!(c, DrawCommand::Line { .. }))
    }

    pub fn gradients(&self) -> usize {
        self.count(|c| matches!(c, DrawCommand::RadialGradient { .. }))
    }

    fn count(&self, pred: impl Fn(&DrawCommand) -> bool) -> usize {
        self.commands.iter().filter(|c| pred(c)).count()
    }
}

impl Surface for RecordingSurface {
    fn width(&self) -> f32 {
        self.width
    }

    fn height(&self) -> f32 {
        self.height
    }

    fn clear(&mut self) {
        self.commands.push(DrawCommand::Clear);
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        self.commands.push(DrawCommand::Circle {
            center,
            radius,
            color,
        });
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Color) {
        self.commands.push(DrawCommand::Line {
            from,
            to,
            width,
            color,
        });
    }

    fn fill_radial_gradient(&mut self, center: Vec2, radius: f32, gradient: &Gradient) {
        self.commands.push(DrawCommand::RadialGradient {
            center,
            radius,
            gradient: gradient.clone(),
        });
    }
}
