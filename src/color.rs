//! Colors accepted by drawing surfaces.
//!
//! Surfaces take colors either as hue/saturation/lightness/alpha (how the
//! ember glow is specified) or as plain RGBA (ambient dots and lines).

use glam::Vec4;
use serde::{Deserialize, Serialize};

/// A color in HSLA or RGBA form.
///
/// Components other than hue are in `0.0..=1.0`; hue is in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "space", rename_all = "lowercase")]
pub enum Color {
    /// Hue (degrees), saturation, lightness, alpha.
    Hsla { h: f32, s: f32, l: f32, a: f32 },
    /// Red, green, blue, alpha.
    Rgba { r: f32, g: f32, b: f32, a: f32 },
}

impl Color {
    /// Transparent black.
    pub const TRANSPARENT: Color = Color::Rgba { r: 0.0, g: 0.0, b: 0.0, a: 0.0 };

    pub const fn hsla(h: f32, s: f32, l: f32, a: f32) -> Self {
        Color::Hsla { h, s, l, a }
    }

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Color::Rgba { r, g, b, a }
    }

    /// Build an RGBA color from 8-bit channels.
    pub fn rgb8(r: u8, g: u8, b: u8, a: f32) -> Self {
        Color::Rgba {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
            a,
        }
    }

    /// Alpha component, clamped to `0.0..=1.0`.
    pub fn alpha(&self) -> f32 {
        match *self {
            Color::Hsla { a, .. } | Color::Rgba { a, .. } => a.clamp(0.0, 1.0),
        }
    }

    /// Same color with a different alpha.
    pub fn with_alpha(self, alpha: f32) -> Self {
        match self {
            Color::Hsla { h, s, l, .. } => Color::Hsla { h, s, l, a: alpha },
            Color::Rgba { r, g, b, .. } => Color::Rgba { r, g, b, a: alpha },
        }
    }

    /// Straight-alpha RGBA with every channel clamped to `0.0..=1.0`.
    pub fn to_rgba(&self) -> Vec4 {
        match *self {
            Color::Hsla { h, s, l, a } => {
                let s = s.clamp(0.0, 1.0);
                let l = l.clamp(0.0, 1.0);
                let h = h.rem_euclid(360.0);
                let amount = s * l.min(1.0 - l);
                let channel = |n: f32| {
                    let k = (n + h / 30.0) % 12.0;
                    l - amount * (k - 3.0).min(9.0 - k).min(1.0).max(-1.0)
                };
                Vec4::new(channel(0.0), channel(8.0), channel(4.0), a.clamp(0.0, 1.0))
            }
            Color::Rgba { r, g, b, a } => Vec4::new(r, g, b, a).clamp(Vec4::ZERO, Vec4::ONE),
        }
    }

    /// CSS color string, as handed to a browser 2D context.
    pub fn css(&self) -> String {
        match *self {
            Color::Hsla { h, s, l, a } => format!(
                "hsla({}, {}%, {}%, {})",
                h,
                (s * 100.0).round(),
                (l * 100.0).round(),
                a.clamp(0.0, 1.0)
            ),
            Color::Rgba { r, g, b, a } => format!(
                "rgba({}, {}, {}, {})",
                (r.clamp(0.0, 1.0) * 255.0).round() as u8,
                (g.clamp(0.0, 1.0) * 255.0).round() as u8,
                (b.clamp(0.0, 1.0) * 255.0).round() as u8,
                a.clamp(0.0, 1.0)
            ),
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::TRANSPARENT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Vec4, b: Vec4) -> bool {
        (a - b).abs().max_element() < 1e-4
    }

    #[test]
    fn test_primary_hues() {
        assert!(close(Color::hsla(0.0, 1.0, 0.5, 1.0).to_rgba(), Vec4::new(1.0, 0.0, 0.0, 1.0)));
        assert!(close(Color::hsla(120.0, 1.0, 0.5, 1.0).to_rgba(), Vec4::new(0.0, 1.0, 0.0, 1.0)));
        assert!(close(Color::hsla(240.0, 1.0, 0.5, 1.0).to_rgba(), Vec4::new(0.0, 0.0, 1.0, 1.0)));
    }

    #[test]
    fn test_lightness_extremes() {
        assert!(close(Color::hsla(30.0, 0.9, 1.0, 1.0).to_rgba(), Vec4::ONE));
        assert!(close(Color::hsla(30.0, 0.9, 0.0, 0.0).to_rgba(), Vec4::ZERO));
    }

    #[test]
    fn test_ember_orange_is_warm() {
        // Middle of the ember hue band
        let c = Color::hsla(30.0, 0.9, 0.6, 0.5).to_rgba();
        assert!(c.x > c.y && c.y > c.z);
        assert_eq!(c.w, 0.5);
    }

    #[test]
    fn test_alpha_clamped() {
        assert_eq!(Color::rgba(1.0, 1.0, 1.0, 1.8).alpha(), 1.0);
        assert_eq!(Color::hsla(20.0, 1.0, 0.8, -0.2).to_rgba().w, 0.0);
    }

    #[test]
    fn test_css_strings() {
        assert_eq!(Color::hsla(20.0, 0.9, 0.6, 0.5).css(), "hsla(20, 90%, 60%, 0.5)");
        assert_eq!(Color::rgb8(100, 255, 218, 0.25).css(), "rgba(100, 255, 218, 0.25)");
    }
}
