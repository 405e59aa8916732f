//! Pointer proximity forces.
//!
//! Every body within `radius` of the tracked pointer feels a force that
//! falls off linearly from 1 at the pointer to 0 at the radius:
//!
//! ```text
//! force = (radius - distance) / radius     if distance < radius
//!       = 0                                 otherwise
//! ```
//!
//! What the force does is up to the variant. The ambient field adds it to
//! velocity along a unit direction; the ember field nudges position by the
//! raw pointer offset and brightens the ember.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Which way the pointer pushes nearby bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerResponse {
    /// Pull bodies toward the pointer.
    #[default]
    Attract,
    /// Push bodies away from the pointer.
    Repel,
}

/// Pointer interaction settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PointerConfig {
    /// Interaction radius in pixels. Bodies at or beyond it are unaffected.
    pub radius: f32,
    /// Scale applied to the force before it reaches the body.
    pub strength: f32,
    pub response: PointerResponse,
}

impl PointerConfig {
    /// Soft attraction used by the ambient field.
    pub fn ambient() -> Self {
        Self {
            radius: 120.0,
            strength: 0.02,
            response: PointerResponse::Attract,
        }
    }

    /// Repulsion used by the ember field.
    pub fn ember() -> Self {
        Self {
            radius: 100.0,
            strength: 0.02,
            response: PointerResponse::Repel,
        }
    }

    /// The pointer's effect on a body at `body`, or `None` outside the radius.
    pub fn influence(&self, body: Vec2, pointer: Vec2) -> Option<Influence> {
        let offset = body - pointer;
        let distance = offset.length();
        let force = proximity_force(distance, self.radius);
        if force > 0.0 {
            Some(Influence {
                offset,
                distance,
                force,
            })
        } else {
            None
        }
    }
}

impl Default for PointerConfig {
    fn default() -> Self {
        Self::ambient()
    }
}

/// Linear falloff force in `0.0..=1.0`.
///
/// Zero at or beyond `radius` (and for a non-positive radius), 1 at distance 0.
#[inline]
pub fn proximity_force(distance: f32, radius: f32) -> f32 {
    if radius <= 0.0 || !(distance < radius) {
        return 0.0;
    }
    ((radius - distance) / radius).clamp(0.0, 1.0)
}

/// The pointer's effect on one body this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Influence {
    /// Body position minus pointer position.
    pub offset: Vec2,
    pub distance: f32,
    /// Falloff force, strictly positive.
    pub force: f32,
}

impl Influence {
    /// Raw offset oriented by `response` (away from the pointer for repel).
    #[inline]
    pub fn delta(&self, response: PointerResponse) -> Vec2 {
        match response {
            PointerResponse::Repel => self.offset,
            PointerResponse::Attract => -self.offset,
        }
    }

    /// Unit direction oriented by `response`. Zero when the body sits on the pointer.
    #[inline]
    pub fn direction(&self, response: PointerResponse) -> Vec2 {
        self.delta(response).normalize_or_zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_force_zero_at_threshold() {
        assert_eq!(proximity_force(120.0, 120.0), 0.0);
        assert_eq!(proximity_force(100.0, 100.0), 0.0);
        assert_eq!(proximity_force(250.0, 100.0), 0.0);
    }

    #[test]
    fn test_force_is_one_at_pointer() {
        assert_eq!(proximity_force(0.0, 100.0), 1.0);
    }

    #[test]
    fn test_force_monotonic() {
        let mut last = f32::INFINITY;
        for d in 0..=100 {
            let f = proximity_force(d as f32, 100.0);
            assert!(f <= last);
            assert!((0.0..=1.0).contains(&f));
            last = f;
        }
    }

    #[test]
    fn test_degenerate_radius() {
        assert_eq!(proximity_force(0.0, 0.0), 0.0);
        assert_eq!(proximity_force(f32::NAN, 10.0), 0.0);
    }

    #[test]
    fn test_influence_directions() {
        let cfg = PointerConfig::ember();
        let inf = cfg
            .influence(Vec2::new(60.0, 0.0), Vec2::ZERO)
            .unwrap();
        assert!((inf.force - 0.4).abs() < 1e-6);
        assert_eq!(inf.direction(PointerResponse::Repel), Vec2::X);
        assert_eq!(inf.direction(PointerResponse::Attract), -Vec2::X);
        assert_eq!(inf.delta(PointerResponse::Repel), Vec2::new(60.0, 0.0));
    }

    #[test]
    fn test_no_influence_from_sentinel() {
        let cfg = PointerConfig::ambient();
        assert!(cfg
            .influence(Vec2::new(10.0, 10.0), Vec2::splat(-1000.0))
            .is_none());
    }

    #[test]
    fn test_body_on_pointer_has_no_direction() {
        let inf = PointerConfig::ambient()
            .influence(Vec2::splat(5.0), Vec2::splat(5.0))
            .unwrap();
        assert_eq!(inf.force, 1.0);
        assert_eq!(inf.direction(PointerResponse::Attract), Vec2::ZERO);
    }
}
