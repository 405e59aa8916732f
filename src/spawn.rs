//! Spawn helpers for particle initialization.
//!
//! Provides the population formula and a small RNG wrapper used whenever a
//! particle or ember is (re)created.

use crate::config::Population;
use glam::Vec2;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::ops::Range;

/// Number of bodies for a surface: `min(cap, floor(width * height / divisor))`.
///
/// Zero, negative or non-finite dimensions give an empty field.
pub fn particle_count(width: f32, height: f32, population: &Population) -> usize {
    if !(width > 0.0 && height > 0.0 && width.is_finite() && height.is_finite()) {
        return 0;
    }
    if !(population.density_divisor > 0.0) {
        return 0;
    }
    let by_area = (width as f64 * height as f64 / population.density_divisor as f64).floor();
    (by_area as usize).min(population.cap)
}

/// Random source handed to spawn functions.
///
/// Hosts use [`SpawnContext::from_entropy`]; tests seed it for reproducible fields.
#[derive(Debug, Clone)]
pub struct SpawnContext {
    rng: SmallRng,
}

impl SpawnContext {
    /// Seed from the operating system (or the browser's crypto API on wasm).
    pub fn from_entropy() -> Self {
        Self {
            rng: SmallRng::from_entropy(),
        }
    }

    /// Deterministic context for reproducible runs.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// Random f32 between 0.0 and 1.0.
    #[inline]
    pub fn random(&mut self) -> f32 {
        self.rng.gen()
    }

    /// Uniform sample from `range`.
    ///
    /// An empty range (`start >= end`) yields `start` instead of panicking,
    /// so a config can pin a value by giving equal bounds.
    #[inline]
    pub fn sample(&mut self, range: &Range<f32>) -> f32 {
        if range.start < range.end {
            self.rng.gen_range(range.clone())
        } else {
            range.start
        }
    }

    /// Random angle in `[0, 2π)`.
    #[inline]
    pub fn angle(&mut self) -> f32 {
        self.sample(&(0.0..std::f32::consts::TAU))
    }

    /// Uniform point on a `width` x `height` surface.
    pub fn position_in(&mut self, width: f32, height: f32) -> Vec2 {
        Vec2::new(
            self.sample(&(0.0..width.max(0.0))),
            self.sample(&(0.0..height.max(0.0))),
        )
    }
}

impl Default for SpawnContext {
    fn default() -> Self {
        Self::from_entropy()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_full_hd_ambient() {
        // 2073600 / 15000 = 138, capped at 80
        assert_eq!(particle_count(1920.0, 1080.0, &Population::ambient()), 80);
    }

    #[test]
    fn test_count_small_ember() {
        // 120000 / 25000 = 4.8
        assert_eq!(particle_count(400.0, 300.0, &Population::ember()), 4);
    }

    #[test]
    fn test_count_matches_formula() {
        let pop = Population::ember();
        for (w, h) in [(1.0, 1.0), (320.0, 568.0), (1366.0, 768.0), (3840.0, 2160.0)] {
            let expected = ((w * h / 25_000.0) as f64).floor() as usize;
            assert_eq!(particle_count(w as f32, h as f32, &pop), expected.min(60));
        }
    }

    #[test]
    fn test_count_degenerate_surface() {
        let pop = Population::ambient();
        assert_eq!(particle_count(0.0, 1080.0, &pop), 0);
        assert_eq!(particle_count(1920.0, -1.0, &pop), 0);
        assert_eq!(particle_count(f32::NAN, 10.0, &pop), 0);
    }

    #[test]
    fn test_sample_within_range() {
        let mut ctx = SpawnContext::seeded(1);
        for _ in 0..1000 {
            let v = ctx.sample(&(15.0..45.0));
            assert!((15.0..45.0).contains(&v));
        }
    }

    #[test]
    fn test_sample_empty_range() {
        let mut ctx = SpawnContext::seeded(1);
        assert_eq!(ctx.sample(&(2.0..2.0)), 2.0);
        assert_eq!(ctx.sample(&(5.0..1.0)), 5.0);
    }

    #[test]
    fn test_seeded_is_reproducible() {
        let mut a = SpawnContext::seeded(99);
        let mut b = SpawnContext::seeded(99);
        for _ in 0..10 {
            assert_eq!(a.random(), b.random());
        }
    }

    #[test]
    fn test_position_in_zero_surface() {
        let mut ctx = SpawnContext::seeded(3);
        assert_eq!(ctx.position_in(0.0, 0.0), Vec2::ZERO);
    }
}
