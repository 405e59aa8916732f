//! Pointer tracking.
//!
//! The field only cares about one thing: where the pointer was last seen.
//! Until the first move event the pointer sits at a far off-surface
//! sentinel, which is outside every interaction radius, so no special
//! "no pointer" branch is needed anywhere.

use glam::Vec2;

/// Last known pointer position in surface pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pointer {
    position: Vec2,
}

impl Pointer {
    /// Position before any pointer event arrives.
    pub const SENTINEL: Vec2 = Vec2::new(-1000.0, -1000.0);

    pub fn new() -> Self {
        Self {
            position: Self::SENTINEL,
        }
    }

    /// Overwrite the tracked position. Last write wins.
    #[inline]
    pub fn move_to(&mut self, x: f32, y: f32) {
        self.position = Vec2::new(x, y);
    }

    /// Forget the pointer, e.g. when it leaves the window.
    #[inline]
    pub fn reset(&mut self) {
        self.position = Self::SENTINEL;
    }

    #[inline]
    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Whether a real position has been recorded.
    #[inline]
    pub fn is_tracking(&self) -> bool {
        self.position != Self::SENTINEL
    }
}

impl Default for Pointer {
    fn default() -> Self {
        Self::new()
    }
}

/// Cursor position carried by a winit event, in physical pixels.
#[cfg(not(target_arch = "wasm32"))]
pub fn cursor_position(event: &winit::event::WindowEvent) -> Option<Vec2> {
    match event {
        winit::event::WindowEvent::CursorMoved { position, .. } => {
            Some(Vec2::new(position.x as f32, position.y as f32))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_at_sentinel() {
        let pointer = Pointer::new();
        assert_eq!(pointer.position(), Vec2::new(-1000.0, -1000.0));
        assert!(!pointer.is_tracking());
    }

    #[test]
    fn test_last_write_wins() {
        let mut pointer = Pointer::new();
        pointer.move_to(10.0, 20.0);
        pointer.move_to(30.0, 40.0);
        assert_eq!(pointer.position(), Vec2::new(30.0, 40.0));
        assert!(pointer.is_tracking());

        pointer.reset();
        assert!(!pointer.is_tracking());
    }
}
