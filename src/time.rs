//! Frame clock driven by host timestamps.
//!
//! Browsers hand `requestAnimationFrame` callbacks a high-resolution
//! timestamp in milliseconds; the native host derives the same value from
//! an [`Instant`](std::time::Instant). Either way the clock never reads the
//! system time itself, so a field can be stepped deterministically in tests.
//!
//! # Example
//!
//! ```ignore
//! use emberfield::time::FrameClock;
//!
//! let mut clock = FrameClock::new();
//! clock.tick(0.0);
//! clock.tick(16.0);
//!
//! assert_eq!(clock.frame(), 2);
//! assert_eq!(clock.delta(), 16.0);
//! ```

/// How often the FPS estimate is refreshed, in milliseconds.
const FPS_WINDOW_MS: f64 = 500.0;

/// Timing state for the animation loop.
///
/// Tracks the latest timestamp, the delta since the previous tick, a frame
/// counter and a periodically refreshed FPS estimate.
#[derive(Debug, Clone)]
pub struct FrameClock {
    /// Timestamp of the latest tick, milliseconds.
    now: f64,
    /// Timestamp of the previous tick, `None` before the first tick or after a resume.
    last: Option<f64>,
    /// Milliseconds between the last two ticks.
    delta: f64,
    frame_count: u64,
    fps: f32,
    fps_frame_count: u64,
    fps_window_start: f64,
    paused: bool,
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            now: 0.0,
            last: None,
            delta: 0.0,
            frame_count: 0,
            fps: 0.0,
            fps_frame_count: 0,
            fps_window_start: 0.0,
            paused: false,
        }
    }

    /// Record a frame at `timestamp` (milliseconds).
    ///
    /// Returns the timestamp the simulation should use for this frame. While
    /// paused the frame is not counted and the previous timestamp is returned.
    /// A timestamp older than the previous one is treated as zero delta.
    pub fn tick(&mut self, timestamp: f64) -> f64 {
        if self.paused {
            self.delta = 0.0;
            return self.now;
        }

        let first = self.last.is_none();
        self.delta = match self.last {
            Some(last) => (timestamp - last).max(0.0),
            None => 0.0,
        };
        self.last = Some(timestamp);
        self.now = timestamp;
        self.frame_count += 1;

        if first {
            self.fps_window_start = timestamp;
            self.fps_frame_count = self.frame_count;
            return self.now;
        }

        let window = timestamp - self.fps_window_start;
        if window >= FPS_WINDOW_MS {
            let frames = self.frame_count - self.fps_frame_count;
            self.fps = (frames as f64 * 1000.0 / window) as f32;
            self.fps_frame_count = self.frame_count;
            self.fps_window_start = timestamp;
        }

        self.now
    }

    /// Timestamp of the latest tick, milliseconds.
    #[inline]
    pub fn now(&self) -> f64 {
        self.now
    }

    /// Milliseconds since the previous tick.
    #[inline]
    pub fn delta(&self) -> f64 {
        self.delta
    }

    /// Ticks recorded since creation, excluding paused ones.
    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame_count
    }

    /// Frames per second over the last completed window.
    #[inline]
    pub fn fps(&self) -> f32 {
        self.fps
    }

    #[inline]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Stop counting frames, e.g. while the window is hidden.
    pub fn pause(&mut self) {
        self.paused = true;
    }

    /// Resume counting. The next tick reports zero delta.
    pub fn resume(&mut self) {
        if self.paused {
            self.paused = false;
            self.last = None;
        }
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_new() {
        let clock = FrameClock::new();
        assert_eq!(clock.frame(), 0);
        assert_eq!(clock.delta(), 0.0);
        assert!(!clock.is_paused());
    }

    #[test]
    fn test_first_tick_has_zero_delta() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.tick(1234.5), 1234.5);
        assert_eq!(clock.delta(), 0.0);
        assert_eq!(clock.frame(), 1);
    }

    #[test]
    fn test_tick_delta() {
        let mut clock = FrameClock::new();
        clock.tick(100.0);
        clock.tick(116.0);
        assert_eq!(clock.delta(), 16.0);
        assert_eq!(clock.now(), 116.0);

        // Out-of-order timestamp
        clock.tick(110.0);
        assert_eq!(clock.delta(), 0.0);
    }

    #[test]
    fn test_pause_freezes_time() {
        let mut clock = FrameClock::new();
        clock.tick(0.0);
        clock.tick(16.0);

        clock.pause();
        assert_eq!(clock.tick(5000.0), 16.0);
        assert_eq!(clock.delta(), 0.0);
        assert_eq!(clock.frame(), 2);

        clock.resume();
        clock.tick(9000.0);
        assert_eq!(clock.delta(), 0.0);
        assert_eq!(clock.frame(), 3);
        clock.tick(9016.0);
        assert_eq!(clock.delta(), 16.0);
    }

    #[test]
    fn test_fps_estimate() {
        let mut clock = FrameClock::new();
        for i in 0..=60 {
            clock.tick(i as f64 * 10.0);
        }
        // 50 frames per 500 ms window
        assert!((clock.fps() - 100.0).abs() < 1.0);
    }
}
