//! Frame timing for the render loop.
//!
//! The animations advance a fixed amount per tick rather than per second, so
//! timing only feeds diagnostics: frame count, delta and a periodically
//! refreshed FPS figure that the scheduler logs.
//!
//! ```ignore
//! let mut clock = FrameClock::new();
//!
//! // Once per frame:
//! if clock.update() {
//!     log::debug!("{:.1} fps over {} frames", clock.fps(), clock.frame());
//! }
//! ```

use std::time::{Duration, Instant};

/// Tracks frame count, delta time and FPS.
#[derive(Debug)]
pub struct FrameClock {
    /// When the clock was created.
    start: Instant,
    /// When the last frame occurred.
    last_frame: Instant,
    /// Time since last frame in seconds.
    delta_secs: f32,
    /// Total frames since start.
    frame_count: u64,
    /// FPS measured over the last report interval.
    fps: f32,
    /// Frame count at last FPS update.
    fps_frame_count: u64,
    /// Time of last FPS calculation.
    fps_update_time: Instant,
    /// How often to refresh the FPS figure.
    report_interval: Duration,
}

impl FrameClock {
    /// Create a clock that refreshes its FPS figure every two seconds.
    pub fn new() -> Self {
        Self::with_report_interval(Duration::from_secs(2))
    }

    pub fn with_report_interval(report_interval: Duration) -> Self {
        let now = Instant::now();
        Self {
            start: now,
            last_frame: now,
            delta_secs: 0.0,
            frame_count: 0,
            fps: 0.0,
            fps_frame_count: 0,
            fps_update_time: now,
            report_interval,
        }
    }

    /// Record a frame. Call once per tick.
    ///
    /// Returns `true` when the FPS figure was refreshed on this call.
    pub fn update(&mut self) -> bool {
        let now = Instant::now();

        self.delta_secs = now.duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;
        self.frame_count += 1;

        let fps_elapsed = now.duration_since(self.fps_update_time);
        if fps_elapsed >= self.report_interval {
            let frames_since = self.frame_count - self.fps_frame_count;
            self.fps = frames_since as f32 / fps_elapsed.as_secs_f32();
            self.fps_frame_count = self.frame_count;
            self.fps_update_time = now;
            return true;
        }
        false
    }

    /// Time since last frame in seconds (delta time).
    #[inline]
    pub fn delta(&self) -> f32 {
        self.delta_secs
    }

    /// Total frames since start.
    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame_count
    }

    /// Frames per second over the last report interval.
    #[inline]
    pub fn fps(&self) -> f32 {
        self.fps
    }

    /// Total elapsed time since the clock started.
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
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
    use std::thread;

    #[test]
    fn test_clock_new() {
        let clock = FrameClock::new();
        assert_eq!(clock.frame(), 0);
        assert_eq!(clock.fps(), 0.0);
    }

    #[test]
    fn test_clock_update() {
        let mut clock = FrameClock::new();
        thread::sleep(Duration::from_millis(10));
        clock.update();

        assert!(clock.delta() > 0.0);
        assert_eq!(clock.frame(), 1);
    }

    #[test]
    fn test_fps_reported_after_interval() {
        let mut clock = FrameClock::with_report_interval(Duration::from_millis(20));
        assert!(!clock.update());
        thread::sleep(Duration::from_millis(30));
        assert!(clock.update());
        assert!(clock.fps() > 0.0);
    }
}
