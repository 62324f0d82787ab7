//! Frame timing for the render loop.
//!
//! The animations themselves advance a fixed amount per frame; this clock only
//! tracks how fast frames are arriving so the loop can report it.
//!
//! # Example
//!
//! ```
//! use hyperfield::time::FrameClock;
//!
//! let mut clock = FrameClock::new();
//! if let Some(fps) = clock.tick() {
//!     println!("{:.1} fps", fps);
//! }
//! assert_eq!(clock.frame(), 1);
//! ```

use std::time::{Duration, Instant};

/// Counts frames and samples the frame rate periodically.
#[derive(Debug)]
pub struct FrameClock {
    start: Instant,
    last_frame: Instant,
    /// Time since last frame in seconds.
    delta_secs: f32,
    frame_count: u64,
    /// Last sampled frame rate.
    fps: f32,
    /// Frame count at last FPS sample.
    fps_frame_count: u64,
    fps_update_time: Instant,
    fps_update_interval: Duration,
}

impl FrameClock {
    /// Clock sampling the frame rate every five seconds.
    pub fn new() -> Self {
        Self::with_interval(Duration::from_secs(5))
    }

    pub fn with_interval(interval: Duration) -> Self {
        let now = Instant::now();
        Self {
            start: now,
            last_frame: now,
            delta_secs: 0.0,
            frame_count: 0,
            fps: 0.0,
            fps_frame_count: 0,
            fps_update_time: now,
            fps_update_interval: interval,
        }
    }

    /// Record a frame. Returns a fresh FPS sample when the interval has
    /// elapsed since the previous one.
    pub fn tick(&mut self) -> Option<f32> {
        let now = Instant::now();
        self.delta_secs = now.duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;
        self.frame_count += 1;

        let since_sample = now.duration_since(self.fps_update_time);
        if since_sample < self.fps_update_interval {
            return None;
        }
        let frames = self.frame_count - self.fps_frame_count;
        self.fps = frames as f32 / since_sample.as_secs_f32();
        self.fps_frame_count = self.frame_count;
        self.fps_update_time = now;
        Some(self.fps)
    }

    /// Time since the previous frame in seconds.
    #[inline]
    pub fn delta(&self) -> f32 {
        self.delta_secs
    }

    /// Frames recorded since creation.
    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame_count
    }

    /// Most recent FPS sample (0 until the first one).
    #[inline]
    pub fn fps(&self) -> f32 {
        self.fps
    }

    #[inline]
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}
