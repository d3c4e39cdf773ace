//! Frame timing.
//!
//! Measures real frame time, clamps it to `max_dt` before it reaches the
//! world, and paces the loop to the target frame rate.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Frame timing manager.
#[derive(Debug)]
pub struct FrameTiming {
    /// Target frames per second
    target_fps: u32,
    /// Time budget per frame
    frame_budget: Duration,
    /// Time of last frame start
    last_frame: Instant,
    /// Largest delta handed to the world
    max_dt: f32,
    /// Sleep out the frame budget after each frame
    paced: bool,
    /// Recent frame times for averaging
    frame_times: VecDeque<f32>,
    /// Maximum samples for averaging
    max_samples: usize,
}

impl Default for FrameTiming {
    fn default() -> Self {
        Self::new(60, 0.1)
    }
}

impl FrameTiming {
    /// Create a frame timing manager.
    ///
    /// # Arguments
    /// * `target_fps` - Target frames per second for pacing
    /// * `max_dt` - Upper bound on any delta, in seconds
    #[must_use]
    pub fn new(target_fps: u32, max_dt: f32) -> Self {
        let target_fps = target_fps.max(1);
        Self {
            target_fps,
            frame_budget: Duration::from_secs_f64(1.0 / f64::from(target_fps)),
            last_frame: Instant::now(),
            max_dt: max_dt.max(0.001),
            paced: false,
            frame_times: VecDeque::with_capacity(120),
            max_samples: 120,
        }
    }

    /// Enable or disable sleeping out the frame budget.
    #[must_use]
    pub fn with_pacing(mut self, paced: bool) -> Self {
        self.paced = paced;
        self
    }

    /// Upper bound on any delta.
    #[must_use]
    pub fn max_dt(&self) -> f32 {
        self.max_dt
    }

    /// Clamp a raw delta to `0..=max_dt`.
    #[must_use]
    pub fn clamp(&self, dt: f32) -> f32 {
        dt.clamp(0.0, self.max_dt)
    }

    /// Delta of one ideal frame at the target rate, clamped.
    #[must_use]
    pub fn nominal_dt(&self) -> f32 {
        self.clamp(1.0 / self.target_fps as f32)
    }

    /// Real time since the last frame, clamped.
    /// Also stores the frame time for FPS calculation.
    pub fn delta_time(&mut self) -> f32 {
        let now = Instant::now();
        let dt = (now - self.last_frame).as_secs_f32();
        self.last_frame = now;

        let clamped_dt = self.clamp(dt);
        self.frame_times.push_back(clamped_dt);
        if self.frame_times.len() > self.max_samples {
            self.frame_times.pop_front();
        }

        clamped_dt
    }

    /// Sleep for the remainder of the frame budget (if pacing is on).
    pub fn sleep_remainder(&self) {
        if !self.paced {
            return;
        }

        let elapsed = self.last_frame.elapsed();
        if elapsed < self.frame_budget {
            std::thread::sleep(self.frame_budget - elapsed);
        }
    }

    /// Get the current FPS (averaged over recent frames).
    #[must_use]
    pub fn current_fps(&self) -> f32 {
        let avg = self.average_frame_time_ms() / 1000.0;
        if avg > 0.0 {
            1.0 / avg
        } else {
            0.0
        }
    }

    /// Get the average frame time in milliseconds.
    #[must_use]
    pub fn average_frame_time_ms(&self) -> f32 {
        if self.frame_times.is_empty() {
            return 0.0;
        }

        (self.frame_times.iter().sum::<f32>() / self.frame_times.len() as f32) * 1000.0
    }

    /// Get the target FPS.
    #[must_use]
    pub fn target_fps(&self) -> u32 {
        self.target_fps
    }

    /// Reset timing (call after loading).
    pub fn reset(&mut self) {
        self.last_frame = Instant::now();
        self.frame_times.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_timing_creation() {
        let timing = FrameTiming::new(60, 0.1);
        assert_eq!(timing.target_fps(), 60);
        assert!((timing.nominal_dt() - 1.0 / 60.0).abs() < 0.001);
        assert_eq!(FrameTiming::new(0, 0.1).target_fps(), 1);
    }

    #[test]
    fn test_nominal_dt_clamped() {
        // One frame per second would be a 1s step; max_dt caps it.
        let timing = FrameTiming::new(1, 0.1);
        assert_eq!(timing.nominal_dt(), 0.1);
    }

    #[test]
    fn test_clamp() {
        let timing = FrameTiming::new(60, 0.1);
        assert_eq!(timing.clamp(0.5), 0.1);
        assert_eq!(timing.clamp(-1.0), 0.0);
        assert_eq!(timing.clamp(0.05), 0.05);
    }

    #[test]
    fn test_frame_timing_delta() {
        let mut timing = FrameTiming::new(60, 0.5);
        std::thread::sleep(Duration::from_millis(16));
        let dt = timing.delta_time();
        assert!(dt >= 0.015);
        assert!(dt <= 0.5);
    }

    #[test]
    fn test_frame_timing_max_dt() {
        let mut timing = FrameTiming::new(60, 0.1);
        std::thread::sleep(Duration::from_millis(150));
        let dt = timing.delta_time();
        assert_eq!(dt, timing.max_dt());
    }

    #[test]
    fn test_reset_timing() {
        let mut timing = FrameTiming::new(60, 0.1);
        timing.frame_times.push_back(0.016);
        assert!(timing.current_fps() > 0.0);

        timing.reset();
        assert!(timing.frame_times.is_empty());
        assert_eq!(timing.current_fps(), 0.0);
    }

    #[test]
    fn test_pacing_setting() {
        assert!(FrameTiming::new(60, 0.1).with_pacing(true).paced);
        assert!(!FrameTiming::new(60, 0.1).paced);
    }
}
