//! Frame clock
//!
//! Converts host frame timestamps (milliseconds, as delivered by an animation
//! frame callback) into a clamped simulation delta. Frame rate is clamped to
//! `[MIN_FPS, MAX_FPS]` so a stalled tab never produces a huge physics step.

use crate::consts::{MAX_FPS, MIN_FPS};

#[derive(Debug, Clone, Default)]
pub struct Clock {
    last_ms: Option<f64>,
    /// Smoothed frames per second over the last window
    fps_samples: Vec<f32>,
}

const FPS_SAMPLE_COUNT: usize = 60;

impl Clock {
    pub fn new() -> Self {
        Self {
            last_ms: None,
            fps_samples: Vec::with_capacity(FPS_SAMPLE_COUNT),
        }
    }

    /// Delta time in seconds for a frame arriving at `now_ms`
    pub fn delta(&mut self, now_ms: f64) -> f32 {
        let fps = match self.last_ms {
            Some(last) if now_ms > last => (1000.0 / (now_ms - last)) as f32,
            _ => MAX_FPS,
        };
        self.last_ms = Some(now_ms);

        let fps = fps.clamp(MIN_FPS, MAX_FPS);
        if self.fps_samples.len() == FPS_SAMPLE_COUNT {
            self.fps_samples.remove(0);
        }
        self.fps_samples.push(fps);

        1.0 / fps
    }

    /// Forget the previous timestamp (after a pause, so the gap isn't counted)
    pub fn reset(&mut self) {
        self.last_ms = None;
    }

    pub fn smoothed_fps(&self) -> f32 {
        if self.fps_samples.is_empty() {
            return MAX_FPS;
        }
        self.fps_samples.iter().sum::<f32>() / self.fps_samples.len() as f32
    }
}
