//! Frame clock
//!
//! Caps the loop at a target frame rate and reports the time each frame took.

use std::thread;
use std::time::{Duration, Instant};

use crate::consts::MAX_FRAME_DT;

/// Frames averaged for the FPS readout
const FPS_WINDOW: usize = 60;

#[derive(Debug, Clone)]
pub struct FrameClock {
    budget: Duration,
    last: Instant,
    // FPS tracking
    frame_times: [Duration; FPS_WINDOW],
    frame_index: usize,
    filled: bool,
}

impl FrameClock {
    pub fn new(target_fps: u32) -> Self {
        Self {
            budget: Duration::from_secs_f64(1.0 / target_fps.max(1) as f64),
            last: Instant::now(),
            frame_times: [Duration::ZERO; FPS_WINDOW],
            frame_index: 0,
            filled: false,
        }
    }

    /// Sleep out the rest of this frame's budget, then return the seconds
    /// since the previous tick. Clamped so a stall never becomes one huge step.
    pub fn tick(&mut self) -> f32 {
        let spent = self.last.elapsed();
        if spent < self.budget {
            thread::sleep(self.budget - spent);
        }

        let now = Instant::now();
        let elapsed = now - self.last;
        self.last = now;
        self.record(elapsed);
        clamp_dt(elapsed)
    }

    fn record(&mut self, elapsed: Duration) {
        self.frame_times[self.frame_index] = elapsed;
        self.frame_index = (self.frame_index + 1) % FPS_WINDOW;
        if self.frame_index == 0 {
            self.filled = true;
        }
    }

    /// Average frames per second over the recent window
    pub fn fps(&self) -> u32 {
        let count = if self.filled {
            FPS_WINDOW
        } else {
            self.frame_index
        };
        let total: Duration = self.frame_times[..count].iter().sum();
        if count == 0 || total.is_zero() {
            return 0;
        }
        (count as f64 / total.as_secs_f64()).round() as u32
    }
}

fn clamp_dt(elapsed: Duration) -> f32 {
    elapsed.as_secs_f32().min(MAX_FRAME_DT)
}
