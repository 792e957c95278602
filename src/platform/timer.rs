//! Fixed-period clocks fed by variable frame time

use crate::consts::MAX_FRAME_DT;

/// Accumulates frame time and reports how many whole periods elapsed
#[derive(Debug, Clone, PartialEq)]
pub struct FixedTimer {
    period: f32,
    accumulator: f32,
    max_steps: u32,
}

impl FixedTimer {
    pub fn new(period: f32, max_steps: u32) -> Self {
        Self {
            period,
            accumulator: 0.0,
            max_steps,
        }
    }

    /// Feed `dt` seconds; returns the number of periods to run now.
    /// Huge frame gaps are clamped and excess backlog is dropped.
    pub fn advance(&mut self, dt: f32) -> u32 {
        if self.period <= 0.0 || !dt.is_finite() {
            return 0;
        }
        self.accumulator += dt.clamp(0.0, MAX_FRAME_DT);

        let mut steps = 0;
        while self.accumulator >= self.period && steps < self.max_steps {
            self.accumulator -= self.period;
            steps += 1;
        }
        if steps == self.max_steps {
            // Spiral of death guard
            self.accumulator = self.accumulator.min(self.period);
        }
        steps
    }
}
