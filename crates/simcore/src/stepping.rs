use crate::SimContext;

/// Convert an elapsed time in hours to minutes.
pub fn hours_to_minutes(hours: f64) -> f64 {
    hours * 60.0
}

/// Fixed-timestep clock.
///
/// Elapsed time is `steps * dt` rather than a running sum, so every context
/// it hands out is exactly one step apart regardless of how long the run is.
#[derive(Debug, Clone, Copy)]
pub struct FixedStepClock {
    pub fixed_dt: f64,
    steps: u64,
}

impl FixedStepClock {
    pub fn new(fixed_dt: f64) -> Self {
        FixedStepClock { fixed_dt, steps: 0 }
    }

    /// Number of completed steps.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Elapsed time at the start of the current step.
    pub fn elapsed(&self) -> f64 {
        self.steps as f64 * self.fixed_dt
    }

    pub fn context(&self) -> SimContext {
        SimContext {
            dt: self.fixed_dt,
            t: self.elapsed(),
        }
    }

    pub fn advance(&mut self) {
        self.steps += 1;
    }

    pub fn reset(&mut self) {
        self.steps = 0;
    }
}
