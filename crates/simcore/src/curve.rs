//! Discharge curve samples and the sinks that receive them.

use serde::{Deserialize, Serialize};

/// One point of a discharge curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub time_minutes: f64,
    pub terminal_voltage: f64,
}

impl Sample {
    pub fn new(time_minutes: f64, terminal_voltage: f64) -> Self {
        Sample { time_minutes, terminal_voltage }
    }

    pub fn as_point(&self) -> [f64; 2] {
        [self.time_minutes, self.terminal_voltage]
    }
}

/// Anything that can receive a discharge curve one sample at a time.
///
/// Samples arrive in strictly increasing time order.
pub trait CurveConsumer {
    fn push_sample(&mut self, sample: Sample);

    fn extend_samples<I: IntoIterator<Item = Sample>>(&mut self, samples: I)
    where
        Self: Sized,
    {
        for sample in samples {
            self.push_sample(sample);
        }
    }
}

impl CurveConsumer for Vec<Sample> {
    fn push_sample(&mut self, sample: Sample) {
        self.push(sample);
    }
}

impl<C: CurveConsumer + ?Sized> CurveConsumer for &mut C {
    fn push_sample(&mut self, sample: Sample) {
        (**self).push_sample(sample);
    }
}
