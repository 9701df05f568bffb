//! egui_plot sink for discharge curves

use egui_plot::{Line, PlotPoints};
use simcore::{CurveConsumer, Sample};

/// A named curve buffered for an `egui_plot` chart.
#[derive(Debug, Clone, Default)]
pub struct PlotSeries {
    pub name: String,
    pub points: Vec<[f64; 2]>,
}

impl PlotSeries {
    pub fn new(name: impl Into<String>) -> Self {
        PlotSeries {
            name: name.into(),
            points: Vec::new(),
        }
    }

    pub fn line(&self) -> Line<'_> {
        Line::new(self.name.clone(), PlotPoints::from(self.points.clone()))
    }

    /// (min, max) of the plotted voltages, if any points were received
    pub fn voltage_range(&self) -> Option<(f64, f64)> {
        self.points.iter().map(|p| p[1]).fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
    }

    pub fn last_time(&self) -> Option<f64> {
        self.points.last().map(|p| p[0])
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }
}

impl CurveConsumer for PlotSeries {
    fn push_sample(&mut self, sample: Sample) {
        self.points.push(sample.as_point());
    }
}
