//! Curve sinks that write to disk

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use log::debug;
use plotters::prelude::*;
use simcore::{CurveConsumer, Sample};

use crate::runner::ScenarioOutcome;

const SERIES_COLORS: [RGBColor; 6] = [BLUE, GREEN, RED, MAGENTA, CYAN, BLACK];
const VOLTAGE_AXIS_MIN: f64 = 0.7;

/// Writes `time_minutes,terminal_voltage` rows.
///
/// `push_sample` cannot fail, so the first I/O error is held until [`finish`](Self::finish).
pub struct CsvCurveWriter<W: Write> {
    out: W,
    rows: usize,
    error: Option<io::Error>,
}

impl<W: Write> CsvCurveWriter<W> {
    pub fn new(mut out: W) -> Self {
        let error = writeln!(out, "time_minutes,terminal_voltage").err();
        CsvCurveWriter { out, rows: 0, error }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn finish(mut self) -> io::Result<W> {
        if let Some(err) = self.error.take() {
            return Err(err);
        }
        self.out.flush()?;
        Ok(self.out)
    }
}

impl<W: Write> CurveConsumer for CsvCurveWriter<W> {
    fn push_sample(&mut self, sample: Sample) {
        if self.error.is_some() {
            return;
        }
        match writeln!(self.out, "{:.6},{:.6}", sample.time_minutes, sample.terminal_voltage) {
            Ok(()) => self.rows += 1,
            Err(err) => self.error = Some(err),
        }
    }
}

/// File-system friendly name for a scenario: `"6.5A Discharge"` -> `"6.5a_discharge"`.
pub fn file_stem(name: &str) -> String {
    let stem: String = name
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect();
    if stem.is_empty() { "scenario".to_string() } else { stem }
}

/// Write one CSV per outcome into `dir`, returning the paths written.
pub fn write_csv_files(dir: &Path, outcomes: &[ScenarioOutcome]) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir).with_context(|| format!("failed to create {}", dir.display()))?;
    outcomes
        .iter()
        .map(|outcome| {
            let path = dir.join(format!("{}.csv", file_stem(&outcome.scenario.name)));
            let file = File::create(&path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            let mut writer = CsvCurveWriter::new(BufWriter::new(file));
            writer.extend_samples(outcome.result.samples.iter().copied());
            debug!("{}: {} rows", path.display(), writer.rows());
            writer
                .finish()
                .with_context(|| format!("failed to write {}", path.display()))?;
            Ok(path)
        })
        .collect()
}

fn draw_chart(path: &Path, outcomes: &[ScenarioOutcome]) -> Result<(), Box<dyn std::error::Error>> {
    let root = BitMapBackend::new(path, (1280, 800)).into_drawing_area();
    root.fill(&WHITE)?;

    let x_max = outcomes
        .iter()
        .map(|o| o.result.summary.runtime_minutes)
        .fold(1.0, f64::max);
    let y_max = outcomes
        .iter()
        .filter_map(|o| o.result.summary.max_voltage)
        .fold(VOLTAGE_AXIS_MIN + 0.1, f64::max)
        + 0.05;

    let mut chart = ChartBuilder::on(&root)
        .caption("Battery Discharge", ("sans-serif", 28))
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(0.0..x_max, VOLTAGE_AXIS_MIN..y_max)?;

    chart
        .configure_mesh()
        .x_desc("Time (Minutes)")
        .y_desc("Voltage (V)")
        .draw()?;

    for (i, outcome) in outcomes.iter().enumerate() {
        let color = SERIES_COLORS[i % SERIES_COLORS.len()];
        chart
            .draw_series(LineSeries::new(
                outcome.result.samples.iter().map(|s| (s.time_minutes, s.terminal_voltage)),
                color.stroke_width(3),
            ))?
            .label(outcome.scenario.name.as_str())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(3)));
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}

/// Render every outcome as one line on a PNG chart.
pub fn write_chart(path: &Path, outcomes: &[ScenarioOutcome]) -> Result<()> {
    draw_chart(path, outcomes).map_err(|e| anyhow!("failed to draw {}: {e}", path.display()))
}
