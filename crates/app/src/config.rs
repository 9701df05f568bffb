//! Scenario configuration
//!
//! A scenario file is JSON:
//!
//! ```json
//! {
//!   "battery": { "label": "Nickel-Metal", "no_load_voltage": 1.28, ... },
//!   "options": { "cutoff_voltage": 0.8 },
//!   "scenarios": [
//!     { "name": "6.5A Discharge", "discharge_current": 6.5, "time_step": 0.01 }
//!   ]
//! }
//! ```

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, ensure};
use electrical::{BatteryConstant, DischargeOptions};
use serde::{Deserialize, Serialize};

pub const DEFAULT_TIME_STEP_HOURS: f64 = 0.01;

/// One constant-current discharge to run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    /// Amperes
    pub discharge_current: f64,
    /// Hours
    #[serde(default = "default_time_step")]
    pub time_step: f64,
    /// Overrides the file-level battery for this scenario only
    #[serde(default)]
    pub battery: Option<BatteryConstant>,
}

fn default_time_step() -> f64 {
    DEFAULT_TIME_STEP_HOURS
}

impl Scenario {
    pub fn new(name: impl Into<String>, discharge_current: f64, time_step: f64) -> Self {
        Scenario {
            name: name.into(),
            discharge_current,
            time_step,
            battery: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioFile {
    #[serde(default)]
    pub battery: BatteryConstant,
    #[serde(default)]
    pub options: DischargeOptions,
    pub scenarios: Vec<Scenario>,
}

impl Default for ScenarioFile {
    /// The Nickel-Metal cell at 1x, 2x and 5x its rated capacity.
    fn default() -> Self {
        ScenarioFile {
            battery: BatteryConstant::nickel_metal_hydride(),
            options: DischargeOptions::default(),
            scenarios: vec![
                Scenario::new("6.5A Discharge", 6.5, DEFAULT_TIME_STEP_HOURS),
                Scenario::new("13A Discharge", 13.0, DEFAULT_TIME_STEP_HOURS),
                Scenario::new("32.5A Discharge", 32.5, DEFAULT_TIME_STEP_HOURS),
            ],
        }
    }
}

impl ScenarioFile {
    pub fn from_json(json: &str) -> Result<Self> {
        let file: ScenarioFile = serde_json::from_str(json).context("invalid scenario JSON")?;
        ensure!(!file.scenarios.is_empty(), "scenario file lists no scenarios");
        Ok(file)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)
            .with_context(|| format!("failed to read scenario file {}", path.display()))?;
        Self::from_json(&json).with_context(|| format!("failed to parse {}", path.display()))
    }

    /// The battery a scenario runs against.
    pub fn battery_for<'a>(&'a self, scenario: &'a Scenario) -> &'a BatteryConstant {
        scenario.battery.as_ref().unwrap_or(&self.battery)
    }
}
