use std::thread;

use anyhow::{Context, Result, anyhow};
use electrical::{BatteryDischargeResult, DischargeOptions, simulate_battery_discharge_with};
use log::info;

use crate::config::{Scenario, ScenarioFile};

#[derive(Debug, Clone)]
pub struct ScenarioOutcome {
    pub scenario: Scenario,
    pub result: BatteryDischargeResult,
}

fn run_scenario(
    file: &ScenarioFile,
    scenario: &Scenario,
    options: &DischargeOptions,
) -> Result<ScenarioOutcome> {
    let battery = file.battery_for(scenario);
    let result = simulate_battery_discharge_with(
        battery,
        scenario.discharge_current,
        scenario.time_step,
        options,
    )
    .with_context(|| format!("scenario {:?} failed", scenario.name))?;
    Ok(ScenarioOutcome {
        scenario: scenario.clone(),
        result,
    })
}

/// Run every scenario on its own thread, returning outcomes in file order.
pub fn run_all(file: &ScenarioFile, options: &DischargeOptions) -> Result<Vec<ScenarioOutcome>> {
    thread::scope(|scope| {
        let handles: Vec<_> = file
            .scenarios
            .iter()
            .map(|scenario| scope.spawn(move || run_scenario(file, scenario, options)))
            .collect();

        handles
            .into_iter()
            .map(|handle| match handle.join() {
                Ok(outcome) => outcome,
                Err(_) => Err(anyhow!("discharge thread panicked")),
            })
            .collect()
    })
}

pub fn log_summary(outcome: &ScenarioOutcome) {
    let summary = &outcome.result.summary;
    info!(
        "{}: {} samples over {:.1} min, {:.3} Ah delivered, {:?}, V {:.4}..{:.4}",
        outcome.scenario.name,
        summary.samples_emitted,
        summary.runtime_minutes,
        summary.delivered_charge_ah,
        summary.termination,
        summary.min_voltage.unwrap_or(f64::NAN),
        summary.max_voltage.unwrap_or(f64::NAN),
    );
}
