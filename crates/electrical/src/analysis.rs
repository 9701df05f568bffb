//! Constant-current discharge analysis
//!
//! Steps a [`Battery`] at a fixed current until it is empty or its terminal
//! voltage falls to the cutoff, streaming one [`Sample`] per step.

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use simcore::error::{ensure_non_negative, ensure_positive};
use simcore::{
    BatteryState, CurveConsumer, ElectricalModel, FixedStepClock, Result, Sample, SimError,
    hours_to_minutes,
};

use crate::battery::{Battery, BatteryConstant};

/// Terminal voltage at or below which a cell counts as discharged (V).
pub const DEFAULT_CUTOFF_VOLTAGE: f64 = 0.8;

/// Upper bound on loop iterations for a single run.
pub const DEFAULT_MAX_ITERATIONS: u64 = 10_000_000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DischargeOptions {
    /// Runs stop before emitting a sample at or below this voltage
    pub cutoff_voltage: f64,
    /// Runs stop after this many samples even if neither condition fired
    pub max_iterations: u64,
    /// Start from this charge instead of the rated capacity (Ah)
    pub initial_remaining_capacity_ah: Option<f64>,
}

impl Default for DischargeOptions {
    fn default() -> Self {
        Self {
            cutoff_voltage: DEFAULT_CUTOFF_VOLTAGE,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            initial_remaining_capacity_ah: None,
        }
    }
}

impl DischargeOptions {
    pub fn with_cutoff_voltage(mut self, cutoff_voltage: f64) -> Self {
        self.cutoff_voltage = cutoff_voltage;
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: u64) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn with_initial_remaining_capacity(mut self, remaining_capacity_ah: f64) -> Self {
        self.initial_remaining_capacity_ah = Some(remaining_capacity_ah);
        self
    }
}

/// Why a run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Termination {
    /// Remaining capacity reached zero.
    CapacityExhausted,
    /// Terminal voltage fell to the cutoff.
    VoltageCutoff,
    /// The iteration cap fired first.
    IterationLimit,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DischargeSummary {
    pub termination: Termination,
    pub samples_emitted: u64,
    /// Time of the last emitted sample, zero for an empty run
    pub runtime_minutes: f64,
    pub delivered_charge_ah: f64,
    /// May dip below zero by at most one step's discharge
    pub final_remaining_capacity_ah: f64,
    pub min_voltage: Option<f64>,
    pub max_voltage: Option<f64>,
}

/// Result of a discharge run collected in memory
#[derive(Debug, Clone)]
pub struct BatteryDischargeResult {
    pub samples: Vec<Sample>,
    pub summary: DischargeSummary,
}

impl BatteryDischargeResult {
    pub fn times(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.time_minutes).collect()
    }

    pub fn voltages(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.terminal_voltage).collect()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

fn initial_state(
    battery: &Battery,
    current: f64,
    options: &DischargeOptions,
) -> Result<BatteryState> {
    let mut state = battery.full_state(current);
    if let Some(remaining) = options.initial_remaining_capacity_ah {
        ensure_non_negative("initial_remaining_capacity_ah", remaining)?;
        if remaining > battery.constants.rated_capacity_ah {
            return Err(SimError::invalid(
                "initial_remaining_capacity_ah",
                remaining,
                "must not exceed the rated capacity",
            ));
        }
        state.remaining_capacity_ah = remaining;
        state.voltage = battery.terminal_voltage(&state);
    }
    Ok(state)
}

/// Discharge a battery at constant `current` (A), stepping `time_step` hours at a time,
/// and stream the curve into `consumer`.
///
/// Each step checks remaining capacity first, then computes the terminal voltage and
/// stops without emitting if it is at or below the cutoff. Otherwise the sample is
/// emitted and the step's charge is drawn.
///
/// # Errors
/// [`SimError::InvalidParameter`] if `current` or `time_step` is not a finite positive
/// number, if the rated capacity is negative, or if the options are out of range.
pub fn discharge_into<C: CurveConsumer + ?Sized>(
    constants: &BatteryConstant,
    current: f64,
    time_step: f64,
    options: &DischargeOptions,
    consumer: &mut C,
) -> Result<DischargeSummary> {
    ensure_positive("discharge_current", current)?;
    ensure_positive("time_step", time_step)?;
    constants.validate()?;
    if !options.cutoff_voltage.is_finite() {
        return Err(SimError::invalid(
            "cutoff_voltage",
            options.cutoff_voltage,
            "must be finite",
        ));
    }

    let battery = Battery::new(constants.clone());
    let mut state = initial_state(&battery, current, options)?;
    let starting_charge = state.remaining_capacity_ah;
    let mut clock = FixedStepClock::new(time_step);

    debug!(
        "discharging {:?} at {} A, dt = {} h, from {} Ah",
        constants.label, current, time_step, starting_charge
    );

    let mut runtime_minutes = 0.0;
    let mut min_voltage: Option<f64> = None;
    let mut max_voltage: Option<f64> = None;

    let termination = loop {
        if !state.has_charge() {
            break Termination::CapacityExhausted;
        }
        if clock.steps() >= options.max_iterations {
            warn!(
                "discharge of {:?} at {} A stopped after {} iterations with {} Ah left",
                constants.label,
                current,
                clock.steps(),
                state.remaining_capacity_ah
            );
            break Termination::IterationLimit;
        }

        let load_voltage = state.voltage;
        if load_voltage <= options.cutoff_voltage {
            break Termination::VoltageCutoff;
        }

        let ctx = clock.context();
        runtime_minutes = hours_to_minutes(ctx.t);
        consumer.push_sample(Sample::new(runtime_minutes, load_voltage));
        min_voltage = Some(min_voltage.map_or(load_voltage, |v| v.min(load_voltage)));
        max_voltage = Some(max_voltage.map_or(load_voltage, |v| v.max(load_voltage)));

        battery.step_electrical(ctx, &mut state);
        clock.advance();
    };

    let summary = DischargeSummary {
        termination,
        samples_emitted: clock.steps(),
        runtime_minutes,
        delivered_charge_ah: starting_charge - state.remaining_capacity_ah,
        final_remaining_capacity_ah: state.remaining_capacity_ah,
        min_voltage,
        max_voltage,
    };
    debug!(
        "{:?} at {} A: {:?} after {} samples, {:.2} min",
        constants.label, current, summary.termination, summary.samples_emitted, summary.runtime_minutes
    );
    Ok(summary)
}

/// Discharge with the default cutoff and iteration cap, collecting the curve.
pub fn simulate_battery_discharge(
    constants: &BatteryConstant,
    current: f64,
    time_step: f64,
) -> Result<BatteryDischargeResult> {
    simulate_battery_discharge_with(constants, current, time_step, &DischargeOptions::default())
}

pub fn simulate_battery_discharge_with(
    constants: &BatteryConstant,
    current: f64,
    time_step: f64,
    options: &DischargeOptions,
) -> Result<BatteryDischargeResult> {
    let mut samples = Vec::new();
    let summary = discharge_into(constants, current, time_step, options, &mut samples)?;
    Ok(BatteryDischargeResult { samples, summary })
}

/// Charge delivered before the run terminates at `current` (Ah).
pub fn effective_capacity_ah(
    constants: &BatteryConstant,
    current: f64,
    time_step: f64,
) -> Result<f64> {
    struct Discard;
    impl CurveConsumer for Discard {
        fn push_sample(&mut self, _sample: Sample) {}
    }

    let summary = discharge_into(
        constants,
        current,
        time_step,
        &DischargeOptions::default(),
        &mut Discard,
    )?;
    Ok(summary.delivered_charge_ah)
}
