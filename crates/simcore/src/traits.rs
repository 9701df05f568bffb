use serde::{Deserialize, Serialize};

// Electrical Traits
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BatteryState {
    pub remaining_capacity_ah: f64,
    pub voltage: f64,
    pub total_current_draw: f64
}

impl Default for BatteryState {
    fn default() -> Self {
        BatteryState {
            remaining_capacity_ah: 0.0,
            voltage: 0.0,
            total_current_draw: 0.0
        }
    }
}

impl BatteryState {
    /// State of a battery holding `remaining_capacity_ah` while drawing `current`.
    pub fn new(remaining_capacity_ah: f64, total_current_draw: f64) -> Self {
        BatteryState {
            remaining_capacity_ah,
            voltage: 0.0,
            total_current_draw,
        }
    }

    pub fn has_charge(&self) -> bool {
        self.remaining_capacity_ah > 0.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimContext {
    pub dt: f64,
    pub t: f64,
}

/// A model of a battery's terminal behaviour.
///
/// Implementations hold only immutable constants. Everything a run changes
/// lives in the [`BatteryState`] the caller owns, so one model can back any
/// number of independent runs.
pub trait ElectricalModel {
    /// Restore `state` to a fully charged battery.
    fn reset(&self, state: &mut BatteryState);

    /// Terminal voltage under the current draw recorded in `state`.
    fn terminal_voltage(&self, state: &BatteryState) -> f64;

    /// Advance `state` by one step of `ctx.dt`.
    fn step_electrical(&self, ctx: SimContext, state: &mut BatteryState);
}
