pub mod analysis;
pub mod battery;
pub mod plot;

pub use analysis::{
    BatteryDischargeResult, DEFAULT_CUTOFF_VOLTAGE, DEFAULT_MAX_ITERATIONS, DischargeOptions,
    DischargeSummary, Termination, discharge_into, effective_capacity_ah,
    simulate_battery_discharge, simulate_battery_discharge_with,
};
pub use battery::{Battery, BatteryConstant};
