use log::trace;
use serde::{Deserialize, Serialize};
use simcore::error::ensure_non_negative;
use simcore::{BatteryState, ElectricalModel, Result, SimContext};


/// Electrochemical constants of a battery chemistry.
///
/// Terminal voltage follows
/// `E0 - K * Q_used / (Q - Q_used) + A * exp(-B * Q_used) - I * R`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatteryConstant {
    #[serde(default)]
    pub label: String,
    /// E0, volts
    pub no_load_voltage: f64,
    /// R, ohms
    pub internal_resistance: f64,
    /// K, volts
    pub polarization_constant: f64,
    /// A, volts
    pub exponential_amplitude: f64,
    /// B, per ampere-hour
    pub exponential_decay: f64,
    pub rated_capacity_ah: f64,
}

impl Default for BatteryConstant {
    fn default() -> Self {
        BatteryConstant::nickel_metal_hydride()
    }
}

impl BatteryConstant {
    pub fn new(
        label: impl Into<String>,
        no_load_voltage: f64,
        internal_resistance: f64,
        polarization_constant: f64,
        exponential_amplitude: f64,
        exponential_decay: f64,
        rated_capacity_ah: f64,
    ) -> Self {
        BatteryConstant {
            label: label.into(),
            no_load_voltage,
            internal_resistance,
            polarization_constant,
            exponential_amplitude,
            exponential_decay,
            rated_capacity_ah,
        }
    }

    /// 1.2 V, 6.5 Ah nickel-metal hydride cell
    pub fn nickel_metal_hydride() -> Self {
        BatteryConstant::new("Nickel-Metal", 1.28, 0.00046, 0.01875, 0.144, 2.3077, 6.5)
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Parse and validate constants from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        let constants: BatteryConstant = serde_json::from_str(json)?;
        constants.validate()?;
        Ok(constants)
    }

    /// Checks the one constant the discharge loop cannot survive.
    ///
    /// A zero capacity is allowed: it simply produces an empty curve.
    pub fn validate(&self) -> Result<()> {
        ensure_non_negative("rated_capacity_ah", self.rated_capacity_ah)
    }

    /// Charge delivered so far, in Ah.
    pub fn used_charge(&self, remaining_capacity_ah: f64) -> f64 {
        self.rated_capacity_ah - remaining_capacity_ah
    }

    /// `Q_used / (Q - Q_used)`, or zero where that ratio is not a finite number.
    pub fn polarization_effect(&self, used_charge_ah: f64) -> f64 {
        let effect = used_charge_ah / (self.rated_capacity_ah - used_charge_ah);
        if effect.is_finite() {
            effect
        } else {
            trace!("polarization effect degenerate at {used_charge_ah} Ah used, substituting 0");
            0.0
        }
    }

    /// Open-circuit voltage after `used_charge_ah` has been drawn.
    pub fn no_load_voltage(&self, used_charge_ah: f64) -> f64 {
        self.no_load_voltage - self.polarization_constant * self.polarization_effect(used_charge_ah)
            + self.exponential_amplitude * (-self.exponential_decay * used_charge_ah).exp()
    }

    /// Terminal voltage while delivering `current` amperes.
    pub fn load_voltage(&self, used_charge_ah: f64, current: f64) -> f64 {
        self.no_load_voltage(used_charge_ah) - current * self.internal_resistance
    }
}


#[derive(Debug, Clone, PartialEq)]
pub struct Battery {
    pub constants: BatteryConstant,
}

impl Battery {
    pub fn new(constants: BatteryConstant) -> Self {
        Battery { constants }
    }

    /// A fully charged state drawing `current`.
    pub fn full_state(&self, current: f64) -> BatteryState {
        let mut state = BatteryState::new(self.constants.rated_capacity_ah, current);
        self.reset(&mut state);
        state
    }
}

impl ElectricalModel for Battery {
    fn reset(&self, state: &mut BatteryState) {
        state.remaining_capacity_ah = self.constants.rated_capacity_ah;
        state.voltage = self.terminal_voltage(state);
    }

    fn terminal_voltage(&self, state: &BatteryState) -> f64 {
        let used = self.constants.used_charge(state.remaining_capacity_ah);
        self.constants.load_voltage(used, state.total_current_draw)
    }

    fn step_electrical(&self, ctx: SimContext, state: &mut BatteryState) {
        state.remaining_capacity_ah -= state.total_current_draw * ctx.dt;
        state.voltage = self.terminal_voltage(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use simcore::SimError;

    #[test]
    fn test_preset_constants() {
        let c = BatteryConstant::nickel_metal_hydride();
        assert_eq!(c.label, "Nickel-Metal");
        assert_eq!(c.rated_capacity_ah, 6.5);
        assert_eq!(c, BatteryConstant::default());
    }

    #[test]
    fn test_full_battery_voltage() {
        let c = BatteryConstant::nickel_metal_hydride();
        assert_relative_eq!(c.no_load_voltage(0.0), 1.424, epsilon = 1e-12);
        assert_relative_eq!(c.load_voltage(0.0, 6.5), 1.42101, epsilon = 1e-12);
    }

    #[test]
    fn test_polarization_effect_grows_towards_depletion() {
        let c = BatteryConstant::nickel_metal_hydride();
        let half = c.polarization_effect(3.25);
        let nearly_empty = c.polarization_effect(6.4);
        assert_relative_eq!(half, 1.0, epsilon = 1e-12);
        assert!(nearly_empty > 60.0);
    }

    #[test]
    fn test_polarization_effect_degenerate_is_zero() {
        let c = BatteryConstant::nickel_metal_hydride();
        // Fully used: x / 0 = inf
        assert_eq!(c.polarization_effect(6.5), 0.0);

        let empty = BatteryConstant::new("empty", 1.0, 0.0, 0.1, 0.0, 0.0, 0.0);
        // 0 / 0 = NaN
        assert_eq!(empty.polarization_effect(0.0), 0.0);
        assert_abs_diff_eq!(empty.no_load_voltage(0.0), 1.0);
    }

    #[test]
    fn test_validate_capacity() {
        assert!(BatteryConstant::default().validate().is_ok());
        let zero = BatteryConstant::default().with_label("zero");
        assert!(BatteryConstant { rated_capacity_ah: 0.0, ..zero.clone() }.validate().is_ok());
        assert!(BatteryConstant { rated_capacity_ah: -1.0, ..zero.clone() }.validate().is_err());
        assert!(BatteryConstant { rated_capacity_ah: f64::NAN, ..zero }.validate().is_err());
    }

    #[test]
    fn test_step_decrements_capacity() {
        let battery = Battery::new(BatteryConstant::default());
        let mut state = battery.full_state(13.0);
        assert_relative_eq!(state.voltage, 1.424 - 13.0 * 0.00046, epsilon = 1e-12);

        battery.step_electrical(SimContext { dt: 0.01, t: 0.0 }, &mut state);
        assert_relative_eq!(state.remaining_capacity_ah, 6.5 - 0.13, epsilon = 1e-12);
        assert!(state.voltage < 1.424 - 13.0 * 0.00046);
    }

    #[test]
    fn test_reset_restores_full_charge() {
        let battery = Battery::new(BatteryConstant::default());
        let mut state = BatteryState::new(0.2, 6.5);
        battery.reset(&mut state);
        assert_eq!(state.remaining_capacity_ah, 6.5);
        assert_eq!(state.total_current_draw, 6.5);
    }

    #[test]
    fn test_deserialize_without_label() {
        let json = r#"{
            "no_load_voltage": 1.28,
            "internal_resistance": 0.00046,
            "polarization_constant": 0.01875,
            "exponential_amplitude": 0.144,
            "exponential_decay": 2.3077,
            "rated_capacity_ah": 6.5
        }"#;
        let c = BatteryConstant::from_json(json).unwrap();
        assert_eq!(c.label, "");
        assert_eq!(c, BatteryConstant::default().with_label(""));
    }

    #[test]
    fn test_from_json_errors() {
        let err = BatteryConstant::from_json("{").unwrap_err();
        assert!(matches!(err, SimError::Serialization(_)));

        let json = serde_json::to_string(&BatteryConstant {
            rated_capacity_ah: -1.0,
            ..BatteryConstant::default()
        })
        .unwrap();
        let err = BatteryConstant::from_json(&json).unwrap_err();
        assert!(matches!(err, SimError::InvalidParameter { name: "rated_capacity_ah", .. }));
    }
}
