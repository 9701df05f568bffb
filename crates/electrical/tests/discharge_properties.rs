use approx::assert_relative_eq;
use electrical::{
    BatteryConstant, DEFAULT_CUTOFF_VOLTAGE, DischargeOptions, Termination,
    simulate_battery_discharge, simulate_battery_discharge_with,
};

const TIME_STEP: f64 = 0.01;
const LOADS: [f64; 3] = [6.5, 13.0, 32.5];

fn nimh(label: &str) -> BatteryConstant {
    BatteryConstant::nickel_metal_hydride().with_label(label)
}

#[test]
fn identical_inputs_give_identical_curves() {
    for current in LOADS {
        let a = simulate_battery_discharge(&nimh("a"), current, TIME_STEP).unwrap();
        let b = simulate_battery_discharge(&nimh("a"), current, TIME_STEP).unwrap();
        assert_eq!(a.len(), b.len());
        for (x, y) in a.samples.iter().zip(&b.samples) {
            assert_eq!(x.time_minutes.to_bits(), y.time_minutes.to_bits());
            assert_eq!(x.terminal_voltage.to_bits(), y.terminal_voltage.to_bits());
        }
        assert_eq!(a.summary, b.summary);
    }
}

#[test]
fn samples_are_evenly_spaced_in_minutes() {
    for current in LOADS {
        let result = simulate_battery_discharge(&nimh("spacing"), current, TIME_STEP).unwrap();
        assert_eq!(result.samples[0].time_minutes, 0.0);
        for pair in result.samples.windows(2) {
            assert!(pair[1].time_minutes > pair[0].time_minutes);
            assert_relative_eq!(
                pair[1].time_minutes - pair[0].time_minutes,
                TIME_STEP * 60.0,
                epsilon = 1e-9
            );
        }
    }
}

#[test]
fn runs_terminate_within_capacity_bound() {
    for current in [0.5, 1.0, 6.5, 13.0, 32.5, 100.0] {
        for dt in [0.001, 0.01, 0.1] {
            let result = simulate_battery_discharge(&nimh("bound"), current, dt).unwrap();
            let bound = (6.5 / (current * dt)).ceil() as u64 + 1;
            assert!(
                result.summary.samples_emitted <= bound,
                "{current} A / {dt} h emitted {} > {bound}",
                result.summary.samples_emitted
            );
            assert_ne!(result.summary.termination, Termination::IterationLimit);
        }
    }
}

#[test]
fn emitted_voltages_are_finite_and_above_cutoff() {
    for current in LOADS {
        let result = simulate_battery_discharge(&nimh("cutoff"), current, TIME_STEP).unwrap();
        for sample in &result.samples {
            assert!(sample.terminal_voltage.is_finite());
            assert!(sample.terminal_voltage > DEFAULT_CUTOFF_VOLTAGE);
        }
    }
}

#[test]
fn overridden_cutoff_is_respected() {
    let options = DischargeOptions::default().with_cutoff_voltage(1.2);
    let result =
        simulate_battery_discharge_with(&nimh("1.2 V"), 6.5, TIME_STEP, &options).unwrap();
    assert_eq!(result.summary.termination, Termination::VoltageCutoff);
    assert!(result.samples.iter().all(|s| s.terminal_voltage > 1.2));

    let default = simulate_battery_discharge(&nimh("0.8 V"), 6.5, TIME_STEP).unwrap();
    assert!(result.len() < default.len());
}

#[test]
fn first_sample_of_nominal_load() {
    let result = simulate_battery_discharge(&nimh("Nickel-Metal (6.5A)"), 6.5, TIME_STEP).unwrap();
    let first = result.samples[0];
    assert_eq!(first.time_minutes, 0.0);
    assert_relative_eq!(first.terminal_voltage, 1.42101, epsilon = 1e-9);
}

#[test]
fn zero_capacity_yields_no_samples() {
    let empty = BatteryConstant {
        rated_capacity_ah: 0.0,
        ..nimh("empty")
    };
    let result = simulate_battery_discharge(&empty, 6.5, TIME_STEP).unwrap();
    assert!(result.is_empty());
    assert_eq!(result.summary.samples_emitted, 0);
}

#[test]
fn concurrent_runs_do_not_interfere() {
    let sequential: Vec<_> = LOADS
        .iter()
        .map(|&current| simulate_battery_discharge(&nimh("seq"), current, TIME_STEP).unwrap())
        .collect();

    let constants = nimh("shared");
    let concurrent: Vec<_> = std::thread::scope(|scope| {
        let handles: Vec<_> = LOADS
            .iter()
            .map(|&current| {
                let constants = &constants;
                scope.spawn(move || simulate_battery_discharge(constants, current, TIME_STEP))
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap().unwrap()).collect()
    });

    for (a, b) in sequential.iter().zip(&concurrent) {
        assert_eq!(a.samples, b.samples);
        assert_eq!(a.summary, b.summary);
    }
    // Heavier loads sag further from the start
    assert!(concurrent[0].samples[0].terminal_voltage > concurrent[1].samples[0].terminal_voltage);
    assert!(concurrent[1].samples[0].terminal_voltage > concurrent[2].samples[0].terminal_voltage);
}
