use electrical::battery::{Battery, BatteryConstant};
use simcore::{ElectricalModel, FixedStepClock, hours_to_minutes};
use std::fs::File;
use std::io::Write;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Drive the model by hand instead of through discharge_into, logging every state field
    let batt = Battery::new(BatteryConstant::nickel_metal_hydride());
    let current = 13.0; // A
    let mut state = batt.full_state(current);
    let mut clock = FixedStepClock::new(0.005); // hours

    let mut csv = File::create("discharge_step.csv")?;
    writeln!(csv, "t_min,batt_v,remaining_ah,current")?;

    while state.has_charge() && state.voltage > 0.8 {
        let ctx = clock.context();
        writeln!(
            csv,
            "{:.6},{:.6},{:.6},{:.6}",
            hours_to_minutes(ctx.t), state.voltage, state.remaining_capacity_ah, state.total_current_draw
        )?;
        batt.step_electrical(ctx, &mut state);
        clock.advance();
    }

    println!("Wrote discharge_step.csv ({} steps)", clock.steps());
    Ok(())
}
