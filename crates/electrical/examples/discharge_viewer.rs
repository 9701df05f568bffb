use electrical::plot::PlotSeries;
use electrical::{BatteryConstant, DEFAULT_CUTOFF_VOLTAGE, DischargeOptions, discharge_into};

use egui_plot::{Legend, Plot};

const TIME_STEP: f64 = 0.01; // hours
const LOADS: [(&str, f64); 3] = [
    ("6.5A Discharge", 6.5),
    ("13A Discharge", 13.0),
    ("32.5A Discharge", 32.5),
];

fn main() -> eframe::Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_title("Battery Discharge"),
        ..Default::default()
    };
    eframe::run_native(
        "Battery Discharge",
        options,
        Box::new(|_cc| Ok(Box::new(App::new()))),
    )
}

struct App {
    constants: BatteryConstant,
    cutoff_voltage: f64,
    time_step: f64,
    series: Vec<PlotSeries>,
    status: String,
}

impl App {
    fn new() -> Self {
        let mut app = Self {
            constants: BatteryConstant::nickel_metal_hydride(),
            cutoff_voltage: DEFAULT_CUTOFF_VOLTAGE,
            time_step: TIME_STEP,
            series: LOADS.iter().map(|(name, _)| PlotSeries::new(*name)).collect(),
            status: String::new(),
        };
        app.recompute();
        app
    }

    fn recompute(&mut self) {
        let options = DischargeOptions::default().with_cutoff_voltage(self.cutoff_voltage);
        self.status.clear();
        for (series, (name, current)) in self.series.iter_mut().zip(LOADS) {
            series.clear();
            match discharge_into(&self.constants, current, self.time_step, &options, series) {
                Ok(summary) => self.status.push_str(&format!(
                    "{name}: {:.1} min, {:?}   ",
                    summary.runtime_minutes, summary.termination
                )),
                Err(err) => self.status.push_str(&format!("{name}: {err}   ")),
            }
        }
    }
}

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::top("controls").show(ctx, |ui| {
            ui.horizontal_wrapped(|ui| {
                let mut changed = false;

                ui.label("Cutoff");
                changed |= ui
                    .add(egui::Slider::new(&mut self.cutoff_voltage, 0.5..=1.3).suffix(" V"))
                    .changed();

                ui.separator();

                ui.label("Time step");
                changed |= ui
                    .add(egui::Slider::new(&mut self.time_step, 0.001..=0.05).logarithmic(true).suffix(" h"))
                    .changed();

                ui.separator();

                ui.label("Capacity");
                changed |= ui
                    .add(egui::Slider::new(&mut self.constants.rated_capacity_ah, 0.5..=20.0).suffix(" Ah"))
                    .changed();

                if ui.button("⟲ Reset").clicked() {
                    self.constants = BatteryConstant::nickel_metal_hydride();
                    self.cutoff_voltage = DEFAULT_CUTOFF_VOLTAGE;
                    self.time_step = TIME_STEP;
                    changed = true;
                }

                if changed {
                    self.recompute();
                }
            });
            ui.label(&self.status);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            Plot::new("discharge_plot")
                .legend(Legend::default())
                .x_axis_label("Time (Minutes)")
                .y_axis_label("Voltage (V)")
                .include_x(0.0)
                .include_y(0.7)
                .show(ui, |plot_ui| {
                    for series in &self.series {
                        plot_ui.line(series.line());
                    }
                });
        });
    }
}
