use eframe::egui::{Color32, Ui};
use egui_plot::{Corner, GridMark, Legend, Line, Plot, PlotPoints, Points};
use std::ops::RangeInclusive;

use libkaon_yield::series::YieldSeries;

const SERIES_COLORS: [Color32; 6] = [
    Color32::LIGHT_BLUE,
    Color32::LIGHT_RED,
    Color32::LIGHT_GREEN,
    Color32::GOLD,
    Color32::from_rgb(200, 120, 255),
    Color32::from_rgb(255, 160, 60),
];

/// Axis ticks are log10 of the value; label the decades as powers of ten
fn log_tick_formatter(mark: GridMark, _range: &RangeInclusive<f64>) -> String {
    let exponent = mark.value;
    if (exponent - exponent.round()).abs() < 1.0e-6 {
        format!("1e{}", exponent.round() as i64)
    } else {
        String::new()
    }
}

/// Render yield per GeV vs energy on log-log axes.
///
/// egui_plot has no log axes, so the points are plotted as log10 values. Points with a
/// non-positive yield have no logarithm and are left out.
pub fn yield_plot(ui: &mut Ui, series: &[YieldSeries]) {
    if series.is_empty() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Run a sweep to view yields");
        });
        return;
    }

    Plot::new("yield_plot")
        .legend(Legend::default().position(Corner::LeftTop))
        .x_axis_label("Energy (GeV)")
        .y_axis_label("Yield [N/pr/GeV]")
        .x_axis_formatter(log_tick_formatter)
        .y_axis_formatter(log_tick_formatter)
        .label_formatter(|name, value| {
            format!(
                "{name}\nE = {:.3} GeV\nY = {:.3e}",
                10f64.powf(value.x),
                10f64.powf(value.y)
            )
        })
        .show(ui, |plot_ui| {
            for (idx, s) in series.iter().enumerate() {
                let color = SERIES_COLORS[idx % SERIES_COLORS.len()];
                let positive: Vec<_> = s
                    .points
                    .iter()
                    .filter(|p| p.energy > 0.0 && p.yield_per_energy > 0.0)
                    .collect();

                let log_points: Vec<[f64; 2]> = positive
                    .iter()
                    .map(|p| [p.energy.log10(), p.yield_per_energy.log10()])
                    .collect();
                plot_ui.line(
                    Line::new(PlotPoints::from(log_points.clone()))
                        .name(&s.label)
                        .color(color)
                        .width(1.5),
                );
                plot_ui.points(
                    Points::new(PlotPoints::from(log_points))
                        .name(&s.label)
                        .color(color)
                        .radius(3.0),
                );

                // Error bars; the lower end is clipped where it would cross zero
                for p in positive {
                    let x = p.energy.log10();
                    let high = (p.yield_per_energy + p.abs_error_per_energy).log10();
                    let low_value = p.yield_per_energy - p.abs_error_per_energy;
                    let low = if low_value > 0.0 {
                        low_value.log10()
                    } else {
                        p.yield_per_energy.log10() - 1.0
                    };
                    plot_ui.line(
                        Line::new(PlotPoints::from(vec![[x, low], [x, high]]))
                            .color(color)
                            .width(1.0),
                    );
                }
            }
        });
}
