use eframe::egui::{RichText, Ui};
use egui_plot::{Bar, BarChart, Legend, Plot};

use crate::color::generate_palette;
use crate::data::chart::{BarComparison, CHART_TITLE};

// ---------------------------------------------------------------------------
// Bar comparison chart
// ---------------------------------------------------------------------------

const CHART_HEIGHT: f32 = 320.0;

/// Render one bar per distinct x value, height = mean y.
pub fn bar_chart(ui: &mut Ui, id_salt: u64, chart: &BarComparison) {
    ui.label(RichText::new(CHART_TITLE).strong());

    let palette = generate_palette(chart.bars.len());
    let bars: Vec<Bar> = chart
        .bars
        .iter()
        .zip(palette)
        .enumerate()
        .map(|(i, (bar, color))| {
            Bar::new(i as f64, bar.mean)
                .name(format!("{} = {} (n={})", chart.x_column, bar.label, bar.count))
                .fill(color)
                .width(0.7)
        })
        .collect();

    // Bars sit at 0, 1, 2, …; label those ticks with the category.
    let labels: Vec<String> = chart.bars.iter().map(|b| b.label.clone()).collect();

    Plot::new(("bar_chart", id_salt))
        .height(CHART_HEIGHT)
        .legend(Legend::default())
        .x_axis_label(chart.x_column.clone())
        .y_axis_label(chart.y_column.clone())
        .x_axis_formatter(move |mark, _range| {
            let pos = mark.value.round();
            if (mark.value - pos).abs() > 1e-6 || pos < 0.0 {
                return String::new();
            }
            labels.get(pos as usize).cloned().unwrap_or_default()
        })
        .allow_scroll(false)
        .allow_drag(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).name(chart.y_column.clone()));
        });
}
