use eframe::egui::{Align2, Color32, Ui};
use egui_plot::{Bar, BarChart, Legend, Line, Plot, PlotPoint, PlotPoints, Text};

use paser_dashboards::color::{experiment_color, stacked_pair};

const PLOT_HEIGHT: f32 = 240.0;
const BAR_WIDTH: f64 = 0.6;

// ---------------------------------------------------------------------------
// Shared plot setup
// ---------------------------------------------------------------------------

/// A bar plot with one category per experiment on the x axis.
fn category_plot<'a>(id: &str, labels: &[String], y_label: &str) -> Plot<'a> {
    let labels = labels.to_vec();
    Plot::new(id)
        .height(PLOT_HEIGHT)
        .legend(Legend::default())
        .y_axis_label(y_label.to_string())
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .allow_boxed_zoom(false)
        .show_x(false)
        .x_axis_formatter(move |mark, _range| {
            let i = mark.value.round();
            if (mark.value - i).abs() > 1e-6 || i < 0.0 {
                return String::new();
            }
            labels.get(i as usize).cloned().unwrap_or_default()
        })
}

// ---------------------------------------------------------------------------
// Stacked bars (Plot dashboard)
// ---------------------------------------------------------------------------

/// One part of a two-part stacked bar.
pub struct Series<'a> {
    pub name: &'a str,
    pub values: Vec<f64>,
}

/// Two-part stacked bar chart, `lower` at the bottom.
pub fn stacked_bars(ui: &mut Ui, id: &str, title: &str, labels: &[String], lower: Series, upper: Series, y_label: &str) {
    ui.strong(title);
    let (lower_color, upper_color) = stacked_pair(experiment_color(0, 1));

    let bars = |series: &Series, color: Color32| -> Vec<Bar> {
        series
            .values
            .iter()
            .enumerate()
            .map(|(i, &v)| {
                Bar::new(i as f64, v)
                    .width(BAR_WIDTH)
                    .fill(color)
                    .name(labels.get(i).map(String::as_str).unwrap_or_default())
            })
            .collect()
    };

    let bottom = BarChart::new(bars(&lower, lower_color))
        .name(lower.name)
        .color(lower_color);
    let top = BarChart::new(bars(&upper, upper_color))
        .name(upper.name)
        .color(upper_color)
        .stack_on(&[&bottom]);

    category_plot(id, labels, y_label).show(ui, |plot_ui| {
        plot_ui.bar_chart(bottom);
        plot_ui.bar_chart(top);
    });
}

// ---------------------------------------------------------------------------
// Bars with error bars (Stats and Venn dashboards)
// ---------------------------------------------------------------------------

/// One bar per experiment, each in its experiment colour, with an optional
/// error bar of +- `errors[i]` and the value printed above the bar.
pub fn bars_with_errors(
    ui: &mut Ui,
    id: &str,
    title: &str,
    labels: &[String],
    values: &[f64],
    errors: Option<&[f64]>,
    y_label: &str,
) {
    ui.strong(title);
    let n = values.len();

    let bars: Vec<Bar> = values
        .iter()
        .enumerate()
        .map(|(i, &v)| {
            Bar::new(i as f64, v)
                .width(BAR_WIDTH)
                .fill(experiment_color(i, n))
                .name(labels.get(i).map(String::as_str).unwrap_or_default())
        })
        .collect();

    category_plot(id, labels, y_label).show(ui, |plot_ui| {
        plot_ui.bar_chart(BarChart::new(bars).name(title));

        for (i, &v) in values.iter().enumerate() {
            let x = i as f64;
            let err = errors.and_then(|e| e.get(i)).copied().unwrap_or(0.0);
            if err > 0.0 {
                let cap = BAR_WIDTH / 6.0;
                let whisker = |points: Vec<[f64; 2]>| {
                    Line::new(PlotPoints::from(points))
                        .color(Color32::DARK_GRAY)
                        .width(1.5)
                };
                plot_ui.line(whisker(vec![[x, v - err], [x, v + err]]));
                plot_ui.line(whisker(vec![[x - cap, v + err], [x + cap, v + err]]));
                plot_ui.line(whisker(vec![[x - cap, v - err], [x + cap, v - err]]));
            }
            plot_ui.text(Text::new(PlotPoint::new(x, v + err), format!("{v:.2}")).anchor(Align2::CENTER_BOTTOM));
        }
    });
}
