use std::ops::RangeInclusive;

use eframe::egui::{Align2, Color32, RichText, Stroke, Ui};
use egui_plot::{Bar, BarChart, GridMark, Legend, Plot, PlotPoint, PlotPoints, Polygon, Text};

use crate::chart::{category_at, BarChartSpec, Orientation, PieChartSpec};
use crate::color::{generate_palette, ColorMap};

const CHART_HEIGHT: f32 = 320.0;
const PIE_SEGMENTS: usize = 96;

// ---------------------------------------------------------------------------
// Grouped bar chart
// ---------------------------------------------------------------------------

/// Render grouped bars, vertical or horizontal, with category names on the
/// category axis. An empty spec draws empty axes.
pub fn bar_chart(ui: &mut Ui, id: &str, spec: &BarChartSpec) {
    let colors = generate_palette(spec.series.len());
    let horizontal = spec.orientation == Orientation::Horizontal;

    let categories = spec.categories.clone();
    let category_label = move |mark: GridMark, _range: &RangeInclusive<f64>| -> String {
        category_at(&categories, mark.value).unwrap_or_default().to_string()
    };
    let value_label = |mark: GridMark, _range: &RangeInclusive<f64>| -> String {
        if mark.value.fract() == 0.0 && mark.value >= 0.0 {
            format!("{}", mark.value)
        } else {
            String::new()
        }
    };

    let mut plot = Plot::new(id)
        .legend(Legend::default())
        .height(CHART_HEIGHT)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false);
    plot = if horizontal {
        plot.x_axis_label(spec.value_axis.as_str())
            .y_axis_label(spec.category_axis.as_str())
            .x_axis_formatter(value_label)
            .y_axis_formatter(category_label)
            .include_x(0.0)
    } else {
        plot.x_axis_label(spec.category_axis.as_str())
            .y_axis_label(spec.value_axis.as_str())
            .x_axis_formatter(category_label)
            .y_axis_formatter(value_label)
            .include_y(0.0)
    };

    plot.show(ui, |plot_ui| {
        for (index, (series, color)) in spec.series.iter().zip(colors).enumerate() {
            let bars: Vec<Bar> = series
                .values
                .iter()
                .enumerate()
                .map(|(category, &value)| {
                    Bar::new(spec.bar_position(category, index), value)
                        .width(spec.bar_width())
                        .name(&spec.categories[category])
                })
                .collect();

            let mut chart = BarChart::new(bars).name(&series.name).color(color);
            if horizontal {
                chart = chart.horizontal();
            }
            plot_ui.bar_chart(chart);
        }
    });
}

// ---------------------------------------------------------------------------
// Pie chart
// ---------------------------------------------------------------------------

/// Render a pie with a percentage on every slice and its label just outside.
/// Equal data aspect keeps the circle round. No slices → placeholder.
pub fn pie_chart(ui: &mut Ui, id: &str, spec: &PieChartSpec) {
    if spec.is_empty() {
        placeholder(ui);
        return;
    }

    let colors = ColorMap::new(spec.slices.iter().map(|s| s.label.as_str()));

    Plot::new(id)
        .legend(Legend::default())
        .height(CHART_HEIGHT)
        .data_aspect(1.0)
        .view_aspect(1.0)
        .show_axes(false)
        .show_grid(false)
        .show_x(false)
        .show_y(false)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .include_x(-1.5)
        .include_x(1.5)
        .include_y(-1.3)
        .include_y(1.3)
        .show(ui, |plot_ui| {
            for slice in &spec.slices {
                let color = colors.color_for(&slice.label);
                let outline: PlotPoints = slice.outline(PIE_SEGMENTS).into_iter().collect();
                plot_ui.polygon(
                    Polygon::new(outline)
                        .name(format!("{} ({})", slice.label, slice.count))
                        .fill_color(color)
                        .stroke(Stroke::new(1.0, Color32::WHITE)),
                );

                let (sin, cos) = slice.mid_angle().sin_cos();
                plot_ui.text(
                    Text::new(
                        PlotPoint::new(0.6 * cos, 0.6 * sin),
                        RichText::new(slice.percent_label()).color(Color32::BLACK).strong(),
                    )
                    .anchor(Align2::CENTER_CENTER),
                );
                plot_ui.text(
                    Text::new(PlotPoint::new(1.15 * cos, 1.15 * sin), slice.label.as_str())
                        .anchor(Align2::CENTER_CENTER),
                );
            }
        });
}

fn placeholder(ui: &mut Ui) {
    ui.add_sized(
        [ui.available_width(), CHART_HEIGHT / 3.0],
        eframe::egui::Label::new(RichText::new("Sin datos para los filtros actuales").weak()),
    );
}
