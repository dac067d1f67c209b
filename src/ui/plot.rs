use std::ops::RangeInclusive;

use eframe::egui::{Color32, Stroke, Ui};
use egui_plot::{
    Bar, BarChart, BoxElem, BoxPlot, BoxSpread, GridMark, Legend, Line, Plot, PlotPoints, Points,
};

use hdb_resale_dashboard::data::aggregate::PriceDistribution;

use crate::color::ColorMap;

const PLOT_HEIGHT: f32 = 280.0;

/// Axis formatter that shows `labels[i]` at integer position `i`.
fn category_axis(labels: Vec<String>) -> impl Fn(GridMark, &RangeInclusive<f64>) -> String {
    move |mark: GridMark, _range: &RangeInclusive<f64>| {
        let pos = mark.value.round();
        if (mark.value - pos).abs() > f64::EPSILON || pos < 0.0 {
            return String::new();
        }
        labels.get(pos as usize).cloned().unwrap_or_default()
    }
}

fn format_sgd(v: f64) -> String {
    let whole = v.round() as i64;
    let digits = whole.abs().to_string();
    let mut out = String::new();
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if whole < 0 {
        format!("-${out}")
    } else {
        format!("${out}")
    }
}

// ---------------------------------------------------------------------------
// Average price per month (line)
// ---------------------------------------------------------------------------

pub fn price_trend(ui: &mut Ui, trend: &[(String, f64)]) {
    let points: PlotPoints = trend
        .iter()
        .enumerate()
        .map(|(i, (_, mean))| [i as f64, *mean])
        .collect();
    let months: Vec<String> = trend.iter().map(|(m, _)| m.clone()).collect();

    Plot::new("price_trend")
        .height(PLOT_HEIGHT)
        .x_axis_label("Month")
        .y_axis_label("Average resale price (SGD)")
        .x_axis_formatter(category_axis(months))
        .y_axis_formatter(|mark, _range| format_sgd(mark.value))
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.line(
                Line::new(points)
                    .name("resale_price")
                    .color(Color32::LIGHT_BLUE)
                    .width(2.0),
            );
        });
}

// ---------------------------------------------------------------------------
// Transactions per town (bars)
// ---------------------------------------------------------------------------

pub fn town_counts(ui: &mut Ui, counts: &[(String, usize)]) {
    let bars: Vec<Bar> = counts
        .iter()
        .enumerate()
        .map(|(i, (town, n))| Bar::new(i as f64, *n as f64).name(town).width(0.7))
        .collect();
    let towns: Vec<String> = counts.iter().map(|(t, _)| t.clone()).collect();

    Plot::new("town_counts")
        .height(PLOT_HEIGHT)
        .x_axis_label("Town")
        .y_axis_label("Transactions")
        .x_axis_formatter(category_axis(towns))
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).name("count").color(Color32::LIGHT_BLUE));
        });
}

// ---------------------------------------------------------------------------
// Price distribution per flat type (box plot)
// ---------------------------------------------------------------------------

pub fn price_boxplot(ui: &mut Ui, dists: &[PriceDistribution], colors: &ColorMap) {
    let flat_types: Vec<String> = dists.iter().map(|d| d.flat_type.clone()).collect();

    Plot::new("price_boxplot")
        .height(PLOT_HEIGHT)
        .legend(Legend::default())
        .x_axis_label("Flat type")
        .y_axis_label("Resale price (SGD)")
        .x_axis_formatter(category_axis(flat_types))
        .y_axis_formatter(|mark, _range| format_sgd(mark.value))
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            for (i, d) in dists.iter().enumerate() {
                let x = i as f64;
                let color = colors.color_for(&d.flat_type);
                let spread =
                    BoxSpread::new(d.lower_whisker, d.q1, d.median, d.q3, d.upper_whisker);
                let elem = BoxElem::new(x, spread)
                    .name(&d.flat_type)
                    .box_width(0.6)
                    .whisker_width(0.3)
                    .stroke(Stroke::new(2.0, color))
                    .fill(color.linear_multiply(0.2));
                plot_ui.box_plot(BoxPlot::new(vec![elem]).name(&d.flat_type).color(color));

                if !d.outliers.is_empty() {
                    let outliers: PlotPoints = d.outliers.iter().map(|&p| [x, p]).collect();
                    plot_ui.points(
                        Points::new(outliers)
                            .name(&d.flat_type)
                            .radius(2.5)
                            .color(Color32::LIGHT_GRAY),
                    );
                }
            }
        });
}
