use eframe::egui::{RichText, Ui};

use crate::color::ColorMap;
use crate::state::AppState;
use crate::ui::{panels, plot, table};

fn no_data(ui: &mut Ui, what: &str) {
    ui.label(RichText::new(format!("No data available for {what}.")).italics());
}

// ---------------------------------------------------------------------------
// Central panel: table, export and charts for the current section
// ---------------------------------------------------------------------------

pub fn render_section(ui: &mut Ui, state: &mut AppState) {
    let section = state.section;
    let Some(view) = state.view() else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("No dataset loaded  (File → Open… or Reload)");
        });
        return;
    };
    let prefix = section.prefix();

    ui.heading(section.heading());
    ui.add_space(6.0);

    ui.strong(format!("{prefix} Filtered Results"));
    table::records_table(ui, view);

    let export_clicked = !view.visible_indices.is_empty()
        && ui.button("📥 Download Filtered Data as CSV").clicked();
    ui.separator();

    ui.strong(format!("📈 {prefix} Average Resale Price Over Time"));
    match &view.price_trend {
        Some(trend) => plot::price_trend(ui, trend),
        None => no_data(ui, "price trend"),
    }
    ui.separator();

    ui.strong(format!("🏡 {prefix} Transactions Count by Town"));
    match &view.town_counts {
        Some(counts) => plot::town_counts(ui, counts),
        None => no_data(ui, "town analysis"),
    }
    ui.separator();

    ui.strong(format!("📦 {prefix} Resale Price Distribution by Flat Type"));
    match &view.price_distribution {
        Some(dists) => {
            let colors = ColorMap::new(&view.options.flat_types);
            plot::price_boxplot(ui, dists, &colors);
        }
        None => no_data(ui, "grouped boxplot"),
    }

    if export_clicked {
        panels::save_export_dialog(state);
    }
}
