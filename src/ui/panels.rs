use std::collections::BTreeSet;
use std::fmt::Display;

use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use hdb_resale_dashboard::data::filter::{
    is_selected, select_all, select_none, toggle, TownSelection, ALL_TOWNS,
};

use crate::state::{AppState, Section};

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    let section = state.section;
    let view = match state.view_mut() {
        Some(view) => view,
        None => {
            ui.label("No dataset loaded.");
            return;
        }
    };

    let mut changed = false;

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Town: single choice ----
            ui.strong("Select Town:");
            let mut chosen = view.filters.town.clone();
            egui::ComboBox::from_id_salt(("town", section))
                .selected_text(chosen.label().to_string())
                .show_ui(ui, |ui: &mut Ui| {
                    ui.selectable_value(&mut chosen, TownSelection::All, ALL_TOWNS);
                    for town in &view.options.towns {
                        ui.selectable_value(&mut chosen, TownSelection::Town(town.clone()), town);
                    }
                });
            if chosen != view.filters.town {
                view.filters.town = chosen;
                changed = true;
            }
            ui.separator();

            // ---- Multi-value dimensions (collapsible) ----
            let filters = &mut view.filters;
            let options = &view.options;
            changed |= multi_select(ui, section, "Flat Type", &mut filters.flat_types, &options.flat_types);
            changed |= multi_select(ui, section, "Floor Level", &mut filters.floor_levels, &options.floor_levels);
            changed |= multi_select(
                ui,
                section,
                "Remaining Lease",
                &mut filters.lease_categories,
                &options.lease_categories,
            );
            changed |= multi_select(ui, section, "Year", &mut filters.years, &options.years);
            changed |= multi_select(ui, section, "Month", &mut filters.months, &options.months);
        });

    // Recompute visible indices after any checkbox changes.
    if changed {
        view.refilter();
    }
}

/// Collapsible checkbox list for one dimension. Returns whether the
/// selection changed.
fn multi_select<T: Ord + Clone + Display>(
    ui: &mut Ui,
    section: Section,
    title: &str,
    selection: &mut Option<BTreeSet<T>>,
    available: &BTreeSet<T>,
) -> bool {
    let mut changed = false;

    // Show count of selected / total in the header
    let n_selected = selection.as_ref().map_or(available.len(), |s| s.len());
    let n_total = available.len();
    let header_text = format!("{title}  ({n_selected}/{n_total})");

    egui::CollapsingHeader::new(RichText::new(header_text).strong())
        .id_salt((title, section))
        .default_open(false)
        .show(ui, |ui: &mut Ui| {
            ui.horizontal(|ui: &mut Ui| {
                if ui.small_button("All").clicked() {
                    select_all(selection, available);
                    changed = true;
                }
                if ui.small_button("None").clicked() {
                    select_none(selection);
                    changed = true;
                }
            });

            for val in available {
                let mut checked = is_selected(selection, val);
                if ui.checkbox(&mut checked, val.to_string()).changed() {
                    toggle(selection, val, available);
                    changed = true;
                }
            }
        });

    changed
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open historical data…").clicked() {
                if let Some(path) = pick_dataset("Open historical resale data") {
                    state.set_historical_path(path);
                }
                ui.close_menu();
            }
            if ui.button("Open recent data…").clicked() {
                if let Some(path) = pick_dataset("Open recent resale data") {
                    state.set_recent_path(path);
                }
                ui.close_menu();
            }
            if ui.button("Reload").clicked() {
                state.reload();
                ui.close_menu();
            }
        });

        ui.separator();

        let mut section = state.section;
        for s in Section::ALL {
            ui.selectable_value(&mut section, s, s.label());
        }
        if section != state.section {
            state.set_section(section);
        }

        ui.separator();

        if let Some(view) = state.view() {
            ui.label(format!(
                "{} records loaded, {} visible",
                view.dataset.len(),
                view.visible_indices.len()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

fn pick_dataset(title: &str) -> Option<std::path::PathBuf> {
    rfd::FileDialog::new()
        .set_title(title)
        .add_filter("Supported files", &["csv", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file()
}

/// Ask where to save the filtered records and write them.
pub fn save_export_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Download filtered data as CSV")
        .set_file_name(state.config.export_file_name.as_str())
        .add_filter("CSV", &["csv"])
        .save_file();

    if let Some(path) = file {
        match state.export_to(&path) {
            Ok(n) => {
                state.status_message = Some(format!("Saved {n} records to {}", path.display()));
            }
            Err(e) => {
                log::error!("Failed to export: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}
