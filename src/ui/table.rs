use eframe::egui::{self, ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};

use crate::state::SectionView;

const ROW_HEIGHT: f32 = 18.0;

/// Scrollable table of the filtered records, all enriched columns.
pub fn records_table(ui: &mut Ui, view: &SectionView) {
    let columns = view.dataset.column_names();
    let records = &view.dataset.records;
    let indices = &view.visible_indices;

    ScrollArea::horizontal()
        .id_salt("records_table_scroll")
        .show(ui, |ui: &mut Ui| {
            TableBuilder::new(ui)
                .striped(true)
                .resizable(true)
                .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
                .columns(Column::auto().at_least(60.0), columns.len())
                .min_scrolled_height(0.0)
                .max_scroll_height(320.0)
                .header(20.0, |mut header| {
                    for name in &columns {
                        header.col(|ui| {
                            ui.strong(name);
                        });
                    }
                })
                .body(|body| {
                    body.rows(ROW_HEIGHT, indices.len(), |mut row| {
                        let record = &records[indices[row.index()]];
                        for name in &columns {
                            row.col(|ui| {
                                ui.label(record.cell(name));
                            });
                        }
                    });
                });
        });
}
