use eframe::egui::{ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::model::RecordTable;

const ROW_HEIGHT: f32 = 18.0;
const MAX_TABLE_HEIGHT: f32 = 300.0;

/// Scrollable listing of the filtered rows, all columns. Only visible rows
/// are laid out, so large tables stay responsive.
pub fn filtered_table(ui: &mut Ui, table: &RecordTable, rows: &[usize]) {
    ScrollArea::horizontal()
        .id_salt("raw_table_scroll")
        .show(ui, |ui: &mut Ui| {
            TableBuilder::new(ui)
                .striped(true)
                .resizable(true)
                .max_scroll_height(MAX_TABLE_HEIGHT)
                .column(Column::auto().at_least(40.0))
                .columns(Column::auto().at_least(60.0), table.columns().len())
                .header(ROW_HEIGHT + 2.0, |mut header| {
                    header.col(|ui| {
                        ui.strong("#");
                    });
                    for name in table.columns() {
                        header.col(|ui| {
                            ui.strong(name.as_str());
                        });
                    }
                })
                .body(|body| {
                    body.rows(ROW_HEIGHT, rows.len(), |mut row| {
                        let index = rows[row.index()];
                        row.col(|ui| {
                            ui.label(index.to_string());
                        });
                        for cell in table.row(index) {
                            row.col(|ui| {
                                ui.label(&*cell.as_field());
                            });
                        }
                    });
                });
        });

    if rows.is_empty() {
        ui.weak("Ninguna fila coincide con los filtros.");
    }
}
