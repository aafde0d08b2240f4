use std::path::Path;

use eframe::egui::{self, Color32, RichText, Ui};

use crate::data::filter::FilterField;
use crate::state::{AppState, FilterChange};

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel. Every pick becomes a [`FilterChange`]
/// handed to the state once the widgets are drawn.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filtros");
    ui.separator();

    if state.table.is_none() {
        ui.label("Sin datos cargados.");
        return;
    }

    let mut changes: Vec<FilterChange> = Vec::new();

    for field in FilterField::ALL {
        let current = state.filters.selection(field);
        ui.strong(field.label());
        egui::ComboBox::from_id_salt(field.column())
            .selected_text(current.to_string())
            .width(ui.available_width())
            .show_ui(ui, |ui: &mut Ui| {
                for choice in state.options.choices(field) {
                    let label = choice.to_string();
                    if ui.selectable_label(choice == current, label).clicked() {
                        changes.push(FilterChange {
                            field,
                            selection: choice,
                        });
                    }
                }
            });
        ui.add_space(6.0);
    }

    for change in changes {
        state.handle(change);
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState, source: &Path) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("Archivo", |ui: &mut Ui| {
            let can_export = state.table.is_some();
            if ui
                .add_enabled(can_export, egui::Button::new("Exportar CSV…"))
                .clicked()
            {
                export_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();
        ui.label(RichText::new(source.display().to_string()).monospace());
        ui.separator();

        if let Some(table) = &state.table {
            ui.label(format!(
                "{} registros cargados, {} visibles",
                table.len(),
                state.visible_indices.len()
            ));
            if state.filters.is_unfiltered() {
                ui.weak("(sin filtros)");
            }
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            let color = if msg.starts_with("Error") {
                Color32::RED
            } else {
                ui.visuals().text_color()
            };
            ui.label(RichText::new(msg).color(color));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn export_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Exportar datos filtrados")
        .add_filter("CSV", &["csv"])
        .set_file_name("EMA_filtrado.csv")
        .save_file();

    if let Some(path) = file {
        state.export_visible(&path);
    }
}
