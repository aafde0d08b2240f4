use eframe::egui::{Color32, RichText, ScrollArea, Ui};

use crate::state::AppState;
use crate::ui::{plot, table};

pub const TITLE: &str = "Análisis de Datos - EMA 2021-2022";

// ---------------------------------------------------------------------------
// Central panel: raw table followed by the charts, in fixed order
// ---------------------------------------------------------------------------

pub fn central_panel(ui: &mut Ui, state: &AppState) {
    if let Some(err) = &state.load_error {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.label(
                RichText::new(format!("No se pudieron cargar los datos.\n\n{err}"))
                    .color(Color32::RED)
                    .heading(),
            );
        });
        return;
    }

    let Some(records) = &state.table else {
        return;
    };
    let charts = &state.charts;

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.heading(TITLE);
            ui.add_space(8.0);

            table::filtered_table(ui, records, &state.visible_indices);

            section(ui, "Estado Civil de Contrayentes");
            plot::bar_chart(ui, "civil_status", &charts.civil_status);

            section(ui, "Nivel de Instrucción de Contrayentes");
            plot::bar_chart(ui, "education", &charts.education);

            section(ui, "Matrimonios por Provincia Más Pobladas");
            plot::pie_chart(ui, "top_provinces", &charts.top_provinces);

            section(ui, "Contrayentes Divorciados y Solteros por Provincia");
            plot::bar_chart(ui, "divorced_single", &charts.divorced_single);

            for (i, province) in charts.province_pies.iter().enumerate() {
                section(ui, &province.title);
                plot::pie_chart(ui, &format!("province_pie_{i}"), &province.pie);
            }
        });
}

fn section(ui: &mut Ui, title: &str) {
    ui.add_space(16.0);
    ui.separator();
    ui.strong(RichText::new(title).size(18.0));
}
