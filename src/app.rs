use eframe::egui;

use crate::config::DashboardConfig;
use crate::data::cache::TableCache;
use crate::state::AppState;
use crate::ui::{dashboard, panels};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct EmaDashboardApp {
    cache: TableCache,
    pub state: AppState,
}

impl EmaDashboardApp {
    /// Load the source table once and build the initial, unfiltered view.
    pub fn new(config: &DashboardConfig) -> Self {
        let cache = TableCache::new(&config.data_path);
        let state = AppState::new(cache.get(), config.report_settings());
        Self { cache, state }
    }
}

impl eframe::App for EmaDashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state, self.cache.path());
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: table and charts ----
        egui::CentralPanel::default().show(ctx, |ui| {
            dashboard::central_panel(ui, &self.state);
        });
    }
}
