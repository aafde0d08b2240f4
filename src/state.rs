use std::path::Path;
use std::sync::Arc;

use crate::chart::ChartSet;
use crate::data::aggregate::{Report, ReportSettings};
use crate::data::export;
use crate::data::filter::{filtered_indices, FilterField, FilterOptions, FilterState, Selection};
use crate::data::model::RecordTable;
use crate::error::DashboardError;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// One user edit of the filter panel.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterChange {
    pub field: FilterField,
    pub selection: Selection,
}

/// The full UI state, independent of rendering.
#[derive(Default)]
pub struct AppState {
    /// Loaded table (None when the load failed).
    pub table: Option<Arc<RecordTable>>,

    /// Selectable values per filter, from the full table.
    pub options: FilterOptions,

    /// Current selection per filter field.
    pub filters: FilterState,

    /// Indices of rows passing the current filters.
    pub visible_indices: Vec<usize>,

    /// Aggregations over `visible_indices`.
    pub report: Report,

    /// Chart specifications derived from `report`.
    pub charts: ChartSet,

    pub settings: ReportSettings,

    /// Set when the source could not be loaded; replaces the whole dashboard.
    pub load_error: Option<DashboardError>,

    /// Status / error message shown in the top bar.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(
        loaded: Result<Arc<RecordTable>, DashboardError>,
        settings: ReportSettings,
    ) -> Self {
        let mut state = AppState {
            settings,
            ..Default::default()
        };
        match loaded {
            Ok(table) => state.set_table(table),
            Err(e) => state.load_error = Some(e),
        }
        state
    }

    /// Ingest the loaded table with every filter at "all values".
    pub fn set_table(&mut self, table: Arc<RecordTable>) {
        self.options = FilterOptions::from_table(&table);
        self.filters = FilterState::default();
        self.table = Some(table);
        self.load_error = None;
        self.refilter();
    }

    /// Apply one filter change and recompute the view and report.
    /// Returns whether anything changed.
    pub fn handle(&mut self, change: FilterChange) -> bool {
        if !self.options.contains(change.field, &change.selection) {
            log::warn!(
                "Ignoring {} = {}: not an option",
                change.field.column(),
                change.selection
            );
            return false;
        }
        if self.filters.selection(change.field) == change.selection {
            return false;
        }
        log::debug!("Filter {} = {}", change.field.column(), change.selection);
        self.filters.set(change.field, change.selection);
        self.refilter();
        true
    }

    /// Recompute `visible_indices` and `report` from scratch.
    fn refilter(&mut self) {
        if let Some(table) = &self.table {
            self.visible_indices = filtered_indices(table, &self.filters);
            self.report = Report::build(table, &self.visible_indices, &self.settings);
            self.charts = ChartSet::from_report(&self.report);
            log::debug!(
                "{} of {} rows visible",
                self.visible_indices.len(),
                table.len()
            );
        }
    }

    /// Write the visible rows to `path`, reporting the outcome in the status line.
    pub fn export_visible(&mut self, path: &Path) {
        let Some(table) = &self.table else {
            return;
        };
        match export::write_csv(table, &self.visible_indices, path) {
            Ok(()) => {
                log::info!(
                    "Exported {} rows to {}",
                    self.visible_indices.len(),
                    path.display()
                );
                self.status_message = Some(format!(
                    "Exportadas {} filas a {}",
                    self.visible_indices.len(),
                    path.display()
                ));
            }
            Err(e) => {
                let err = DashboardError::export(path, &e);
                log::error!("{err}");
                self.status_message = Some(format!("Error: {err}"));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::data::model::{columns, test_support::table, CellValue};

    fn state() -> AppState {
        let t = table(
            &columns::REQUIRED,
            &[
                &["2021", "Enero", "Ecuador", "Ecuador", "Hombre", "Mujer", "Soltero", "Soltera", "Superior", "Superior", "Guayas"],
                &["2021", "Enero", "Ecuador", "Colombia", "Hombre", "Mujer", "Divorciado", "Soltera", "Primaria", "Superior", "Guayas"],
                &["2022", "Marzo", "Peru", "Ecuador", "Hombre", "Mujer", "Soltero", "Divorciada", "Superior", "Primaria", "Pichincha"],
            ],
        );
        AppState::new(Ok(Arc::new(t)), ReportSettings::default())
    }

    fn year(y: i64) -> FilterChange {
        FilterChange {
            field: FilterField::Year,
            selection: Selection::Value(CellValue::Integer(y)),
        }
    }

    #[test]
    fn starts_unfiltered() {
        let s = state();
        assert_eq!(s.visible_indices, vec![0, 1, 2]);
        assert_eq!(s.report.rows, 3);
        assert!(s.load_error.is_none());
    }

    #[test]
    fn filter_change_recomputes_report() {
        let mut s = state();
        assert!(s.handle(year(2021)));
        assert_eq!(s.visible_indices, vec![0, 1]);
        assert_eq!(s.report.province_breakdowns[0].counts.total(), 2);
        assert!(s.report.province_breakdowns[1].counts.is_empty());

        assert!(!s.handle(year(2021)));

        assert!(s.handle(FilterChange {
            field: FilterField::Year,
            selection: Selection::All,
        }));
        assert_eq!(s.visible_indices.len(), 3);
    }

    #[test]
    fn unknown_option_is_ignored() {
        let mut s = state();
        assert!(!s.handle(year(1990)));
        assert_eq!(s.visible_indices.len(), 3);
    }

    #[test]
    fn conjunction_can_empty_the_view() {
        let mut s = state();
        s.handle(year(2022));
        s.handle(FilterChange {
            field: FilterField::Nationality1,
            selection: Selection::Value("Ecuador".into()),
        });
        assert!(s.visible_indices.is_empty());
        assert_eq!(s.report.rows, 0);
        assert!(s.report.top_provinces.counts.is_empty());
        assert!(s.charts.top_provinces.is_empty());
        assert!(s.charts.province_pies.iter().all(|p| p.pie.is_empty()));
    }

    #[test]
    fn load_failure_is_kept_for_display() {
        let err = DashboardError::DataUnavailable {
            path: PathBuf::from("EMA_2021_2022.csv"),
            reason: "No such file".into(),
        };
        let s = AppState::new(Err(err.clone()), ReportSettings::default());
        assert_eq!(s.load_error, Some(err));
        assert!(s.table.is_none());
        assert!(s.visible_indices.is_empty());
    }

    #[test]
    fn export_reports_in_status_line() {
        let mut s = state();
        s.handle(year(2022));
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        s.export_visible(&path);
        assert!(s.status_message.as_deref().unwrap().starts_with("Exportadas 1 filas"));

        s.export_visible(Path::new("/nonexistent/dir/out.csv"));
        assert!(s.status_message.as_deref().unwrap().starts_with("Error: export"));
    }
}
