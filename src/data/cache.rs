use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use crate::error::DashboardError;

use super::loader;
use super::model::RecordTable;

/// Read-once holder of the record table for one source path.
///
/// The first successful [`TableCache::get`] parses the file; every later call
/// hands out the same `Arc` without touching the disk. Failed loads are not
/// cached.
#[derive(Debug)]
pub struct TableCache {
    path: PathBuf,
    table: OnceLock<Arc<RecordTable>>,
}

impl TableCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            table: OnceLock::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self) -> Result<Arc<RecordTable>, DashboardError> {
        if let Some(table) = self.table.get() {
            return Ok(Arc::clone(table));
        }

        let table = loader::load_file(&self.path).map_err(|e| {
            log::error!("Failed to load {}: {e:#}", self.path.display());
            DashboardError::data_unavailable(&self.path, &e)
        })?;
        log::info!(
            "Loaded {} rows with {} columns from {}",
            table.len(),
            table.columns().len(),
            self.path.display()
        );

        Ok(Arc::clone(self.table.get_or_init(|| Arc::new(table))))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::data::model::columns;

    #[test]
    fn second_get_reuses_first_load() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "{}", columns::REQUIRED.join(";")).unwrap();
        writeln!(file, "2021;Enero;Ecuador;Ecuador;Hombre;Mujer;Soltero;Soltera;Superior;Superior;Azuay").unwrap();
        file.flush().unwrap();

        let cache = TableCache::new(file.path());
        let first = cache.get().unwrap();

        // The file is gone, the cached table is not.
        let path = file.path().to_path_buf();
        drop(file);
        assert!(!path.exists());

        let second = cache.get().unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(second.len(), 1);
    }

    #[test]
    fn missing_file_is_data_unavailable() {
        let cache = TableCache::new("/nonexistent/EMA_2021_2022.csv");
        let err = cache.get().unwrap_err();
        assert!(matches!(err, DashboardError::DataUnavailable { .. }));
        assert!(err.to_string().starts_with("data unavailable (/nonexistent/EMA_2021_2022.csv)"));
    }
}
