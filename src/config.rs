use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::data::aggregate::ReportSettings;

/// Optional settings file looked up in the working directory.
pub const CONFIG_FILE: &str = "dashboard.json";

/// Dashboard settings. Every field has a default, so an absent file or a
/// partial one both work.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Source table, read once at startup.
    pub data_path: PathBuf,
    /// How many provinces the distribution pie keeps.
    pub top_provinces: usize,
    /// Provinces that get their own divorced/single pie, in panel order.
    pub focus_provinces: Vec<String>,
    /// Initial window size in points.
    pub window_size: [f32; 2],
}

impl Default for DashboardConfig {
    fn default() -> Self {
        let report = ReportSettings::default();
        Self {
            data_path: PathBuf::from("EMA_2021_2022.csv"),
            top_provinces: report.top_provinces,
            focus_provinces: report.focus_provinces,
            window_size: [1200.0, 800.0],
        }
    }
}

impl DashboardConfig {
    /// Read `path` if it exists. A broken file is logged and ignored.
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match Self::load(path) {
            Ok(config) => {
                log::info!("Using settings from {}", path.display());
                config
            }
            Err(e) => {
                log::warn!("Ignoring {}: {e:#}", path.display());
                Self::default()
            }
        }
    }

    fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).context("reading settings")?;
        serde_json::from_str(&text).context("parsing settings")
    }

    pub fn report_settings(&self) -> ReportSettings {
        ReportSettings {
            top_provinces: self.top_provinces,
            focus_provinces: self.focus_provinces.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let config = DashboardConfig::load_or_default(Path::new("/nonexistent/dashboard.json"));
        assert_eq!(config, DashboardConfig::default());
        assert_eq!(config.report_settings(), ReportSettings::default());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "data_path": "otro.parquet", "top_provinces": 3 }}"#).unwrap();
        file.flush().unwrap();

        let config = DashboardConfig::load_or_default(file.path());
        assert_eq!(config.data_path, PathBuf::from("otro.parquet"));
        assert_eq!(config.top_provinces, 3);
        assert_eq!(config.focus_provinces, vec!["Guayas", "Pichincha"]);
    }

    #[test]
    fn broken_file_falls_back_to_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        file.flush().unwrap();
        assert_eq!(DashboardConfig::load_or_default(file.path()), DashboardConfig::default());
    }
}
