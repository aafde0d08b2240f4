use std::path::{Path, PathBuf};

/// Failures surfaced to the user. Empty filter results are not errors and never show up here.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DashboardError {
    /// The source file is missing, unreadable or malformed. Nothing is rendered.
    #[error("data unavailable ({}): {reason}", .path.display())]
    DataUnavailable { path: PathBuf, reason: String },

    #[error("export to {} failed: {reason}", .path.display())]
    Export { path: PathBuf, reason: String },
}

impl DashboardError {
    pub fn data_unavailable(path: &Path, err: &anyhow::Error) -> Self {
        DashboardError::DataUnavailable {
            path: path.to_path_buf(),
            reason: format!("{err:#}"),
        }
    }

    pub fn export(path: &Path, err: &anyhow::Error) -> Self {
        DashboardError::Export {
            path: path.to_path_buf(),
            reason: format!("{err:#}"),
        }
    }
}
