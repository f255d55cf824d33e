use std::path::PathBuf;

/// Failures reading or writing project and CSV files.
#[derive(Debug, thiserror::Error)]
pub enum ProjectIoError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid project file {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("CSV is missing required columns. Found headers: {found:?}. Need columns for: phase name, start offset, duration.")]
    MissingColumns { found: Vec<String> },

    #[error("no valid phases found in CSV ({skipped} rows skipped)")]
    NoPhases { skipped: usize },

    #[error(transparent)]
    Calendar(#[from] crate::calendar::CalendarError),
}
