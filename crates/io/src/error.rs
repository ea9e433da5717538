use std::path::PathBuf;

use courtsync_recon::ReconError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IoError {
    #[error("{}: {source}", path.display())]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("xlsx error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Recon(#[from] ReconError),

    #[error("government data: {0}")]
    GovData(String),

    #[error("unsupported file type '{0}' (expected .csv or .json)")]
    UnsupportedFormat(String),

    #[error("invalid table name '{0}'")]
    TableName(String),
}

impl IoError {
    pub(crate) fn file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::File {
            path: path.into(),
            source,
        }
    }
}
