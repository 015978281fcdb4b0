use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("store file not found: {}", .path.display())]
    Missing { path: PathBuf },

    #[error("malformed store: {0}")]
    Malformed(String),

    #[error("invalid file name: {0}")]
    InvalidName(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("XLSX read error: {0}")]
    XlsxRead(#[from] calamine::XlsxError),

    #[error("XLSX write error: {0}")]
    XlsxWrite(#[from] rust_xlsxwriter::XlsxError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl StoreError {
    /// Stable error code reported to the sidecar host.
    pub fn code(&self) -> &'static str {
        match self {
            StoreError::Missing { .. } => "store_missing",
            StoreError::Malformed(_) | StoreError::XlsxRead(_) | StoreError::Json(_) => {
                "store_malformed"
            }
            StoreError::InvalidName(_) => "bad_params",
            StoreError::Io(_) | StoreError::XlsxWrite(_) => "io_failed",
        }
    }
}
