use thiserror::Error;

pub mod export;

pub use export::{
    ExportConfig, ExportFormat, export_dot, export_json, write_all, write_export,
};

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}
