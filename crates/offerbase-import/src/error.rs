use thiserror::Error;

/// Batch-level failures of the import entry points. Record-level problems
/// never surface here; they are collected into the aggregate report.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON in {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("unsupported JSON shape: expected an object or an array of objects")]
    UnsupportedShape,
}
