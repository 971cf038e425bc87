use std::path::PathBuf;

use thiserror::Error;

use crate::semantic::LowerError;

#[derive(Debug, Error)]
pub enum Error {
    #[error("{}: {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{}: invalid parse tree: {}", .path.display(), .source)]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("{0}")]
    Lower(#[from] LowerError),
    #[error("failed to serialize output: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("{count} unsupported construct(s) reported")]
    Diagnostics { count: usize },
}
