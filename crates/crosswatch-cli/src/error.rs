use std::path::PathBuf;

use thiserror::Error;

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("cannot read universe file {path}: {source}")]
    Universe {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("universe file {path} contains no symbols")]
    EmptyUniverse { path: PathBuf },

    #[error(transparent)]
    Store(#[from] crosswatch_store::StoreError),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Universe { .. } | Self::EmptyUniverse { .. } => 2,
            Self::Store(_) => 4,
            Self::Serialization(_) => 4,
            Self::Io(_) => 10,
        }
    }
}
