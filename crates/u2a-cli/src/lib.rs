pub mod commands;
pub mod table_source;
pub mod trace_init;

use u2a_core::settings::SettingsError;
use u2a_core::{OptionsError, TableError, TableIoError};

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("{path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Table(#[from] TableError),
    #[error(transparent)]
    TableIo(#[from] TableIoError),
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error(transparent)]
    Options(#[from] OptionsError),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CliError {
    pub(crate) fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        CliError::Io {
            path: path.into(),
            source,
        }
    }
}
