use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("generator error: {0}")]
    Core(#[from] vaforge_core::Error),
    #[error("expansion error: {0}")]
    Expand(#[from] vaforge_expand::ExpandError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("config error in {}: {source}", path.display())]
    Config {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("logging error: {0}")]
    Logging(String),
    #[error("{} is out of date ({reason})", path.display())]
    Stale { path: PathBuf, reason: &'static str },
}

pub type CliResult<T> = std::result::Result<T, CliError>;
