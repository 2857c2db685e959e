// src/errors.rs

//! Crate-wide error type and exit-code mapping.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DojoError {
    #[error("Configuration error: {0}")]
    Config(String),

    /// The auto-commit action exited with git's fatal status.
    #[error(
        "Impossible to commit to repository at {path:?}. \
         Make sure git is installed and this is a valid repository"
    )]
    NotARepository { path: PathBuf },

    /// The shell itself could not be started (distinct from a nonzero exit).
    #[error("failed to launch shell for command '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DojoError {
    /// Process exit status used by `main` for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            DojoError::Config(_) | DojoError::Toml(_) => 2,
            DojoError::NotARepository { .. } => 3,
            _ => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, DojoError>;
