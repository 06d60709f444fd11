use spendbook_config::ConfigError;
use spendbook_core::{CoreError, ErrorKind};
use thiserror::Error;

/// Unified error type for the store, storage and configuration layers.
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl AppError {
    /// Storage-class failures for core errors; configuration problems count as storage too.
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::Core(err) => err.kind(),
            AppError::Config(_) => ErrorKind::Storage,
        }
    }
}

/// Failures that stop the shell itself rather than a single command.
#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    App(#[from] AppError),
    #[error("Terminal error: {0}")]
    Readline(#[from] rustyline::error::ReadlineError),
    #[error("Prompt error: {0}")]
    Prompt(#[from] dialoguer::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        CliError::App(AppError::from(err))
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        CliError::App(AppError::from(err))
    }
}
