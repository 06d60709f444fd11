use spendbook_domain::UnknownCategory;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("Expense not found: {0}")]
    ExpenseNotFound(String),
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Serialization error: {0}")]
    Serde(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Coarse failure classes callers branch on when presenting errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    NotFound,
    Storage,
}

impl CoreError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CoreError::Validation(_) => ErrorKind::Validation,
            CoreError::ExpenseNotFound(_) => ErrorKind::NotFound,
            CoreError::Storage(_) | CoreError::Serde(_) | CoreError::Io(_) => ErrorKind::Storage,
        }
    }
}

impl From<UnknownCategory> for CoreError {
    fn from(err: UnknownCategory) -> Self {
        CoreError::Validation(err.to_string())
    }
}

impl From<csv::Error> for CoreError {
    fn from(err: csv::Error) -> Self {
        if !err.is_io_error() {
            return CoreError::Serde(err.to_string());
        }
        match err.into_kind() {
            csv::ErrorKind::Io(io) => CoreError::Io(io),
            other => CoreError::Serde(format!("{other:?}")),
        }
    }
}
