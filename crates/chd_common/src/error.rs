//! Error types for CHD risk assessment.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChdError {
    #[error("Model artifact not found at {}", path.display())]
    ModelNotFound { path: PathBuf },

    #[error("Failed to read model artifact {}: {source}", path.display())]
    ModelIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed model artifact: {0}")]
    ModelFormat(#[from] serde_json::Error),

    #[error("Incompatible model artifact: {0}")]
    IncompatibleModel(String),

    #[error("{field} = {value} is outside [{min}, {max}]")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("{field} must be a finite number")]
    NonFinite { field: String },

    #[error("Missing column '{0}'")]
    MissingColumn(String),

    #[error("Unexpected column '{0}'")]
    UnexpectedColumn(String),

    #[error("Duplicate column '{0}'")]
    DuplicateColumn(String),

    #[error("Column '{column}' expects {expected}")]
    TypeMismatch {
        column: String,
        expected: &'static str,
    },

    #[error("Unknown category '{value}' for column '{column}' (known: {known})")]
    UnknownCategory {
        column: String,
        value: String,
        known: String,
    },

    #[error("Config error: {0}")]
    Config(String),
}

impl ChdError {
    pub fn code(&self) -> i32 {
        match self {
            ChdError::ModelNotFound { .. } => -32000,
            ChdError::ModelIo { .. } => -32001,
            ChdError::ModelFormat(_) => -32700,
            ChdError::IncompatibleModel(_) => -32002,
            ChdError::OutOfRange { .. } => -32602,
            ChdError::NonFinite { .. } => -32603,
            ChdError::MissingColumn(_) => -32610,
            ChdError::UnexpectedColumn(_) => -32611,
            ChdError::DuplicateColumn(_) => -32612,
            ChdError::TypeMismatch { .. } => -32613,
            ChdError::UnknownCategory { .. } => -32614,
            ChdError::Config(_) => -32010,
        }
    }

    /// The artifact could not be loaded; nothing can be predicted.
    pub fn is_model_unavailable(&self) -> bool {
        matches!(
            self,
            ChdError::ModelNotFound { .. }
                | ChdError::ModelIo { .. }
                | ChdError::ModelFormat(_)
                | ChdError::IncompatibleModel(_)
        )
    }

    /// The caller sent a bad record or row (HTTP 422 territory).
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            ChdError::OutOfRange { .. }
                | ChdError::NonFinite { .. }
                | ChdError::MissingColumn(_)
                | ChdError::UnexpectedColumn(_)
                | ChdError::DuplicateColumn(_)
                | ChdError::TypeMismatch { .. }
                | ChdError::UnknownCategory { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, ChdError>;
