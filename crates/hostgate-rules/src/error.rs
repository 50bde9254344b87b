//! Error types for rule loading.

use thiserror::Error;

/// Errors from loading rule files.
///
/// Evaluation itself is infallible: classification is total and the
/// policies always return a verdict. Only the file provider can fail.
#[derive(Error, Debug)]
pub enum RulesError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("yaml parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}
