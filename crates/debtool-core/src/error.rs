//! Error taxonomy for the Debian build driver.
//!
//! Two kinds matter to callers: [`BuildToolError::Config`] is always fatal
//! and raised before any repository work starts; [`BuildToolError::Execution`]
//! signals a non-zero exit of an external build invocation and is the only
//! kind eligible for the one-shot publish-flag retry. Everything else
//! propagates uncaught.

use thiserror::Error;

/// Errors produced by the Debian build pipeline.
#[derive(Debug, Error)]
pub enum BuildToolError {
    /// Required environment credentials or options are missing or invalid.
    #[error("config error: {0}")]
    Config(String),

    /// An external build invocation exited with a non-zero status.
    #[error("execution error: {stage} for repository {repository} exited with status {exit_code}")]
    Execution {
        repository: String,
        stage: String,
        exit_code: i32,
        stderr: String,
    },

    /// The source-code-manager could not resolve a repository.
    #[error("scm error: {0}")]
    Scm(String),

    /// The Bintray existence check failed (network or unexpected status).
    #[error("bintray error: {0}")]
    Bintray(String),

    /// BOM document could not be parsed.
    #[error("bom parse error: {0}")]
    BomParse(#[from] serde_json::Error),

    /// Underlying I/O failure (spawn, file access).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl BuildToolError {
    /// Whether this error is the retryable external-process kind.
    pub fn is_execution(&self) -> bool {
        matches!(self, BuildToolError::Execution { .. })
    }
}

/// Result type for build driver operations.
pub type Result<T> = std::result::Result<T, BuildToolError>;
