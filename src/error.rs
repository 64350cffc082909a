//! Application-wide error types.
//!
//! Library modules use specific error types via `thiserror` (the pipeline's
//! [`LookupError`], config's `ConfigError`); this module aggregates them for
//! the CLI, which uses `anyhow` at the binary boundary.

use crate::pipeline::domain::LookupError;

/// Application-wide result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level application error.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// File I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    /// External service error
    #[error("Lookup error: {0}")]
    Lookup(#[from] LookupError),

    /// A required API key is neither configured nor in the environment
    #[error("Missing credential: {0} (set it in config.toml or the environment)")]
    MissingCredential(&'static str),

    /// Generic error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Add context to an error.
    pub fn context(self, ctx: impl Into<String>) -> Self {
        Self::WithContext {
            context: ctx.into(),
            source: Box::new(self),
        }
    }
}

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn with_context(self, ctx: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn with_context(self, ctx: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.context(ctx))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, LookupError> {
    fn with_context(self, ctx: impl Into<String>) -> Result<T> {
        self.map_err(|e| Error::Lookup(e).context(ctx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::MissingCredential("YOUTUBE_API_KEY");
        assert!(err.to_string().contains("YOUTUBE_API_KEY"));
    }

    #[test]
    fn test_error_with_context() {
        let err = Error::Lookup(LookupError::Network("timeout".to_string()))
            .context("while validating candidate");
        let msg = err.to_string();
        assert!(msg.contains("while validating candidate"));
    }

    #[test]
    fn test_result_ext() {
        let result: std::result::Result<(), LookupError> =
            Err(LookupError::Parse("bad json".to_string()));
        let with_ctx = result.with_context("additional context");
        assert!(
            with_ctx
                .unwrap_err()
                .to_string()
                .contains("additional context")
        );
    }
}
