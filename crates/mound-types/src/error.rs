use thiserror::Error;

/// Errors produced by type operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid identifier {input:?}: {reason}")]
    InvalidDid { input: String, reason: String },

    #[error("identifier generation failed: {0}")]
    Generation(String),
}
