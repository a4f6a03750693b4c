use std::io;
use std::path::PathBuf;

use mound_types::{Did, TypeError};

/// Errors from mound store operations.
#[derive(Debug, thiserror::Error)]
pub enum MoundError {
    /// The identifier provider could not produce a fresh identifier.
    #[error("identifier generation failed: {0}")]
    IdentifierGenerationFailed(#[source] TypeError),

    /// The identifier is too short to shard, or its shard prefix is not hex.
    #[error("invalid identifier {0:?}")]
    InvalidIdentifier(String),

    /// A link target failed the provider's validation predicate.
    #[error("invalid link target {0:?}: not a random-variant identifier")]
    InvalidLinkTarget(String),

    /// More than one optional name was passed to blob allocation.
    #[error("blob allocation takes zero or one name, got {given}")]
    TooManyArguments { given: usize },

    /// Directory creation, or a descriptor write or read, failed.
    #[error("failed to persist {path}: {source}")]
    PersistenceFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Opening, appending to, or flushing a blob file failed.
    #[error("failed to write blob {path}: {source}")]
    BlobWriteFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Reading a blob file back failed.
    #[error("failed to read blob {path}: {source}")]
    BlobReadFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// `blob` or `link` was called after the entity was closed.
    #[error("entity {0} is closed")]
    AlreadyClosed(Did),

    /// `-1` is reserved for open entities and cannot be a terminal status.
    #[error("status {0} is reserved for open entities")]
    InvalidStatus(i32),

    /// A descriptor field was rejected at creation.
    #[error("invalid {field}: {reason}")]
    InvalidField { field: &'static str, reason: String },

    /// A blob name was rejected at allocation.
    #[error("invalid blob name {0:?}")]
    InvalidBlobName(String),

    /// No blob is allocated at the given slot.
    #[error("entity {did} has no blob at slot {slot}")]
    UnknownBlob { did: Did, slot: usize },

    /// No descriptor exists for the identifier.
    #[error("no document for {0}")]
    DocumentNotFound(Did),

    /// The `doc` at the identifier's path belongs to another entity sharing
    /// its shard prefix.
    #[error("document {path} holds {found}, not {requested}")]
    DocumentMismatch {
        requested: Did,
        found: Did,
        path: PathBuf,
    },

    /// A descriptor file exists but cannot be parsed.
    #[error("corrupt document {path}: {source}")]
    CorruptDocument {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Descriptor serialization failure.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The config file could not be read.
    #[error("failed to read config {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The config document is not valid TOML for [`MoundConfig`](crate::MoundConfig).
    #[error("invalid config: {0}")]
    ConfigParse(#[source] toml::de::Error),

    /// An environment override holds a value that cannot be interpreted.
    #[error("invalid value {value:?} for {var}")]
    InvalidEnv { var: &'static str, value: String },
}

/// Result alias for mound store operations.
pub type Result<T> = std::result::Result<T, MoundError>;
