use std::path::PathBuf;

use thiserror::Error;

use crate::core::types::DocId;

/// Error kinds produced by the engine, one variant per failure mode enumerated
/// in the error handling design.
#[derive(Debug, Error)]
pub enum Error {
    #[error("no index found at {0}")]
    StorageNotFound(PathBuf),

    #[error("an index already exists at {0}")]
    DuplicateStorage(PathBuf),

    #[error("internal container missing: {0}")]
    ContainerMissing(String),

    #[error("document {0:?} does not exist")]
    DocumentMissing(DocId),

    #[error("field '{0}' is already declared")]
    DuplicateField(String),

    #[error("invalid field name '{0}'")]
    InvalidFieldName(String),

    #[error("invalid field configuration: {0}")]
    InvalidFieldConfig(String),

    #[error("query syntax error: {0}")]
    QuerySyntax(String),

    #[error("query semantics error: {0}")]
    QuerySemantics(String),

    #[error("timed out waiting to acquire the writer lock")]
    LockTimeout,

    #[error("the writer lock is already held by another process")]
    LockAlreadyHeld,

    #[error("failed to acquire the writer lock: {0}")]
    LockFailed(String),

    #[error("the writer lock is not held")]
    LockNotHeld,

    #[error("the writer lock is held by a different process")]
    LockNotMine,

    #[error("no plugin slot for type '{plugin_type}' settings '{settings}'")]
    PluginMissing { plugin_type: String, settings: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
