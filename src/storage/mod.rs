use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use std::io;
use std::path::Path;
use std::sync::Arc;

pub mod sqlite;

pub use sqlite::SqliteStorage;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] tokio_rusqlite::Error),
    #[error("Storage connection error: {0}")]
    Connection(String),
    #[error("Unknown storage adapter: {0}")]
    UnknownAdapter(String),
    #[error("Invalid database URI: {0}")]
    InvalidUri(String),
}

/// A single stored exchange line. Statements with no `in_response_to`
/// open a conversation; the rest answer the statement text they name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statement {
    pub text: String,
    pub in_response_to: Option<String>,
    pub conversation: String,
}

impl Statement {
    pub fn new(text: impl Into<String>, in_response_to: Option<String>, conversation: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            in_response_to,
            conversation: conversation.into(),
        }
    }
}

#[async_trait]
pub trait StorageAdapter: Send + Sync {
    async fn insert(&self, statement: Statement) -> Result<(), StorageError>;

    async fn find_responses_to(&self, text: &str) -> Result<Vec<Statement>, StorageError>;

    /// Distinct statement texts known to the store.
    async fn all_texts(&self) -> Result<Vec<String>, StorageError>;

    async fn random_statement(&self) -> Result<Option<Statement>, StorageError>;

    async fn count(&self) -> Result<u64, StorageError>;
}

/// Delete the persisted database file. Returns whether a file was
/// actually removed; a missing file is not an error.
pub fn reset_database(path: &Path) -> io::Result<bool> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e),
    }
}

/// Resolve a storage selector string to a concrete backend.
/// `storage.sqlite` is the only registered adapter.
pub async fn create_storage(
    selector: &str,
    database_uri: &str,
) -> Result<Arc<dyn StorageAdapter>, StorageError> {
    match selector {
        "storage.sqlite" => Ok(Arc::new(SqliteStorage::new(database_uri).await?)),
        other => Err(StorageError::UnknownAdapter(other.to_string())),
    }
}
