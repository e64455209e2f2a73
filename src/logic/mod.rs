use thiserror::Error;
use async_trait::async_trait;
use std::fmt;

use crate::storage::{StorageAdapter, StorageError};

pub mod best_match;
pub mod similarity;

pub use best_match::BestMatch;
pub use similarity::similarity;

#[derive(Error, Debug)]
pub enum LogicError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
    #[error("Unknown logic adapter: {0}")]
    UnknownAdapter(String),
    #[error("No statements in storage, the bot has nothing to respond with. Train it first.")]
    EmptyStorage,
}

/// A reply selected for one input line. The `Display` form is what gets
/// printed to the terminal.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub text: String,
    pub confidence: f64,
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}

/// Descriptor for one logic adapter, resolved by [`create_logic_adapter`].
#[derive(Debug, Clone)]
pub struct LogicAdapterConfig {
    pub name: String,
    pub maximum_similarity_threshold: Option<f64>,
}

impl LogicAdapterConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            maximum_similarity_threshold: None,
        }
    }
}

#[async_trait]
pub trait LogicAdapter: Send + Sync {
    fn name(&self) -> &str;

    async fn process(
        &self,
        input: &str,
        storage: &dyn StorageAdapter,
    ) -> Result<Reply, LogicError>;
}

/// Resolve a logic adapter descriptor to a concrete strategy.
/// `logic.best_match` is the only registered adapter.
pub fn create_logic_adapter(
    config: &LogicAdapterConfig,
) -> Result<Box<dyn LogicAdapter>, LogicError> {
    match config.name.as_str() {
        "logic.best_match" => Ok(Box::new(BestMatch::new(
            config.maximum_similarity_threshold,
        ))),
        other => Err(LogicError::UnknownAdapter(other.to_string())),
    }
}
