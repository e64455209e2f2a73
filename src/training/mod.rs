use log::info;
use thiserror::Error;
use std::sync::Arc;

use crate::corpus::{self, CorpusError};
use crate::storage::{Statement, StorageAdapter, StorageError};

#[derive(Error, Debug)]
pub enum TrainingError {
    #[error("Corpus error: {0}")]
    Corpus(#[from] CorpusError),
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
    #[error("List training needs at least two statements, got {0}")]
    NotEnoughStatements(usize),
}

/// Stores one conversation as a chain: the first statement opens it, each
/// later statement answers its predecessor.
async fn store_conversation<S: AsRef<str>>(
    storage: &dyn StorageAdapter,
    conversation: &[S],
    tag: &str,
) -> Result<(), TrainingError> {
    let mut previous: Option<String> = None;

    for statement in conversation {
        let text = statement.as_ref();
        storage
            .insert(Statement::new(text, previous.take(), tag))
            .await?;
        previous = Some(text.to_string());
    }

    Ok(())
}

/// Bulk-loads a built-in dataset of example exchanges.
pub struct CorpusTrainer {
    storage: Arc<dyn StorageAdapter>,
}

impl CorpusTrainer {
    pub fn new(storage: Arc<dyn StorageAdapter>) -> Self {
        Self { storage }
    }

    pub async fn train(&self, dataset_id: &str) -> Result<(), TrainingError> {
        for (category, conversations) in corpus::conversations_for(dataset_id)? {
            let tag = format!("training.{category}");
            for conversation in &conversations {
                store_conversation(self.storage.as_ref(), conversation, &tag).await?;
            }
            info!(
                "Trained {} conversations from {}",
                conversations.len(),
                category
            );
        }

        Ok(())
    }
}

/// Loads an explicit ordered list of statements, alternating prompt and
/// response.
pub struct ListTrainer {
    storage: Arc<dyn StorageAdapter>,
}

impl ListTrainer {
    pub fn new(storage: Arc<dyn StorageAdapter>) -> Self {
        Self { storage }
    }

    pub async fn train<S: AsRef<str>>(&self, statements: &[S]) -> Result<(), TrainingError> {
        if statements.len() < 2 {
            return Err(TrainingError::NotEnoughStatements(statements.len()));
        }

        store_conversation(self.storage.as_ref(), statements, "list-training").await?;
        info!("Trained {} statements from a list", statements.len());

        Ok(())
    }
}
