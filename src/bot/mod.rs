use log::info;
use thiserror::Error;
use tokio::sync::Mutex;
use uuid::Uuid;
use std::sync::Arc;

use crate::logic::{create_logic_adapter, LogicAdapter, LogicAdapterConfig, LogicError, Reply};
use crate::storage::{create_storage, Statement, StorageAdapter, StorageError};

#[derive(Error, Debug)]
pub enum BotError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
    #[error("Logic error: {0}")]
    Logic(#[from] LogicError),
    #[error("At least one logic adapter is required")]
    NoLogicAdapters,
}

/// The conversational agent: stores prior exchanges and selects a reply
/// for new input through its logic adapters.
pub struct ChatBot {
    name: String,
    storage: Arc<dyn StorageAdapter>,
    logic_adapters: Vec<Box<dyn LogicAdapter>>,
    read_only: bool,
    conversation_id: String,
    last_reply: Mutex<Option<String>>,
}

impl ChatBot {
    pub async fn new(
        name: impl Into<String>,
        storage_selector: &str,
        database_uri: &str,
        adapter_configs: &[LogicAdapterConfig],
        read_only: bool,
    ) -> Result<Self, BotError> {
        if adapter_configs.is_empty() {
            return Err(BotError::NoLogicAdapters);
        }

        let storage = create_storage(storage_selector, database_uri).await?;

        let logic_adapters = adapter_configs
            .iter()
            .map(create_logic_adapter)
            .collect::<Result<Vec<_>, LogicError>>()?;

        let name = name.into();
        info!(
            "Bot {:?} ready with {} logic adapter(s)",
            name,
            logic_adapters.len()
        );

        Ok(Self {
            name,
            storage,
            logic_adapters,
            read_only,
            conversation_id: Uuid::new_v4().to_string(),
            last_reply: Mutex::new(None),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Storage handle for trainers.
    pub fn storage(&self) -> Arc<dyn StorageAdapter> {
        self.storage.clone()
    }

    /// Select a reply for one input line. Unless the bot is read-only,
    /// the input is learned as a response to the previous reply of this
    /// session.
    pub async fn get_response(&self, input: &str) -> Result<Reply, BotError> {
        let reply = self.logic_adapters[0]
            .process(input, self.storage.as_ref())
            .await?;

        if !self.read_only {
            let mut last_reply = self.last_reply.lock().await;
            self.storage
                .insert(Statement::new(
                    input,
                    last_reply.clone(),
                    self.conversation_id.clone(),
                ))
                .await?;
            *last_reply = Some(reply.text.clone());
        }

        Ok(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::training::ListTrainer;

    async fn test_bot(read_only: bool) -> ChatBot {
        let bot = ChatBot::new(
            "TestBot",
            "storage.sqlite",
            "sqlite://:memory:",
            &[LogicAdapterConfig::new("logic.best_match")],
            read_only,
        )
        .await
        .unwrap();

        ListTrainer::new(bot.storage())
            .train(&["Hello", "Hi there"])
            .await
            .unwrap();

        bot
    }

    #[tokio::test]
    async fn test_requires_a_logic_adapter() {
        let err = ChatBot::new("TestBot", "storage.sqlite", "sqlite://:memory:", &[], false)
            .await
            .err()
            .unwrap();
        assert!(matches!(err, BotError::NoLogicAdapters));
    }

    #[tokio::test]
    async fn test_unknown_storage_selector_fails_construction() {
        let err = ChatBot::new(
            "TestBot",
            "storage.postgres",
            "sqlite://:memory:",
            &[LogicAdapterConfig::new("logic.best_match")],
            false,
        )
        .await
        .err()
        .unwrap();
        assert!(matches!(err, BotError::Storage(StorageError::UnknownAdapter(_))));
    }

    #[tokio::test]
    async fn test_unknown_logic_adapter_fails_construction() {
        let err = ChatBot::new(
            "TestBot",
            "storage.sqlite",
            "sqlite://:memory:",
            &[LogicAdapterConfig::new("logic.markov_chain")],
            false,
        )
        .await
        .err()
        .unwrap();
        assert!(matches!(err, BotError::Logic(LogicError::UnknownAdapter(_))));
    }

    #[tokio::test]
    async fn test_trained_prompt_gets_its_response() {
        let bot = test_bot(true).await;
        let reply = bot.get_response("Hello").await.unwrap();
        assert_eq!(reply.text, "Hi there");
    }

    #[tokio::test]
    async fn test_read_only_bot_does_not_learn() {
        let bot = test_bot(true).await;
        let before = bot.storage().count().await.unwrap();
        bot.get_response("Hello").await.unwrap();
        assert_eq!(bot.storage().count().await.unwrap(), before);
    }

    #[tokio::test]
    async fn test_learning_bot_records_the_input() {
        let bot = test_bot(false).await;
        let before = bot.storage().count().await.unwrap();
        bot.get_response("Hello").await.unwrap();
        assert_eq!(bot.storage().count().await.unwrap(), before + 1);
    }

    #[tokio::test]
    async fn test_untrained_bot_returns_an_error() {
        let bot = ChatBot::new(
            "TestBot",
            "storage.sqlite",
            "sqlite://:memory:",
            &[LogicAdapterConfig::new("logic.best_match")],
            false,
        )
        .await
        .unwrap();

        let err = bot.get_response("Hello").await.err().unwrap();
        assert!(matches!(err, BotError::Logic(LogicError::EmptyStorage)));
    }
}
