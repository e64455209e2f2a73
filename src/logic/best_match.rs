use async_trait::async_trait;
use log::debug;
use rand::seq::SliceRandom;

use super::{similarity, LogicAdapter, LogicError, Reply};
use crate::storage::StorageAdapter;

const DEFAULT_MAXIMUM_SIMILARITY_THRESHOLD: f64 = 0.95;

/// Picks the known statement closest to the input and replies with one of
/// the responses recorded for it.
pub struct BestMatch {
    maximum_similarity_threshold: f64,
}

impl BestMatch {
    pub fn new(maximum_similarity_threshold: Option<f64>) -> Self {
        Self {
            maximum_similarity_threshold: maximum_similarity_threshold
                .unwrap_or(DEFAULT_MAXIMUM_SIMILARITY_THRESHOLD),
        }
    }

    /// Closest known statement text to the input. The scan stops early
    /// once a candidate reaches the maximum similarity threshold.
    fn closest_match(&self, input: &str, texts: &[String]) -> Option<(String, f64)> {
        let mut best: Option<(String, f64)> = None;

        for text in texts {
            let score = similarity(input, text);
            if best.as_ref().map_or(true, |(_, s)| score > *s) {
                best = Some((text.clone(), score));
            }
            if score >= self.maximum_similarity_threshold {
                break;
            }
        }

        best
    }
}

#[async_trait]
impl LogicAdapter for BestMatch {
    fn name(&self) -> &str {
        "logic.best_match"
    }

    async fn process(
        &self,
        input: &str,
        storage: &dyn StorageAdapter,
    ) -> Result<Reply, LogicError> {
        let texts = storage.all_texts().await?;

        let (matched_text, confidence) = self
            .closest_match(input, &texts)
            .ok_or(LogicError::EmptyStorage)?;

        debug!(
            "Closest match for input: {:?} (confidence {:.2})",
            matched_text, confidence
        );

        let responses = storage.find_responses_to(&matched_text).await?;
        if let Some(choice) = responses.choose(&mut rand::thread_rng()) {
            return Ok(Reply {
                text: choice.text.clone(),
                confidence,
            });
        }

        // Nothing recorded as a response to the match. Fall back to a
        // random stored statement at zero confidence.
        let fallback = storage
            .random_statement()
            .await?
            .ok_or(LogicError::EmptyStorage)?;

        Ok(Reply {
            text: fallback.text,
            confidence: 0.0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{SqliteStorage, Statement};

    async fn trained_storage() -> SqliteStorage {
        let storage = SqliteStorage::new("sqlite://:memory:").await.unwrap();
        storage
            .insert(Statement::new("Hello! How are you doing?", None, "test"))
            .await
            .unwrap();
        storage
            .insert(Statement::new(
                "I am doing very well, thank you for asking.",
                Some("Hello! How are you doing?".to_string()),
                "test",
            ))
            .await
            .unwrap();
        storage
    }

    #[tokio::test]
    async fn test_exact_prompt_returns_trained_response() {
        let storage = trained_storage().await;
        let adapter = BestMatch::new(None);

        let reply = adapter
            .process("Hello! How are you doing?", &storage)
            .await
            .unwrap();

        assert_eq!(reply.text, "I am doing very well, thank you for asking.");
        assert!(reply.confidence >= DEFAULT_MAXIMUM_SIMILARITY_THRESHOLD);
    }

    #[tokio::test]
    async fn test_near_prompt_still_matches() {
        let storage = trained_storage().await;
        let adapter = BestMatch::new(None);

        let reply = adapter
            .process("hello! how are you doing", &storage)
            .await
            .unwrap();

        assert_eq!(reply.text, "I am doing very well, thank you for asking.");
        assert!(reply.confidence > 0.8);
    }

    #[tokio::test]
    async fn test_empty_storage_is_an_error() {
        let storage = SqliteStorage::new("sqlite://:memory:").await.unwrap();
        let adapter = BestMatch::new(None);

        let err = adapter.process("anything", &storage).await.err().unwrap();
        assert!(matches!(err, LogicError::EmptyStorage));
    }

    #[tokio::test]
    async fn test_match_without_responses_falls_back() {
        let storage = SqliteStorage::new("sqlite://:memory:").await.unwrap();
        storage
            .insert(Statement::new("Lonely statement", None, "test"))
            .await
            .unwrap();
        let adapter = BestMatch::new(None);

        let reply = adapter.process("Lonely statement", &storage).await.unwrap();
        assert_eq!(reply.text, "Lonely statement");
        assert_eq!(reply.confidence, 0.0);
    }
}
