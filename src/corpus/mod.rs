use thiserror::Error;
use std::collections::BTreeMap;

/// The built-in English dataset, compiled into the binary.
const ENGLISH: &str = include_str!("english.json");

const ENGLISH_DATASET_ID: &str = "corpus.english";

#[derive(Error, Debug)]
pub enum CorpusError {
    #[error("Unknown corpus dataset: {0}")]
    UnknownDataset(String),
    #[error("Corpus data error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// One named category with its list of conversations. Each conversation
/// is an ordered list of statements, each answering the one before it.
pub type Category = (String, Vec<Vec<String>>);

fn english_categories() -> Result<BTreeMap<String, Vec<Vec<String>>>, CorpusError> {
    Ok(serde_json::from_str(ENGLISH)?)
}

/// Resolve a dotted dataset identifier to its conversations.
///
/// `corpus.english` selects every category; `corpus.english.greetings`
/// selects just one.
pub fn conversations_for(dataset_id: &str) -> Result<Vec<Category>, CorpusError> {
    let categories = english_categories()?;

    if dataset_id == ENGLISH_DATASET_ID {
        return Ok(categories.into_iter().collect());
    }

    if let Some(category) = dataset_id.strip_prefix(&format!("{ENGLISH_DATASET_ID}.")) {
        if let Some(conversations) = categories.get(category) {
            return Ok(vec![(category.to_string(), conversations.clone())]);
        }
    }

    Err(CorpusError::UnknownDataset(dataset_id.to_string()))
}
