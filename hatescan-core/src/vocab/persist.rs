//! JSON persistence in the Keras `Tokenizer.to_json()` layout.
//!
//! ```text
//! {"class_name": "Tokenizer",
//!  "config": {"num_words": null, "filters": "...", "lower": true, "split": " ",
//!             "char_level": false, "oov_token": null, "document_count": 2,
//!             "word_counts": "{\"cat\": 2}", "word_docs": "{\"cat\": 1}",
//!             "index_docs": "{\"1\": 1}", "index_word": "{\"1\": \"cat\"}",
//!             "word_index": "{\"cat\": 1}"}}
//! ```
//!
//! The five maps are JSON documents stored as strings inside the outer
//! document.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use hatescan_types::{ArtifactError, TokenId};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::vocab::types::{Vocabulary, VocabularyConfig, DEFAULT_FILTERS, DEFAULT_SPLIT};

const CLASS_NAME: &str = "Tokenizer";

#[derive(Serialize, Deserialize)]
struct TokenizerDocument {
    class_name: String,
    config: TokenizerConfig,
}

#[derive(Serialize, Deserialize)]
struct TokenizerConfig {
    #[serde(default)]
    num_words: Option<usize>,
    #[serde(default = "default_filters")]
    filters: String,
    #[serde(default = "default_lower")]
    lower: bool,
    #[serde(default = "default_split")]
    split: String,
    #[serde(default)]
    char_level: bool,
    #[serde(default)]
    oov_token: Option<String>,
    #[serde(default)]
    document_count: u64,
    #[serde(default = "empty_map")]
    word_counts: String,
    #[serde(default = "empty_map")]
    word_docs: String,
    #[serde(default = "empty_map")]
    index_docs: String,
    #[serde(default = "empty_map")]
    index_word: String,
    #[serde(default = "empty_map")]
    word_index: String,
}

fn default_filters() -> String {
    DEFAULT_FILTERS.to_owned()
}

fn default_lower() -> bool {
    true
}

fn default_split() -> String {
    DEFAULT_SPLIT.to_string()
}

fn empty_map() -> String {
    "{}".to_owned()
}

fn malformed(reason: impl Into<String>) -> ArtifactError {
    ArtifactError::Malformed {
        reason: reason.into(),
    }
}

impl Vocabulary {
    /// Reads a vocabulary from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ArtifactError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| ArtifactError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Writes the vocabulary to a JSON file, replacing any existing file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ArtifactError> {
        let path = path.as_ref();
        let json = self.to_json()?;
        fs::write(path, json).map_err(|source| ArtifactError::Io {
            path: path.display().to_string(),
            source,
        })
    }

    /// Parses a vocabulary document.
    ///
    /// # Errors
    ///
    /// [`ArtifactError::Json`] when the document or one of its nested maps
    /// is not valid JSON, [`ArtifactError::Malformed`] when it is not a word
    /// level tokenizer or its ids are inconsistent.
    pub fn from_json(json: &str) -> Result<Self, ArtifactError> {
        let document: TokenizerDocument = serde_json::from_str(json)?;
        if document.class_name != CLASS_NAME {
            return Err(malformed(format!(
                "expected class_name \"{CLASS_NAME}\", found \"{}\"",
                document.class_name
            )));
        }

        let raw = document.config;
        if raw.char_level {
            return Err(malformed("character level tokenizers are not supported"));
        }

        let mut split_chars = raw.split.chars();
        let split = match (split_chars.next(), split_chars.next()) {
            (Some(c), None) => c,
            _ => {
                return Err(malformed(format!(
                    "split must be a single character, found {:?}",
                    raw.split
                )))
            }
        };

        let word_index: FxHashMap<String, TokenId> = serde_json::from_str(&raw.word_index)?;
        let counts: FxHashMap<String, u64> = serde_json::from_str(&raw.word_counts)?;
        let word_docs: FxHashMap<String, u64> = serde_json::from_str(&raw.word_docs)?;
        let mut index_word: FxHashMap<TokenId, String> = serde_json::from_str(&raw.index_word)?;

        if word_index.values().any(|&id| id == 0) {
            return Err(malformed("word_index assigns the reserved id 0"));
        }

        if index_word.is_empty() {
            for (word, &id) in &word_index {
                index_word.insert(id, word.clone());
            }
        }

        // Object key order is not preserved, so first-seen order is rebuilt
        // from the ids, which are assigned in that order among equal counts.
        let mut ordered: Vec<(&String, u64)> = counts.iter().map(|(w, &c)| (w, c)).collect();
        ordered.sort_by(|a, b| {
            let id_a = word_index.get(a.0).copied().unwrap_or(TokenId::MAX);
            let id_b = word_index.get(b.0).copied().unwrap_or(TokenId::MAX);
            id_a.cmp(&id_b).then_with(|| a.0.cmp(b.0))
        });

        let mut word_counts = Vec::with_capacity(ordered.len());
        let mut count_slots = FxHashMap::default();
        for (slot, (word, count)) in ordered.into_iter().enumerate() {
            count_slots.insert(word.clone(), slot);
            word_counts.push((word.clone(), count));
        }

        Ok(Self {
            config: VocabularyConfig {
                num_words: raw.num_words,
                filters: raw.filters,
                lower: raw.lower,
                split,
                oov_token: raw.oov_token,
            },
            document_count: raw.document_count,
            word_counts,
            count_slots,
            word_docs,
            word_index,
            index_word,
        })
    }

    /// Serializes the vocabulary. Map keys are written in sorted order.
    pub fn to_json(&self) -> Result<String, ArtifactError> {
        let word_counts: BTreeMap<&str, u64> = self
            .word_counts
            .iter()
            .map(|(word, count)| (word.as_str(), *count))
            .collect();
        let word_docs: BTreeMap<&str, u64> = self
            .word_docs
            .iter()
            .map(|(word, docs)| (word.as_str(), *docs))
            .collect();
        let index_docs: BTreeMap<TokenId, u64> = self
            .word_docs
            .iter()
            .filter_map(|(word, &docs)| self.word_index.get(word).map(|&id| (id, docs)))
            .collect();
        let index_word: BTreeMap<TokenId, &str> = self
            .index_word
            .iter()
            .map(|(&id, word)| (id, word.as_str()))
            .collect();
        let word_index: BTreeMap<&str, TokenId> = self
            .word_index
            .iter()
            .map(|(word, &id)| (word.as_str(), id))
            .collect();

        let document = TokenizerDocument {
            class_name: CLASS_NAME.to_owned(),
            config: TokenizerConfig {
                num_words: self.config.num_words,
                filters: self.config.filters.clone(),
                lower: self.config.lower,
                split: self.config.split.to_string(),
                char_level: false,
                oov_token: self.config.oov_token.clone(),
                document_count: self.document_count,
                word_counts: serde_json::to_string(&word_counts)?,
                word_docs: serde_json::to_string(&word_docs)?,
                index_docs: serde_json::to_string(&index_docs)?,
                index_word: serde_json::to_string(&index_word)?,
                word_index: serde_json::to_string(&word_index)?,
            },
        };

        Ok(serde_json::to_string(&document)?)
    }
}
