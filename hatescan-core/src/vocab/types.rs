//! Vocabulary types and defaults.

use hatescan_types::TokenId;
use rustc_hash::FxHashMap;

/// Characters replaced by the split character before splitting.
pub const DEFAULT_FILTERS: &str = "!\"#$%&()*+,-./:;<=>?@[\\]^_`{|}~\t\n";

pub const DEFAULT_SPLIT: char = ' ';

/// How text is split into words and which words get an id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VocabularyConfig {
    /// Only ids strictly below this value are kept by lookups. `None` and
    /// `Some(0)` keep every id.
    pub num_words: Option<usize>,
    pub filters: String,
    pub lower: bool,
    pub split: char,
    /// Reserved word that takes id 1 and stands in for unknown words.
    pub oov_token: Option<String>,
}

impl Default for VocabularyConfig {
    fn default() -> Self {
        Self {
            num_words: None,
            filters: DEFAULT_FILTERS.to_owned(),
            lower: true,
            split: DEFAULT_SPLIT,
            oov_token: None,
        }
    }
}

impl VocabularyConfig {
    /// Default config limited to the `num_words - 1` most frequent words.
    pub fn with_num_words(num_words: usize) -> Self {
        Self {
            num_words: Some(num_words),
            ..Self::default()
        }
    }

    /// Effective id limit, `None` when unlimited.
    #[inline]
    pub(crate) fn id_limit(&self) -> Option<usize> {
        self.num_words.filter(|&n| n > 0)
    }
}

/// Word to id mapping fitted on a corpus.
///
/// Ids start at 1 and follow descending corpus frequency, ties keeping the
/// order in which words were first seen. When an OOV token is configured it
/// always owns id 1.
///
/// Fitting mutates; everything else takes `&self`, so a loaded vocabulary can
/// be shared behind an `Arc`.
#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    pub(crate) config: VocabularyConfig,
    pub(crate) document_count: u64,
    /// Word counts in first-seen order.
    pub(crate) word_counts: Vec<(String, u64)>,
    pub(crate) count_slots: FxHashMap<String, usize>,
    /// Number of documents each word appeared in.
    pub(crate) word_docs: FxHashMap<String, u64>,
    pub(crate) word_index: FxHashMap<String, TokenId>,
    pub(crate) index_word: FxHashMap<TokenId, String>,
}

impl Vocabulary {
    /// Creates an empty vocabulary with the default config.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: VocabularyConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    #[inline(always)]
    pub fn config(&self) -> &VocabularyConfig {
        &self.config
    }

    /// Number of words with an id, OOV token included.
    #[inline(always)]
    #[must_use]
    pub fn len(&self) -> usize {
        self.word_index.len()
    }

    #[inline(always)]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.word_index.is_empty()
    }

    /// Number of documents the vocabulary was fitted on.
    #[inline(always)]
    pub fn document_count(&self) -> u64 {
        self.document_count
    }

    /// Corpus frequency of `word`.
    pub fn word_count(&self, word: &str) -> Option<u64> {
        self.count_slots
            .get(word)
            .map(|&slot| self.word_counts[slot].1)
    }

    /// Number of documents `word` appeared in.
    pub fn document_frequency(&self, word: &str) -> Option<u64> {
        self.word_docs.get(word).copied()
    }

    /// Removes every fitted word and count. The config is kept.
    pub fn clear(&mut self) {
        self.document_count = 0;
        self.word_counts.clear();
        self.count_slots.clear();
        self.word_docs.clear();
        self.word_index.clear();
        self.index_word.clear();
    }
}
