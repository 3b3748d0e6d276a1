//! Statistics and VocabStats.

use crate::vocab::types::Vocabulary;

/// A snapshot of vocabulary statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VocabStats {
    /// Number of documents fitted.
    pub documents: u64,
    /// Number of distinct words counted.
    pub unique_words: usize,
    /// Total number of word occurrences counted.
    pub total_words: u64,
    /// Number of ids lookups can return, OOV included.
    pub usable_ids: usize,
    /// Whether unknown words map to an OOV id.
    pub has_oov: bool,
}

impl Vocabulary {
    /// Returns vocabulary statistics.
    pub fn stats(&self) -> VocabStats {
        let usable_ids = match self.config.id_limit() {
            Some(limit) => self.len().min(limit.saturating_sub(1)),
            None => self.len(),
        };

        VocabStats {
            documents: self.document_count,
            unique_words: self.word_counts.len(),
            total_words: self.word_counts.iter().map(|(_, count)| count).sum(),
            usable_ids,
            has_oov: self.oov_id().is_some(),
        }
    }
}

impl VocabStats {
    /// Share of word occurrences that map to an in-range id.
    pub fn coverage(&self, vocab: &Vocabulary) -> f64 {
        if self.total_words == 0 {
            return 0.0;
        }

        let covered: u64 = vocab
            .word_counts
            .iter()
            .filter(|(word, _)| {
                vocab.index_of(word).is_some_and(|id| match vocab.config.id_limit() {
                    Some(limit) => (id as usize) < limit,
                    None => true,
                })
            })
            .map(|(_, count)| count)
            .sum();

        covered as f64 / self.total_words as f64
    }
}

impl core::fmt::Display for VocabStats {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "{} docs, {} unique words, {} occurrences, {} usable ids",
            self.documents, self.unique_words, self.total_words, self.usable_ids
        )?;

        if self.has_oov {
            write!(f, ", oov enabled")?;
        }

        Ok(())
    }
}
