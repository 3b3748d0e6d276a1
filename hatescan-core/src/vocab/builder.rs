//! Vocabulary fitting.

use hatescan_types::TokenId;
use rustc_hash::FxHashSet;

use crate::vocab::types::Vocabulary;

impl Vocabulary {
    /// Counts the words of every text and rebuilds the index.
    ///
    /// Each text is split with [`Vocabulary::word_sequence`] and counts as one
    /// document. Calling this again adds to the existing counts.
    pub fn fit_on_texts<I, S>(&mut self, texts: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for text in texts {
            let words = self.word_sequence(text.as_ref());
            self.count_document(&words);
        }
        self.rebuild_index();
    }

    /// Counts already tokenized documents and rebuilds the index.
    ///
    /// Every token goes through the same lowercasing and filter split that
    /// lookups use, so a fitted word can always be found again.
    pub fn fit_on_tokens<I, D, S>(&mut self, documents: I)
    where
        I: IntoIterator<Item = D>,
        D: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut words = Vec::new();
        for document in documents {
            words.clear();
            for token in document {
                words.extend(self.word_sequence(token.as_ref()));
            }
            self.count_document(&words);
        }
        self.rebuild_index();
    }

    fn count_document(&mut self, words: &[String]) {
        self.document_count += 1;

        for word in words {
            match self.count_slots.get(word) {
                Some(&slot) => self.word_counts[slot].1 += 1,
                None => {
                    self.count_slots
                        .insert(word.clone(), self.word_counts.len());
                    self.word_counts.push((word.clone(), 1));
                }
            }
        }

        let mut seen: FxHashSet<&str> = FxHashSet::default();
        for word in words {
            if seen.insert(word) {
                *self.word_docs.entry(word.clone()).or_insert(0) += 1;
            }
        }
    }

    /// Reassigns ids from the current counts.
    ///
    /// The OOV token goes first. Words follow by descending count; the sort is
    /// stable, so equal counts keep first-seen order. If the OOV token is also
    /// a corpus word, its corpus rank overwrites id 1 and id 1 is left without
    /// a word.
    pub(crate) fn rebuild_index(&mut self) {
        let mut ranked: Vec<(&str, u64)> = self
            .word_counts
            .iter()
            .map(|(word, count)| (word.as_str(), *count))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));

        let oov = self.config.oov_token.as_deref();
        let ordered = oov.into_iter().chain(ranked.into_iter().map(|(word, _)| word));

        self.word_index.clear();
        for (i, word) in ordered.enumerate() {
            let id = (i + 1) as TokenId;
            self.word_index.insert(word.to_owned(), id);
        }

        self.index_word.clear();
        for (word, &id) in &self.word_index {
            self.index_word.insert(id, word.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::vocab::{Vocabulary, VocabularyConfig};

    #[test]
    fn ranks_by_descending_frequency() {
        let mut vocab = Vocabulary::new();
        vocab.fit_on_texts(["b a", "a c a", "b a"]);

        assert_eq!(vocab.lookup("a"), Some(1));
        assert_eq!(vocab.lookup("b"), Some(2));
        assert_eq!(vocab.lookup("c"), Some(3));
        assert_eq!(vocab.len(), 3);
    }

    #[test]
    fn ties_keep_first_seen_order() {
        let mut vocab = Vocabulary::new();
        vocab.fit_on_texts(["zebra apple mango"]);

        assert_eq!(vocab.lookup("zebra"), Some(1));
        assert_eq!(vocab.lookup("apple"), Some(2));
        assert_eq!(vocab.lookup("mango"), Some(3));
    }

    #[test]
    fn counts_words_and_documents() {
        let mut vocab = Vocabulary::new();
        vocab.fit_on_texts(["hate hate speech", "speech"]);

        assert_eq!(vocab.document_count(), 2);
        assert_eq!(vocab.word_count("hate"), Some(2));
        assert_eq!(vocab.word_count("speech"), Some(2));
        assert_eq!(vocab.document_frequency("hate"), Some(1));
        assert_eq!(vocab.document_frequency("speech"), Some(2));
        assert_eq!(vocab.word_count("missing"), None);
    }

    #[test]
    fn oov_token_takes_first_id() {
        let mut vocab = Vocabulary::with_config(VocabularyConfig {
            oov_token: Some("<OOV>".to_owned()),
            ..VocabularyConfig::default()
        });
        vocab.fit_on_texts(["cat cat dog"]);

        assert_eq!(vocab.word(1), Some("<OOV>"));
        assert_eq!(vocab.lookup("cat"), Some(2));
        assert_eq!(vocab.lookup("dog"), Some(3));
    }

    #[test]
    fn oov_token_in_corpus_loses_id_one() {
        let mut vocab = Vocabulary::with_config(VocabularyConfig {
            oov_token: Some("unk".to_owned()),
            ..VocabularyConfig::default()
        });
        vocab.fit_on_texts(["cat unk"]);

        assert_eq!(vocab.lookup("unk"), Some(3));
        assert_eq!(vocab.word(1), None);
        assert_eq!(vocab.lookup("cat"), Some(2));
    }

    #[test]
    fn refitting_accumulates() {
        let mut vocab = Vocabulary::new();
        vocab.fit_on_texts(["dog"]);
        vocab.fit_on_texts(["cat cat"]);

        assert_eq!(vocab.document_count(), 2);
        assert_eq!(vocab.lookup("cat"), Some(1));
        assert_eq!(vocab.lookup("dog"), Some(2));
    }

    #[test]
    fn fit_on_tokens_matches_fit_on_texts() {
        let mut from_tokens = Vocabulary::new();
        from_tokens.fit_on_tokens([vec!["hate", "speech"], vec!["speech"]]);

        let mut from_texts = Vocabulary::new();
        from_texts.fit_on_texts(["hate speech", "speech"]);

        for word in ["hate", "speech"] {
            assert_eq!(from_tokens.lookup(word), from_texts.lookup(word));
        }
        assert_eq!(from_tokens.document_count(), 2);
    }

    #[test]
    fn fit_on_tokens_splits_filtered_characters() {
        let mut vocab = Vocabulary::new();
        vocab.fit_on_tokens([vec!["snake_case", "Upper"]]);

        assert_eq!(vocab.lookup("snake"), Some(1));
        assert_eq!(vocab.lookup("case"), Some(2));
        assert_eq!(vocab.lookup("upper"), Some(3));
        assert_eq!(vocab.lookup("snake_case"), None);
    }

    #[test]
    fn empty_documents_still_count() {
        let mut vocab = Vocabulary::new();
        vocab.fit_on_texts(["", "!!!"]);

        assert_eq!(vocab.document_count(), 2);
        assert!(vocab.is_empty());
    }

    #[test]
    fn clear_resets_counts() {
        let mut vocab = Vocabulary::new();
        vocab.fit_on_texts(["a b c"]);
        vocab.clear();

        assert!(vocab.is_empty());
        assert_eq!(vocab.document_count(), 0);
        assert_eq!(vocab.word_count("a"), None);
    }
}
