//! Word splitting and id lookup.

use std::borrow::Cow;

use hatescan_types::TokenId;
use smallvec::SmallVec;

use crate::vocab::types::Vocabulary;

/// Inline capacity of a looked-up sequence. Covers the default encoder length.
pub const INLINE_SEQUENCE: usize = 64;

pub type IdSequence = SmallVec<[TokenId; INLINE_SEQUENCE]>;

/// Splits `text` into words.
///
/// Optionally lowercases, treats every character of `filters` as a
/// separator in addition to `split`, and drops empty pieces.
pub fn text_to_word_sequence(text: &str, filters: &str, lower: bool, split: char) -> Vec<String> {
    let text: Cow<'_, str> = if lower {
        Cow::Owned(text.to_lowercase())
    } else {
        Cow::Borrowed(text)
    };

    text.split(|c: char| c == split || filters.contains(c))
        .filter(|piece| !piece.is_empty())
        .map(str::to_owned)
        .collect()
}

impl Vocabulary {
    /// Splits `text` with this vocabulary's filters, case and split character.
    pub fn word_sequence(&self, text: &str) -> Vec<String> {
        text_to_word_sequence(
            text,
            &self.config.filters,
            self.config.lower,
            self.config.split,
        )
    }

    /// Id of the OOV token, if one was configured and indexed.
    #[inline]
    pub fn oov_id(&self) -> Option<TokenId> {
        self.config
            .oov_token
            .as_deref()
            .and_then(|token| self.word_index.get(token).copied())
    }

    /// Id used for `word` when encoding.
    ///
    /// Unknown words and words ranked at or beyond `num_words` resolve to the
    /// OOV id when there is one, and to `None` otherwise.
    pub fn lookup(&self, word: &str) -> Option<TokenId> {
        match self.word_index.get(word) {
            Some(&id) => match self.config.id_limit() {
                Some(limit) if id as usize >= limit => self.oov_id(),
                _ => Some(id),
            },
            None => self.oov_id(),
        }
    }

    /// Raw id of `word` in the full index, ignoring `num_words` and OOV.
    #[inline]
    pub fn index_of(&self, word: &str) -> Option<TokenId> {
        self.word_index.get(word).copied()
    }

    /// Word that owns `id`.
    pub fn word(&self, id: TokenId) -> Option<&str> {
        self.index_word.get(&id).map(String::as_str)
    }

    /// Splits `text` and looks up every word, dropping those without an id.
    pub fn text_to_sequence(&self, text: &str) -> IdSequence {
        self.word_sequence(text)
            .iter()
            .filter_map(|word| self.lookup(word))
            .collect()
    }

    /// Looks up already tokenized words.
    ///
    /// Tokens are split the same way [`fit_on_tokens`](Self::fit_on_tokens)
    /// splits them.
    pub fn tokens_to_sequence<S: AsRef<str>>(&self, tokens: &[S]) -> IdSequence {
        let mut ids = IdSequence::new();
        for token in tokens {
            for word in self.word_sequence(token.as_ref()) {
                if let Some(id) = self.lookup(&word) {
                    ids.push(id);
                }
            }
        }
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vocab::{VocabularyConfig, DEFAULT_FILTERS};

    fn fitted(config: VocabularyConfig) -> Vocabulary {
        let mut vocab = Vocabulary::with_config(config);
        // counts: a=3, b=2, c=1
        vocab.fit_on_texts(["a b c", "a b", "a"]);
        vocab
    }

    #[test]
    fn word_sequence_filters_and_lowercases() {
        let words = text_to_word_sequence("Hello, World!  foo-bar", DEFAULT_FILTERS, true, ' ');
        assert_eq!(words, vec!["hello", "world", "foo", "bar"]);
    }

    #[test]
    fn word_sequence_keeps_case_when_asked() {
        let words = text_to_word_sequence("Hello World", DEFAULT_FILTERS, false, ' ');
        assert_eq!(words, vec!["Hello", "World"]);
    }

    #[test]
    fn word_sequence_custom_split() {
        let words = text_to_word_sequence("a|b||c", "", true, '|');
        assert_eq!(words, vec!["a", "b", "c"]);
    }

    #[test]
    fn apostrophe_is_not_a_filter() {
        let words = text_to_word_sequence("don't", DEFAULT_FILTERS, true, ' ');
        assert_eq!(words, vec!["don't"]);
    }

    #[test]
    fn unknown_words_dropped_without_oov() {
        let vocab = fitted(VocabularyConfig::default());
        assert_eq!(vocab.lookup("zzz"), None);
        assert_eq!(vocab.text_to_sequence("a zzz c").as_slice(), &[1, 3]);
    }

    #[test]
    fn unknown_words_map_to_oov() {
        let vocab = fitted(VocabularyConfig {
            oov_token: Some("<OOV>".to_owned()),
            ..VocabularyConfig::default()
        });
        assert_eq!(vocab.oov_id(), Some(1));
        assert_eq!(vocab.text_to_sequence("a zzz c").as_slice(), &[2, 1, 4]);
    }

    #[test]
    fn num_words_cuts_off_rare_words() {
        let vocab = fitted(VocabularyConfig::with_num_words(3));
        assert_eq!(vocab.lookup("a"), Some(1));
        assert_eq!(vocab.lookup("b"), Some(2));
        assert_eq!(vocab.lookup("c"), None);
        assert_eq!(vocab.index_of("c"), Some(3));
    }

    #[test]
    fn num_words_cut_off_maps_to_oov() {
        let vocab = fitted(VocabularyConfig {
            num_words: Some(3),
            oov_token: Some("<OOV>".to_owned()),
            ..VocabularyConfig::default()
        });
        // ids: <OOV>=1, a=2, b=3, c=4
        assert_eq!(vocab.text_to_sequence("a b c").as_slice(), &[2, 1, 1]);
    }

    #[test]
    fn zero_num_words_means_unlimited() {
        let vocab = fitted(VocabularyConfig::with_num_words(0));
        assert_eq!(vocab.lookup("c"), Some(3));
    }

    #[test]
    fn tokens_to_sequence_matches_text() {
        let vocab = fitted(VocabularyConfig::default());
        let from_tokens = vocab.tokens_to_sequence(&["a", "c", "zzz", "b"]);
        let from_text = vocab.text_to_sequence("a c zzz b");
        assert_eq!(from_tokens, from_text);
    }

    #[test]
    fn reverse_lookup() {
        let vocab = fitted(VocabularyConfig::default());
        assert_eq!(vocab.word(1), Some("a"));
        assert_eq!(vocab.word(3), Some("c"));
        assert_eq!(vocab.word(0), None);
        assert_eq!(vocab.word(4), None);
    }

    #[test]
    fn long_sequences_spill_to_heap() {
        let vocab = fitted(VocabularyConfig::default());
        let text = "a ".repeat(INLINE_SEQUENCE * 2);
        let ids = vocab.text_to_sequence(&text);
        assert_eq!(ids.len(), INLINE_SEQUENCE * 2);
        assert!(ids.spilled());
    }
}
