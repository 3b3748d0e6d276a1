use std::borrow::Cow;
use std::fmt;

use rust_stemmers::{Algorithm, Stemmer};

use super::stages;
use super::stopwords::is_stopword;
use super::tokenizer::split_words;

/// One step of the normalization pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    StripMarkup,
    StripUrls,
    StripNonAscii,
    StripEmoji,
    StripDigits,
    Lowercase,
    ExpandContractions,
    StripPunctuation,
    RemoveStopwords,
    Stem,
}

impl Stage {
    /// Stage order. The first eight rewrite the whole text, the last two
    /// work on individual words.
    pub const PIPELINE: [Stage; 10] = [
        Stage::StripMarkup,
        Stage::StripUrls,
        Stage::StripNonAscii,
        Stage::StripEmoji,
        Stage::StripDigits,
        Stage::Lowercase,
        Stage::ExpandContractions,
        Stage::StripPunctuation,
        Stage::RemoveStopwords,
        Stage::Stem,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Stage::StripMarkup => "strip_markup",
            Stage::StripUrls => "strip_urls",
            Stage::StripNonAscii => "strip_non_ascii",
            Stage::StripEmoji => "strip_emoji",
            Stage::StripDigits => "strip_digits",
            Stage::Lowercase => "lowercase",
            Stage::ExpandContractions => "expand_contractions",
            Stage::StripPunctuation => "strip_punctuation",
            Stage::RemoveStopwords => "remove_stopwords",
            Stage::Stem => "stem",
        }
    }

    /// Applies a text stage. Returns `None` for word stages.
    pub fn rewrite(self, text: &str) -> Option<Cow<'_, str>> {
        let out = match self {
            Stage::StripMarkup => stages::strip_markup(text),
            Stage::StripUrls => stages::strip_urls(text),
            Stage::StripNonAscii => stages::strip_non_ascii(text),
            Stage::StripEmoji => stages::strip_emoji(text),
            Stage::StripDigits => stages::strip_digits(text),
            Stage::Lowercase => stages::lowercase(text),
            Stage::ExpandContractions => stages::expand_contractions(text),
            Stage::StripPunctuation => stages::strip_punctuation(text),
            Stage::RemoveStopwords | Stage::Stem => return None,
        };
        Some(out)
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Configuration options for text normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizerConfig {
    /// Drop English stopwords after splitting.
    pub remove_stopwords: bool,
    /// Reduce every word to its Snowball English stem.
    pub stem: bool,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            remove_stopwords: true,
            stem: true,
        }
    }
}

/// Turns raw social-media text into the word tokens the classifier was
/// trained on.
///
/// Runs every stage of [`Stage::PIPELINE`] in order. Markup, `https`/`www`
/// links, non-ASCII characters, digits and punctuation are removed, text is
/// lowercased and contractions expanded, then stopwords are dropped and the
/// remaining words stemmed.
///
/// Both output shapes share one pipeline:
///
/// - [`normalize_to_tokens`](Self::normalize_to_tokens) for vocabulary fitting
/// - [`normalize_to_text`](Self::normalize_to_text) for inference
///
/// # Examples
///
/// ```
/// use hatescan_core::analyzer::TextNormalizer;
///
/// let normalizer = TextNormalizer::default();
/// assert_eq!(normalizer.normalize_to_text("The cats are RUNNING!"), "cat run");
/// assert_eq!(normalizer.normalize_to_tokens("I don't agree"), vec!["agre"]);
/// ```
///
/// The normalizer holds no mutable state and can be shared across threads.
pub struct TextNormalizer {
    config: NormalizerConfig,
    stemmer: Stemmer,
}

impl Default for TextNormalizer {
    fn default() -> Self {
        Self::new(NormalizerConfig::default())
    }
}

impl TextNormalizer {
    pub fn new(config: NormalizerConfig) -> Self {
        Self {
            config,
            stemmer: Stemmer::create(Algorithm::English),
        }
    }

    pub fn config(&self) -> NormalizerConfig {
        self.config
    }

    /// Normalizes `input` into its list of tokens.
    pub fn normalize_to_tokens(&self, input: &str) -> Vec<String> {
        let text = self.clean(input);
        let mut tokens = Vec::new();
        self.for_each_token(&text, |token| tokens.push(token.into_owned()));
        tokens
    }

    /// Normalizes `input` into its tokens joined by single spaces.
    pub fn normalize_to_text(&self, input: &str) -> String {
        let mut out = String::new();
        self.normalize_into(input, &mut out);
        out
    }

    /// Like [`normalize_to_text`](Self::normalize_to_text), writing into an
    /// existing buffer.
    ///
    /// Clears the buffer first and reuses its capacity.
    pub fn normalize_into(&self, input: &str, out: &mut String) {
        out.clear();
        let text = self.clean(input);
        self.for_each_token(&text, |token| {
            if !out.is_empty() {
                out.push(' ');
            }
            out.push_str(&token);
        });
    }

    /// Runs the text stages.
    fn clean<'a>(&self, input: &'a str) -> Cow<'a, str> {
        let mut text = Cow::Borrowed(input);
        for stage in Stage::PIPELINE {
            let rewritten = match stage.rewrite(&text) {
                Some(Cow::Owned(s)) => Some(s),
                _ => None,
            };
            if let Some(s) = rewritten {
                text = Cow::Owned(s);
            }
        }
        text
    }

    /// Runs the word stages over cleaned text.
    fn for_each_token<'t, F>(&self, text: &'t str, mut emit: F)
    where
        F: FnMut(Cow<'t, str>),
    {
        split_words(text, |word, _| {
            if self.config.remove_stopwords && is_stopword(word) {
                return;
            }
            if !self.config.stem {
                emit(Cow::Borrowed(word));
                return;
            }

            let lowered = word.to_lowercase();
            let stemmed = self.stemmer.stem(&lowered).into_owned();
            if !stemmed.is_empty() {
                emit(Cow::Owned(stemmed));
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn tokens(input: &str) -> Vec<String> {
        TextNormalizer::default().normalize_to_tokens(input)
    }

    fn text(input: &str) -> String {
        TextNormalizer::default().normalize_to_text(input)
    }

    fn unstemmed() -> TextNormalizer {
        TextNormalizer::new(NormalizerConfig {
            remove_stopwords: true,
            stem: false,
        })
    }

    #[test]
    fn golden_end_to_end() {
        let input = "I can't believe this!!! <b>Terrible</b> http://x.co 123 😀";
        assert_eq!(text(input), "cannot believ terribl http x co");
        assert_eq!(
            tokens(input),
            vec!["cannot", "believ", "terribl", "http", "x", "co"]
        );
    }

    #[test]
    fn pipeline_order_is_fixed() {
        let names: Vec<&str> = Stage::PIPELINE.iter().map(|s| s.name()).collect();
        assert_eq!(
            names,
            vec![
                "strip_markup",
                "strip_urls",
                "strip_non_ascii",
                "strip_emoji",
                "strip_digits",
                "lowercase",
                "expand_contractions",
                "strip_punctuation",
                "remove_stopwords",
                "stem",
            ]
        );
    }

    #[test]
    fn word_stages_do_not_rewrite_text() {
        assert!(Stage::RemoveStopwords.rewrite("the cat").is_none());
        assert!(Stage::Stem.rewrite("running").is_none());
        assert_eq!(
            Stage::StripDigits.rewrite("a1b").as_deref(),
            Some("ab")
        );
    }

    #[test]
    fn modes_agree() {
        let inputs = [
            "Hello World",
            "  spaced   out  ",
            "<p>You're the BEST!</p> https://t.co/x",
            "",
            "!!!",
        ];
        for input in inputs {
            assert_eq!(text(input), tokens(input).join(" "));
        }
    }

    #[test]
    fn empty_and_blank_input() {
        assert!(tokens("").is_empty());
        assert_eq!(text(""), "");
        assert!(tokens("     ").is_empty());
        assert!(tokens("<br/> 123 !!! 😀").is_empty());
    }

    #[test]
    fn only_stopwords_yields_nothing() {
        assert!(tokens("the and of to").is_empty());
    }

    #[test]
    fn stopwords_removed() {
        assert_eq!(unstemmed().normalize_to_tokens("the cat sat"), vec!["cat", "sat"]);
    }

    #[test]
    fn stopwords_kept_when_disabled() {
        let n = TextNormalizer::new(NormalizerConfig {
            remove_stopwords: false,
            stem: false,
        });
        assert_eq!(n.normalize_to_tokens("the cat sat"), vec!["the", "cat", "sat"]);
    }

    #[test]
    fn stems() {
        assert_eq!(tokens("running"), vec!["run"]);
        assert_eq!(tokens("happy"), vec!["happi"]);
        assert_eq!(tokens("hateful"), vec!["hate"]);
        assert_eq!(tokens("believe"), vec!["believ"]);
    }

    #[test]
    fn expanded_pronoun_is_lowercased_by_stemming() {
        // "you'd" expands to "You would"; "You" is not a stopword because
        // membership is case-sensitive.
        assert_eq!(unstemmed().normalize_to_tokens("you'd"), vec!["You", "would"]);
        assert_eq!(tokens("you'd"), vec!["you", "would"]);
    }

    #[test]
    fn contraction_expanded_before_punctuation() {
        assert_eq!(unstemmed().normalize_to_tokens("they're mean"), vec!["mean"]);
        assert_eq!(unstemmed().normalize_to_tokens("can't"), vec!["cannot"]);
    }

    #[test]
    fn https_links_removed_http_kept() {
        assert_eq!(
            unstemmed().normalize_to_tokens("look https://bad.example/x now"),
            vec!["look"]
        );
        assert_eq!(
            unstemmed().normalize_to_tokens("look http://bad.example now"),
            vec!["look", "http", "bad", "example"]
        );
    }

    #[test]
    fn non_ascii_splits_words() {
        assert_eq!(unstemmed().normalize_to_tokens("café"), vec!["caf"]);
        assert_eq!(unstemmed().normalize_to_tokens("big😀deal"), vec!["big", "deal"]);
    }

    #[test]
    fn digits_removed_inside_words() {
        assert_eq!(
            unstemmed().normalize_to_tokens("abc123def 2day"),
            vec!["abcdef", "day"]
        );
    }

    #[test]
    fn idempotent_on_normalized_text() {
        let normalized = "cannot terribl http";
        assert_eq!(text(normalized), normalized);
        assert_eq!(text(&text(normalized)), normalized);
    }

    #[test]
    fn only_space_separates_words() {
        assert_eq!(unstemmed().normalize_to_tokens("cat\tsat"), vec!["cat\tsat"]);
    }

    #[test]
    fn information_separators_stay_in_tokens() {
        let raw = TextNormalizer::new(NormalizerConfig {
            remove_stopwords: false,
            stem: false,
        });
        assert_eq!(
            raw.normalize_to_tokens("WORLD\u{1c}😀\u{a0}<b>\tCAN'T"),
            vec!["world\u{1c}", "\tcannot"]
        );
        assert_eq!(raw.normalize_to_tokens("\twww.ex.com\u{1c}"), vec!["\t\u{1c}"]);
    }

    #[test]
    fn tokens_never_empty() {
        let out = tokens("a -- b __ c ... <x> 9 9 9");
        assert!(out.iter().all(|t| !t.is_empty()));
    }

    #[test]
    fn normalize_into_reuses_buffer() {
        let n = TextNormalizer::default();
        let mut buf = String::with_capacity(128);
        n.normalize_into("Terrible people", &mut buf);
        assert_eq!(buf, "terribl peopl");
        n.normalize_into("", &mut buf);
        assert_eq!(buf, "");
        assert_eq!(buf.capacity(), 128);
    }

    #[test]
    fn config_defaults() {
        let c = NormalizerConfig::default();
        assert!(c.remove_stopwords);
        assert!(c.stem);
    }

    #[test]
    fn normalizer_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<TextNormalizer>();
    }
}
