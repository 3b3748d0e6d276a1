//! Word vocabulary for the sequence model.
//!
//! Reproduces the fit and lookup rules of the Keras `Tokenizer` the model was
//! trained with, so that a vocabulary exported from training maps words to the
//! same ids here.
//!
//! Layout:
//! - Word counts are kept in first-seen order next to a slot map, which makes
//!   the frequency ranking stable without an ordered map
//! - The word index is rebuilt from scratch after every fit
//! - Lookups return small inline id buffers sized for one encoded sequence
//!
//! Threading:
//! - [`Vocabulary`] is `Send + Sync`. Fitting needs `&mut self`, lookups and
//!   persistence only `&self`.

mod api;
mod builder;
mod persist;
mod stats;
mod types;

pub use api::{text_to_word_sequence, IdSequence, INLINE_SEQUENCE};
pub use stats::VocabStats;
pub use types::{Vocabulary, VocabularyConfig, DEFAULT_FILTERS, DEFAULT_SPLIT};
