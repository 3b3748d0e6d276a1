//! Text preprocessing for the hatescan classifier.
//!
//! - [`analyzer`]: the normalization pipeline that turns raw posts into stemmed words
//! - [`vocab`]: the word to id mapping fitted on the training corpus
//! - [`encoder`]: fixed-length padding of id sequences
//!
//! Everything here is synchronous and free of I/O except vocabulary
//! loading and saving.

pub mod analyzer;
pub mod encoder;
pub mod vocab;

pub use analyzer::{NormalizerConfig, Stage, TextNormalizer};
pub use encoder::SequenceEncoder;
pub use vocab::{VocabStats, Vocabulary, VocabularyConfig};
