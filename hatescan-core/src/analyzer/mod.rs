//! Text analysis pipeline.
//!
//! This module provides the text processing components:
//! - **Stages**: Pure text rewrites (markup, links, non-ASCII, digits, case, contractions, punctuation)
//! - **Tokenizer**: Splits cleaned text into words on the ASCII space
//! - **Normalizer**: Runs every stage in order and produces stemmed tokens
//! - **Contractions / Stopwords**: The fixed tables the stages read

pub mod contractions;
pub mod normalizer;
pub mod stages;
pub mod stopwords;
pub mod tokenizer;

pub use normalizer::{NormalizerConfig, Stage, TextNormalizer};
pub use tokenizer::split_words;
