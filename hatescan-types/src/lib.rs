//! Core types and errors for the hatescan classifier.
//!
//! This crate provides the fundamental types shared by the normalizer,
//! the vocabulary and the prediction server. Keeping them separate ensures:
//!
//! - **Stable contracts**: label indices and token ids mean the same thing in every crate
//! - **Clean boundaries**: the server depends on these types, never the other way around
//! - **One error taxonomy**: artifact, encoding and inference failures are defined once

#![warn(missing_docs)]

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Vocabulary identifier of a word.
///
/// Ids start at 1. The value 0 is never assigned to a word and is used
/// as the padding sentinel in encoded sequences.
pub type TokenId = u32;

/// Padding sentinel written after the last real id of a short sequence.
pub const PAD_ID: TokenId = 0;

/// Default length of an encoded sequence.
pub const DEFAULT_MAX_LENGTH: usize = 50;

/// One of the three classes the model predicts.
///
/// `#[repr(u8)]` pins the discriminant to the model's output index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Label {
    /// Output index 0.
    #[serde(rename = "No hate - Supportive speech")]
    Supportive = 0,
    /// Output index 1.
    #[serde(rename = "Neutral or ambiguos")]
    Neutral = 1,
    /// Output index 2.
    #[serde(rename = "Hate speech")]
    Hate = 2,
}

impl Label {
    /// All labels in output-index order.
    pub const ALL: [Label; 3] = [Label::Supportive, Label::Neutral, Label::Hate];

    /// Number of classes the model emits.
    pub const COUNT: usize = Self::ALL.len();

    /// Maps a model output index to its label.
    #[inline]
    pub const fn from_index(index: usize) -> Option<Label> {
        match index {
            0 => Some(Label::Supportive),
            1 => Some(Label::Neutral),
            2 => Some(Label::Hate),
            _ => None,
        }
    }

    /// Returns the model output index of this label.
    #[inline(always)]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Human readable label, exactly as the service returns it.
    ///
    /// "ambiguos" is spelled the way stored predictions spell it.
    pub const fn as_str(self) -> &'static str {
        match self {
            Label::Supportive => "No hate - Supportive speech",
            Label::Neutral => "Neutral or ambiguos",
            Label::Hate => "Hate speech",
        }
    }

    /// Picks the label with the highest probability.
    ///
    /// # Errors
    ///
    /// Returns [`InferenceError::UnexpectedOutputShape`] unless exactly
    /// [`Label::COUNT`] probabilities are given.
    pub fn from_probabilities(probabilities: &[f32]) -> Result<Label, InferenceError> {
        if probabilities.len() != Self::COUNT {
            return Err(InferenceError::UnexpectedOutputShape {
                expected: Self::COUNT,
                actual: probabilities.len(),
            });
        }

        argmax(probabilities)
            .and_then(Label::from_index)
            .ok_or(InferenceError::UnexpectedOutputShape {
                expected: Self::COUNT,
                actual: probabilities.len(),
            })
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Index of the largest value, first occurrence wins.
///
/// A later value replaces the current maximum only when it is strictly
/// greater, so ties resolve to the lowest index and NaN never displaces
/// a number. Returns `None` for an empty slice.
pub fn argmax(values: &[f32]) -> Option<usize> {
    let (first, rest) = values.split_first()?;
    let mut best = 0usize;
    let mut best_value = *first;

    for (i, &value) in rest.iter().enumerate() {
        if value > best_value || (best_value.is_nan() && !value.is_nan()) {
            best = i + 1;
            best_value = value;
        }
    }

    Some(best)
}

/// User verdict on a stored prediction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Feedback {
    /// The prediction was correct.
    Yes,
    /// The prediction was wrong.
    No,
}

impl Feedback {
    /// Value written to the `feedback` column.
    pub const fn as_str(self) -> &'static str {
        match self {
            Feedback::Yes => "Yes",
            Feedback::No => "No",
        }
    }
}

impl fmt::Display for Feedback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Feedback {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "yes" => Ok(Feedback::Yes),
            "no" => Ok(Feedback::No),
            other => Err(format!("unknown feedback value: {other}")),
        }
    }
}

/// Which end of an over-long sequence is cut off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Truncation {
    /// Keep the first `max_length` ids, drop the rest.
    #[default]
    Post,
    /// Keep the last `max_length` ids.
    Pre,
}

/// Sequence encoder options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncoderConfig {
    /// Exact length of every encoded sequence. Must be positive.
    pub max_length: usize,
    /// Side that is dropped when a sequence is too long.
    pub truncation: Truncation,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            max_length: DEFAULT_MAX_LENGTH,
            truncation: Truncation::Post,
        }
    }
}

impl EncoderConfig {
    /// Config with the given length and trailing truncation.
    pub const fn with_max_length(max_length: usize) -> Self {
        Self {
            max_length,
            truncation: Truncation::Post,
        }
    }
}

/// Fixed-length id sequence fed to the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EncodedSequence(Vec<TokenId>);

impl EncodedSequence {
    /// Wraps ids that already have the target length.
    pub fn from_padded(ids: Vec<TokenId>) -> Self {
        Self(ids)
    }

    /// Borrows the ids.
    #[inline(always)]
    pub fn as_slice(&self) -> &[TokenId] {
        &self.0
    }

    /// Number of ids, padding included.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` for a zero-length sequence.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of ids before the padding starts.
    pub fn content_len(&self) -> usize {
        self.0.iter().rposition(|&id| id != PAD_ID).map_or(0, |i| i + 1)
    }

    /// Consumes the sequence and returns the ids.
    pub fn into_inner(self) -> Vec<TokenId> {
        self.0
    }
}

/// Errors raised while building an encoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EncodeError {
    /// `max_length` was zero.
    #[error("max_length must be a positive integer, got {0}")]
    InvalidMaxLength(usize),
}

/// Errors raised while loading or saving a persisted artifact.
#[derive(Debug, Error)]
pub enum ArtifactError {
    /// The artifact could not be read or written.
    #[error("artifact I/O failed for {path}: {source}")]
    Io {
        /// Path of the artifact.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The artifact is not valid JSON.
    #[error("artifact is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// The JSON is well formed but does not have the expected layout.
    #[error("malformed artifact: {reason}")]
    Malformed {
        /// What was wrong with the document.
        reason: String,
    },
}

/// Errors raised by the model runtime during a prediction.
#[derive(Debug, Error)]
pub enum InferenceError {
    /// The runtime could not be reached or the request did not complete.
    #[error("model runtime request failed: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),
    /// The runtime answered with a non-success status.
    #[error("model runtime returned status {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, possibly truncated.
        body: String,
    },
    /// The response did not contain a prediction.
    #[error("model runtime response is malformed: {reason}")]
    MalformedResponse {
        /// What was wrong with the response.
        reason: String,
    },
    /// The probability vector has the wrong number of classes.
    #[error("expected {expected} class probabilities, got {actual}")]
    UnexpectedOutputShape {
        /// Number of classes the labels cover.
        expected: usize,
        /// Number of values received.
        actual: usize,
    },
}

/// Errors surfaced by a single prediction.
#[derive(Debug, Error)]
pub enum PredictError {
    /// The input could not be encoded.
    #[error(transparent)]
    Encode(#[from] EncodeError),
    /// The model runtime failed.
    #[error(transparent)]
    Inference(#[from] InferenceError),
}
