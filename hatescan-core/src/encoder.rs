//! Fixed-length sequence encoding.

use hatescan_types::{EncodeError, EncodedSequence, EncoderConfig, TokenId, Truncation, PAD_ID};

use crate::vocab::Vocabulary;

/// Pads or truncates id sequences to the length the model expects.
///
/// Short sequences get [`PAD_ID`] appended. Long sequences lose ids from the
/// end by default, or from the front with [`Truncation::Pre`].
///
/// ```
/// use hatescan_core::encoder::SequenceEncoder;
/// use hatescan_types::EncoderConfig;
///
/// let encoder = SequenceEncoder::new(EncoderConfig::with_max_length(5)).unwrap();
/// assert_eq!(encoder.encode(&[7, 8, 9]).as_slice(), &[7, 8, 9, 0, 0]);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct SequenceEncoder {
    config: EncoderConfig,
}

impl Default for SequenceEncoder {
    fn default() -> Self {
        Self {
            config: EncoderConfig::default(),
        }
    }
}

impl SequenceEncoder {
    /// # Errors
    ///
    /// Returns [`EncodeError::InvalidMaxLength`] when `max_length` is zero.
    pub fn new(config: EncoderConfig) -> Result<Self, EncodeError> {
        if config.max_length == 0 {
            return Err(EncodeError::InvalidMaxLength(config.max_length));
        }
        Ok(Self { config })
    }

    #[inline(always)]
    pub fn config(&self) -> EncoderConfig {
        self.config
    }

    #[inline(always)]
    pub fn max_length(&self) -> usize {
        self.config.max_length
    }

    pub fn encode(&self, ids: &[TokenId]) -> EncodedSequence {
        let max = self.config.max_length;
        let kept = if ids.len() > max {
            match self.config.truncation {
                Truncation::Post => &ids[..max],
                Truncation::Pre => &ids[ids.len() - max..],
            }
        } else {
            ids
        };

        let mut out = Vec::with_capacity(max);
        out.extend_from_slice(kept);
        out.resize(max, PAD_ID);
        EncodedSequence::from_padded(out)
    }

    /// Looks up the words of `text` and encodes the resulting ids.
    pub fn encode_text(&self, vocab: &Vocabulary, text: &str) -> EncodedSequence {
        self.encode(&vocab.text_to_sequence(text))
    }

    /// Looks up already tokenized words and encodes the resulting ids.
    pub fn encode_tokens<S: AsRef<str>>(&self, vocab: &Vocabulary, tokens: &[S]) -> EncodedSequence {
        self.encode(&vocab.tokens_to_sequence(tokens))
    }
}
