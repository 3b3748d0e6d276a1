//! Text to label prediction.

use std::sync::Arc;

use hatescan_core::analyzer::TextNormalizer;
use hatescan_core::encoder::SequenceEncoder;
use hatescan_core::vocab::Vocabulary;
use hatescan_types::{EncoderConfig, Label, PredictError};
use tracing::debug;

use crate::runtime::ModelRuntime;

/// Normalizes, encodes and classifies text.
///
/// All state is read-only after construction; clones share it.
#[derive(Clone)]
pub struct PredictionService {
    normalizer: Arc<TextNormalizer>,
    vocab: Arc<Vocabulary>,
    encoder: SequenceEncoder,
    runtime: Arc<dyn ModelRuntime>,
}

impl PredictionService {
    /// # Errors
    ///
    /// Returns [`PredictError::Encode`] when `encoder` has a zero length.
    pub fn new(
        vocab: Arc<Vocabulary>,
        runtime: Arc<dyn ModelRuntime>,
        encoder: EncoderConfig,
    ) -> Result<Self, PredictError> {
        Ok(Self {
            normalizer: Arc::new(TextNormalizer::default()),
            vocab,
            encoder: SequenceEncoder::new(encoder)?,
            runtime,
        })
    }

    pub fn vocab(&self) -> &Vocabulary {
        &self.vocab
    }

    pub fn encoder(&self) -> &SequenceEncoder {
        &self.encoder
    }

    /// Predicts the label of `text`.
    ///
    /// Text that normalizes to nothing is still sent to the model as an
    /// all-padding sequence.
    pub async fn predict(&self, text: &str) -> Result<Label, PredictError> {
        let normalized = self.normalizer.normalize_to_text(text);
        let encoded = self.encoder.encode_text(&self.vocab, &normalized);
        debug!(
            normalized = %normalized,
            ids = encoded.content_len(),
            "encoded input"
        );

        let probabilities = self.runtime.predict(&encoded).await?;
        let label = Label::from_probabilities(&probabilities)?;
        debug!(?probabilities, label = %label, "model prediction");

        Ok(label)
    }
}

#[cfg(test)]
pub(crate) mod stub {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use hatescan_types::{EncodedSequence, InferenceError};

    use crate::runtime::ModelRuntime;

    /// Runtime that answers every request with fixed probabilities and keeps
    /// the sequences it was sent.
    pub struct StubRuntime {
        probabilities: Option<Vec<f32>>,
        seen: Mutex<Vec<EncodedSequence>>,
    }

    impl StubRuntime {
        pub fn answering(probabilities: Vec<f32>) -> Self {
            Self {
                probabilities: Some(probabilities),
                seen: Mutex::default(),
            }
        }

        /// Runtime that fails like an unreachable model server.
        pub fn unavailable() -> Self {
            Self {
                probabilities: None,
                seen: Mutex::default(),
            }
        }

        pub fn seen(&self) -> Vec<EncodedSequence> {
            self.seen.lock().expect("stub lock").clone()
        }
    }

    #[async_trait]
    impl ModelRuntime for StubRuntime {
        async fn predict(&self, input: &EncodedSequence) -> Result<Vec<f32>, InferenceError> {
            self.seen.lock().expect("stub lock").push(input.clone());
            self.probabilities.clone().ok_or(InferenceError::Status {
                status: 503,
                body: "model unavailable".to_owned(),
            })
        }
    }
}
