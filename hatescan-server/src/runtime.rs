//! Model runtime client.
//!
//! The classifier runs in a separate model server. [`RestModelRuntime`] talks
//! to it over the TensorFlow Serving REST predict API:
//!
//! ```text
//! POST {url}  {"instances": [[12, 7, 0, 0, ...]]}
//! 200         {"predictions": [[0.1, 0.2, 0.7]]}
//! ```

use std::time::Duration;

use async_trait::async_trait;
use hatescan_types::{EncodedSequence, InferenceError, TokenId};
use serde::{Deserialize, Serialize};

/// Maximum number of bytes of an error body kept in [`InferenceError::Status`].
const MAX_ERROR_BODY: usize = 512;

/// Produces class probabilities for one encoded sequence.
#[async_trait]
pub trait ModelRuntime: Send + Sync {
    async fn predict(&self, input: &EncodedSequence) -> Result<Vec<f32>, InferenceError>;
}

#[derive(Serialize)]
struct PredictRequest<'a> {
    instances: [&'a [TokenId]; 1],
}

#[derive(Deserialize)]
struct PredictResponse {
    predictions: Vec<Vec<f32>>,
}

/// HTTP client for a model served behind a `:predict` endpoint.
#[derive(Debug, Clone)]
pub struct RestModelRuntime {
    client: reqwest::Client,
    url: String,
}

impl RestModelRuntime {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, InferenceError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| InferenceError::Transport(Box::new(e)))?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl ModelRuntime for RestModelRuntime {
    async fn predict(&self, input: &EncodedSequence) -> Result<Vec<f32>, InferenceError> {
        let request = PredictRequest {
            instances: [input.as_slice()],
        };

        let response = self
            .client
            .post(&self.url)
            .json(&request)
            .send()
            .await
            .map_err(|e| InferenceError::Transport(Box::new(e)))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| InferenceError::Transport(Box::new(e)))?;

        if !status.is_success() {
            return Err(InferenceError::Status {
                status: status.as_u16(),
                body: error_body(&body),
            });
        }

        parse_predictions(&body)
    }
}

/// Extracts the first probability vector of a predict response.
pub(crate) fn parse_predictions(body: &[u8]) -> Result<Vec<f32>, InferenceError> {
    let response: PredictResponse =
        serde_json::from_slice(body).map_err(|e| InferenceError::MalformedResponse {
            reason: e.to_string(),
        })?;

    response
        .predictions
        .into_iter()
        .next()
        .ok_or_else(|| InferenceError::MalformedResponse {
            reason: "response contains no predictions".to_owned(),
        })
}

fn error_body(body: &[u8]) -> String {
    let text = String::from_utf8_lossy(body);
    if text.len() <= MAX_ERROR_BODY {
        return text.into_owned();
    }
    let mut end = MAX_ERROR_BODY;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &text[..end])
}
