use std::future::Future;

use crate::client::EndpointOpts;
use crate::foundation::error::{ScopeError, ScopeResult};
use crate::prediction::{Label, PredictionResult};
use crate::sampler::payload::Payload;

/// Something that can classify an exported drawing.
///
/// Every failure is reported as [`ScopeError::InferenceUnavailable`].
pub trait PredictionService {
    /// Classify `payload`.
    fn predict(
        &self,
        payload: &Payload,
    ) -> impl Future<Output = ScopeResult<PredictionResult>> + Send;
}

#[derive(Debug, serde::Serialize)]
struct PredictBody<'a> {
    image: &'a str,
}

#[derive(Debug, serde::Deserialize)]
struct PredictReply {
    prediction: serde_json::Value,
}

/// `POST {base}/predict` client.
#[derive(Clone, Debug)]
pub struct HttpPredictionClient {
    http: reqwest::Client,
    url: String,
    class_count: u32,
}

impl HttpPredictionClient {
    /// Client for `endpoint`, accepting labels in `0..class_count`.
    pub fn new(endpoint: &EndpointOpts, class_count: u32) -> ScopeResult<Self> {
        Ok(Self::with_http_client(
            endpoint,
            endpoint.http_client()?,
            class_count,
        ))
    }

    /// Client sharing an already configured `reqwest::Client`.
    pub fn with_http_client(
        endpoint: &EndpointOpts,
        http: reqwest::Client,
        class_count: u32,
    ) -> Self {
        Self {
            http,
            url: endpoint.url("predict"),
            class_count,
        }
    }

    /// Target URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    async fn request(&self, payload: &Payload) -> Result<serde_json::Value, reqwest::Error> {
        let reply: PredictReply = self
            .http
            .post(&self.url)
            .json(&PredictBody {
                image: payload.as_str(),
            })
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(reply.prediction)
    }
}

/// Interpret the `prediction` field of a reply as a label in `0..class_count`.
pub fn parse_prediction(value: &serde_json::Value, class_count: u32) -> ScopeResult<Label> {
    let raw = value.as_i64().ok_or_else(|| {
        ScopeError::inference_unavailable(format!("prediction is not an integer: {value}"))
    })?;
    Label::new(raw, class_count).map_err(|e| ScopeError::inference_unavailable(e.to_string()))
}

impl PredictionService for HttpPredictionClient {
    #[tracing::instrument(skip_all, fields(url = %self.url))]
    async fn predict(&self, payload: &Payload) -> ScopeResult<PredictionResult> {
        let value = self.request(payload).await.map_err(|e| {
            tracing::warn!(error = %e, "predict request failed");
            ScopeError::inference_unavailable(e.to_string())
        })?;
        let label = parse_prediction(&value, self.class_count)?;
        tracing::debug!(label = label.get(), "prediction received");
        Ok(PredictionResult::new(label))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/client/inference.rs"]
mod tests;
