use std::future::Future;

use crate::client::EndpointOpts;
use crate::foundation::error::{ScopeError, ScopeResult};
use crate::prediction::Label;
use crate::sampler::payload::Payload;

/// One correction sent back to the classifier service.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct FeedbackRecord {
    /// The drawing that was classified.
    pub image: Payload,
    /// What the service predicted.
    pub prediction: Label,
    /// What the user says it is, exactly as typed.
    pub actual: String,
}

/// Something that accepts corrections.
pub trait FeedbackService {
    /// Deliver `record`. Every failure is reported as
    /// [`ScopeError::FeedbackSubmissionFailed`].
    fn send_feedback(&self, record: &FeedbackRecord)
    -> impl Future<Output = ScopeResult<()>> + Send;
}

/// `POST {base}/feedback` client.
#[derive(Clone, Debug)]
pub struct HttpFeedbackClient {
    http: reqwest::Client,
    url: String,
}

impl HttpFeedbackClient {
    /// Client for `endpoint`.
    pub fn new(endpoint: &EndpointOpts) -> ScopeResult<Self> {
        Ok(Self::with_http_client(endpoint, endpoint.http_client()?))
    }

    /// Client sharing an already configured `reqwest::Client`.
    pub fn with_http_client(endpoint: &EndpointOpts, http: reqwest::Client) -> Self {
        Self {
            http,
            url: endpoint.url("feedback"),
        }
    }

    /// Target URL.
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl FeedbackService for HttpFeedbackClient {
    #[tracing::instrument(skip_all, fields(url = %self.url, prediction = record.prediction.get()))]
    async fn send_feedback(&self, record: &FeedbackRecord) -> ScopeResult<()> {
        let sent = self
            .http
            .post(&self.url)
            .json(record)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status);
        match sent {
            Ok(_) => {
                tracing::debug!("feedback accepted");
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "feedback request failed");
                Err(ScopeError::feedback_failed(e.to_string()))
            }
        }
    }
}

/// Outcome of a feedback attempt that reached the service.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FeedbackOutcome {
    /// The service accepted the correction; the text field was cleared.
    Accepted,
}

/// The "actual digit" text field and its submit rules.
///
/// Blank input never reaches the network. Text made only of whitespace counts as blank, but
/// anything else is sent exactly as typed, surrounding whitespace included. The text survives a
/// failed submission so the user can retry, and is cleared only after the service accepted it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FeedbackForm {
    text: String,
}

impl FeedbackForm {
    /// Empty form.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the field content.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    /// Current field content.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Build the record to send, or a validation error for blank input.
    pub fn record(&self, image: &Payload, prediction: Label) -> ScopeResult<FeedbackRecord> {
        if self.text.trim().is_empty() {
            return Err(ScopeError::validation("enter the actual digit first"));
        }
        Ok(FeedbackRecord {
            image: image.clone(),
            prediction,
            actual: self.text.clone(),
        })
    }

    /// Validate, send through `service`, and clear the field on success.
    pub async fn submit<S: FeedbackService>(
        &mut self,
        service: &S,
        image: &Payload,
        prediction: Label,
    ) -> ScopeResult<FeedbackOutcome> {
        let record = self.record(image, prediction)?;
        service.send_feedback(&record).await?;
        self.text.clear();
        Ok(FeedbackOutcome::Accepted)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/client/feedback.rs"]
mod tests;
