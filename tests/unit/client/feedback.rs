use super::*;
use std::sync::Mutex;

use serde_json::json;

use crate::sampler::surface::DrawingSurface;
use crate::foundation::core::Canvas;

struct Recorder {
    fail: bool,
    seen: Mutex<Vec<FeedbackRecord>>,
}

impl Recorder {
    fn new(fail: bool) -> Self {
        Self {
            fail,
            seen: Mutex::new(Vec::new()),
        }
    }
}

impl FeedbackService for Recorder {
    async fn send_feedback(&self, record: &FeedbackRecord) -> ScopeResult<()> {
        self.seen.lock().unwrap().push(record.clone());
        if self.fail {
            Err(ScopeError::feedback_failed("boom"))
        } else {
            Ok(())
        }
    }
}

fn blank_payload() -> Payload {
    Payload::encode(&DrawingSurface::new(Canvas::new(28, 28).unwrap())).unwrap()
}

fn label(k: i64) -> Label {
    Label::new(k, 10).unwrap()
}

#[tokio::test]
async fn blank_text_is_rejected_without_a_call() {
    let svc = Recorder::new(false);
    let mut form = FeedbackForm::new();
    form.set_text("   ");
    let err = form.submit(&svc, &blank_payload(), label(3)).await.unwrap_err();
    assert!(matches!(err, ScopeError::Validation(_)));
    assert!(svc.seen.lock().unwrap().is_empty());
    assert_eq!(form.text(), "   ");
}

#[tokio::test]
async fn success_clears_the_field_and_sends_text_as_typed() {
    let svc = Recorder::new(false);
    let mut form = FeedbackForm::new();
    form.set_text("7");
    let out = form.submit(&svc, &blank_payload(), label(3)).await.unwrap();
    assert_eq!(out, FeedbackOutcome::Accepted);
    assert_eq!(form.text(), "");
    let seen = svc.seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].actual, "7");
    assert_eq!(seen[0].prediction, label(3));
}

#[tokio::test]
async fn failure_keeps_the_field() {
    let svc = Recorder::new(true);
    let mut form = FeedbackForm::new();
    form.set_text("7");
    let err = form.submit(&svc, &blank_payload(), label(3)).await.unwrap_err();
    assert!(matches!(err, ScopeError::FeedbackSubmissionFailed(_)));
    assert_eq!(form.text(), "7");
}

#[test]
fn record_serializes_to_wire_shape() {
    let payload = blank_payload();
    let mut form = FeedbackForm::new();
    form.set_text(" 7 ");
    let record = form.record(&payload, label(3)).unwrap();
    assert_eq!(
        serde_json::to_value(&record).unwrap(),
        json!({ "image": payload.as_str(), "prediction": 3, "actual": " 7 " })
    );
}

#[test]
fn only_whitespace_counts_as_blank() {
    let payload = blank_payload();
    let mut form = FeedbackForm::new();
    for blank in ["", " ", "\t\n", "\u{3000}"] {
        form.set_text(blank);
        assert!(form.record(&payload, label(1)).is_err(), "{blank:?}");
    }
    form.set_text("\tseven\n");
    assert_eq!(form.record(&payload, label(1)).unwrap().actual, "\tseven\n");
}
