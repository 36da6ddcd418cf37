use std::time::Duration;

use crate::animation::engine::{AnimationEngine, EngineEvent, EngineOpts};
use crate::animation::sampling::RandomSource;
use crate::animation::timeline::Generation;
use crate::client::feedback::{FeedbackForm, FeedbackOutcome, FeedbackService};
use crate::client::inference::PredictionService;
use crate::encode::sink::FrameSink;
use crate::foundation::core::Point;
use crate::foundation::error::{ScopeError, ScopeResult};
use crate::network::topology::NetworkTopology;
use crate::prediction::{Label, PredictionResult};
use crate::render::pipeline::{RenderStats, RunRenderOpts, render_triggered};
use crate::render::raster::SvgRasterizer;
use crate::sampler::payload::Payload;
use crate::sampler::stroke::{BitmapSampler, SamplerOpts, StrokeScript};
use crate::session::notice::Notice;
use crate::store::{KeyValueStore, LAST_IMAGE_KEY, LAST_PREDICTION_KEY};

/// A prediction request handed out by [`DemoSession::begin_submit`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PredictRequest {
    /// Request generation; the response is applied only while it is still current.
    pub generation: Generation,
    /// Snapshot of the drawing at submit time.
    pub payload: Payload,
}

/// What happened to a prediction response.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The response was current and started animation run `run`.
    Triggered {
        /// Engine generation of the new run.
        run: Generation,
        /// Predicted class.
        label: Label,
    },
    /// The request failed; the drawing is untouched and nothing was animated.
    Failed(Notice),
    /// A newer request (or a clear) superseded this one; the response was dropped.
    Stale,
}

/// The interactive demo: one drawing, one classifier, one animation.
///
/// Everything runs on the caller's task. The only suspension points are the two service calls
/// and, in [`DemoSession::run_until_complete`], timer waits. Request generations make late
/// responses harmless: a response is applied only if no newer submit or clear happened since
/// its request was issued.
pub struct DemoSession<P, F, S> {
    sampler: BitmapSampler,
    engine: AnimationEngine,
    predictor: P,
    feedback: F,
    store: S,
    rng: Box<dyn RandomSource + Send>,
    epoch: tokio::time::Instant,
    request_generation: Generation,
    in_flight: Option<Generation>,
    last: Option<(Payload, PredictionResult)>,
    restored: bool,
    form: FeedbackForm,
    notices: Vec<Notice>,
}

impl<P, F, S> DemoSession<P, F, S>
where
    P: PredictionService,
    F: FeedbackService,
    S: KeyValueStore,
{
    /// New session with a blank drawing and an idle engine.
    ///
    /// The session clock starts now; [`DemoSession::now`] is measured from here.
    pub fn new(
        sampler: SamplerOpts,
        topology: NetworkTopology,
        engine: EngineOpts,
        predictor: P,
        feedback: F,
        store: S,
        rng: Box<dyn RandomSource + Send>,
    ) -> ScopeResult<Self> {
        Ok(Self {
            sampler: BitmapSampler::new(sampler)?,
            engine: AnimationEngine::new(topology, engine),
            predictor,
            feedback,
            store,
            rng,
            epoch: tokio::time::Instant::now(),
            request_generation: Generation::default(),
            in_flight: None,
            last: None,
            restored: false,
            form: FeedbackForm::new(),
            notices: Vec::new(),
        })
    }

    /// Time since the session started.
    pub fn now(&self) -> Duration {
        self.epoch.elapsed()
    }

    /// Pointer pressed at display coordinates `p`.
    pub fn pointer_down(&mut self, p: Point) {
        self.sampler.begin_stroke(p);
    }

    /// Pointer moved to `p`; draws only while pressed.
    pub fn pointer_move(&mut self, p: Point) {
        self.sampler.extend_stroke(p);
    }

    /// Pointer released, wherever it is.
    pub fn pointer_up(&mut self) {
        self.sampler.end_stroke();
    }

    /// Replay a recorded gesture as pointer events.
    pub fn replay(&mut self, script: &StrokeScript) {
        script.replay(&mut self.sampler);
    }

    /// Blank the drawing and retire any outstanding prediction request.
    pub fn clear_drawing(&mut self) {
        self.sampler.clear();
        self.request_generation = self.request_generation.next();
        if let Some(g) = self.in_flight.take() {
            tracing::debug!(request = g.0, "in-flight prediction superseded by clear");
        }
        self.last = None;
        self.restored = false;
    }

    /// Snapshot the drawing and open a new request generation.
    ///
    /// Starting a new cycle retires the previous one: its animation run is cancelled and its
    /// prediction is no longer offered for feedback, whatever the new request returns.
    pub fn begin_submit(&mut self) -> ScopeResult<PredictRequest> {
        let payload = self.sampler.export_payload()?;
        self.request_generation = self.request_generation.next();
        self.in_flight = Some(self.request_generation);
        self.engine.cancel();
        self.last = None;
        self.restored = false;
        tracing::debug!(request = self.request_generation.0, "prediction requested");
        Ok(PredictRequest {
            generation: self.request_generation,
            payload,
        })
    }

    /// Apply the response to `request`, observed at `now`.
    pub fn complete_submit(
        &mut self,
        request: PredictRequest,
        result: ScopeResult<PredictionResult>,
        now: Duration,
    ) -> SubmitOutcome {
        if request.generation != self.request_generation {
            tracing::debug!(
                request = request.generation.0,
                current = self.request_generation.0,
                "discarding stale prediction response"
            );
            return SubmitOutcome::Stale;
        }
        self.in_flight = None;

        let prediction = match result {
            Ok(p) => p,
            Err(e) => {
                tracing::warn!(error = %e, "prediction failed");
                let notice = Notice::from_error(&e);
                self.notices.push(notice.clone());
                return SubmitOutcome::Failed(notice);
            }
        };

        self.remember(&request.payload, prediction);
        self.last = Some((request.payload, prediction));
        let run = self.engine.trigger(Some(prediction), now, self.rng.as_mut());
        SubmitOutcome::Triggered {
            run,
            label: prediction.label,
        }
    }

    /// Export, classify and, if the answer is still wanted, start the animation.
    #[tracing::instrument(skip(self))]
    pub async fn submit(&mut self) -> ScopeResult<SubmitOutcome> {
        let request = self.begin_submit()?;
        let result = self.predictor.predict(&request.payload).await;
        let now = self.now();
        Ok(self.complete_submit(request, result, now))
    }

    /// Fire animation timers due at `now`.
    pub fn tick_at(&mut self, now: Duration) -> Vec<EngineEvent> {
        self.engine.advance(now)
    }

    /// Fire animation timers due on the session clock.
    pub fn tick(&mut self) -> Vec<EngineEvent> {
        let now = self.now();
        self.tick_at(now)
    }

    /// Sleep through the current run, firing each timer on time.
    pub async fn run_until_complete(&mut self) -> Vec<EngineEvent> {
        let mut events = Vec::new();
        while let Some(deadline) = self.engine.next_deadline() {
            tokio::time::sleep_until(self.epoch + deadline).await;
            events.extend(self.tick());
        }
        events
    }

    /// Render the current run to `sink`, firing its timers at frame instants instead of waiting
    /// on the session clock.
    ///
    /// The run ends complete, so feedback for a fresh prediction becomes available.
    pub fn render_current_run(
        &mut self,
        opts: &RunRenderOpts,
        rasterizer: &SvgRasterizer,
        sink: &mut dyn FrameSink,
    ) -> ScopeResult<RenderStats> {
        render_triggered(&mut self.engine, opts, rasterizer, sink)
    }

    /// `true` while there is a prediction the user can correct.
    ///
    /// A fresh prediction becomes correctable once its run reaches
    /// [`EngineState::Complete`](crate::EngineState::Complete). A prediction restored from the
    /// cache is correctable right away since its run is not replayed.
    pub fn feedback_available(&self) -> bool {
        self.last.is_some() && (self.restored || self.engine.is_complete())
    }

    /// Feedback text field.
    pub fn feedback_form(&self) -> &FeedbackForm {
        &self.form
    }

    /// Replace the feedback text.
    pub fn set_feedback_text(&mut self, text: impl Into<String>) {
        self.form.set_text(text);
    }

    /// Send the feedback text for the last prediction.
    ///
    /// Rejected locally until [`DemoSession::feedback_available`] holds. Every outcome is also
    /// recorded as a [`Notice`].
    pub async fn submit_feedback(&mut self) -> ScopeResult<FeedbackOutcome> {
        let correctable = self.last.clone().filter(|_| self.feedback_available());
        let Some((payload, prediction)) = correctable else {
            let err = ScopeError::validation(if self.last.is_none() {
                "nothing to correct yet; submit a drawing first"
            } else {
                "wait for the animation to finish before correcting it"
            });
            self.notices.push(Notice::from_error(&err));
            return Err(err);
        };
        match self
            .form
            .submit(&self.feedback, &payload, prediction.label)
            .await
        {
            Ok(outcome) => {
                tracing::info!(prediction = prediction.label.get(), "feedback submitted");
                self.notices.push(Notice::info("Thanks! Feedback submitted."));
                Ok(outcome)
            }
            Err(e) => {
                self.notices.push(Notice::from_error(&e));
                Err(e)
            }
        }
    }

    /// Reload the cached drawing and prediction, if both are present and readable.
    ///
    /// Never fails: cache problems are logged and treated as "nothing cached". The animation is
    /// not replayed.
    pub fn restore_last(&mut self) -> Option<PredictionResult> {
        match self.read_cached() {
            Ok(Some((payload, prediction))) => {
                tracing::debug!(label = prediction.label.get(), "restored cached drawing");
                self.last = Some((payload, prediction));
                self.restored = true;
                Some(prediction)
            }
            Ok(None) => None,
            Err(e) => {
                tracing::warn!(error = %e, "ignoring unreadable cache");
                None
            }
        }
    }

    fn read_cached(&mut self) -> ScopeResult<Option<(Payload, PredictionResult)>> {
        let (Some(image), Some(label)) = (
            self.store.get(LAST_IMAGE_KEY)?,
            self.store.get(LAST_PREDICTION_KEY)?,
        ) else {
            return Ok(None);
        };
        let raw: i64 = label
            .trim()
            .parse()
            .map_err(|_| ScopeError::store(format!("cached prediction is not a number: {label}")))?;
        let prediction =
            PredictionResult::new(Label::new(raw, self.engine.topology().class_count())?);
        let payload = Payload::from_data_url(image)?;
        self.sampler.load_surface(payload.decode_surface()?)?;
        let payload = self.sampler.export_payload()?;
        Ok(Some((payload, prediction)))
    }

    fn remember(&mut self, payload: &Payload, prediction: PredictionResult) {
        let label = prediction.label.to_string();
        let writes = [
            (LAST_IMAGE_KEY, payload.as_str()),
            (LAST_PREDICTION_KEY, label.as_str()),
        ];
        for (key, value) in writes {
            if let Err(e) = self.store.set(key, value) {
                tracing::warn!(key, error = %e, "cache write failed");
            }
        }
    }

    /// Drain notices produced since the last call.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    /// Pending notices.
    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    /// Drawing state.
    pub fn sampler(&self) -> &BitmapSampler {
        &self.sampler
    }

    /// Animation state.
    pub fn engine(&self) -> &AnimationEngine {
        &self.engine
    }

    /// Prediction service.
    pub fn predictor(&self) -> &P {
        &self.predictor
    }

    /// Feedback service.
    pub fn feedback_service(&self) -> &F {
        &self.feedback
    }

    /// Cache.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Latest request generation.
    pub fn request_generation(&self) -> Generation {
        self.request_generation
    }

    /// Generation of the request awaiting a response, if any.
    pub fn in_flight(&self) -> Option<Generation> {
        self.in_flight
    }

    /// Last applied prediction.
    pub fn last_prediction(&self) -> Option<PredictionResult> {
        self.last.as_ref().map(|(_, p)| *p)
    }

    /// Payload the last prediction was made for.
    pub fn last_payload(&self) -> Option<&Payload> {
        self.last.as_ref().map(|(p, _)| p)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/demo.rs"]
mod tests;
