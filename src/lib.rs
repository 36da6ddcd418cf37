//! digitscope is the front-end of a handwritten-digit classifier demo.
//!
//! It turns pointer strokes into a 28×28 bitmap, asks a remote classifier what digit it is, and
//! animates the answer as a signal travelling through a schematic neural network:
//!
//! - Draw on a [`BitmapSampler`] and export a [`Payload`]
//! - Classify it through a [`PredictionService`] (e.g. [`HttpPredictionClient`])
//! - Animate the run with an [`AnimationEngine`], or drive everything through a [`DemoSession`]
//! - Render runs to frames with [`render_run`] into a [`FrameSink`]
//! - Send corrections back through a [`FeedbackForm`] and a [`FeedbackService`]
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

pub(crate) mod animation;
pub(crate) mod client;
/// Application configuration.
pub mod config;
pub(crate) mod encode;
pub(crate) mod network;
pub(crate) mod prediction;
pub(crate) mod render;
pub(crate) mod sampler;
pub(crate) mod session;
pub mod store;

pub use crate::foundation::core::{Canvas, Fps, FrameIndex, Point, Rect, Rgba8, Vec2};
pub use crate::foundation::error::{ScopeError, ScopeResult};

pub use crate::animation::clock::AnimationClock;
pub use crate::animation::ease::{Ease, Transition};
pub use crate::animation::engine::{
    AnimationEngine, DEFAULT_EDGES_PER_LAYER, EngineEvent, EngineOpts, EngineState,
};
pub use crate::animation::sampling::{
    EdgeId, EntropySource, HighlightSet, RandomSource, Rng64, sample_edges,
};
pub use crate::animation::timeline::{
    Generation, ScheduledTimer, StageAction, StageTiming, TimerQueue, schedule_run,
};
pub use crate::client::feedback::{
    FeedbackForm, FeedbackOutcome, FeedbackRecord, FeedbackService, HttpFeedbackClient,
};
pub use crate::client::inference::{HttpPredictionClient, PredictionService, parse_prediction};
pub use crate::client::{DEFAULT_BASE_URL, EndpointOpts};
pub use crate::config::AppConfig;
pub use crate::encode::sink::{FrameSink, InMemorySink, PngSequenceSink, SinkConfig};
pub use crate::network::layout::{DiagramLayout, LayoutOpts};
pub use crate::network::topology::{DEFAULT_DISPLAY_CAP, LayerSpec, NetworkTopology};
pub use crate::prediction::{Label, PredictionResult};
pub use crate::render::pipeline::{
    RenderStats, RunRenderOpts, render_frame, render_run, render_triggered,
};
pub use crate::render::raster::{FrameRGBA, SvgRasterizer};
pub use crate::render::svg::diagram_svg;
pub use crate::render::view::{
    CaptionView, DiagramStyle, DiagramView, EdgeView, Emphasis, NodeFill, NodeScale, NodeView,
    classify_edge,
};
pub use crate::sampler::payload::{DATA_URL_PREFIX, Payload, render_preview};
pub use crate::sampler::stroke::{BitmapSampler, SamplerOpts, StrokeScript};
pub use crate::sampler::surface::{BACKGROUND, DrawingSurface, FOREGROUND};
pub use crate::session::demo::{DemoSession, PredictRequest, SubmitOutcome};
pub use crate::session::notice::{Notice, NoticeLevel};
pub use crate::store::{JsonFileStore, KeyValueStore, LAST_IMAGE_KEY, LAST_PREDICTION_KEY, MemoryStore};
