use std::time::Duration;

use crate::animation::engine::{AnimationEngine, EngineOpts};
use crate::animation::sampling::RandomSource;
use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::error::{ScopeError, ScopeResult};
use crate::network::layout::{DiagramLayout, LayoutOpts};
use crate::network::topology::NetworkTopology;
use crate::prediction::PredictionResult;
use crate::render::raster::{FrameRGBA, SvgRasterizer};
use crate::render::svg::diagram_svg;
use crate::render::view::{DiagramStyle, DiagramView};

/// Controls for rendering a whole animation run to frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RunRenderOpts {
    /// Output frame rate.
    pub fps: Fps,
    /// Stage timing and sampling.
    pub engine: EngineOpts,
    /// Diagram geometry.
    pub layout: LayoutOpts,
    /// Colours and transitions.
    pub style: DiagramStyle,
    /// Extra time rendered after completion so the caption can settle.
    pub tail: Duration,
}

impl Default for RunRenderOpts {
    fn default() -> Self {
        let style = DiagramStyle::default();
        Self {
            fps: Fps { num: 30, den: 1 },
            engine: EngineOpts::default(),
            layout: LayoutOpts::default(),
            style,
            tail: style.caption_transition.duration,
        }
    }
}

/// Counters of a run render.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// Frames pushed to the sink.
    pub frames_total: u64,
    /// Frames actually rasterized.
    pub frames_rendered: u64,
    /// Frames reused because nothing visible changed since the previous one.
    pub frames_reused: u64,
}

/// Build the view of `engine` at `now` and rasterize it.
pub fn render_frame(
    engine: &AnimationEngine,
    layout: &DiagramLayout,
    style: &DiagramStyle,
    rasterizer: &SvgRasterizer,
    now: Duration,
) -> ScopeResult<FrameRGBA> {
    let view = DiagramView::build(engine, layout, style, now);
    rasterizer.render(&diagram_svg(&view, style))
}

/// Render one complete run, from trigger to settled caption, into `sink`.
///
/// A fresh engine is triggered at time zero and stepped to each frame instant before the view is
/// built, so frames see exactly the state the timers would have produced.
#[tracing::instrument(skip_all, fields(fps = opts.fps.as_f64(), label))]
pub fn render_run(
    topology: NetworkTopology,
    prediction: Option<PredictionResult>,
    opts: &RunRenderOpts,
    rng: &mut dyn RandomSource,
    rasterizer: &SvgRasterizer,
    sink: &mut dyn FrameSink,
) -> ScopeResult<RenderStats> {
    if let Some(p) = prediction {
        tracing::Span::current().record("label", p.label.get());
    }
    let mut engine = AnimationEngine::new(topology, opts.engine);
    engine.trigger(prediction, Duration::ZERO, rng);
    render_triggered(&mut engine, opts, rasterizer, sink)
}

/// Render the run `engine` is currently in, from its trigger instant to the settled caption.
///
/// The engine keeps its own timing and highlights; only the frame rate, layout, style and tail
/// of `opts` apply. Its timers are fired as frames pass them, so it ends the render complete.
pub fn render_triggered(
    engine: &mut AnimationEngine,
    opts: &RunRenderOpts,
    rasterizer: &SvgRasterizer,
    sink: &mut dyn FrameSink,
) -> ScopeResult<RenderStats> {
    let anchor = engine
        .anchor()
        .ok_or_else(|| ScopeError::render("no animation run to render"))?;
    let layout = DiagramLayout::new(engine.topology(), opts.layout);
    let bounds = layout.bounds();

    let last = opts.fps.frames_covering(engine.run_length() + opts.tail);
    sink.begin(SinkConfig {
        width: bounds.width().ceil() as u32,
        height: bounds.height().ceil() as u32,
        fps: opts.fps,
    })?;

    let mut stats = RenderStats::default();
    let mut previous: Option<(DiagramView, FrameRGBA)> = None;
    for f in 0..=last {
        let idx = FrameIndex(f);
        let now = anchor + opts.fps.frame_time(idx);
        engine.advance(now);

        let view = DiagramView::build(engine, &layout, &opts.style, now);
        let frame = match previous.take() {
            Some((prev_view, prev_frame)) if prev_view == view => {
                stats.frames_reused += 1;
                prev_frame
            }
            _ => {
                stats.frames_rendered += 1;
                rasterizer.render(&diagram_svg(&view, &opts.style))?
            }
        };
        sink.push_frame(idx, &frame)?;
        stats.frames_total += 1;
        previous = Some((view, frame));
    }
    sink.end()?;

    tracing::info!(
        generation = engine.generation().0,
        frames = stats.frames_total,
        rendered = stats.frames_rendered,
        reused = stats.frames_reused,
        "run rendered"
    );
    Ok(stats)
}

#[cfg(test)]
#[path = "../../tests/unit/render/pipeline.rs"]
mod tests;
