use std::path::Path;
use std::time::Duration;

use anyhow::Context;

use crate::animation::engine::{DEFAULT_EDGES_PER_LAYER, EngineOpts};
use crate::animation::sampling::{EntropySource, RandomSource, Rng64};
use crate::animation::timeline::StageTiming;
use crate::client::EndpointOpts;
use crate::foundation::core::{Canvas, Fps};
use crate::foundation::error::{ScopeError, ScopeResult};
use crate::network::layout::LayoutOpts;
use crate::network::topology::{DEFAULT_DISPLAY_CAP, NetworkTopology};
use crate::render::pipeline::RunRenderOpts;
use crate::render::view::DiagramStyle;
use crate::sampler::stroke::SamplerOpts;

/// Drawing surface settings.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SurfaceConfig {
    /// Logical surface width in cells.
    pub width: u32,
    /// Logical surface height in cells.
    pub height: u32,
    /// On-screen width pointer coordinates refer to.
    pub display_width: f64,
    /// On-screen height pointer coordinates refer to.
    pub display_height: f64,
    /// Brush radius in cells.
    pub brush_radius: f64,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        let d = SamplerOpts::default();
        Self {
            width: d.surface.width,
            height: d.surface.height,
            display_width: d.display_width,
            display_height: d.display_height,
            brush_radius: d.brush_radius,
        }
    }
}

/// Animation timing and sampling.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    /// Delay between layer reveals.
    pub stage_interval_ms: u64,
    /// Delay between the last reveal slot and completion.
    pub settle_ms: u64,
    /// Highlighted edges per hidden layer.
    pub edges_per_layer: usize,
    /// Fixed seed for edge sampling; `None` draws from OS entropy.
    pub seed: Option<u64>,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            stage_interval_ms: 700,
            settle_ms: 500,
            edges_per_layer: DEFAULT_EDGES_PER_LAYER,
            seed: None,
        }
    }
}

/// Shape of the visualized network.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TopologyConfig {
    /// Node count per layer, input first; the last entry is the class count.
    pub layers: Vec<u32>,
    /// Most nodes drawn per layer.
    pub display_cap: u32,
}

impl Default for TopologyConfig {
    fn default() -> Self {
        Self {
            layers: vec![25, 20, 20, 10],
            display_cap: DEFAULT_DISPLAY_CAP,
        }
    }
}

/// Offline frame rendering.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Frames per second numerator.
    pub fps_num: u32,
    /// Frames per second denominator.
    pub fps_den: u32,
    /// Time rendered after completion.
    pub tail_ms: u64,
    /// Diagram geometry.
    pub layout: LayoutOpts,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            fps_num: 30,
            fps_den: 1,
            tail_ms: 200,
            layout: LayoutOpts::default(),
        }
    }
}

/// Everything configurable, loaded from one JSON document. Every field has a default, so `{}`
/// is a valid configuration.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Classifier service.
    pub endpoint: EndpointOpts,
    /// Drawing surface.
    pub surface: SurfaceConfig,
    /// Animation engine.
    pub animation: AnimationConfig,
    /// Network shape.
    pub topology: TopologyConfig,
    /// Frame rendering.
    pub render: RenderConfig,
}

impl AppConfig {
    /// Parse a JSON document.
    pub fn from_json_str(s: &str) -> ScopeResult<Self> {
        let cfg: Self = serde_json::from_str(s).map_err(|e| ScopeError::serde(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read and parse `path`.
    pub fn from_path(path: &Path) -> ScopeResult<Self> {
        let s = std::fs::read_to_string(path)
            .with_context(|| format!("read config '{}'", path.display()))?;
        Self::from_json_str(&s)
    }

    /// Check every section; the first problem is reported.
    pub fn validate(&self) -> ScopeResult<()> {
        self.endpoint.validate()?;
        self.sampler_opts()?;
        self.topology()?;
        self.fps()?;
        self.engine_opts().validate()
    }

    /// Sampler options.
    pub fn sampler_opts(&self) -> ScopeResult<SamplerOpts> {
        let s = &self.surface;
        let opts = SamplerOpts {
            surface: Canvas::new(s.width, s.height)?,
            display_width: s.display_width,
            display_height: s.display_height,
            brush_radius: s.brush_radius,
        };
        if !(opts.display_width.is_finite() && opts.display_height.is_finite())
            || opts.display_width <= 0.0
            || opts.display_height <= 0.0
        {
            return Err(ScopeError::validation("surface display size must be positive"));
        }
        if !opts.brush_radius.is_finite() || opts.brush_radius <= 0.0 {
            return Err(ScopeError::validation("surface brush_radius must be positive"));
        }
        Ok(opts)
    }

    /// Engine options.
    pub fn engine_opts(&self) -> EngineOpts {
        EngineOpts {
            timing: StageTiming {
                interval: Duration::from_millis(self.animation.stage_interval_ms),
                settle: Duration::from_millis(self.animation.settle_ms),
            },
            edges_per_layer: self.animation.edges_per_layer,
        }
    }

    /// Network topology.
    pub fn topology(&self) -> ScopeResult<NetworkTopology> {
        NetworkTopology::from_sizes(&self.topology.layers, self.topology.display_cap)
    }

    /// Output frame rate.
    pub fn fps(&self) -> ScopeResult<Fps> {
        Fps::new(self.render.fps_num, self.render.fps_den)
    }

    /// Options for [`crate::render_run`].
    pub fn run_render_opts(&self) -> ScopeResult<RunRenderOpts> {
        Ok(RunRenderOpts {
            fps: self.fps()?,
            engine: self.engine_opts(),
            layout: self.render.layout,
            style: DiagramStyle::default(),
            tail: Duration::from_millis(self.render.tail_ms),
        })
    }

    /// Random source for edge sampling: seeded when a seed is configured.
    pub fn random_source(&self) -> Box<dyn RandomSource + Send> {
        match self.animation.seed {
            Some(seed) => Box::new(Rng64::new(seed)),
            None => Box::new(EntropySource::new()),
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/config/config.rs"]
mod tests;
