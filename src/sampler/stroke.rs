use crate::foundation::core::{Canvas, Point};
use crate::foundation::error::{ScopeError, ScopeResult};
use crate::sampler::payload::Payload;
use crate::sampler::surface::{DrawingSurface, FOREGROUND};

/// Options for a [`BitmapSampler`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SamplerOpts {
    /// Logical surface resolution (what gets exported).
    pub surface: Canvas,
    /// Size of the on-screen area pointer coordinates are expressed in.
    pub display_width: f64,
    /// See `display_width`.
    pub display_height: f64,
    /// Brush radius in surface units.
    pub brush_radius: f64,
}

impl Default for SamplerOpts {
    fn default() -> Self {
        Self {
            surface: Canvas {
                width: 28,
                height: 28,
            },
            display_width: 280.0,
            display_height: 280.0,
            brush_radius: 1.5,
        }
    }
}

/// Turns pointer gestures in display space into marks on a [`DrawingSurface`].
///
/// Pointer samples outside the display rectangle are ignored: they stamp nothing and break
/// interpolation, but do not end the stroke. Only [`BitmapSampler::end_stroke`] ends a
/// stroke, and it needs no coordinates, so a release anywhere terminates the gesture.
#[derive(Clone, Debug)]
pub struct BitmapSampler {
    opts: SamplerOpts,
    surface: DrawingSurface,
    drawing: bool,
    last: Option<Point>,
}

impl BitmapSampler {
    /// Create a sampler with a blank surface.
    pub fn new(opts: SamplerOpts) -> ScopeResult<Self> {
        if !positive(opts.display_width) || !positive(opts.display_height) {
            return Err(ScopeError::validation("display size must be positive"));
        }
        if !positive(opts.brush_radius) {
            return Err(ScopeError::validation("brush radius must be positive"));
        }
        let surface = Canvas::new(opts.surface.width, opts.surface.height)?;
        Ok(Self {
            opts,
            surface: DrawingSurface::new(surface),
            drawing: false,
            last: None,
        })
    }

    /// Sampler options.
    pub fn opts(&self) -> SamplerOpts {
        self.opts
    }

    /// Read-only view of the surface.
    pub fn surface(&self) -> &DrawingSurface {
        &self.surface
    }

    /// `true` between `begin_stroke` and `end_stroke`.
    pub fn is_drawing(&self) -> bool {
        self.drawing
    }

    /// Map a display-space point into surface space, per-axis.
    ///
    /// Returns `None` for points outside `[0, display_width] x [0, display_height]`.
    pub fn to_surface(&self, p: Point) -> Option<Point> {
        let o = &self.opts;
        let inside =
            (0.0..=o.display_width).contains(&p.x) && (0.0..=o.display_height).contains(&p.y);
        if !inside {
            return None;
        }
        Some(Point::new(
            p.x * f64::from(o.surface.width) / o.display_width,
            p.y * f64::from(o.surface.height) / o.display_height,
        ))
    }

    /// Pointer down: start a stroke and stamp at `p`.
    pub fn begin_stroke(&mut self, p: Point) {
        self.drawing = true;
        self.last = None;
        self.mark(p);
    }

    /// Pointer move: stamp along the segment from the previous sample. No-op when no stroke
    /// is active.
    pub fn extend_stroke(&mut self, p: Point) {
        if !self.drawing {
            return;
        }
        self.mark(p);
    }

    /// Pointer up, anywhere.
    pub fn end_stroke(&mut self) {
        self.drawing = false;
        self.last = None;
    }

    /// Reset the surface to background. Payloads exported before this call no longer match
    /// [`BitmapSampler::is_current`].
    pub fn clear(&mut self) {
        self.surface.clear();
        self.last = None;
    }

    /// Snapshot the surface as a transport payload.
    pub fn export_payload(&self) -> ScopeResult<Payload> {
        Payload::encode(&self.surface)
    }

    /// `true` if `payload` was exported from the current surface state.
    pub fn is_current(&self, payload: &Payload) -> bool {
        payload.source_revision() == Some(self.surface.revision())
    }

    /// Replace the surface (e.g. restoring a cached drawing). Sizes must match.
    pub fn load_surface(&mut self, surface: DrawingSurface) -> ScopeResult<()> {
        if surface.size() != self.opts.surface {
            return Err(ScopeError::validation(format!(
                "surface is {}x{}, sampler expects {}x{}",
                surface.size().width,
                surface.size().height,
                self.opts.surface.width,
                self.opts.surface.height
            )));
        }
        self.surface = surface;
        self.drawing = false;
        self.last = None;
        Ok(())
    }

    fn mark(&mut self, display: Point) {
        let Some(p) = self.to_surface(display) else {
            self.last = None;
            return;
        };
        let radius = self.opts.brush_radius;
        match self.last {
            Some(prev) => {
                // Spacing of radius/2 keeps consecutive discs overlapping on fast gestures.
                let dist = prev.distance(p);
                let steps = (dist / (radius * 0.5)).ceil().max(1.0) as u32;
                for k in 1..=steps {
                    let t = f64::from(k) / f64::from(steps);
                    self.surface.stamp_disc(prev.lerp(p, t), radius, FOREGROUND);
                }
            }
            None => {
                self.surface.stamp_disc(p, radius, FOREGROUND);
            }
        }
        self.last = Some(p);
    }
}

/// A recorded gesture: strokes of display-space points, as stored in `*.strokes.json` files.
///
/// ```json
/// { "strokes": [[[100, 40], [120, 200]], [[60, 120], [200, 120]]] }
/// ```
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct StrokeScript {
    /// Each stroke is one press-move-release gesture.
    pub strokes: Vec<Vec<[f64; 2]>>,
}

impl StrokeScript {
    /// Parse a JSON script.
    pub fn from_json_str(s: &str) -> ScopeResult<Self> {
        serde_json::from_str(s).map_err(|e| ScopeError::serde(format!("stroke script: {e}")))
    }

    /// Replay every stroke on `sampler`. Empty strokes are skipped.
    pub fn replay(&self, sampler: &mut BitmapSampler) {
        for stroke in &self.strokes {
            let Some((first, rest)) = stroke.split_first() else {
                continue;
            };
            sampler.begin_stroke(Point::new(first[0], first[1]));
            for p in rest {
                sampler.extend_stroke(Point::new(p[0], p[1]));
            }
            sampler.end_stroke();
        }
    }
}

fn positive(v: f64) -> bool {
    v.is_finite() && v > 0.0
}

#[cfg(test)]
#[path = "../../tests/unit/sampler/stroke.rs"]
mod tests;
