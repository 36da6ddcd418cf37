use crate::foundation::core::{Canvas, Point};
use crate::foundation::error::{ScopeError, ScopeResult};

/// Intensity of an untouched cell.
pub const BACKGROUND: f32 = 0.0;
/// Intensity laid down by the brush.
pub const FOREGROUND: f32 = 1.0;

// Per-axis supersampling used to estimate disc coverage of a cell.
const COVERAGE_SAMPLES: u32 = 4;

/// Fixed-resolution intensity raster the user draws on.
///
/// Cells are row-major `f32` values in `[0, 1]`. The surface only changes through
/// [`DrawingSurface::stamp_disc`] and [`DrawingSurface::clear`]. Both bump
/// [`DrawingSurface::revision`] (stamps only when they alter a cell), which lets holders of an
/// exported payload detect that it no longer matches the drawing.
#[derive(Clone, Debug, PartialEq)]
pub struct DrawingSurface {
    size: Canvas,
    cells: Vec<f32>,
    revision: u64,
}

impl DrawingSurface {
    /// Create a surface filled with [`BACKGROUND`].
    pub fn new(size: Canvas) -> Self {
        Self {
            size,
            cells: vec![BACKGROUND; size.area()],
            revision: 0,
        }
    }

    /// Build a surface from 8-bit luminance values (row-major, `width * height` bytes).
    pub fn from_gray8(size: Canvas, gray: &[u8]) -> ScopeResult<Self> {
        if gray.len() != size.area() {
            return Err(ScopeError::validation(format!(
                "expected {} gray bytes for a {}x{} surface, got {}",
                size.area(),
                size.width,
                size.height,
                gray.len()
            )));
        }
        Ok(Self {
            size,
            cells: gray.iter().map(|&v| f32::from(v) / 255.0).collect(),
            revision: 0,
        })
    }

    /// Logical size in surface cells.
    pub fn size(&self) -> Canvas {
        self.size
    }

    /// Mutation counter.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Intensity at `(x, y)`, or `None` outside the surface.
    pub fn get(&self, x: u32, y: u32) -> Option<f32> {
        if x >= self.size.width || y >= self.size.height {
            return None;
        }
        self.cells
            .get((y as usize) * (self.size.width as usize) + (x as usize))
            .copied()
    }

    /// Row-major cell intensities.
    pub fn cells(&self) -> &[f32] {
        &self.cells
    }

    /// `true` when every cell is at [`BACKGROUND`].
    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(|&c| c == BACKGROUND)
    }

    /// Reset every cell to [`BACKGROUND`] and start a new revision.
    pub fn clear(&mut self) {
        self.cells.fill(BACKGROUND);
        self.revision += 1;
    }

    /// Stamp a filled disc centred at `center` (surface units; cell `(x, y)` spans
    /// `[x, x+1) x [y, y+1)`).
    ///
    /// Each touched cell keeps the maximum of its current value and `intensity` scaled by the
    /// fraction of the cell the disc covers, so overlapping stamps never darken a stroke.
    /// Parts of the disc outside the surface are clipped. Returns `true` if any cell changed.
    pub fn stamp_disc(&mut self, center: Point, radius: f64, intensity: f32) -> bool {
        if radius.is_nan() || radius <= 0.0 || !center.x.is_finite() || !center.y.is_finite() {
            return false;
        }
        let w = i64::from(self.size.width);
        let h = i64::from(self.size.height);
        let x0 = ((center.x - radius).floor() as i64).max(0);
        let x1 = ((center.x + radius).ceil() as i64).min(w);
        let y0 = ((center.y - radius).floor() as i64).max(0);
        let y1 = ((center.y + radius).ceil() as i64).min(h);

        let r2 = radius * radius;
        let step = 1.0 / f64::from(COVERAGE_SAMPLES);
        let total = f64::from(COVERAGE_SAMPLES * COVERAGE_SAMPLES);
        let mut changed = false;

        for y in y0..y1 {
            for x in x0..x1 {
                let mut hits = 0u32;
                for sy in 0..COVERAGE_SAMPLES {
                    for sx in 0..COVERAGE_SAMPLES {
                        let px = x as f64 + (f64::from(sx) + 0.5) * step - center.x;
                        let py = y as f64 + (f64::from(sy) + 0.5) * step - center.y;
                        if px * px + py * py <= r2 {
                            hits += 1;
                        }
                    }
                }
                if hits == 0 {
                    continue;
                }
                let value = intensity * (f64::from(hits) / total) as f32;
                let idx = (y as usize) * (self.size.width as usize) + (x as usize);
                if value > self.cells[idx] {
                    self.cells[idx] = value;
                    changed = true;
                }
            }
        }

        if changed {
            self.revision += 1;
        }
        changed
    }

    /// Quantize to 8-bit luminance, row-major.
    pub fn to_gray8(&self) -> Vec<u8> {
        self.cells
            .iter()
            .map(|&c| (c.clamp(0.0, 1.0) * 255.0).round() as u8)
            .collect()
    }

    /// Opaque gray RGBA8, the pixel layout a browser canvas would export.
    pub fn to_rgba8(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.cells.len() * 4);
        for v in self.to_gray8() {
            out.extend_from_slice(&[v, v, v, 255]);
        }
        out
    }
}

#[cfg(test)]
#[path = "../../tests/unit/sampler/surface.rs"]
mod tests;
