use std::sync::Arc;

use anyhow::Context;

use crate::foundation::core::Canvas;
use crate::foundation::error::{ScopeError, ScopeResult};
use crate::sampler::payload::encode_png_rgba8;

/// A rendered frame as straight-alpha RGBA8 pixels.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
}

impl FrameRGBA {
    /// Pixel at `(x, y)`, if inside the frame.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        let px = self.data.get(i..i + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }

    /// Encode as PNG.
    pub fn to_png(&self) -> ScopeResult<Vec<u8>> {
        encode_png_rgba8(&self.data, Canvas::new(self.width, self.height)?)
    }
}

/// Turns diagram SVG documents into pixels.
///
/// Holds one font database for the caption text, shared by every render.
#[derive(Clone)]
pub struct SvgRasterizer {
    fontdb: Arc<usvg::fontdb::Database>,
}

impl SvgRasterizer {
    /// Rasterizer with system fonts loaded.
    pub fn new() -> Self {
        let mut db = usvg::fontdb::Database::new();
        db.load_system_fonts();
        tracing::debug!(faces = db.faces().count(), "loaded system fonts");
        Self {
            fontdb: Arc::new(db),
        }
    }

    /// Rasterizer without any fonts; text nodes are dropped.
    pub fn without_fonts() -> Self {
        Self {
            fontdb: Arc::new(usvg::fontdb::Database::new()),
        }
    }

    /// Number of loaded font faces.
    pub fn font_faces(&self) -> usize {
        self.fontdb.faces().count()
    }

    /// Parse and render `svg` at its intrinsic size.
    pub fn render(&self, svg: &str) -> ScopeResult<FrameRGBA> {
        let opts = usvg::Options {
            fontdb: self.fontdb.clone(),
            ..Default::default()
        };
        let tree = usvg::Tree::from_str(svg, &opts).context("parse diagram svg")?;
        let size = tree.size().to_int_size();

        let mut pixmap = resvg::tiny_skia::Pixmap::new(size.width(), size.height())
            .ok_or_else(|| ScopeError::render("failed to allocate diagram pixmap"))?;
        resvg::render(
            &tree,
            resvg::tiny_skia::Transform::identity(),
            &mut pixmap.as_mut(),
        );

        let mut data = Vec::with_capacity(pixmap.data().len());
        for px in pixmap.pixels() {
            let c = px.demultiply();
            data.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
        }
        Ok(FrameRGBA {
            width: pixmap.width(),
            height: pixmap.height(),
            data,
        })
    }
}

impl std::fmt::Debug for SvgRasterizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SvgRasterizer")
            .field("font_faces", &self.font_faces())
            .finish()
    }
}

impl Default for SvgRasterizer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/raster.rs"]
mod tests;
