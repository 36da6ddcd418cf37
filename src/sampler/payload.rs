use anyhow::Context as _;
use base64::Engine as _;
use image::ImageEncoder as _;

use crate::foundation::core::Canvas;
use crate::foundation::error::{ScopeError, ScopeResult};
use crate::sampler::surface::DrawingSurface;

/// Prefix of every payload; matches what a browser canvas produces for `image/png`.
pub const DATA_URL_PREFIX: &str = "data:image/png;base64,";

/// Transportable snapshot of a drawing: a base64 PNG data URL.
///
/// Encoding is a pure function of the surface cells, so two surfaces with equal cells always
/// produce byte-identical payloads. Equality compares the encoding only.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct Payload {
    data_url: String,
    #[serde(skip)]
    source_revision: Option<u64>,
}

impl Payload {
    /// Encode `surface` as an opaque RGBA8 PNG.
    pub fn encode(surface: &DrawingSurface) -> ScopeResult<Self> {
        let size = surface.size();
        let png = encode_png_rgba8(&surface.to_rgba8(), size)?;
        Ok(Self {
            data_url: format!(
                "{DATA_URL_PREFIX}{}",
                base64::engine::general_purpose::STANDARD.encode(png)
            ),
            source_revision: Some(surface.revision()),
        })
    }

    /// Wrap an existing data URL (e.g. from the cache) after checking its shape.
    pub fn from_data_url(data_url: impl Into<String>) -> ScopeResult<Self> {
        let data_url = data_url.into();
        let payload = Self {
            data_url,
            source_revision: None,
        };
        payload.png_bytes()?;
        Ok(payload)
    }

    /// Wrap raw PNG file bytes.
    pub fn from_png_bytes(png: &[u8]) -> ScopeResult<Self> {
        image::load_from_memory_with_format(png, image::ImageFormat::Png)
            .context("decode png payload")?;
        Ok(Self {
            data_url: format!(
                "{DATA_URL_PREFIX}{}",
                base64::engine::general_purpose::STANDARD.encode(png)
            ),
            source_revision: None,
        })
    }

    /// The `data:image/png;base64,...` string sent over the wire.
    pub fn as_str(&self) -> &str {
        &self.data_url
    }

    /// Surface revision this payload was taken from, if it came from a live surface.
    pub fn source_revision(&self) -> Option<u64> {
        self.source_revision
    }

    /// Decoded PNG bytes.
    pub fn png_bytes(&self) -> ScopeResult<Vec<u8>> {
        let b64 = self.data_url.strip_prefix(DATA_URL_PREFIX).ok_or_else(|| {
            ScopeError::validation("payload is not a data:image/png;base64 URL")
        })?;
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(b64)
            .map_err(|e| ScopeError::validation(format!("payload base64 is invalid: {e}")))?;
        Ok(bytes)
    }

    /// Rebuild a surface from the payload's luminance.
    pub fn decode_surface(&self) -> ScopeResult<DrawingSurface> {
        let bytes = self.png_bytes()?;
        let img = image::load_from_memory_with_format(&bytes, image::ImageFormat::Png)
            .context("decode png payload")?;
        let gray = img.to_luma8();
        let size = Canvas::new(gray.width(), gray.height())?;
        DrawingSurface::from_gray8(size, gray.as_raw())
    }
}

impl PartialEq for Payload {
    fn eq(&self, other: &Self) -> bool {
        self.data_url == other.data_url
    }
}

impl Eq for Payload {}

pub(crate) fn encode_png_rgba8(rgba: &[u8], size: Canvas) -> ScopeResult<Vec<u8>> {
    let mut out = Vec::new();
    image::codecs::png::PngEncoder::new(&mut out)
        .write_image(rgba, size.width, size.height, image::ExtendedColorType::Rgba8)
        .context("encode png")?;
    Ok(out)
}

/// Nearest-neighbor upscale of the surface to `display`, so logical cells stay visibly square.
pub fn render_preview(surface: &DrawingSurface, display: Canvas) -> ScopeResult<image::RgbaImage> {
    let size = surface.size();
    let src = image::RgbaImage::from_raw(size.width, size.height, surface.to_rgba8())
        .ok_or_else(|| ScopeError::render("surface buffer does not match its size"))?;
    Ok(image::imageops::resize(
        &src,
        display.width,
        display.height,
        image::imageops::FilterType::Nearest,
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/sampler/payload.rs"]
mod tests;
