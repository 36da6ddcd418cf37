use std::time::Duration;

use crate::foundation::error::{ScopeError, ScopeResult};

pub use kurbo::{Point, Rect, Vec2};

/// Absolute 0-based frame index in a rendered run.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub u64);

/// Frames-per-second represented as a rational `num/den`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Fps {
    /// Numerator (frames).
    pub num: u32,
    /// Denominator (seconds), must be non-zero.
    pub den: u32,
}

impl Fps {
    /// Create a validated FPS value.
    pub fn new(num: u32, den: u32) -> ScopeResult<Self> {
        if den == 0 {
            return Err(ScopeError::validation("Fps den must be > 0"));
        }
        if num == 0 {
            return Err(ScopeError::validation("Fps num must be > 0"));
        }
        Ok(Self { num, den })
    }

    /// Convert to floating-point FPS.
    pub fn as_f64(self) -> f64 {
        f64::from(self.num) / f64::from(self.den)
    }

    /// Timeline offset of frame `f` relative to the start of the run.
    pub fn frame_time(self, f: FrameIndex) -> Duration {
        // Integer math keeps frame instants exact for rational rates like 30000/1001.
        let nanos = u128::from(f.0) * u128::from(self.den) * 1_000_000_000 / u128::from(self.num);
        Duration::from_nanos(u64::try_from(nanos).unwrap_or(u64::MAX))
    }

    /// Number of frames needed to cover `span`, rounding up.
    pub fn frames_covering(self, span: Duration) -> u64 {
        let num = span.as_nanos() * u128::from(self.num);
        let den = u128::from(self.den) * 1_000_000_000;
        u64::try_from(num.div_ceil(den)).unwrap_or(u64::MAX)
    }
}

/// Pixel dimensions of a raster target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Canvas {
    /// Create a validated, non-empty canvas.
    pub fn new(width: u32, height: u32) -> ScopeResult<Self> {
        if width == 0 || height == 0 {
            return Err(ScopeError::validation(format!(
                "canvas must be non-empty, got {width}x{height}"
            )));
        }
        Ok(Self { width, height })
    }

    /// Number of cells (`width * height`).
    pub fn area(self) -> usize {
        (self.width as usize) * (self.height as usize)
    }
}

/// Straight-alpha RGBA8 color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgba8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Rgba8 {
    /// Opaque color from a `0xRRGGBB` literal.
    pub const fn from_rgb_hex(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xff) as u8,
            g: ((hex >> 8) & 0xff) as u8,
            b: (hex & 0xff) as u8,
            a: 255,
        }
    }

    /// Channel-wise linear interpolation, `t` clamped to `[0, 1]`.
    pub fn lerp(self, other: Self, t: f64) -> Self {
        fn lerp_u8(a: u8, b: u8, t: f64) -> u8 {
            let a = f64::from(a);
            let b = f64::from(b);
            (a + (b - a) * t).round().clamp(0.0, 255.0) as u8
        }

        let t = t.clamp(0.0, 1.0);
        Self {
            r: lerp_u8(self.r, other.r, t),
            g: lerp_u8(self.g, other.g, t),
            b: lerp_u8(self.b, other.b, t),
            a: lerp_u8(self.a, other.a, t),
        }
    }

    /// `#rrggbb` form for SVG paint attributes (alpha is emitted separately).
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
