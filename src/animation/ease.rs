use std::time::Duration;

/// Easing functions used to map normalized transition progress.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Ease {
    /// Linear interpolation.
    Linear,
    /// Quadratic ease-in.
    InQuad,
    /// Quadratic ease-out.
    OutQuad,
    /// Quadratic ease-in/out.
    InOutQuad,
    /// Cubic ease-in.
    InCubic,
    /// Cubic ease-out.
    OutCubic,
    /// Cubic ease-in/out.
    InOutCubic,
}

impl Ease {
    /// Apply this easing function to normalized progress `t` in `[0, 1]`.
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::InQuad => t * t,
            Self::OutQuad => 1.0 - (1.0 - t) * (1.0 - t),
            Self::InOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - ((-2.0 * t + 2.0).powi(2) / 2.0)
                }
            }
            Self::InCubic => t * t * t,
            Self::OutCubic => 1.0 - (1.0 - t).powi(3),
            Self::InOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - ((-2.0 * t + 2.0).powi(3) / 2.0)
                }
            }
        }
    }
}

/// A fixed-length eased transition that starts at some anchor instant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Transition {
    /// Time from start to fully settled.
    pub duration: Duration,
    /// Curve applied to linear progress.
    pub ease: Ease,
}

impl Transition {
    /// Build a transition of `millis` milliseconds.
    pub const fn millis(millis: u64, ease: Ease) -> Self {
        Self {
            duration: Duration::from_millis(millis),
            ease,
        }
    }

    /// Eased progress in `[0, 1]` after `elapsed` time. Zero-length transitions jump to 1.
    pub fn progress(self, elapsed: Duration) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        self.ease
            .apply(elapsed.as_secs_f64() / self.duration.as_secs_f64())
    }

    /// Progress at `now` for a transition started at `started` (`0` if not started yet).
    pub fn progress_since(self, started: Option<Duration>, now: Duration) -> f64 {
        match started {
            Some(start) if now >= start => self.progress(now - start),
            _ => 0.0,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/ease.rs"]
mod tests;
