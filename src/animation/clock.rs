/// Stage progress of one animation run.
///
/// The stage is `None` before anything is revealed (the `-1` stage) and `Some(i)` once layers
/// `0..=i` are revealed. Within a run it only moves forward; [`AnimationClock::reset`] is the
/// only way back.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AnimationClock {
    stage: Option<usize>,
    caption_visible: bool,
}

impl AnimationClock {
    /// Clock with nothing revealed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Back to nothing revealed, caption hidden.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Highest revealed layer, if any.
    pub fn stage(&self) -> Option<usize> {
        self.stage
    }

    /// Stage as a signed index, `-1` meaning nothing revealed.
    pub fn stage_index(&self) -> i64 {
        self.stage.map_or(-1, |s| s as i64)
    }

    /// `true` once the final caption may be shown.
    pub fn caption_visible(&self) -> bool {
        self.caption_visible
    }

    /// `true` when `layer` has been revealed (`stage >= layer`).
    pub fn is_revealed(&self, layer: usize) -> bool {
        self.stage.is_some_and(|s| s >= layer)
    }

    /// Reveal up to `stage`. Returns `false` (and changes nothing) if that would not move the
    /// clock forward.
    pub fn reveal(&mut self, stage: usize) -> bool {
        if self.stage >= Some(stage) {
            return false;
        }
        self.stage = Some(stage);
        true
    }

    /// Set the caption flag. Returns `false` if it was already set.
    pub fn show_caption(&mut self) -> bool {
        !std::mem::replace(&mut self.caption_visible, true)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/clock.rs"]
mod tests;
