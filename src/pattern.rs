//! Pattern evaluation: output level as a pure function of elapsed time.

use crate::time::TimeDuration;
use crate::types::{Pattern, PatternKind, Repeat};

/// Full output level.
pub const LEVEL_ON: f32 = 1.0;

/// Zero output level.
pub const LEVEL_OFF: f32 = 0.0;

impl<D: TimeDuration> Pattern<D> {
    /// Calculates the output level at a given elapsed time since the pattern started.
    ///
    /// `fade_from` is the level the channel showed when the pattern was issued;
    /// only [`PatternKind::FadeOff`] uses it.
    ///
    /// # Returns
    /// A tuple of `(level, next_service)`:
    /// * `next_service == Some(ZERO)` - level is changing continuously
    /// * `next_service == Some(d)` - level holds for `d`
    /// * `next_service == None` - pattern has settled and will not change again
    pub fn evaluate(&self, elapsed: D, fade_from: f32) -> (f32, Option<D>) {
        match self.kind {
            PatternKind::Off => (LEVEL_OFF, None),
            PatternKind::On => (LEVEL_ON, None),
            PatternKind::FadeOff => {
                let duration = self.on.as_millis();
                let elapsed = elapsed.as_millis();
                if elapsed >= duration {
                    return (LEVEL_OFF, None);
                }
                let progress = elapsed as f32 / duration as f32;
                (fade_from.clamp(0.0, 1.0) * (1.0 - progress), Some(D::ZERO))
            }
            PatternKind::Blink | PatternKind::Breathe => self.evaluate_cycle(elapsed),
        }
    }

    fn evaluate_cycle(&self, elapsed: D) -> (f32, Option<D>) {
        let cycle = self.cycle_millis();
        if cycle == 0 {
            return (LEVEL_OFF, None);
        }

        let elapsed = elapsed.as_millis();
        if let Repeat::Times(count) = self.repeat {
            if elapsed >= cycle.saturating_mul(count as u64) {
                return (LEVEL_OFF, None);
            }
        }

        let on = self.on.as_millis();
        let off = self.off.as_millis();
        let t = elapsed % cycle;

        match self.kind {
            PatternKind::Blink => {
                if t < on {
                    (LEVEL_ON, Some(D::from_millis(on - t)))
                } else {
                    (LEVEL_OFF, Some(D::from_millis(cycle - t)))
                }
            }
            _ => {
                if t < on {
                    let progress = t as f32 / on as f32;
                    (ease_in_out(progress), Some(D::ZERO))
                } else {
                    let progress = (t - on) as f32 / off as f32;
                    (1.0 - ease_in_out(progress), Some(D::ZERO))
                }
            }
        }
    }
}

/// Quadratic ease-in-out on `[0, 1]`.
#[inline]
fn ease_in_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        2.0 * t * t
    } else {
        let u = -2.0 * t + 2.0;
        1.0 - u * u / 2.0
    }
}
