//! The panel's "spin" action.
//!
//! A spin adds [`SPIN_ANGLE`] radians to the cloud's Y rotation, easing in
//! over [`SPIN_DURATION`] seconds after a [`SPIN_DELAY`] second pause. Spins are
//! stored as tweens keyed to the elapsed time they were triggered at, so the
//! offset is a pure function of time and overlapping spins simply add up.

use std::f32::consts::PI;

/// Extra rotation per spin.
pub const SPIN_ANGLE: f32 = PI * 1.25;
/// Seconds between trigger and motion.
pub const SPIN_DELAY: f32 = 0.5;
/// Seconds the motion lasts.
pub const SPIN_DURATION: f32 = 1.0;

/// Quadratic ease-out on `[0, 1]`.
#[inline]
pub fn ease_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t) * (1.0 - t)
}

/// One delayed, eased rotation increment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tween {
    pub triggered_at: f32,
    pub delay: f32,
    pub duration: f32,
    pub amount: f32,
}

impl Tween {
    pub fn spin(triggered_at: f32) -> Self {
        Self {
            triggered_at,
            delay: SPIN_DELAY,
            duration: SPIN_DURATION,
            amount: SPIN_ANGLE,
        }
    }

    /// Progress in `[0, 1]` at elapsed time `t`.
    pub fn progress(&self, t: f32) -> f32 {
        let local = t - self.triggered_at - self.delay;
        if local <= 0.0 {
            0.0
        } else if self.duration <= 0.0 || local >= self.duration {
            1.0
        } else {
            local / self.duration
        }
    }

    pub fn value_at(&self, t: f32) -> f32 {
        self.amount * ease_out(self.progress(t))
    }

    pub fn is_finished(&self, t: f32) -> bool {
        self.progress(t) >= 1.0
    }
}

/// Accumulated spin offsets.
#[derive(Debug, Clone, Default)]
pub struct SpinAnimator {
    /// Sum of tweens that have finished and been folded in.
    settled: f32,
    active: Vec<Tween>,
}

impl SpinAnimator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a spin starting from elapsed time `now`.
    pub fn trigger(&mut self, now: f32) {
        self.active.push(Tween::spin(now));
    }

    /// Rotation offset at elapsed time `t`.
    pub fn offset_at(&self, t: f32) -> f32 {
        self.settled + self.active.iter().map(|tween| tween.value_at(t)).sum::<f32>()
    }

    /// Fold finished tweens into the settled offset.
    ///
    /// Only call with the latest elapsed time; afterwards `offset_at` for
    /// earlier times no longer reflects the folded tweens' ramps.
    pub fn settle(&mut self, t: f32) {
        let mut finished = 0.0;
        self.active.retain(|tween| {
            if tween.is_finished(t) {
                finished += tween.amount;
                false
            } else {
                true
            }
        });
        self.settled += finished;
    }

    /// Number of spins still in motion or waiting on their delay.
    pub fn active(&self) -> usize {
        self.active.len()
    }
}
