//! Exploration schedule.

use serde::{Deserialize, Serialize};

/// Multiplicative epsilon decay with an exact floor.
///
/// [`decay`](Self::decay) clamps with `max`, so a schedule that has bottomed
/// out satisfies `epsilon() == floor()` *exactly* and drivers can test for
/// it with plain equality.  The training loop's re-exploration kick keys off
/// [`at_floor`](Self::at_floor).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpsilonGreedy {
    epsilon: f32,
    floor:   f32,
    decay:   f32,
}

impl EpsilonGreedy {
    pub fn new(epsilon: f32, floor: f32, decay: f32) -> Self {
        EpsilonGreedy { epsilon, floor, decay }
    }

    #[inline]
    pub fn epsilon(&self) -> f32 {
        self.epsilon
    }

    #[inline]
    pub fn floor(&self) -> f32 {
        self.floor
    }

    /// Overwrite the current rate, e.g. to kick exploration back up.
    pub fn set(&mut self, epsilon: f32) {
        self.epsilon = epsilon;
    }

    /// One multiplicative step, clamped exactly to the floor.
    pub fn decay(&mut self) {
        self.epsilon = (self.epsilon * self.decay).max(self.floor);
    }

    /// True when the schedule sits exactly at its floor.
    pub fn at_floor(&self) -> bool {
        self.epsilon == self.floor
    }
}
