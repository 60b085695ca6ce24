//! Simulated-frame counter.
//!
//! # Design
//!
//! Time is represented as a monotonically increasing `Frame` counter.  One
//! frame is one call to the world's `advance()` and maps to one environment
//! step (plus the single priming/reset frames the environment runs itself).
//! There is no wall-clock mapping: training runs as fast as the hardware
//! allows, and all cadence arithmetic (train every K1 steps, sync every K2)
//! is exact integer math on counters.

use std::fmt;

/// An absolute simulated-frame counter.
///
/// Stored as `u64` to avoid overflow: at a million frames per second a u64
/// lasts ~585,000 years, far beyond any conceivable run.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Frame(pub u64);

impl Frame {
    pub const ZERO: Frame = Frame(0);

    /// Return the frame `n` steps after `self`.
    #[inline]
    pub fn offset(self, n: u64) -> Frame {
        Frame(self.0 + n)
    }

    /// Frames elapsed from `earlier` to `self`.
    ///
    /// # Panics
    /// Panics in debug mode if `earlier > self`.
    #[inline]
    pub fn since(self, earlier: Frame) -> u64 {
        self.0 - earlier.0
    }
}

impl std::ops::Add<u64> for Frame {
    type Output = Frame;
    #[inline]
    fn add(self, rhs: u64) -> Frame {
        Frame(self.0 + rhs)
    }
}

impl std::ops::Sub for Frame {
    type Output = u64;
    #[inline]
    fn sub(self, rhs: Frame) -> u64 {
        self.0 - rhs.0
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "F{}", self.0)
    }
}
