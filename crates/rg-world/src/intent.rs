//! Control intents — the one thing an agent may request per frame.

/// A queued control input, consumed by the next `advance()`.
///
/// Exactly one intent applies per frame.  Queueing a second before the
/// advance replaces the first (last write wins); the environment's step
/// protocol only ever applies one.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum ControlIntent {
    /// Add to the signed scalar speed, units/frame².  Positive = thrust
    /// along the heading, negative = braking/reverse thrust.
    Accelerate(f32),
    /// Turn the heading by this many radians.  The velocity turns with it.
    Rotate(f32),
}
