//! The discrete control alphabet shared by the environment, learners, and
//! the training loop.
//!
//! The numeric encoding is load-bearing: learner outputs, replay
//! transitions, and checkpoint files all identify actions by index, so the
//! order here is frozen.  `Forward=0, Right=1, Brake=2, Left=3`.

/// One discrete control decision per frame.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Action {
    /// Accelerate along the current heading.
    Forward,
    /// Rotate clockwise.
    Right,
    /// Decelerate (reverse thrust along the heading).
    Brake,
    /// Rotate counter-clockwise.
    Left,
}

impl Action {
    /// Number of actions — the width of a learner's output head.
    pub const COUNT: usize = 4;

    /// All actions in index order, for iteration and argmax loops.
    pub const ALL: [Action; Action::COUNT] =
        [Action::Forward, Action::Right, Action::Brake, Action::Left];

    /// Decode a raw action index.  Returns `None` for anything outside
    /// `0..COUNT` — the caller decides whether that is an error.
    #[inline]
    pub fn from_index(index: usize) -> Option<Action> {
        match index {
            0 => Some(Action::Forward),
            1 => Some(Action::Right),
            2 => Some(Action::Brake),
            3 => Some(Action::Left),
            _ => None,
        }
    }

    /// The frozen wire index of this action.
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Action::Forward => 0,
            Action::Right   => 1,
            Action::Brake   => 2,
            Action::Left    => 3,
        }
    }

    /// Human-readable label, useful for CSV column values and log lines.
    pub fn as_str(self) -> &'static str {
        match self {
            Action::Forward => "forward",
            Action::Right   => "right",
            Action::Brake   => "brake",
            Action::Left    => "left",
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
