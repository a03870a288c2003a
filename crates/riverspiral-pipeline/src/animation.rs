//! Animation step counter.
//!
//! The driver owns one [`AnimationState`] and passes it by reference to
//! every frame computation, advancing it after the frame is drawn.

use serde::{Deserialize, Serialize};

use crate::aggregate::ContinentGroups;

/// Arc-length units revealed so far.
///
/// Starts at 0 and only grows. There is no upper clamp: once the step
/// passes every continent's total the spirals are simply complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnimationState {
    current_step: u64,
    step_increment: u64,
}

impl AnimationState {
    /// Steps added per rendered frame by default.
    pub const DEFAULT_STEP_INCREMENT: u64 = 10;

    /// Start at step 0 with the given per-frame increment.
    #[must_use]
    pub const fn new(step_increment: u64) -> Self {
        Self {
            current_step: 0,
            step_increment,
        }
    }

    /// Steps revealed so far.
    #[must_use]
    pub const fn current_step(&self) -> u64 {
        self.current_step
    }

    /// Steps added by [`advance`](Self::advance).
    #[must_use]
    pub const fn step_increment(&self) -> u64 {
        self.step_increment
    }

    /// Advance by one frame's increment.
    pub const fn advance(&mut self) {
        self.advance_by(self.step_increment);
    }

    /// Advance by an explicit number of steps.
    pub const fn advance_by(&mut self, steps: u64) {
        self.current_step = self.current_step.saturating_add(steps);
    }

    /// Returns `true` once every spiral in `groups` is fully drawn.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn is_complete(&self, groups: &ContinentGroups) -> bool {
        self.current_step as f64 >= groups.max_total_length()
    }
}

impl Default for AnimationState {
    fn default() -> Self {
        Self::new(Self::DEFAULT_STEP_INCREMENT)
    }
}
