//! Two-fold orientation disambiguation.
//!
//! A bilaterally symmetric marker pair yields a line direction, not an
//! oriented direction: every raw reading could equally be its 180-degree
//! opposite. The disambiguator resolves each per-frame candidate against a
//! one-slot rolling history of the last accepted direction, rejecting
//! candidates that are too far from the history in both orientations.

use crate::angle::{antipode, circular_distance, normalize};
use crate::constants::{DEFAULT_AMBIGUITY_THRESHOLD_DEG, DEFAULT_GAP_RESET_FRAMES};
use log::debug;

/// Rolling history of the disambiguator.
///
/// `Empty` means no usable recent direction; the next candidate seeds the
/// history unconditionally. The state is an explicit value (not a global) so
/// independent trials can be processed in parallel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DisambiguationState {
    /// No recent accepted direction
    Empty,
    /// Last accepted direction and the frame it was accepted at
    Active {
        /// The most recently accepted direction
        last_angle: f64,
        /// Frame index of the most recent acceptance
        last_frame: usize,
    },
}

/// Resolves raw two-fold candidates into single accepted directions.
pub struct Disambiguator {
    gap_reset: usize,
    ambiguity_threshold: f64,
    state: DisambiguationState,
}

impl Disambiguator {
    /// Create a disambiguator with explicit parameters.
    ///
    /// # Panics
    ///
    /// Panics if `gap_reset` is zero or `ambiguity_threshold` is outside `(0, 180]`.
    #[must_use]
    pub fn new(gap_reset: usize, ambiguity_threshold: f64) -> Self {
        assert!(gap_reset > 0, "Gap reset must be greater than 0");
        assert!(
            ambiguity_threshold > 0.0 && ambiguity_threshold <= 180.0,
            "Ambiguity threshold must be in (0, 180], got {}",
            ambiguity_threshold
        );
        Self {
            gap_reset,
            ambiguity_threshold,
            state: DisambiguationState::Empty,
        }
    }

    /// Current rolling history.
    #[must_use]
    pub fn state(&self) -> DisambiguationState {
        self.state
    }

    /// Forget the rolling history.
    pub fn reset(&mut self) {
        self.state = DisambiguationState::Empty;
    }

    /// Resolve one candidate reading, in increasing frame-index order.
    ///
    /// Returns the accepted direction, or `None` when the candidate is too
    /// ambiguous relative to the history (the frame stays unset and the
    /// history is unchanged). A candidate arriving more than `gap_reset`
    /// frames after the last acceptance clears the history first, so it
    /// seeds a fresh run.
    pub fn observe(&mut self, frame_index: usize, candidate: f64) -> Option<f64> {
        let candidate = normalize(candidate);

        if let DisambiguationState::Active { last_frame, .. } = self.state {
            if frame_index.saturating_sub(last_frame) > self.gap_reset {
                debug!(
                    "history expired at frame {} (last acceptance at {})",
                    frame_index, last_frame
                );
                self.state = DisambiguationState::Empty;
            }
        }

        match self.state {
            DisambiguationState::Empty => {
                self.state = DisambiguationState::Active {
                    last_angle: candidate,
                    last_frame: frame_index,
                };
                Some(candidate)
            }
            DisambiguationState::Active { last_angle, .. } => {
                let alt = antipode(candidate);
                let d1 = circular_distance(last_angle, candidate);
                let d2 = circular_distance(last_angle, alt);
                if d1.min(d2) >= self.ambiguity_threshold {
                    debug!(
                        "rejected frame {}: candidate {} too far from history {} (d1={}, d2={})",
                        frame_index, candidate, last_angle, d1, d2
                    );
                    return None;
                }
                let accepted = if d2 < d1 { alt } else { candidate };
                self.state = DisambiguationState::Active {
                    last_angle: accepted,
                    last_frame: frame_index,
                };
                Some(accepted)
            }
        }
    }
}

impl Default for Disambiguator {
    fn default() -> Self {
        Self::new(DEFAULT_GAP_RESET_FRAMES, DEFAULT_AMBIGUITY_THRESHOLD_DEG)
    }
}
