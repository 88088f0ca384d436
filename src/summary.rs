//! Subject-level trial summaries.
//!
//! The downstream analysis compares each trial's head movement and head-turn
//! behavior before and after the stimulus onset. This module derives those
//! figures from a trial's display series, plus the stimulus-name
//! classification used to group trials.

use crate::constants::{HEAD_TURN_THRESHOLD_DEG, MOVEMENT_WRAP_THRESHOLD_DEG};
use crate::trial::TrialSeries;
use std::fmt;

/// Behavioral summary of one trial around the stimulus onset.
#[derive(Debug, Clone, PartialEq)]
pub struct TrialSummary {
    /// Sum of frame-to-frame direction changes before onset, in degrees
    pub movement_before: f64,
    /// Sum of frame-to-frame direction changes from onset on, in degrees
    pub movement_after: f64,
    /// Whether any pre-onset frame points past 180 degrees
    pub head_turn_before: bool,
    /// Whether any post-onset frame points past 180 degrees
    pub head_turn_after: bool,
    /// First post-onset frame index counting toward a head turn
    pub head_turn_index: Option<usize>,
    /// Number of post-onset frames counting toward a head turn
    pub head_turn_duration: usize,
}

/// Summarize a trial's display series around `onset_frame` (absolute index).
///
/// Frames without a display value (a degenerate trial, or one not yet
/// smoothed) contribute nothing; a fully undefined trial yields zero
/// movement and no head turn.
#[must_use]
pub fn summarize(series: &TrialSeries, onset_frame: usize) -> TrialSummary {
    let mut before = Vec::new();
    let mut after = Vec::new();
    for sample in series.samples() {
        if let Some(angle) = sample.display {
            if sample.index < onset_frame {
                before.push((sample.index, angle));
            } else {
                after.push((sample.index, angle));
            }
        }
    }

    let turned = |angle: f64| angle > HEAD_TURN_THRESHOLD_DEG;
    let head_turn_index = after.iter().find(|&&(_, a)| turned(a)).map(|&(i, _)| i);
    let head_turn_duration = after.iter().filter(|&&(_, a)| turned(a)).count();

    TrialSummary {
        movement_before: movement(&before),
        movement_after: movement(&after),
        head_turn_before: before.iter().any(|&(_, a)| turned(a)),
        head_turn_after: head_turn_index.is_some(),
        head_turn_index,
        head_turn_duration,
    }
}

/// Sum of consecutive frame-to-frame changes with the wraparound correction.
///
/// A turn through 0/360 shows up as a near-full-circle difference (e.g.
/// 5 -> 355 reads as 350); differences above 270 are folded to `360 - d`.
fn movement(angles: &[(usize, f64)]) -> f64 {
    angles
        .windows(2)
        .map(|pair| {
            let d = (pair[1].1 - pair[0].1).abs();
            if d > MOVEMENT_WRAP_THRESHOLD_DEG {
                360.0 - d
            } else {
                d
            }
        })
        .sum()
}

/// The four stimulus families of the experiment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StimulusClass {
    /// Same element count as the habituated pattern
    Repetition,
    /// Pattern extended by extra middle elements
    Extension,
    /// Pattern missing its first element
    MissingFirst,
    /// Pattern missing its last element
    MissingLast,
}

impl StimulusClass {
    /// Classify a stimulus name such as `ABBA_1`.
    #[must_use]
    pub fn classify(stimulus: &str) -> Option<Self> {
        match stimulus {
            "ABA_1" | "ABBA_1" | "ABBBBA_1" | "ABBBBA_2" => Some(Self::Repetition),
            "ABBBA_1" | "ABBBA_2" | "ABBBBBA_1" | "ABBBBBA_2" => Some(Self::Extension),
            "BA_1" | "BBA_1" | "BBBA_1" | "BBBBA_1" => Some(Self::MissingFirst),
            "AB_1" | "ABB_1" | "ABBB_1" | "ABBBB_1" => Some(Self::MissingLast),
            _ => None,
        }
    }
}

impl fmt::Display for StimulusClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Repetition => "repetition",
            Self::Extension => "extension",
            Self::MissingFirst => "missing_first",
            Self::MissingLast => "missing_last",
        };
        write!(f, "{name}")
    }
}
