//! Manual corrections to the accepted series.
//!
//! The review UI issues a small closed set of edit commands. Each command
//! mutates only the accepted series and is followed by a full interpolation
//! and smoothing recompute, so the hypothetical and display series never go
//! stale.

use crate::trial::TrialSeries;
use crate::{angle::normalize, Error, Result};
use log::info;
use std::ops::Range;

/// An edit command against one trial's accepted series.
///
/// Ranges are absolute frame indices, end-exclusive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Edit {
    /// Drop the accepted direction of every frame in the range
    Clear(Range<usize>),
    /// Rotate the accepted direction of every set frame in the range by 180 degrees
    Rotate180(Range<usize>),
    /// Commit every hypothetical estimate as an accepted direction, series-wide
    PromoteHypothesis,
}

/// Apply an edit and synchronously recompute the derived series.
///
/// `Clear` and `Rotate180` are idempotent; `Rotate180` is self-inverse, so
/// applying it twice restores the original directions. `PromoteHypothesis`
/// leaves no unset frame behind on a non-degenerate trial.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] when a range reaches outside the trial.
pub fn apply(series: &mut TrialSeries, edit: &Edit, smoothing_radius: usize) -> Result<()> {
    match edit {
        Edit::Clear(range) => {
            let (start, end) = positions(series, range)?;
            for sample in &mut series.samples_mut()[start..end] {
                sample.accepted = None;
            }
            info!("cleared frames {}..{}", range.start, range.end);
        }
        Edit::Rotate180(range) => {
            let (start, end) = positions(series, range)?;
            for sample in &mut series.samples_mut()[start..end] {
                if let Some(angle) = sample.accepted {
                    sample.accepted = Some(normalize(angle + 180.0));
                }
            }
            info!("rotated frames {}..{}", range.start, range.end);
        }
        Edit::PromoteHypothesis => {
            let mut promoted = 0usize;
            for sample in series.samples_mut() {
                if sample.accepted.is_none() && sample.hypothetical.is_some() {
                    sample.accepted = sample.hypothetical.take();
                    promoted += 1;
                }
            }
            info!("promoted {} hypothetical frames", promoted);
        }
    }
    series.recompute(smoothing_radius);
    Ok(())
}

/// Translate an absolute frame-index range into sample positions.
fn positions(series: &TrialSeries, range: &Range<usize>) -> Result<(usize, usize)> {
    if range.start > range.end {
        return Err(Error::InvalidInput(format!(
            "Edit range {}..{} is reversed",
            range.start, range.end
        )));
    }
    let last = series.base_index() + series.len();
    if range.start < series.base_index() || range.end > last {
        return Err(Error::InvalidInput(format!(
            "Edit range {}..{} outside trial frames {}..{}",
            range.start,
            range.end,
            series.base_index(),
            last
        )));
    }
    Ok((range.start - series.base_index(), range.end - series.base_index()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::disambiguation::Disambiguator;
    use crate::trial::Detection;

    fn detected(angles: &[Option<f64>]) -> TrialSeries {
        let detections = angles.iter().enumerate().map(|(i, &angle)| Detection {
            frame_index: i,
            angle,
        });
        let mut disambiguator = Disambiguator::default();
        TrialSeries::from_detections(angles.len(), detections, &mut disambiguator, 2)
    }

    #[test]
    fn test_clear_unsets_range() {
        let mut series = detected(&[Some(10.0), Some(12.0), Some(14.0), Some(16.0)]);
        apply(&mut series, &Edit::Clear(1..3), 2).unwrap();
        assert_eq!(series.get(0).and_then(|s| s.accepted), Some(10.0));
        assert_eq!(series.get(1).and_then(|s| s.accepted), None);
        assert_eq!(series.get(2).and_then(|s| s.accepted), None);
        // the recompute bridged the new gap
        assert!(series.get(1).and_then(|s| s.hypothetical).is_some());
    }

    #[test]
    fn test_rotate180_is_self_inverse() {
        let mut series = detected(&[Some(10.0), Some(12.0), Some(350.0)]);
        let before: Vec<_> = series.samples().iter().map(|s| s.accepted).collect();
        apply(&mut series, &Edit::Rotate180(0..3), 2).unwrap();
        assert_eq!(series.get(0).and_then(|s| s.accepted), Some(190.0));
        assert_eq!(series.get(2).and_then(|s| s.accepted), Some(170.0));
        apply(&mut series, &Edit::Rotate180(0..3), 2).unwrap();
        let after: Vec<_> = series.samples().iter().map(|s| s.accepted).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_rotate180_skips_unset_frames() {
        let mut series = detected(&[Some(10.0), None, Some(12.0)]);
        apply(&mut series, &Edit::Clear(1..2), 2).unwrap();
        apply(&mut series, &Edit::Rotate180(0..3), 2).unwrap();
        assert_eq!(series.get(1).and_then(|s| s.accepted), None);
    }

    #[test]
    fn test_promote_bakes_in_estimates() {
        let mut series = detected(&[Some(10.0), None, None, Some(40.0)]);
        apply(&mut series, &Edit::PromoteHypothesis, 2).unwrap();
        assert_eq!(series.accepted_count(), 4);
        assert_eq!(series.get(1).and_then(|s| s.accepted), Some(20.0));
        assert_eq!(series.get(2).and_then(|s| s.accepted), Some(30.0));
        // nothing left to interpolate
        assert!(series.samples().iter().all(|s| s.hypothetical.is_none()));
    }

    #[test]
    fn test_promote_on_degenerate_trial_is_a_no_op() {
        let mut series = TrialSeries::new(3);
        series.recompute(2);
        apply(&mut series, &Edit::PromoteHypothesis, 2).unwrap();
        assert!(series.is_degenerate());
    }

    #[test]
    fn test_out_of_range_edit_is_rejected() {
        let mut series = detected(&[Some(10.0), Some(12.0)]);
        let result = apply(&mut series, &Edit::Clear(0..5), 2);
        assert!(matches!(result, Err(Error::InvalidInput(_))));
        let result = apply(&mut series, &Edit::Rotate180(2..1), 2);
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_edit_respects_base_index() {
        let mut series = TrialSeries::with_base(1, 3);
        series.samples_mut()[0].accepted = Some(10.0);
        series.recompute(2);
        assert!(matches!(
            apply(&mut series, &Edit::Clear(0..1), 2),
            Err(Error::InvalidInput(_))
        ));
        apply(&mut series, &Edit::Clear(1..2), 2).unwrap();
        assert!(series.is_degenerate());
    }
}
