//! Per-trial data model and processing pipeline.
//!
//! A [`TrialSeries`] holds one dense, fixed-length sequence of per-frame
//! samples for a single stimulus trial. Detections stream in through a
//! [`Disambiguator`](crate::disambiguation::Disambiguator) to build the
//! accepted series; [`TrialSeries::recompute`] then derives the hypothetical
//! and display series in full passes. No state is shared across trials.

use crate::disambiguation::Disambiguator;
use crate::{interpolation, smoothing};
use log::debug;

/// One video frame's worth of direction data.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameSample {
    /// Absolute frame index within the trial
    pub index: usize,
    /// Direction committed by the disambiguator or a manual edit
    pub accepted: Option<f64>,
    /// Interpolated estimate, only present where `accepted` is unset
    pub hypothetical: Option<f64>,
    /// Smoothed value used for analysis and display
    pub display: Option<f64>,
}

impl FrameSample {
    fn unset(index: usize) -> Self {
        Self {
            index,
            accepted: None,
            hypothetical: None,
            display: None,
        }
    }

    /// The accepted direction if present, else the hypothetical estimate.
    #[must_use]
    pub fn effective(&self) -> Option<f64> {
        self.accepted.or(self.hypothetical)
    }
}

/// One frame of detector output: a raw candidate direction, or an explicit
/// no-detection marker (`angle == None`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Detection {
    /// Absolute frame index the reading belongs to
    pub frame_index: usize,
    /// Raw candidate direction (two-fold ambiguous), if anything was detected
    pub angle: Option<f64>,
}

/// Dense, fixed-length series of [`FrameSample`]s for one trial.
#[derive(Debug, Clone, PartialEq)]
pub struct TrialSeries {
    base_index: usize,
    samples: Vec<FrameSample>,
}

impl TrialSeries {
    /// Create an all-unset series of `frame_count` frames starting at index 0.
    #[must_use]
    pub fn new(frame_count: usize) -> Self {
        Self::with_base(0, frame_count)
    }

    /// Create an all-unset series with an explicit base frame index (0 or 1).
    ///
    /// # Panics
    ///
    /// Panics if `frame_count` is zero or `base_index` is greater than 1.
    #[must_use]
    pub fn with_base(base_index: usize, frame_count: usize) -> Self {
        assert!(frame_count > 0, "Frame count must be greater than 0");
        assert!(base_index <= 1, "Base index must be 0 or 1, got {}", base_index);
        let samples = (0..frame_count)
            .map(|i| FrameSample::unset(base_index + i))
            .collect();
        Self { base_index, samples }
    }

    /// Build a series by streaming detections through a disambiguator and
    /// running the interpolation and smoothing passes.
    ///
    /// Detections must arrive in increasing frame-index order; readings for
    /// frames outside the series are ignored.
    pub fn from_detections<I>(
        frame_count: usize,
        detections: I,
        disambiguator: &mut Disambiguator,
        smoothing_radius: usize,
    ) -> Self
    where
        I: IntoIterator<Item = Detection>,
    {
        let mut series = Self::new(frame_count);
        for detection in detections {
            series.ingest(&detection, disambiguator);
        }
        series.recompute(smoothing_radius);
        series
    }

    /// Feed a single detection through the disambiguator into this series.
    pub fn ingest(&mut self, detection: &Detection, disambiguator: &mut Disambiguator) {
        let Detection { frame_index, angle } = *detection;
        let Some(candidate) = angle else {
            return; // explicit no-detection: frame stays unset
        };
        let Some(pos) = self.position(frame_index) else {
            debug!("ignoring detection at out-of-range frame {}", frame_index);
            return;
        };
        self.samples[pos].accepted = disambiguator.observe(frame_index, candidate);
    }

    /// Re-derive the hypothetical and display series from the accepted series.
    ///
    /// Must be called after ingest completes and after any edit.
    pub fn recompute(&mut self, smoothing_radius: usize) {
        interpolation::fill_gaps(&mut self.samples);
        smoothing::smooth(&mut self.samples, smoothing_radius);
    }

    /// Number of frames in the trial.
    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether the trial has no frames (never true for a constructed series).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// First frame index of the trial (0 or 1).
    #[must_use]
    pub fn base_index(&self) -> usize {
        self.base_index
    }

    /// All samples, in frame order.
    #[must_use]
    pub fn samples(&self) -> &[FrameSample] {
        &self.samples
    }

    pub(crate) fn samples_mut(&mut self) -> &mut [FrameSample] {
        &mut self.samples
    }

    /// Sample at an absolute frame index.
    #[must_use]
    pub fn get(&self, frame_index: usize) -> Option<&FrameSample> {
        self.position(frame_index).map(|pos| &self.samples[pos])
    }

    /// Accepted-or-hypothetical value at an absolute frame index.
    #[must_use]
    pub fn effective(&self, frame_index: usize) -> Option<f64> {
        self.get(frame_index).and_then(FrameSample::effective)
    }

    /// Number of frames with an accepted direction.
    #[must_use]
    pub fn accepted_count(&self) -> usize {
        self.samples.iter().filter(|s| s.accepted.is_some()).count()
    }

    /// True when no frame has an accepted direction, so no estimate exists.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.accepted_count() == 0
    }

    /// Position of an absolute frame index within the sample vector.
    pub(crate) fn position(&self, frame_index: usize) -> Option<usize> {
        frame_index
            .checked_sub(self.base_index)
            .filter(|&pos| pos < self.samples.len())
    }
}
