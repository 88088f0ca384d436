//! Head direction time-series processing for animal head-turning trials.
//!
//! This library turns noisy, partially-missing per-frame head-direction
//! readings from trial videos into a clean, analysis-ready series:
//! 1. Disambiguation of the two-fold readings a symmetric marker pair yields
//! 2. Gap interpolation across undetected frames, aware of the 0/360 wraparound
//! 3. Windowed smoothing that excludes values across wraparound jumps
//! 4. Manual edit commands (clear, rotate, promote) with synchronous recompute
//!
//! Video decoding, marker detection, and GUI display are external concerns;
//! the crate consumes detector output (in memory or from its persisted CSV
//! form) and produces the revised series the downstream analysis reads.
//!
//! # Examples
//!
//! ## Processing a detection stream
//!
//! ```
//! use head_direction::disambiguation::Disambiguator;
//! use head_direction::trial::{Detection, TrialSeries};
//!
//! let detections = (0..100).map(|frame_index| Detection {
//!     frame_index,
//!     // every fourth frame goes undetected
//!     angle: (frame_index % 4 != 0).then(|| (frame_index as f64 * 1.5) % 360.0),
//! });
//!
//! let mut disambiguator = Disambiguator::default();
//! let series = TrialSeries::from_detections(100, detections, &mut disambiguator, 10);
//!
//! // every frame now carries a display value for analysis
//! assert!(series.samples().iter().all(|s| s.display.is_some()));
//! ```
//!
//! ## Revising a trial
//!
//! ```
//! use head_direction::disambiguation::Disambiguator;
//! use head_direction::revision::{self, Edit};
//! use head_direction::trial::{Detection, TrialSeries};
//!
//! # fn main() -> head_direction::Result<()> {
//! let detections = (0..20).map(|frame_index| Detection {
//!     frame_index,
//!     angle: Some(90.0),
//! });
//! let mut disambiguator = Disambiguator::default();
//! let mut series = TrialSeries::from_detections(20, detections, &mut disambiguator, 10);
//!
//! // drop a misdetected stretch, then bake the interpolated estimates in
//! revision::apply(&mut series, &Edit::Clear(5..10), 10)?;
//! revision::apply(&mut series, &Edit::PromoteHypothesis, 10)?;
//! assert_eq!(series.accepted_count(), 20);
//! # Ok(())
//! # }
//! ```

/// Circular angle primitives (normalization, circular distance)
pub mod angle;

/// Two-fold orientation disambiguation with rolling history
pub mod disambiguation;

/// Gap interpolation over the accepted series
pub mod interpolation;

/// Discontinuity-aware windowed smoothing
pub mod smoothing;

/// Per-trial data model and processing pipeline
pub mod trial;

/// Manual edit commands and recompute control
pub mod revision;

/// Subject-level trial summaries
pub mod summary;

/// Persisted CSV forms
pub mod storage;

/// Batch revision application
pub mod app;

/// Error types and result handling
pub mod error;

/// Constants used throughout the library
pub mod constants;

/// Configuration management
pub mod config;

pub use error::{Error, Result};
