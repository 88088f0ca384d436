//! Constants used throughout the library

/// Frames without an accepted direction before the disambiguation history resets
pub const DEFAULT_GAP_RESET_FRAMES: usize = 10;

/// Minimum circular distance (degrees) at which a candidate is rejected as ambiguous
pub const DEFAULT_AMBIGUITY_THRESHOLD_DEG: f64 = 45.0;

/// Smoothing window radius (window covers up to 2 * radius + 1 frames)
pub const DEFAULT_SMOOTHING_RADIUS: usize = 10;

/// Default number of frames in one trial video
pub const DEFAULT_FRAME_COUNT: usize = 1000;

/// Frame at which the sound stimulus is played (half of the default trial)
pub const DEFAULT_STIMULUS_ONSET_FRAME: usize = 500;

/// Sentinel written to CSV for frames without an accepted direction
pub const UNSET_SENTINEL: i64 = -1;

/// Raw adjacent difference above which the smoother treats a jump as a wraparound discontinuity
pub const DISCONTINUITY_THRESHOLD_DEG: f64 = 180.0;

/// Frame-to-frame difference above which movement sums apply the 360 - d wrap correction
pub const MOVEMENT_WRAP_THRESHOLD_DEG: f64 = 270.0;

/// Display angle above which a frame counts toward a head turn
pub const HEAD_TURN_THRESHOLD_DEG: f64 = 180.0;
