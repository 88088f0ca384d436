//! Gap interpolation over the accepted series.
//!
//! Every maximal run of unset frames gets a hypothetical estimate: a flat
//! carry from the single bounding neighbor at the series edges, or a linear
//! bridge between the bounding accepted values elsewhere. A bridge whose raw
//! difference exceeds 180 degrees is assumed to wrap near 0/360 and steps
//! through the wraparound instead of sweeping the long way.

use crate::angle::normalize;
use crate::trial::FrameSample;

/// Fill the hypothetical series for every unset frame, in one O(N) pass.
///
/// Accepted frames are never touched. Previously computed hypotheticals are
/// cleared first, so frames that have since gained an accepted value carry no
/// stale estimate and repeated passes are idempotent. A series with no
/// accepted frame at all is left entirely unset.
pub fn fill_gaps(samples: &mut [FrameSample]) {
    for sample in samples.iter_mut() {
        sample.hypothetical = None;
    }

    let len = samples.len();
    let mut i = 0;
    while i < len {
        if samples[i].accepted.is_some() {
            i += 1;
            continue;
        }

        // maximal unset run [run_start, run_end)
        let run_start = i;
        let mut run_end = i;
        while run_end < len && samples[run_end].accepted.is_none() {
            run_end += 1;
        }

        let prev = run_start
            .checked_sub(1)
            .and_then(|p| samples[p].accepted.map(|v| (p, v)));
        let next = if run_end < len {
            samples[run_end].accepted.map(|v| (run_end, v))
        } else {
            None
        };

        match (prev, next) {
            (None, Some((_, next_value))) => {
                // run starts the series: flat carry-backward
                for sample in &mut samples[run_start..run_end] {
                    sample.hypothetical = Some(next_value);
                }
            }
            (Some((_, prev_value)), None) => {
                // run ends the series: flat carry-forward
                for sample in &mut samples[run_start..run_end] {
                    sample.hypothetical = Some(prev_value);
                }
            }
            (Some((prev_index, prev_value)), Some((next_index, next_value))) => {
                let frame_span = (next_index - prev_index) as f64;
                let diff = next_value - prev_value;
                let increment = if diff.abs() <= 180.0 {
                    diff / frame_span
                } else {
                    // short path wraps through 0/360: step via the wraparound,
                    // opposite in sign to the raw difference
                    let min_delta = prev_value.min(360.0 - prev_value) + next_value.min(360.0 - next_value);
                    if diff > 0.0 {
                        -min_delta / frame_span
                    } else {
                        min_delta / frame_span
                    }
                };
                for pos in run_start..run_end {
                    let steps = (pos - prev_index) as f64;
                    samples[pos].hypothetical = Some(normalize(prev_value + (steps * increment).floor()));
                }
            }
            (None, None) => {} // whole series unset: no fill possible
        }

        i = run_end;
    }
}
