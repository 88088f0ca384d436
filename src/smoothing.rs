//! Discontinuity-aware windowed smoothing.
//!
//! The display series is a windowed average of the effective series
//! (accepted where present, else hypothetical). Averaging across a 0/360
//! wraparound would drag values toward the middle of the range, so each
//! window is scanned for an abrupt jump between adjacent values and the
//! side of the window beyond the jump is excluded before averaging.

use crate::constants::DISCONTINUITY_THRESHOLD_DEG;
use crate::trial::FrameSample;

/// Compute the display value for every frame.
///
/// For each frame the window covers the `radius` preceding and following
/// frames plus the frame itself, with out-of-range positions undefined. The
/// discontinuity test compares raw adjacent values, not circular distance;
/// values are already in `[0, 360)`, so a raw difference above 180 can only
/// be a wraparound jump. Frames whose whole window is undefined (a trial
/// with no accepted data at all) get no display value.
///
/// # Panics
///
/// Panics if `radius` is zero.
pub fn smooth(samples: &mut [FrameSample], radius: usize) {
    assert!(radius > 0, "Smoothing radius must be greater than 0");

    let len = samples.len() as isize;
    let width = 2 * radius + 1;
    // a jump at or before this window position discards the head, after it the tail
    let center_cut = (width as f64 / 2.0).ceil() as usize;

    let mut window: Vec<Option<f64>> = Vec::with_capacity(width);
    for center in 0..samples.len() {
        window.clear();
        for offset in -(radius as isize)..=(radius as isize) {
            let pos = center as isize + offset;
            if (0..len).contains(&pos) {
                window.push(samples[pos as usize].effective());
            } else {
                window.push(None);
            }
        }

        // exclude values across an abrupt wraparound jump; the scan continues
        // over the already-erased window, so later jumps still apply
        for i in 1..window.len() {
            if let (Some(prev), Some(cur)) = (window[i - 1], window[i]) {
                if (prev - cur).abs() > DISCONTINUITY_THRESHOLD_DEG {
                    if i < center_cut {
                        for slot in &mut window[..i] {
                            *slot = None;
                        }
                    } else {
                        for slot in &mut window[i..] {
                            *slot = None;
                        }
                    }
                }
            }
        }

        let mut sum = 0.0;
        let mut count = 0usize;
        for value in window.iter().flatten() {
            sum += value;
            count += 1;
        }
        samples[center].display = if count == 0 {
            None
        } else {
            Some((sum / count as f64).floor())
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(effective: &[Option<f64>]) -> Vec<FrameSample> {
        effective
            .iter()
            .enumerate()
            .map(|(index, &accepted)| FrameSample {
                index,
                accepted,
                hypothetical: None,
                display: None,
            })
            .collect()
    }

    fn displays(samples: &[FrameSample]) -> Vec<Option<f64>> {
        samples.iter().map(|s| s.display).collect()
    }

    #[test]
    fn test_constant_series_is_unchanged() {
        let mut samples = series(&[Some(90.0); 30]);
        smooth(&mut samples, 10);
        assert!(samples.iter().all(|s| s.display == Some(90.0)));
    }

    #[test]
    fn test_short_window_at_edges() {
        let mut samples = series(&[Some(0.0), Some(10.0), Some(20.0)]);
        smooth(&mut samples, 10);
        // every window holds the whole series
        assert_eq!(displays(&samples), vec![Some(10.0), Some(10.0), Some(10.0)]);
    }

    #[test]
    fn test_mean_is_floored() {
        let mut samples = series(&[Some(0.0), Some(1.0)]);
        smooth(&mut samples, 1);
        // both windows average to 0.5
        assert_eq!(displays(&samples), vec![Some(0.0), Some(0.0)]);
    }

    #[test]
    fn test_jump_after_center_discards_tail() {
        // 21-frame window centered at frame 10; values climb to 352 then
        // wrap to small angles between positions 12 and 13
        let values: Vec<Option<f64>> = (0..21)
            .map(|i| if i <= 12 { Some(340.0 + i as f64) } else { Some(2.0) })
            .collect();
        let mut samples = series(&values);
        smooth(&mut samples, 10);
        // at center 10 the jump (352 -> 2) falls after the center: only the
        // 13 values at/before the jump are averaged
        let expected: f64 = (0..=12).map(|i| 340.0 + i as f64).sum::<f64>() / 13.0;
        assert_eq!(samples[10].display, Some(expected.floor()));
    }

    #[test]
    fn test_jump_before_center_discards_head() {
        // values sit near 355 then wrap down to 5 early in the window
        let mut values = vec![Some(355.0); 3];
        values.extend(vec![Some(5.0); 18]);
        let mut samples = series(&values);
        smooth(&mut samples, 10);
        // at center 10 the jump is at window position 3, before the center:
        // the three 355s are discarded
        assert_eq!(samples[10].display, Some(5.0));
    }

    #[test]
    fn test_degenerate_window_yields_none() {
        let mut samples = series(&[None, None, None]);
        smooth(&mut samples, 10);
        assert_eq!(displays(&samples), vec![None, None, None]);
    }

    #[test]
    fn test_single_defined_value() {
        let mut samples = series(&[None, Some(123.0), None]);
        smooth(&mut samples, 1);
        assert_eq!(
            displays(&samples),
            vec![Some(123.0), Some(123.0), Some(123.0)]
        );
    }

    #[test]
    #[should_panic(expected = "Smoothing radius must be greater than 0")]
    fn test_zero_radius() {
        let mut samples = series(&[Some(0.0)]);
        smooth(&mut samples, 0);
    }
}
