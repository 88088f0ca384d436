//! Edge case tests for trial boundaries and degenerate data

use head_direction::disambiguation::Disambiguator;
use head_direction::summary::summarize;
use head_direction::trial::{Detection, TrialSeries};

#[test]
fn test_degenerate_trial_has_no_estimates() {
    // the detector never finds the head
    let detections = (0..50).map(|frame_index| Detection {
        frame_index,
        angle: None,
    });
    let mut disambiguator = Disambiguator::default();
    let series = TrialSeries::from_detections(50, detections, &mut disambiguator, 10);

    assert!(series.is_degenerate());
    for sample in series.samples() {
        assert_eq!(sample.accepted, None);
        assert_eq!(sample.hypothetical, None);
        assert_eq!(sample.display, None);
    }
    // the summary degrades to "nothing happened" rather than failing
    let summary = summarize(&series, 25);
    assert_eq!(summary.movement_after, 0.0);
    assert!(!summary.head_turn_after);
}

#[test]
fn test_single_frame_trial() {
    let detections = [Detection {
        frame_index: 0,
        angle: Some(270.0),
    }];
    let mut disambiguator = Disambiguator::default();
    let series = TrialSeries::from_detections(1, detections, &mut disambiguator, 10);

    assert_eq!(series.len(), 1);
    assert_eq!(series.get(0).and_then(|s| s.accepted), Some(270.0));
    assert_eq!(series.get(0).and_then(|s| s.display), Some(270.0));
}

#[test]
fn test_single_detection_fills_whole_trial() {
    // one detection mid-trial carries flat in both directions
    let detections = [Detection {
        frame_index: 20,
        angle: Some(123.0),
    }];
    let mut disambiguator = Disambiguator::default();
    let series = TrialSeries::from_detections(41, detections, &mut disambiguator, 10);

    for sample in series.samples() {
        assert_eq!(sample.effective(), Some(123.0), "frame {}", sample.index);
        assert_eq!(sample.display, Some(123.0), "frame {}", sample.index);
    }
}

#[test]
fn test_rejected_frames_stay_unset_but_get_estimates() {
    // a stretch of orthogonal readings the disambiguator must reject
    let mut detections = Vec::new();
    for frame_index in 0..10 {
        detections.push(Detection {
            frame_index,
            angle: Some(0.0),
        });
    }
    for frame_index in 10..15 {
        detections.push(Detection {
            frame_index,
            angle: Some(90.0), // both 90 and 270 are 90 degrees away
        });
    }
    for frame_index in 15..25 {
        detections.push(Detection {
            frame_index,
            angle: Some(2.0),
        });
    }
    let mut disambiguator = Disambiguator::default();
    let series = TrialSeries::from_detections(25, detections, &mut disambiguator, 10);

    for frame_index in 10..15 {
        assert_eq!(series.get(frame_index).and_then(|s| s.accepted), None);
        assert!(series.get(frame_index).and_then(|s| s.hypothetical).is_some());
    }
    assert_eq!(series.get(16).and_then(|s| s.accepted), Some(2.0));
}

#[test]
fn test_base_one_trial_addressing() {
    let mut series = TrialSeries::with_base(1, 10);
    let mut disambiguator = Disambiguator::default();
    for frame_index in 1..=10 {
        series.ingest(
            &Detection {
                frame_index,
                angle: Some(45.0),
            },
            &mut disambiguator,
        );
    }
    series.recompute(10);

    assert!(series.get(0).is_none());
    assert_eq!(series.get(1).and_then(|s| s.display), Some(45.0));
    assert_eq!(series.get(10).and_then(|s| s.display), Some(45.0));
    assert!(series.get(11).is_none());
}

#[test]
fn test_all_frames_at_the_seam() {
    // readings alternate tightly around 0/360; the accepted series hops
    // across the seam but the display must stay near it
    let detections: Vec<Detection> = (0..60)
        .map(|frame_index| Detection {
            frame_index,
            angle: Some(if frame_index % 2 == 0 { 358.0 } else { 2.0 }),
        })
        .collect();
    let mut disambiguator = Disambiguator::default();
    let series = TrialSeries::from_detections(60, detections, &mut disambiguator, 10);

    for sample in series.samples() {
        let display = sample.display.unwrap();
        assert!(
            display >= 300.0 || display <= 60.0,
            "frame {} drifted to {}",
            sample.index,
            display
        );
    }
}
