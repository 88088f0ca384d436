//! Persisted trial-series forms.
//!
//! Two line-oriented CSV forms exist. The video-analysis stage writes a
//! sparse *detector output* carrying per-frame marker geometry; the revision
//! stage reads and writes a dense *reduced* two-column form with `-1` for
//! unset frames. Malformed lines are skipped with a warning, never fatal.

use crate::angle::normalize;
use crate::constants::UNSET_SENTINEL;
use crate::summary::{StimulusClass, TrialSummary};
use crate::trial::{Detection, TrialSeries};
use crate::{Error, Result};
use log::warn;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// Header of the reduced two-column form.
const REDUCED_HEADER: &str = "Frame-index, Direction";

/// Which persisted form a CSV file carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CsvFormat {
    /// Sparse per-frame records with marker geometry, from the detector
    DetectorOutput,
    /// Dense `frame, direction` rows with `-1` for unset frames
    Reduced,
}

/// One row of detector output. The geometry fields are opaque to the
/// processing core; only `frame_index` and `direction` feed the pipeline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectorRecord {
    /// Absolute frame index
    pub frame_index: usize,
    /// Bounding corners of the two ear rectangles
    pub ear_rect: [i32; 4],
    /// Raw candidate direction from the marker pair
    pub direction: f64,
    /// Start point of the drawn direction line
    pub line_start: (i32, i32),
    /// End point of the drawn direction line
    pub line_end: (i32, i32),
}

impl DetectorRecord {
    /// The detection this record contributes to the pipeline.
    #[must_use]
    pub fn detection(&self) -> Detection {
        Detection {
            frame_index: self.frame_index,
            angle: Some(self.direction),
        }
    }
}

/// Determine which form a CSV file carries from its header line.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] when no header line is found.
pub fn sniff_format<P: AsRef<Path>>(path: P) -> Result<CsvFormat> {
    let path = path.as_ref();
    let reader = BufReader::new(File::open(path)?);
    for line in reader.lines() {
        let line = line?;
        let line = line.trim();
        if line.starts_with("Frame-") {
            if line.contains("Ear-rect") {
                return Ok(CsvFormat::DetectorOutput);
            }
            return Ok(CsvFormat::Reduced);
        }
    }
    Err(Error::InvalidInput(format!(
        "No header line in {}",
        path.display()
    )))
}

/// Load sparse detector output, skipping malformed lines.
///
/// # Errors
///
/// Returns [`Error::Io`] when the file cannot be read.
pub fn load_detector_output<P: AsRef<Path>>(path: P) -> Result<Vec<DetectorRecord>> {
    let path = path.as_ref();
    let reader = BufReader::new(File::open(path)?);
    let mut records = Vec::new();
    for (line_no, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with("Frame-") {
            continue;
        }
        match parse_detector_line(trimmed) {
            Some(record) => records.push(record),
            None => warn!(
                "skipping malformed record at {}:{}: {}",
                path.display(),
                line_no + 1,
                trimmed
            ),
        }
    }
    Ok(records)
}

/// Load a dense reduced-form trial series.
///
/// The base frame index is taken from the first data row. Malformed lines
/// are skipped; missing rows simply leave their frame unset.
///
/// # Errors
///
/// Returns [`Error::Io`] when the file cannot be read,
/// [`Error::InvalidInput`] when it holds no data rows or starts past frame 1.
pub fn load_trial<P: AsRef<Path>>(path: P) -> Result<TrialSeries> {
    let path = path.as_ref();
    let reader = BufReader::new(File::open(path)?);
    let mut rows: Vec<(usize, Option<f64>)> = Vec::new();
    for (line_no, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with("Frame-") {
            continue;
        }
        match parse_reduced_line(trimmed) {
            Some(row) => rows.push(row),
            None => warn!(
                "skipping malformed record at {}:{}: {}",
                path.display(),
                line_no + 1,
                trimmed
            ),
        }
    }

    let first = rows
        .iter()
        .map(|&(index, _)| index)
        .min()
        .ok_or_else(|| Error::InvalidInput(format!("No data rows in {}", path.display())))?;
    if first > 1 {
        return Err(Error::InvalidInput(format!(
            "Trial in {} starts at frame {}, expected 0 or 1",
            path.display(),
            first
        )));
    }
    let last = rows.iter().map(|&(index, _)| index).max().unwrap_or(first);

    let mut series = TrialSeries::with_base(first, last - first + 1);
    for (index, direction) in rows {
        if let Some(pos) = series.position(index) {
            series.samples_mut()[pos].accepted = direction;
        }
    }
    Ok(series)
}

/// Save a trial series in the reduced two-column form.
///
/// # Errors
///
/// Returns [`Error::Io`] when the file cannot be written.
pub fn save_trial<P: AsRef<Path>>(series: &TrialSeries, path: P) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    writeln!(writer, "{REDUCED_HEADER}")?;
    for sample in series.samples() {
        let direction = sample
            .accepted
            .map_or(UNSET_SENTINEL, |angle| angle as i64);
        writeln!(writer, "{}, {}", sample.index, direction)?;
    }
    writer.flush()?;
    Ok(())
}

/// One exported summary row for a subject's trial.
#[derive(Debug, Clone)]
pub struct SummaryRow {
    /// Experimental group of the subject
    pub group: String,
    /// Test/session label
    pub test: String,
    /// Stimulus name, e.g. `ABBA_1`
    pub stimulus: String,
    /// Stimulus family, when the name is recognized
    pub stimulus_class: Option<StimulusClass>,
    /// The trial's behavioral summary
    pub summary: TrialSummary,
}

/// Export one subject's trial summaries as CSV.
///
/// # Errors
///
/// Returns [`Error::Io`] when the file cannot be written.
pub fn save_subject_summary<P: AsRef<Path>>(path: P, rows: &[SummaryRow]) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    writeln!(
        writer,
        "Group, Test, Stimulus, StimType, Mov_B, Mov_A, H_turn_B, H_turn_A, H_turn_idx, H_turn_dur"
    )?;
    for row in rows {
        let stim_type = row
            .stimulus_class
            .map_or_else(|| "unknown".to_string(), |c| c.to_string());
        let turn_index = row
            .summary
            .head_turn_index
            .map_or(UNSET_SENTINEL, |index| index as i64);
        writeln!(
            writer,
            "{}, {}, {}, {}, {}, {}, {}, {}, {}, {}",
            row.group,
            row.test,
            row.stimulus,
            stim_type,
            row.summary.movement_before,
            row.summary.movement_after,
            row.summary.head_turn_before,
            row.summary.head_turn_after,
            turn_index,
            row.summary.head_turn_duration
        )?;
    }
    writer.flush()?;
    Ok(())
}

fn parse_reduced_line(line: &str) -> Option<(usize, Option<f64>)> {
    let mut fields = line.split(',').map(str::trim);
    let index: usize = fields.next()?.parse().ok()?;
    let value: f64 = fields.next()?.parse().ok()?;
    let direction = if value < 0.0 { None } else { Some(normalize(value)) };
    Some((index, direction))
}

fn parse_detector_line(line: &str) -> Option<DetectorRecord> {
    let fields: Vec<&str> = line.split(',').map(str::trim).collect();
    if fields.len() != 5 {
        return None;
    }
    let frame_index: usize = fields[0].parse().ok()?;
    let rect: Vec<i32> = fields[1]
        .split('/')
        .map(|v| v.trim().parse().ok())
        .collect::<Option<Vec<i32>>>()?;
    let ear_rect: [i32; 4] = rect.try_into().ok()?;
    let direction: f64 = fields[2].parse().ok()?;
    let line_start = parse_point(fields[3])?;
    let line_end = parse_point(fields[4])?;
    Some(DetectorRecord {
        frame_index,
        ear_rect,
        direction: normalize(direction),
        line_start,
        line_end,
    })
}

fn parse_point(field: &str) -> Option<(i32, i32)> {
    let mut parts = field.split('/').map(str::trim);
    let x: i32 = parts.next()?.parse().ok()?;
    let y: i32 = parts.next()?.parse().ok()?;
    Some((x, y))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::fs;
    use std::path::PathBuf;

    fn temp_path(name: &str) -> PathBuf {
        env::temp_dir().join(format!("head_direction_storage_{name}"))
    }

    #[test]
    fn test_reduced_round_trip() {
        let mut series = TrialSeries::new(4);
        series.samples_mut()[0].accepted = Some(10.0);
        series.samples_mut()[2].accepted = Some(350.0);

        let path = temp_path("round_trip.csv");
        save_trial(&series, &path).unwrap();
        let loaded = load_trial(&path).unwrap();
        fs::remove_file(&path).unwrap();

        assert_eq!(loaded.len(), 4);
        assert_eq!(loaded.get(0).and_then(|s| s.accepted), Some(10.0));
        assert_eq!(loaded.get(1).and_then(|s| s.accepted), None);
        assert_eq!(loaded.get(2).and_then(|s| s.accepted), Some(350.0));
    }

    #[test]
    fn test_malformed_lines_are_skipped() {
        let path = temp_path("malformed.csv");
        fs::write(
            &path,
            "Frame-index, Direction\n0, 10\nnot a record\n1, \n2, 20\n",
        )
        .unwrap();
        let series = load_trial(&path).unwrap();
        fs::remove_file(&path).unwrap();

        assert_eq!(series.len(), 3);
        assert_eq!(series.get(0).and_then(|s| s.accepted), Some(10.0));
        assert_eq!(series.get(1).and_then(|s| s.accepted), None);
        assert_eq!(series.get(2).and_then(|s| s.accepted), Some(20.0));
    }

    #[test]
    fn test_empty_file_is_rejected() {
        let path = temp_path("empty.csv");
        fs::write(&path, "Frame-index, Direction\n").unwrap();
        let result = load_trial(&path);
        fs::remove_file(&path).unwrap();
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_detector_output_parsing() {
        let path = temp_path("detector.csv");
        fs::write(
            &path,
            "# Ear-rect : Ear1_UpperLeft_PT/Ear1_LowerRight_PT/Ear2_UpperLeft_PT/Ear2_LowerRight_PT\n\
             Frame-index, Ear-rect, Direction, Direction-line-start, Direction-line-end\n\
             3, 10/20/30/40, 123, 5/6, 7/8\n\
             bad line\n\
             7, 11/21/31/41, 250, 9/10, 11/12\n",
        )
        .unwrap();
        let records = load_detector_output(&path).unwrap();
        fs::remove_file(&path).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].frame_index, 3);
        assert_eq!(records[0].ear_rect, [10, 20, 30, 40]);
        assert_eq!(records[0].direction, 123.0);
        assert_eq!(records[0].line_start, (5, 6));
        assert_eq!(records[0].line_end, (7, 8));
        assert_eq!(records[1].detection().angle, Some(250.0));
    }

    #[test]
    fn test_sniff_format() {
        let detector = temp_path("sniff_detector.csv");
        fs::write(
            &detector,
            "# comment\nFrame-index, Ear-rect, Direction, Direction-line-start, Direction-line-end\n",
        )
        .unwrap();
        assert_eq!(sniff_format(&detector).unwrap(), CsvFormat::DetectorOutput);
        fs::remove_file(&detector).unwrap();

        let reduced = temp_path("sniff_reduced.csv");
        fs::write(&reduced, "Frame-index, Direction\n0, 1\n").unwrap();
        assert_eq!(sniff_format(&reduced).unwrap(), CsvFormat::Reduced);
        fs::remove_file(&reduced).unwrap();
    }

    #[test]
    fn test_unset_sentinel_round_trip() {
        let series = TrialSeries::new(2);
        let path = temp_path("sentinel.csv");
        save_trial(&series, &path).unwrap();
        let contents = fs::read_to_string(&path).unwrap();
        fs::remove_file(&path).unwrap();
        assert!(contents.contains("0, -1"));
        assert!(contents.contains("1, -1"));
    }
}
