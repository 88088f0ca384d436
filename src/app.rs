//! Batch revision application.
//!
//! Drives the whole pipeline over a directory of trial CSV files: load each
//! trial (detector output or already-reduced form), disambiguate and
//! recompute, optionally promote the interpolated estimates, persist the
//! reduced form, and aggregate per-subject behavioral summaries.

use crate::config::Config;
use crate::revision::{self, Edit};
use crate::storage::{self, CsvFormat, SummaryRow};
use crate::summary::{summarize, StimulusClass};
use crate::trial::TrialSeries;
use crate::{Error, Result};
use log::{info, warn};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Directory the per-subject summary CSVs are written into.
const SUBJECT_OUTPUT_DIR: &str = "_subject_output";

/// Batch run configuration
#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// Directory scanned for trial CSV files
    pub input_dir: PathBuf,
    /// Directory the revised trials are written into
    pub output_dir: PathBuf,
    /// Commit interpolated estimates as accepted data before saving
    pub promote_hypotheses: bool,
    /// Export per-subject summary CSVs
    pub export_summaries: bool,
}

/// Identity of one trial file, parsed from its name.
///
/// Trial files are named `Group_Test_Subject_Stimulus_N.csv`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrialName {
    /// Experimental group
    pub group: String,
    /// Test/session label
    pub test: String,
    /// Subject name
    pub subject: String,
    /// Stimulus name including its numbering, e.g. `ABBA_1`
    pub stimulus: String,
}

impl TrialName {
    /// Parse a trial identity from a file stem (name without extension).
    #[must_use]
    pub fn parse(stem: &str) -> Option<Self> {
        let parts: Vec<&str> = stem.split('_').collect();
        if parts.len() != 5 || parts.iter().any(|p| p.is_empty()) {
            return None;
        }
        Some(Self {
            group: parts[0].to_string(),
            test: parts[1].to_string(),
            subject: parts[2].to_string(),
            stimulus: format!("{}_{}", parts[3], parts[4]),
        })
    }
}

/// Batch revision pipeline over one input directory.
pub struct RevisionApp {
    config: Config,
    batch: BatchConfig,
}

impl RevisionApp {
    /// Create the application, validating the pipeline configuration.
    pub fn new(config: Config, batch: BatchConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, batch })
    }

    /// Process every trial CSV in the input directory.
    ///
    /// Files that fail to load are skipped with a warning so one corrupt
    /// trial does not abort the batch.
    pub fn run(&self) -> Result<()> {
        let trial_files = self.find_trial_files()?;
        if trial_files.is_empty() {
            return Err(Error::InvalidInput(format!(
                "No trial CSV files in {}",
                self.batch.input_dir.display()
            )));
        }
        fs::create_dir_all(&self.batch.output_dir)?;

        let mut subjects: BTreeMap<String, Vec<SummaryRow>> = BTreeMap::new();
        let mut processed = 0usize;
        for path in &trial_files {
            match self.process_trial(path) {
                Ok(series) => {
                    processed += 1;
                    self.persist_trial(path, &series)?;
                    self.collect_summary(path, &series, &mut subjects);
                }
                Err(e) => warn!("skipping {}: {}", path.display(), e),
            }
        }
        info!("processed {}/{} trial files", processed, trial_files.len());

        if self.batch.export_summaries {
            self.export_summaries(&subjects)?;
        }
        Ok(())
    }

    /// Load one trial file and run the processing pipeline over it.
    pub fn process_trial(&self, path: &Path) -> Result<TrialSeries> {
        let radius = self.config.smoothing.radius;
        let mut series = match storage::sniff_format(path)? {
            CsvFormat::DetectorOutput => {
                let records = storage::load_detector_output(path)?;
                let mut series = TrialSeries::with_base(
                    self.config.trial.base_index,
                    self.config.trial.frame_count,
                );
                let mut disambiguator = self.config.create_disambiguator();
                for record in &records {
                    series.ingest(&record.detection(), &mut disambiguator);
                }
                series
            }
            CsvFormat::Reduced => storage::load_trial(path)?,
        };
        series.recompute(radius);

        if series.is_degenerate() {
            warn!("{}: no accepted direction in the whole trial", path.display());
        } else if self.batch.promote_hypotheses {
            revision::apply(&mut series, &Edit::PromoteHypothesis, radius)?;
        }
        Ok(series)
    }

    fn find_trial_files(&self) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        for entry in fs::read_dir(&self.batch.input_dir)? {
            let path = entry?.path();
            let is_csv = path
                .extension()
                .map_or(false, |ext| ext.eq_ignore_ascii_case("csv"));
            if path.is_file() && is_csv {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }

    fn persist_trial(&self, input_path: &Path, series: &TrialSeries) -> Result<()> {
        let file_name = input_path.file_name().ok_or_else(|| {
            Error::InvalidInput(format!("No file name in {}", input_path.display()))
        })?;
        let output_path = self.batch.output_dir.join(file_name);
        storage::save_trial(series, &output_path)?;
        info!("saved {}", output_path.display());
        Ok(())
    }

    fn collect_summary(
        &self,
        path: &Path,
        series: &TrialSeries,
        subjects: &mut BTreeMap<String, Vec<SummaryRow>>,
    ) {
        let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("");
        let Some(name) = TrialName::parse(stem) else {
            warn!("{}: file name does not identify a trial", path.display());
            return;
        };
        if series.is_degenerate() {
            // no estimate available for this trial
            return;
        }
        let row = SummaryRow {
            group: name.group,
            test: name.test,
            stimulus_class: StimulusClass::classify(&name.stimulus),
            stimulus: name.stimulus,
            summary: summarize(series, self.config.trial.stimulus_onset_frame),
        };
        subjects.entry(name.subject).or_default().push(row);
    }

    fn export_summaries(&self, subjects: &BTreeMap<String, Vec<SummaryRow>>) -> Result<()> {
        let export_dir = self.batch.output_dir.join(SUBJECT_OUTPUT_DIR);
        fs::create_dir_all(&export_dir)?;
        for (subject, rows) in subjects {
            let path = export_dir.join(format!("{subject}.csv"));
            storage::save_subject_summary(&path, rows)?;
            info!("exported summary for {} ({} trials)", subject, rows.len());
        }
        Ok(())
    }
}
