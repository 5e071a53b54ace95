//! Pipeline execution engine.
//!
//! Runs the cleaning stages strictly one after another over a single owned
//! dataset, collecting one [`ChangeReport`] per stage and a [`RunReport`]
//! for the whole invocation.

use super::stage::{Stage, StageOutput};
use crate::cleaning::{
    CoerceTypes, ImputeMissing, LocateNulls, NormalizeColumnNames, PruneEmpty,
    RemoveDuplicateColumns, RemoveDuplicateRows, TrimWhitespace, ValidatePhoneNumbers,
};
use crate::config::CleanerSettings;
use crate::dataset::is_empty;
use crate::error::{CleanError, Result};
use crate::report::ChangeReport;
use polars::prelude::DataFrame;
use serde::Serialize;
use std::time::{Duration, Instant};

/// Report generated after pipeline execution
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    /// Number of rows before processing
    pub rows_before: usize,

    /// Number of columns before processing
    pub columns_before: usize,

    /// Number of rows after processing
    pub rows_after: usize,

    /// Number of columns after processing
    pub columns_after: usize,

    /// Number of stages applied
    pub stages_applied: usize,

    /// Warnings raised by any stage, prefixed with the stage name
    pub warnings: Vec<String>,

    /// Time taken for execution
    #[serde(with = "duration_serde")]
    pub duration: Duration,
}

mod duration_serde {
    use serde::{Serializer, ser::SerializeStruct as _};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_struct("Duration", 2)?;
        state.serialize_field("secs", &duration.as_secs())?;
        state.serialize_field("nanos", &duration.subsec_nanos())?;
        state.end()
    }
}

fn trend(before: usize, after: usize) -> &'static str {
    if after > before {
        "added"
    } else if after < before {
        "removed"
    } else {
        "unchanged"
    }
}

impl RunReport {
    /// Create a summary message
    pub fn summary(&self) -> String {
        format!(
            "Pipeline completed: {} rows ({} → {}), {} columns ({} → {}), {} stages, {:.2}s",
            trend(self.rows_before, self.rows_after),
            self.rows_before,
            self.rows_after,
            trend(self.columns_before, self.columns_after),
            self.columns_before,
            self.columns_after,
            self.stages_applied,
            self.duration.as_secs_f64()
        )
    }
}

/// Everything a run produces: the cleaned dataset and its diagnostics.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineOutcome {
    #[serde(skip)]
    pub dataset: DataFrame,
    pub reports: Vec<ChangeReport>,
    pub run: RunReport,
}

impl PipelineOutcome {
    /// Report of the named stage, if it ran.
    pub fn report(&self, stage: &str) -> Option<&ChangeReport> {
        self.reports.iter().find(|r| r.stage == stage)
    }

    /// The rectangular view of rows and columns with missing values, as
    /// seen after deduplication.
    pub fn null_view(&self) -> Option<&DataFrame> {
        self.report(crate::cleaning::nulls::STAGE)
            .and_then(|r| r.preview.as_ref())
    }
}

/// An ordered list of stages run over one dataset.
pub struct Pipeline {
    stages: Vec<Box<dyn Stage>>,
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.stages.iter().map(|s| s.name()))
            .finish()
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::from_settings(&CleanerSettings::default())
    }
}

impl Pipeline {
    pub fn new(stages: Vec<Box<dyn Stage>>) -> Self {
        Self { stages }
    }

    /// The standard cleaning sequence.
    ///
    /// Deduplication runs before null location so that rows about to be
    /// dropped are not reported, and type coercion runs before every stage
    /// that depends on a column's type.
    pub fn from_settings(settings: &CleanerSettings) -> Self {
        Self::new(vec![
            Box::new(NormalizeColumnNames),
            Box::new(RemoveDuplicateRows),
            Box::new(RemoveDuplicateColumns),
            Box::new(LocateNulls),
            Box::new(CoerceTypes),
            Box::new(ValidatePhoneNumbers::from_settings(settings)),
            Box::new(TrimWhitespace::from_settings(settings)),
            Box::new(PruneEmpty),
            Box::new(ImputeMissing::from_settings(settings)),
        ])
    }

    pub fn stages(&self) -> impl Iterator<Item = &dyn Stage> + '_ {
        self.stages.iter().map(|s| &**s)
    }

    /// Runs every stage in order.
    ///
    /// # Errors
    ///
    /// Returns [`CleanError::Structural`] if the dataset is empty (no columns
    /// or no rows). Any error a stage returns aborts the whole run; the
    /// partially cleaned dataset is discarded.
    pub fn run(&self, dataset: DataFrame) -> Result<PipelineOutcome> {
        let start = Instant::now();

        if is_empty(&dataset) {
            return Err(CleanError::Structural(format!(
                "dataset is empty ({} rows, {} columns)",
                dataset.height(),
                dataset.width()
            )));
        }

        let rows_before = dataset.height();
        let columns_before = dataset.width();
        tracing::info!(rows = rows_before, columns = columns_before, "Starting cleaning pipeline");

        let mut current = dataset;
        let mut reports = Vec::with_capacity(self.stages.len());
        let mut warnings = Vec::new();

        for (idx, stage) in self.stages.iter().enumerate() {
            tracing::debug!(
                "Stage {}/{}: {}",
                idx + 1,
                self.stages.len(),
                stage.description()
            );
            let StageOutput { dataset, report } = stage.apply(current).inspect_err(|e| {
                tracing::error!(stage = stage.name(), "Stage failed: {e}");
            })?;

            tracing::info!("{}", report.summary());
            warnings.extend(
                report
                    .warnings
                    .iter()
                    .map(|w| format!("{}: {w}", report.stage)),
            );
            reports.push(report);
            current = dataset;
        }

        let run = RunReport {
            rows_before,
            columns_before,
            rows_after: current.height(),
            columns_after: current.width(),
            stages_applied: reports.len(),
            warnings,
            duration: start.elapsed(),
        };
        tracing::info!("{}", run.summary());

        Ok(PipelineOutcome {
            dataset: current,
            reports,
            run,
        })
    }
}

/// Runs the standard pipeline configured by `settings`.
///
/// # Errors
///
/// See [`Pipeline::run`].
pub fn clean(dataset: DataFrame, settings: &CleanerSettings) -> Result<PipelineOutcome> {
    Pipeline::from_settings(settings).run(dataset)
}
