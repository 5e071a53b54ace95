use crate::error::Result;
use crate::report::ChangeReport;
use polars::prelude::DataFrame;

/// What a stage hands to the next one.
#[derive(Debug, Clone)]
pub struct StageOutput {
    pub dataset: DataFrame,
    pub report: ChangeReport,
}

impl From<(DataFrame, ChangeReport)> for StageOutput {
    fn from((dataset, report): (DataFrame, ChangeReport)) -> Self {
        Self { dataset, report }
    }
}

/// One step of the cleaning pipeline.
///
/// A stage takes ownership of the previous stage's dataset and returns the
/// next one, so two stages can never observe different versions of the same
/// table. Stages must be deterministic: the same input gives the same output
/// and report.
pub trait Stage: Send + Sync {
    /// Stable identifier, also used as the report's `stage`
    fn name(&self) -> &'static str;

    /// Human-readable summary of what the stage does
    fn description(&self) -> String;

    /// Apply this stage.
    ///
    /// # Errors
    ///
    /// Only structural failures are errors; per-cell problems belong in the
    /// returned report.
    fn apply(&self, dataset: DataFrame) -> Result<StageOutput>;
}
