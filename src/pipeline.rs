//! The cleaning pipeline.
//!
//! A [`Pipeline`] is an ordered list of [`Stage`]s. The standard sequence is:
//!
//! ```text
//! raw dataset
//!   ├─> normalize_column_names
//!   ├─> duplicate_rows         (report + drop)
//!   ├─> duplicate_columns      (report + drop)
//!   ├─> locate_nulls           (report only)
//!   ├─> coerce_types
//!   ├─> phone_numbers          (skipped without a phone column)
//!   ├─> trim_whitespace
//!   ├─> prune_empty            (drops empty columns, reports empty rows)
//!   └─> impute_missing
//! cleaned dataset
//! ```
//!
//! ```no_run
//! use tidysheet::config::CleanerSettings;
//! use tidysheet::pipeline::Pipeline;
//!
//! # fn main() -> tidysheet::error::Result<()> {
//! let dataset = tidysheet::ingest::load_dataset("contacts.csv".as_ref(), &CleanerSettings::default())?;
//! let outcome = Pipeline::default().run(dataset)?;
//! for report in &outcome.reports {
//!     println!("{}", report.summary());
//! }
//! # Ok(())
//! # }
//! ```

pub mod executor;
pub mod stage;

pub use executor::{Pipeline, PipelineOutcome, RunReport, clean};
pub use stage::{Stage, StageOutput};
