//! # Tidysheet - tabular cleaning pipeline
//!
//! Tidysheet takes a raw table (a `.csv` file or the first sheet of an
//! `.xlsx` workbook) and runs it through a fixed sequence of cleaning
//! stages: column names are trimmed, duplicate rows and columns dropped,
//! missing values located, column types inferred, phone numbers checked,
//! text trimmed, empty columns pruned and the remaining holes imputed.
//! Every stage hands back a [`report::ChangeReport`] describing what it
//! found and changed.
//!
//! ## Quick Start
//!
//! ```no_run
//! use tidysheet::config::CleanerSettings;
//! use tidysheet::{export, ingest, pipeline};
//!
//! # fn example() -> tidysheet::error::Result<()> {
//! let settings = CleanerSettings::default();
//! let raw = ingest::load_dataset("contacts.csv".as_ref(), &settings)?;
//! let outcome = pipeline::clean(raw, &settings)?;
//!
//! for report in &outcome.reports {
//!     println!("{}", report.summary());
//! }
//! export::write_file(&outcome.dataset, "contacts_cleaned.xlsx".as_ref(), &settings)?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Core Modules
//!
//! - [`dataset`]: the polars `DataFrame` helpers every stage shares (`TypeTag`, text rendering)
//! - [`cleaning`]: one module per cleaning concern
//! - [`pipeline`]: stage sequencing and run reports
//! - [`ingest`] / [`export`]: reading and writing files
//! - [`config`]: JSON settings
//! - [`error`]: error types and handling utilities
//! - [`logging`]: console and rolling-file tracing setup

#![warn(clippy::all, rust_2018_idioms)]

pub mod cleaning;
pub mod config;
pub mod dataset;
pub mod error;
pub mod export;
pub mod ingest;
pub mod logging;
pub mod pipeline;
pub mod report;
