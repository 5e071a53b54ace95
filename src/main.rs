//! # Tidysheet command-line entry point
//!
//! ```text
//! main()
//!   │
//!   ├─> Parse CLI arguments (clap)
//!   ├─> Install console + rolling-file logging
//!   └─> Execute the subcommand
//! ```
//!
//! ```bash
//! tidysheet clean --file contacts.csv --output clean.xlsx --output clean.pdf
//! tidysheet inspect --file contacts.csv
//! ```

#![warn(clippy::all, rust_2018_idioms)]
#![expect(clippy::print_stdout)] // Allow println! in main binary

mod cli;

use anyhow::Result;
use clap::Parser as _;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    // RUST_LOG overrides the level chosen with -v
    tidysheet::logging::init(cli.verbose)?;

    cli::run_command(cli.command)
}
