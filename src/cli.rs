use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tidysheet::config::{self, CleanerSettings};
use tidysheet::pipeline::{self, PipelineOutcome};
use tidysheet::{export, ingest};

#[derive(Parser)]
#[command(
    name = "tidysheet",
    version,
    about = "Clean a spreadsheet: dedupe, retype, validate and impute"
)]
pub struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Clean a file and save the result
    Clean {
        /// Input file path (.csv or .xlsx)
        #[arg(short, long)]
        file: PathBuf,

        /// Output file path; repeat for several formats (.csv, .xlsx, .pdf).
        /// Defaults to `<stem>_cleaned.csv` next to the input.
        #[arg(short, long)]
        output: Vec<PathBuf>,

        /// Write the per-stage change reports to this JSON file
        #[arg(long)]
        report: Option<PathBuf>,

        /// Path to a JSON settings file
        #[arg(long, env = "TIDYSHEET_CONFIG")]
        config: Option<PathBuf>,
    },
    /// Run the pipeline and print what each stage would change
    Inspect {
        /// Input file path (.csv or .xlsx)
        #[arg(short, long)]
        file: PathBuf,

        /// Path to a JSON settings file
        #[arg(long, env = "TIDYSHEET_CONFIG")]
        config: Option<PathBuf>,

        /// Also print the null view
        #[arg(long)]
        nulls: bool,
    },
}

pub fn run_command(command: Commands) -> Result<()> {
    match command {
        Commands::Clean {
            file,
            output,
            report,
            config,
        } => handle_clean(&file, output, report.as_deref(), config.as_deref()),
        Commands::Inspect {
            file,
            config,
            nulls,
        } => handle_inspect(&file, config.as_deref(), nulls),
    }
}

fn run_pipeline(file: &Path, config_path: Option<&Path>) -> Result<(CleanerSettings, PipelineOutcome)> {
    let settings = config::load_settings(config_path).context("Failed to load settings")?;
    let dataset = ingest::load_dataset(file, &settings)
        .with_context(|| format!("Failed to load {}", file.display()))?;
    let outcome = pipeline::clean(dataset, &settings).context("Cleaning failed")?;
    Ok((settings, outcome))
}

fn default_output(input: &Path) -> PathBuf {
    let stem = input.file_stem().unwrap_or_default().to_string_lossy();
    input.with_file_name(format!("{stem}_cleaned.csv"))
}

fn handle_clean(
    file: &Path,
    output: Vec<PathBuf>,
    report_path: Option<&Path>,
    config_path: Option<&Path>,
) -> Result<()> {
    let outputs = if output.is_empty() {
        vec![default_output(file)]
    } else {
        output
    };
    // Fail on a bad extension before doing any work.
    for path in &outputs {
        export::ExportFormat::from_path(path)?;
    }

    println!("Cleaning {}...", file.display());
    let (settings, outcome) = run_pipeline(file, config_path)?;

    for path in &outputs {
        export::write_file(&outcome.dataset, path, &settings)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        println!("Saved {}", path.display());
    }

    if let Some(path) = report_path {
        let json = serde_json::to_string_pretty(&outcome)?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write report {}", path.display()))?;
        println!("Report written to {}", path.display());
    }

    for warning in &outcome.run.warnings {
        println!("warning: {warning}");
    }
    println!("{}", outcome.run.summary());
    Ok(())
}

fn handle_inspect(file: &Path, config_path: Option<&Path>, show_nulls: bool) -> Result<()> {
    let (_, outcome) = run_pipeline(file, config_path)?;

    for report in &outcome.reports {
        println!("{}", report.summary());
        for warning in &report.warnings {
            println!("    warning: {warning}");
        }
    }

    if show_nulls {
        match outcome.null_view() {
            Some(view) => {
                println!("\nMissing values ({} rows):", view.height());
                let columns: Vec<usize> = (0..view.width()).collect();
                for line in export::text_table(view, &columns) {
                    println!("  {line}");
                }
            }
            None => println!("\nNo missing values."),
        }
    }

    println!("{}", outcome.run.summary());
    Ok(())
}
