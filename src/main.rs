//! CLI entry point for the score dashboard.
//!
//! Loads the tier configuration and score exports once, then answers a single
//! query with chart series and the student table, or lists the values each
//! selection input can take.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use score_dashboard::{
    dataset::Dataset,
    fetch::BasicClient,
    output::{render_text, write_json, write_table_csv},
    query::{FilterCriteria, Selection},
    report::{FilterOptions, QueryOutcome, run_query},
    settings::Settings,
};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::{error, info};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "score_dashboard")]
#[command(about = "Averages and performance tiers for exam score exports", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Filter the loaded scores and print chart series and the student table
    Query {
        #[command(flatten)]
        load: LoadArgs,

        /// Calendar to show, or "all". Nothing matches until one is given
        #[arg(long)]
        calendar: Option<String>,

        /// Test name, or "all"
        #[arg(long, default_value = "all")]
        test: String,

        /// Cycle (e.g. "Cycle-II"), or "all"
        #[arg(long, default_value = "all")]
        cycle: String,

        /// Grade number, or "all"
        #[arg(long, default_value = "all")]
        grade: String,

        /// Subject column name (e.g. "MATEMÁTICAS"), or "all"
        #[arg(long, default_value = "all")]
        subject: String,

        #[arg(short, long, value_enum, default_value_t = Format::Text)]
        format: Format,

        /// Also write the student table to this CSV file
        #[arg(long, value_name = "PATH")]
        table_csv: Option<PathBuf>,
    },
    /// List the calendars, tests, grades and subjects found in the sources
    Filters {
        #[command(flatten)]
        load: LoadArgs,

        #[arg(short, long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },
}

#[derive(Args)]
struct LoadArgs {
    /// Path or URL of the tier document (overrides DASHBOARD_TIERS)
    #[arg(long, value_name = "FILE_OR_URL")]
    tiers: Option<String>,

    /// Path or URL of a score export; repeatable (overrides DASHBOARD_SOURCES)
    #[arg(long = "source", value_name = "FILE_OR_URL")]
    sources: Vec<String>,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    let cli = Cli::parse();
    let mut settings = Settings::from_env();

    // Logging setup: colored stderr + JSON rolling log file
    let log_path = Path::new(&settings.log_file_path);
    let log_dir = log_path.parent().unwrap_or(Path::new("logs"));
    let log_file_name = log_path
        .file_name()
        .unwrap_or(OsStr::new("score_dashboard.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    match cli.command {
        Commands::Query {
            load,
            calendar,
            test,
            cycle,
            grade,
            subject,
            format,
            table_csv,
        } => {
            let criteria = FilterCriteria {
                calendar: calendar
                    .as_deref()
                    .map(str::parse::<Selection<String>>)
                    .transpose()?,
                test: test.parse()?,
                cycle: cycle.parse()?,
                grade: grade
                    .parse::<Selection<i64>>()
                    .context("grade must be a number or \"all\"")?,
                subject: subject.parse()?,
            };

            load.apply(&mut settings);
            let dataset = load_dataset(&settings).await?;

            let outcome = run_query(&dataset, &criteria);
            match &outcome {
                QueryOutcome::NoResults => info!("No records matched the query"),
                QueryOutcome::Results(dashboard) => {
                    info!(
                        matched = dashboard.matched,
                        charts = dashboard.charts.len(),
                        students = dashboard.table.rows.len(),
                        "Query answered"
                    );
                    if let Some(path) = &table_csv {
                        write_table_csv(path, &dashboard.table)?;
                        info!(path = %path.display(), "Student table written");
                    }
                }
            }

            match format {
                Format::Text => print!("{}", render_text(&outcome)),
                Format::Json => write_json(std::io::stdout().lock(), &outcome)?,
            }
        }
        Commands::Filters { load, format } => {
            load.apply(&mut settings);
            let dataset = load_dataset(&settings).await?;
            let options = FilterOptions::from_records(&dataset.records);

            match format {
                Format::Text => {
                    println!("calendars: {}", options.calendars.join(", "));
                    println!("tests:     {}", options.tests.join(", "));
                    let grades: Vec<_> = options.grades.iter().map(i64::to_string).collect();
                    println!("grades:    {}", grades.join(", "));
                    let subjects: Vec<_> =
                        options.subjects.iter().map(|s| s.to_string()).collect();
                    println!("subjects:  {}", subjects.join(", "));
                }
                Format::Json => write_json(std::io::stdout().lock(), &options)?,
            }
        }
    }

    Ok(())
}

impl LoadArgs {
    fn apply(self, settings: &mut Settings) {
        if let Some(tiers) = self.tiers {
            settings.tiers_source = tiers;
        }
        if !self.sources.is_empty() {
            settings.sources = self.sources;
        }
    }
}

/// Runs the startup load; a missing tier document stops the program.
async fn load_dataset(settings: &Settings) -> Result<Dataset> {
    let client = BasicClient::new()?;
    match Dataset::load(&client, &settings.tiers_source, &settings.sources).await {
        Ok((dataset, report)) => {
            if dataset.is_empty() {
                info!(skipped = report.skipped.len(), "No score records were loaded");
            }
            Ok(dataset)
        }
        Err(e) => {
            error!(error = %format!("{e:#}"), "Startup load failed");
            eprintln!(
                "Could not load the initial configuration. Check the log at {} for details.",
                settings.log_file_path
            );
            Err(e)
        }
    }
}
