//! CLI entry point for the school statistics tool.
//!
//! Loads the school and student sources, then prints or writes the
//! requested summary tables.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use school_stats::analyzers::analyzer::analyze;
use school_stats::analyzers::buckets::{Dimension, bucket_summaries};
use school_stats::analyzers::district::district_summary;
use school_stats::analyzers::grade::scores_by_grade;
use school_stats::analyzers::ranking::{bottom_schools, top_schools};
use school_stats::analyzers::school::school_summaries;
use school_stats::analyzers::types::SchoolSummary;
use school_stats::config::AnalysisConfig;
use school_stats::fetch::{BasicClient, load_source};
use school_stats::output::{print_csv, print_json, write_report};
use school_stats::parser::{parse_schools, parse_students};
use school_stats::records::{SchoolRecord, StudentRecord};
use serde::Serialize;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "school_stats")]
#[command(about = "Summarize school and student performance data", long_about = None)]
struct Cli {
    /// School source: path or URL to a CSV (optionally gzip-compressed)
    #[arg(
        long,
        global = true,
        env = "SCHOOL_DATA",
        default_value = "Resources/schools_complete.csv"
    )]
    schools: String,

    /// Student source: path or URL to a CSV (optionally gzip-compressed)
    #[arg(
        long,
        global = true,
        env = "STUDENT_DATA",
        default_value = "Resources/students_complete.csv"
    )]
    students: String,

    /// JSON file overriding bucket boundaries and ranking depth
    #[arg(long, global = true, env = "ANALYSIS_CONFIG")]
    config: Option<String>,

    /// Output format for tables printed to stdout
    #[arg(long, global = true, value_enum, default_value_t = Format::Json)]
    format: Format,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Csv,
    Json,
}

#[derive(Clone, Copy, ValueEnum)]
enum BucketBy {
    Spending,
    Size,
    Type,
}

#[derive(Subcommand)]
enum Commands {
    /// District-wide totals and pass rates
    District,
    /// One row per school
    Schools,
    /// Best and worst schools by overall passing rate
    Ranking {
        /// Number of schools at each end (defaults to the config's top_n)
        #[arg(short, long)]
        n: Option<usize>,
    },
    /// Average math and reading score per grade at each school
    Grades,
    /// School statistics averaged per spending, size or type bucket
    Buckets {
        #[arg(long, value_enum)]
        by: BucketBy,
    },
    /// Write every table as CSV plus report.json into a directory
    Report {
        #[arg(short, long, default_value = "report")]
        output_dir: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/school_stats.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("school_stats.log"));

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

    let cli = Cli::parse();

    let config = AnalysisConfig::load_or_default(cli.config.as_deref())?;
    let (schools, students) = load_sources(&cli.schools, &cli.students).await?;

    match cli.command {
        Commands::District => {
            let summary = district_summary(&schools, &students)?;
            emit(cli.format, std::slice::from_ref(&summary))?;
        }
        Commands::Schools => {
            emit(cli.format, &school_summaries(&schools, &students)?)?;
        }
        Commands::Ranking { n } => {
            let n = n.unwrap_or(config.top_n);
            let summaries = school_summaries(&schools, &students)?;
            let top = top_schools(&summaries, n);
            let bottom = bottom_schools(&summaries, n);
            match cli.format {
                Format::Json => print_json(&Ranking { top, bottom })?,
                Format::Csv => {
                    print_csv(&top)?;
                    print_csv(&bottom)?;
                }
            }
        }
        Commands::Grades => {
            emit(cli.format, &scores_by_grade(&schools, &students)?)?;
        }
        Commands::Buckets { by } => {
            let summaries = school_summaries(&schools, &students)?;
            let dimension = match by {
                BucketBy::Spending => Dimension::Spending(&config.spending_bins),
                BucketBy::Size => Dimension::Size(&config.size_bins),
                BucketBy::Type => Dimension::SchoolType,
            };
            emit(cli.format, &bucket_summaries(&summaries, dimension)?)?;
        }
        Commands::Report { output_dir } => {
            let report = analyze(&schools, &students, &config)?;
            write_report(&output_dir, &report)?;
            info!(output_dir = %output_dir.display(), "Report saved");
        }
    }

    Ok(())
}

#[derive(Serialize)]
struct Ranking {
    top: Vec<SchoolSummary>,
    bottom: Vec<SchoolSummary>,
}

fn emit<T: Serialize>(format: Format, rows: &[T]) -> Result<()> {
    match format {
        Format::Json => print_json(&rows),
        Format::Csv => print_csv(rows),
    }
}

/// Loads and decodes both sources, fetching them concurrently.
#[tracing::instrument]
async fn load_sources(
    schools: &str,
    students: &str,
) -> Result<(Vec<SchoolRecord>, Vec<StudentRecord>)> {
    let client = BasicClient::new();
    let (school_bytes, student_bytes) =
        tokio::try_join!(load_source(&client, schools), load_source(&client, students))?;

    let schools = parse_schools(&school_bytes).context("failed to decode school source")?;
    let students = parse_students(&student_bytes).context("failed to decode student source")?;

    info!(
        schools = schools.len(),
        students = students.len(),
        "Sources loaded"
    );
    Ok((schools, students))
}
