use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing_subscriber::EnvFilter;

mod aggregate;
mod db;
mod models;
mod pipeline;
mod report;
mod rows;
mod schema;
mod validate;
mod workbook;

use models::ImportResult;

#[derive(Parser)]
#[command(name = "qualityscore")]
#[command(about = "Quality maturity survey import and analysis", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create or upgrade the database schema
    InitDb,
    /// Import a survey spreadsheet and print the result
    Import {
        #[arg(long)]
        file: PathBuf,
        /// Print the full result as JSON instead of a summary
        #[arg(long)]
        json: bool,
    },
    /// Import a spreadsheet and write a markdown report
    Report {
        #[arg(long)]
        file: PathBuf,
        #[arg(long, default_value = "report.md")]
        out: PathBuf,
    },
    /// Import a spreadsheet and persist it as a new assessment version
    Save {
        #[arg(long)]
        file: PathBuf,
        #[arg(long)]
        company: String,
    },
    /// List saved assessment versions for a company
    Versions {
        #[arg(long)]
        company: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::InitDb => {
            let pool = connect().await?;
            db::init_db(&pool).await?;
            println!("Schema ready.");
        }
        Commands::Import { file, json } => {
            let result = import_file(&file)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                print_summary(&file, &result);
            }
        }
        Commands::Report { file, out } => {
            let result = import_file(&file)?;
            let report = report::build_report(&file.display().to_string(), &result);
            std::fs::write(&out, report)?;
            println!("Report written to {}.", out.display());
        }
        Commands::Save { file, company } => {
            let result = import_file(&file)?;
            if result.valid_respondents == 0 {
                anyhow::bail!(
                    "nothing to save: no valid respondents ({} errors)",
                    result.errors.len()
                );
            }
            let pool = connect().await?;
            let version = db::save_assessment(&pool, &company, &result).await?;
            println!(
                "Saved version {version} for {company} ({} respondents).",
                result.valid_respondents
            );
        }
        Commands::Versions { company } => {
            let pool = connect().await?;
            let versions = db::list_versions(&pool, &company).await?;
            if versions.is_empty() {
                println!("No saved assessments for {company}.");
            } else {
                for v in versions {
                    println!(
                        "- v{} on {}: {} respondents, {} rejected rows",
                        v.version,
                        v.imported_at.format("%Y-%m-%d %H:%M"),
                        v.valid_respondents,
                        v.invalid_rows
                    );
                }
            }
        }
    }

    Ok(())
}

fn import_file(file: &Path) -> anyhow::Result<ImportResult> {
    let grid = workbook::read_workbook(file)
        .with_context(|| format!("failed to read {}", file.display()))?;
    Ok(pipeline::run_import(&grid))
}

fn print_summary(file: &Path, result: &ImportResult) {
    println!(
        "Imported {}: {} rows, {} valid respondents, {} rejected.",
        file.display(),
        result.total_rows,
        result.valid_respondents,
        result.invalid_rows
    );
    for warning in &result.warnings {
        println!("warning: {warning}");
    }
    for error in &result.errors {
        println!("error: {error}");
    }
    if result.valid_respondents > 0 {
        println!("Pillar means:");
        for (pillar, mean) in &result.aggregates.mean_by_pillar {
            println!("- {pillar}: {mean:.1} ({})", report::maturity_band(*mean));
        }
    }
}

async fn connect() -> anyhow::Result<PgPool> {
    let database_url = std::env::var("DATABASE_URL")
        .context("DATABASE_URL must be set to a Postgres instance")?;
    PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .context("failed to connect to Postgres")
}
