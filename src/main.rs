//! Command-line importer for college-registry.
//!
//! Reconciles university and college spreadsheet exports into PostgreSQL and
//! provides a few database diagnostics.
//!
//! # Usage
//!
//! ```bash
//! # Import universities first, colleges resolve against them
//! college-registry import universities data/universities.xlsx
//!
//! # Preview a college import without writing
//! college-registry import colleges data/colleges.xlsx --dry-run
//!
//! # Import non-interactively and print a JSON summary
//! college-registry import colleges data/colleges.csv --yes --json
//!
//! # Counts
//! college-registry stats
//!
//! # Database tools
//! college-registry db check
//! college-registry db migrate
//! ```
//!
//! # Environment Variables
//!
//! See [`college_registry::config`].

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;
use sqlx::PgPool;

use college_registry::application::services::{ImportPlan, ImportService};
use college_registry::config::{self, Config, mask_connection_string, validate_batch_size};
use college_registry::domain::repositories::{CollegeRepository, UniversityRepository};
use college_registry::import::normalizer::RequiredField;
use college_registry::import::row::columns;
use college_registry::import::{Dataset, FilterStats, ImportKind, ImportSummary, LogReporter, read_dataset};
use college_registry::infrastructure::persistence::pool as db_pool;
use college_registry::infrastructure::persistence::{PgCollegeRepository, PgUniversityRepository};

/// Bulk importer for universities and affiliated colleges.
#[derive(Parser)]
#[command(name = "college-registry")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand)]
enum Commands {
    /// Import a dataset
    Import {
        #[command(subcommand)]
        target: ImportTarget,
    },

    /// Show record counts
    Stats,

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

/// Datasets that can be imported.
#[derive(Subcommand)]
enum ImportTarget {
    /// Import universities
    Universities(ImportArgs),

    /// Import affiliated colleges, linking each to its university
    Colleges(ImportArgs),
}

#[derive(Args)]
struct ImportArgs {
    /// Dataset file (.xlsx, .xlsm, .xlsb, .xls, .ods or .csv)
    file: PathBuf,

    /// Records per bulk insert (overrides IMPORT_BATCH_SIZE)
    #[arg(short, long)]
    batch_size: Option<usize>,

    /// Show what would be written and exit
    #[arg(long)]
    dry_run: bool,

    /// Skip confirmation prompt
    #[arg(short = 'y', long)]
    yes: bool,

    /// Print the summary as JSON
    #[arg(long)]
    json: bool,
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,

    /// Show database info
    Info,

    /// Apply pending migrations
    Migrate,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = config::load_from_env().context("Invalid configuration")?;
    college_registry::telemetry::init(&config);
    config.print_summary();

    match cli.command {
        Commands::Import { target } => handle_import(target, &config).await?,
        Commands::Stats => {
            let pool = connect(&config).await?;
            handle_stats(&pool).await?;
        }
        Commands::Db { action } => {
            let pool = connect(&config).await?;
            handle_db_action(action, &pool).await?;
        }
    }

    Ok(())
}

async fn connect(config: &Config) -> Result<PgPool> {
    db_pool::connect(config).await.with_context(|| {
        format!(
            "Failed to connect to database at {}",
            mask_connection_string(&config.database_url)
        )
    })
}

/// Runs an import.
///
/// # Flow
///
/// 1. Check the file exists (before touching the database)
/// 2. Read the dataset on a blocking thread
/// 3. Connect and apply migrations
/// 4. Load the snapshot and build the plan
/// 5. Print the plan; stop here on `--dry-run`
/// 6. Confirm (unless `--yes`)
/// 7. Write and print the summary
async fn handle_import(target: ImportTarget, config: &Config) -> Result<()> {
    let (kind, args) = match target {
        ImportTarget::Universities(args) => (ImportKind::Universities, args),
        ImportTarget::Colleges(args) => (ImportKind::Colleges, args),
    };

    let batch_size = args.batch_size.unwrap_or(config.batch_size);
    validate_batch_size(batch_size)?;

    if !args.file.is_file() {
        anyhow::bail!("File not found: {}", args.file.display());
    }

    let dataset = load_dataset(&args.file).await?;
    warn_missing_columns(kind, &dataset);

    let pool = connect(config).await?;
    db_pool::migrate(&pool)
        .await
        .context("Failed to apply migrations")?;

    let pool = Arc::new(pool);
    let service = ImportService::new(
        Arc::new(PgUniversityRepository::new(pool.clone())),
        Arc::new(PgCollegeRepository::new(pool)),
    )
    .with_batch_size(batch_size);

    let summary = match kind {
        ImportKind::Universities => {
            let context = service.load_university_context(&LogReporter).await?;
            let plan = service.plan_universities(&context, &dataset.rows, &LogReporter);
            if !review_plan(&plan, &args, batch_size)? {
                return Ok(());
            }
            service.write_universities(plan, &LogReporter).await?
        }
        ImportKind::Colleges => {
            let context = service.load_college_context(&LogReporter).await?;
            let plan = service.plan_colleges(&context, &dataset.rows, &LogReporter);
            if !review_plan(&plan, &args, batch_size)? {
                return Ok(());
            }
            service.write_colleges(plan, &LogReporter).await?
        }
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_summary(&summary);
    }

    Ok(())
}

async fn load_dataset(path: &Path) -> Result<Dataset> {
    let owned = path.to_path_buf();
    let dataset = tokio::task::spawn_blocking(move || read_dataset(&owned))
        .await
        .context("Dataset reader panicked")?
        .with_context(|| format!("Failed to read {}", path.display()))?;

    Ok(dataset)
}

fn warn_missing_columns(kind: ImportKind, dataset: &Dataset) {
    let required = [
        RequiredField::AisheCode,
        RequiredField::Name,
        RequiredField::State,
        RequiredField::District,
    ]
    .map(RequiredField::column);

    let mut expected = required.to_vec();
    if kind == ImportKind::Colleges {
        expected.extend([columns::UNIVERSITY_AISHE_CODE, columns::UNIVERSITY_NAME]);
    }

    let missing = dataset.missing_columns(&expected);
    if !missing.is_empty() {
        tracing::warn!(
            entity = kind.as_str(),
            missing = ?missing,
            "Dataset is missing expected columns"
        );
    }
}

/// Prints the plan and decides whether to write it.
///
/// Returns `false` on `--dry-run`, when nothing is new, or when the user declines.
fn review_plan<T>(plan: &ImportPlan<T>, args: &ImportArgs, batch_size: usize) -> Result<bool> {
    if args.json && args.dry_run {
        println!("{}", serde_json::to_string_pretty(&plan.stats)?);
        return Ok(false);
    }

    if !args.json {
        print_plan(plan.kind, &plan.stats, batch_size);
    }

    if args.dry_run {
        println!("{}", "🔍 Dry run, nothing written".yellow());
        return Ok(false);
    }

    if plan.is_empty() {
        if !args.json {
            println!("{}", "✅ Nothing to import".green().bold());
        }
        return Ok(false);
    }

    if !args.yes {
        let confirmed = Confirm::new()
            .with_prompt(format!("Insert {} new {}?", plan.records.len(), plan.kind))
            .default(true)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(false);
        }
    }

    Ok(true)
}

fn print_plan(kind: ImportKind, stats: &FilterStats, batch_size: usize) {
    println!();
    println!("{}", format!("📋 Import plan: {}", kind).bright_blue().bold());
    println!();
    println!("  Rows:              {}", stats.total_rows.to_string().bright_white());
    println!("  Rejected:          {}", stats.rejected.to_string().yellow());
    println!("  Already persisted: {}", stats.already_persisted.to_string().bright_black());
    println!("  Repeated in file:  {}", stats.repeated_in_input.to_string().bright_black());
    if kind == ImportKind::Colleges {
        println!("  Linked by code:    {}", stats.resolved_by_code.to_string().cyan());
        println!("  Linked by name:    {}", stats.resolved_by_name.to_string().cyan());
        println!("  Unlinked:          {}", stats.unresolved.to_string().yellow());
    }
    println!(
        "  New:               {}",
        stats.new_records().to_string().bright_green().bold()
    );
    println!(
        "  Batches:           {}",
        stats.new_records().div_ceil(batch_size).to_string().bright_white()
    );
    println!();
}

fn print_summary(summary: &ImportSummary) {
    println!();
    println!("{}", "✅ Import complete".green().bold());
    println!();
    println!(
        "  Inserted:           {}",
        summary.inserted().to_string().bright_green().bold()
    );
    println!(
        "  Skipped duplicates: {}",
        summary.write.skipped_duplicates.to_string().bright_black()
    );

    let failed = summary.write.failed();
    let failed_text = if failed > 0 {
        failed.to_string().red().bold()
    } else {
        failed.to_string().bright_black()
    };
    println!("  Failed:             {}", failed_text);
    println!(
        "  Batches:            {} ({} fallback)",
        summary.write.batches,
        summary.write.fallback_batches
    );
    println!("  Time:               {:.1}s", summary.elapsed_secs);
    println!("  Rate:               {:.0} records/sec", summary.rate());

    if failed > 0 {
        println!();
        println!("{}", "  Failed records:".red().bold());
        for failure in &summary.write.failures {
            println!("    {}  {}", failure.aishe_code.cyan(), failure.reason.bright_black());
        }
    }
    println!();
}

/// Displays record counts.
async fn handle_stats(pool: &PgPool) -> Result<()> {
    println!("{}", "📊 Statistics".bright_blue().bold());
    println!();

    let pool = Arc::new(pool.clone());
    let universities = PgUniversityRepository::new(pool.clone());
    let colleges = PgCollegeRepository::new(pool);

    let universities_count = universities.count().await?;
    let colleges_count = colleges.count().await?;
    let unlinked_count = colleges.count_unlinked().await?;

    println!(
        "  Universities:       {}",
        universities_count.to_string().bright_green().bold()
    );
    println!(
        "  Colleges:           {}",
        colleges_count.to_string().bright_green().bold()
    );
    println!(
        "  Without university: {}",
        unlinked_count.to_string().yellow()
    );
    println!();

    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").fetch_one(pool).await?;

            println!("{}", "✅ Database connection OK".green().bold());
        }
        DbAction::Info => {
            println!("{}", "ℹ️  Database Information".bright_blue().bold());
            println!();

            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await?;

            println!("  PostgreSQL: {}", version.bright_white());
            println!();
        }
        DbAction::Migrate => {
            println!("{}", "🛠️  Applying migrations...".bright_blue());

            db_pool::migrate(pool)
                .await
                .context("Failed to apply migrations")?;

            println!("{}", "✅ Migrations applied".green().bold());
        }
    }

    Ok(())
}
