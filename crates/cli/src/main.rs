//! codesearch-gym CLI - grading harness for code-search tool calls
//!
//! This binary verifies blueprints against fixture corpora, grades individual
//! tool calls and manages fixtures, seeds and configuration.

#![deny(warnings)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use codesearch_gym::commands::{
    export_seeds, grade_tool_call, load_blueprint_set, read_json, validate_document, verify,
};
use codesearch_gym_core::config::global_config_path;
use codesearch_gym_core::GymConfig;
use codesearch_gym_grader::RewardOptions;
use codesearch_gym_tools::ToolExecutor;
use codesearch_gym_verify::{cleanup_fixtures, materialize_all, Verifier};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{debug, info};

#[derive(Parser)]
#[command(name = "codesearch-gym")]
#[command(about = "Grading harness for ast-grep and ripgrep tool calls")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Verify seed blueprints (or blueprints from a file) against fixture corpora
    Verify {
        /// Directory for materialized fixture corpora
        #[arg(long, value_name = "DIR")]
        fixtures_dir: Option<PathBuf>,

        /// Minimum span F1 for a blueprint to pass
        #[arg(long)]
        min_f1: Option<f64>,

        /// Verify only the blueprint with this id
        #[arg(long)]
        seed_id: Option<String>,

        /// Blueprint document (.json or .jsonl) instead of the built-in seeds
        #[arg(long, value_name = "FILE")]
        blueprints: Option<PathBuf>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Execute a tool call in a blueprint's corpus and print its grade and reward
    Grade {
        /// Blueprint whose corpus and ground truth are used
        #[arg(long)]
        blueprint_id: String,

        /// Tool-call JSON document
        #[arg(long, value_name = "FILE")]
        tool_call: PathBuf,

        /// Blueprint document (.json or .jsonl) instead of the built-in seeds
        #[arg(long, value_name = "FILE")]
        blueprints: Option<PathBuf>,

        /// Line tolerance for span matching
        #[arg(long)]
        tolerance: Option<usize>,

        /// Directory for materialized fixture corpora
        #[arg(long, value_name = "DIR")]
        fixtures_dir: Option<PathBuf>,
    },
    /// Validate a tool-call document
    Validate {
        /// Tool-call JSON document
        file: PathBuf,

        /// Apply common repairs before validating
        #[arg(long)]
        repair: bool,
    },
    /// Manage fixture corpora
    #[command(subcommand)]
    Fixtures(FixturesCommands),
    /// Manage seed blueprints
    #[command(subcommand)]
    Seeds(SeedsCommands),
    /// Manage configuration
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Subcommand)]
enum FixturesCommands {
    /// Write every fixture corpus to disk
    Materialize {
        #[arg(long, value_name = "DIR")]
        fixtures_dir: Option<PathBuf>,
    },
    /// Remove the fixtures directory
    Clean {
        #[arg(long, value_name = "DIR")]
        fixtures_dir: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum SeedsCommands {
    /// Write the seed blueprints to a file (format from the extension)
    Export { file: PathBuf },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Write the default configuration
    Init {
        /// Destination (defaults to ~/.codesearch-gym/config.toml)
        file: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    init_logging(cli.verbose)?;

    match cli.command {
        Commands::Verify {
            fixtures_dir,
            min_f1,
            seed_id,
            blueprints,
            json,
        } => {
            let mut config = load_config(cli.config.as_deref())?;
            if let Some(dir) = fixtures_dir {
                config.fixtures.base_dir = dir;
            }
            if let Some(min_f1) = min_f1 {
                config.grading.min_f1 = min_f1;
            }
            config.validate()?;
            run_verify(&config, blueprints.as_deref(), seed_id.as_deref(), json).await
        }
        Commands::Grade {
            blueprint_id,
            tool_call,
            blueprints,
            tolerance,
            fixtures_dir,
        } => {
            let mut config = load_config(cli.config.as_deref())?;
            if let Some(dir) = fixtures_dir {
                config.fixtures.base_dir = dir;
            }
            if let Some(tolerance) = tolerance {
                config.grading.tolerance = tolerance;
            }
            run_grade(&config, &blueprint_id, &tool_call, blueprints.as_deref()).await
        }
        Commands::Validate { file, repair } => run_validate(&file, repair),
        Commands::Fixtures(cmd) => {
            let config = load_config(cli.config.as_deref())?;
            handle_fixtures_command(cmd, &config)
        }
        Commands::Seeds(SeedsCommands::Export { file }) => {
            let count = export_seeds(&file)?;
            println!("Wrote {count} seed blueprints to {}", file.display());
            Ok(ExitCode::SUCCESS)
        }
        Commands::Config(ConfigCommands::Init { file, force }) => {
            let path = match file.or(cli.config) {
                Some(path) => path,
                None => global_config_path()?,
            };
            init_config(&path, force)
        }
    }
}

/// Initialize logging system
///
/// Logs go to stderr so reports on stdout stay machine-readable.
fn init_logging(verbose: bool) -> Result<()> {
    let level = if verbose { "debug" } else { "info" };

    tracing_subscriber::fmt()
        .with_env_filter(format!("warn,codesearch_gym={level}"))
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow!("Failed to initialize logging: {e}"))?;

    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<GymConfig> {
    let config = GymConfig::load(path).context("Failed to load configuration")?;
    debug!("Loaded configuration: {config:?}");
    Ok(config)
}

async fn run_verify(
    config: &GymConfig,
    blueprints_path: Option<&Path>,
    seed_id: Option<&str>,
    json: bool,
) -> Result<ExitCode> {
    let blueprints = load_blueprint_set(blueprints_path)?;
    let verifier = Verifier::from_config(ToolExecutor::new(config.tools.clone()), config);
    let report = verify(&verifier, &blueprints, seed_id).await?;

    if json {
        println!("{}", report.to_json()?);
    } else {
        println!("{report}");
    }

    Ok(if report.all_passed() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

async fn run_grade(
    config: &GymConfig,
    blueprint_id: &str,
    tool_call_path: &Path,
    blueprints_path: Option<&Path>,
) -> Result<ExitCode> {
    let blueprints = load_blueprint_set(blueprints_path)?;
    let blueprint = blueprints
        .iter()
        .find(|b| b.id == blueprint_id)
        .ok_or_else(|| anyhow!("Unknown blueprint id: {blueprint_id}"))?;
    let tool_call = read_json(tool_call_path)?;

    let options = RewardOptions {
        tolerance: config.grading.tolerance,
        weights: config.reward,
        errors: 0.0,
    };
    let executor = ToolExecutor::new(config.tools.clone());
    let output = grade_tool_call(
        &executor,
        blueprint,
        &tool_call,
        &config.fixtures.base_dir,
        &options,
    )
    .await?;

    eprintln!("{}", output.grade);
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(ExitCode::SUCCESS)
}

fn run_validate(path: &Path, repair: bool) -> Result<ExitCode> {
    let call = read_json(path)?;
    let output = validate_document(&call, repair);
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(if output.valid {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn handle_fixtures_command(cmd: FixturesCommands, config: &GymConfig) -> Result<ExitCode> {
    match cmd {
        FixturesCommands::Materialize { fixtures_dir } => {
            let base = fixtures_dir.unwrap_or_else(|| config.fixtures.base_dir.clone());
            let roots = materialize_all(&base)?;
            for (name, root) in &roots {
                println!("{name}: {}", root.display());
            }
        }
        FixturesCommands::Clean { fixtures_dir } => {
            let base = fixtures_dir.unwrap_or_else(|| config.fixtures.base_dir.clone());
            cleanup_fixtures(&base)?;
            println!("Removed {}", base.display());
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn init_config(path: &Path, force: bool) -> Result<ExitCode> {
    if path.exists() && !force {
        bail!(
            "{} already exists. Use --force to overwrite it.",
            path.display()
        );
    }
    GymConfig::default().save(path)?;
    info!("Wrote default configuration to {}", path.display());
    println!("{}", path.display());
    Ok(ExitCode::SUCCESS)
}
