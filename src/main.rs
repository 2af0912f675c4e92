//! Mockwrap CLI - recorded HTTP responses for offline function runs
//!
//! Commands:
//!   mockwrap up      - install wrappers, hold until Ctrl+C, clean up
//!   mockwrap render  - print what would be generated, without writing
//!   mockwrap clean   - remove a stale generated module

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use mockwrap::{ArtifactManager, MockLifecycle, Project, RunOptions, RunPlan, ARTIFACT_MODULE};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "mockwrap")]
#[command(about = "Serve recorded HTTP responses to function handlers during offline runs", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Install mock wrappers and keep them until interrupted
    Up {
        /// Path to the project manifest
        #[arg(short, long, default_value = "serverless.yml")]
        config: PathBuf,

        /// Wrap only this function
        #[arg(short, long)]
        function: Option<String>,
    },
    /// Print the generated module and handler rewrites without writing
    Render {
        /// Path to the project manifest
        #[arg(short, long, default_value = "serverless.yml")]
        config: PathBuf,

        /// Wrap only this function
        #[arg(short, long)]
        function: Option<String>,

        /// Output a machine-readable summary instead of Python source
        #[arg(long)]
        json: bool,
    },
    /// Remove a stale generated module from the working directory
    Clean,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Up { config, function } => up_command(&config, function).await,
        Commands::Render {
            config,
            function,
            json,
        } => render_command(&config, function, json),
        Commands::Clean => clean_command(),
    }
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

async fn up_command(config: &Path, function: Option<String>) -> anyhow::Result<()> {
    let mut project = Project::load(config)?;
    let mut lifecycle = MockLifecycle::new();
    let plan = lifecycle.start(&mut project, &RunOptions { function })?;

    print_summary(&plan, &lifecycle);
    println!();
    println!("Press Ctrl+C to stop.");

    tokio::signal::ctrl_c().await?;

    println!();
    lifecycle.stop()?;
    println!("Removed {}.", lifecycle.artifact().path().display());
    Ok(())
}

fn print_summary(plan: &RunPlan, lifecycle: &MockLifecycle) {
    println!("Mock responses installed.");
    println!();
    println!(
        "  interpreter: {} (from {})",
        plan.python.bin,
        plan.python.source.as_str()
    );
    println!("  artifact:    {}", lifecycle.artifact().path().display());
    println!("  routes:      read from {} at invocation time", mockwrap::MOCKS_FILE);
    println!();
    println!("Wrapped handlers:");
    for wrapper in &plan.wrappers {
        println!(
            "  {}: {} -> {}",
            wrapper.function, wrapper.original_handler, wrapper.wrapped_handler
        );
    }
}

fn render_command(config: &Path, function: Option<String>, json: bool) -> anyhow::Result<()> {
    let project = Project::load(config)?;
    let plan = RunPlan::build(&project, &RunOptions { function }, ARTIFACT_MODULE)?;

    if json {
        print_plan_json(&plan)?;
    } else {
        print!("{}", plan.rendered());
    }
    Ok(())
}

fn print_plan_json(plan: &RunPlan) -> anyhow::Result<()> {
    let output = serde_json::json!({
        "python": {
            "bin": plan.python.bin,
            "source": plan.python.source.as_str(),
        },
        "artifact": format!("{ARTIFACT_MODULE}.py"),
        "functions": plan.wrappers.iter().map(|wrapper| serde_json::json!({
            "name": wrapper.function,
            "handler": wrapper.original_handler,
            "wrapped": wrapper.wrapped_handler,
        })).collect::<Vec<_>>(),
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn clean_command() -> anyhow::Result<()> {
    let artifact = ArtifactManager::new();
    artifact.remove()?;
    println!("Cleaned {}.", artifact.path().display());
    Ok(())
}
