use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use employees::{Employees, EmployeesConfig};
use mimalloc::MiMalloc;
use runtime::{AppConfig, CliArgs};
use std::path::{Path, PathBuf};
use task_manager::{TaskManager, TaskManagerConfig};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

/// TaskHub Server - users, projects and tasks over a document store
#[derive(Parser)]
#[command(name = "taskhub-server")]
#[command(about = "TaskHub Server - users, projects and tasks over a document store")]
#[command(version = "0.1.0")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Document store URI (overrides config), e.g. mongodb://localhost:27017 or memory://
    #[arg(long)]
    store_uri: Option<String>,

    /// Print current configuration and exit
    #[arg(long)]
    print_config: bool,

    /// Log verbosity level (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate configuration and print it
    Check,
    /// Connect to the document store, wire the modules and report record counts
    Ping,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let args = CliArgs {
        config: cli.config.as_ref().map(|p| p.to_string_lossy().to_string()),
        store_uri: cli.store_uri.clone(),
        print_config: cli.print_config,
        verbose: cli.verbose,
    };

    // Load configuration (normalized home_dir is applied inside)
    let mut config = AppConfig::load_or_default(cli.config.as_deref())?;
    config.apply_cli_overrides(&args);

    let logging_config = config.logging.as_ref().cloned().unwrap_or_default();
    runtime::logging::init_logging_from_config(&logging_config, Path::new(&config.server.home_dir));
    tracing::info!("TaskHub Server starting");

    if cli.print_config {
        println!("{}", config.to_yaml()?);
        return Ok(());
    }

    match cli.command {
        Commands::Check => check_config(config),
        Commands::Ping => ping_store(config).await,
    }
}

fn check_config(config: AppConfig) -> Result<()> {
    tracing::info!("Checking configuration...");

    docstore::engine_for_uri(&config.store.uri)
        .with_context(|| format!("Invalid store uri '{}'", config.store.redacted_uri()))?;
    config.module_config::<TaskManagerConfig>(TaskManager::NAME)?;
    config.module_config::<EmployeesConfig>(Employees::NAME)?;

    tracing::info!("Configuration is valid");
    println!("Configuration check passed");
    println!("{}", config.to_yaml()?);
    Ok(())
}

async fn ping_store(config: AppConfig) -> Result<()> {
    let task_cfg: TaskManagerConfig = config.module_config(TaskManager::NAME)?;
    let employees_cfg: EmployeesConfig = config.module_config(Employees::NAME)?;

    tracing::info!(uri = %config.store.redacted_uri(), "Connecting to document store");
    let store = docstore::connect(&config.store)
        .await
        .with_context(|| format!("Failed to connect to {}", config.store.redacted_uri()))?;
    tracing::info!(engine = ?store.engine(), "Connected to document store");

    let tasks = TaskManager::new(store.clone(), task_cfg).client();
    let staff = Employees::init(store, employees_cfg).await?.client();

    let users = tasks.list_users().await?.len();
    let projects = tasks.list_projects().await?.len();
    let task_count = tasks.list_tasks().await?.len();
    let employee_count = staff.list_employees().await?.len();
    tracing::info!(
        users,
        projects,
        tasks = task_count,
        employees = employee_count,
        "Store reachable"
    );
    println!(
        "Store reachable: {users} users, {projects} projects, {task_count} tasks, \
         {employee_count} employees"
    );
    Ok(())
}
