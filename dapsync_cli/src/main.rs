use clap::Parser;
use dapsync_cli::config::{CliOverrides, ConfigManager, Profile};
use dapsync_cli::error::{CliError, CliResult, ExitCode};
use dapsync_cli::orchestrators::sync_orchestrator::{SyncOptions, SyncOrchestrator};
use dapsync_cli::output::OutputFormat;
use dapsync_cli::terminal;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "dapsync")]
#[command(author, version, about = "Replicate Canvas Data 2 tables into PostgreSQL", long_about = None)]
struct Cli {
    /// Destination database profile
    #[arg(value_enum)]
    profile: Profile,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Summary output format (defaults to output.format from the config)
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Path to the configuration file
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Maximum number of tables processed at once (0 = unbounded)
    #[arg(long, value_name = "N")]
    max_concurrency: Option<usize>,

    /// Per-table deadline in seconds (0 = none)
    #[arg(long, value_name = "SECONDS")]
    table_timeout: Option<u64>,

    /// Only process these tables (can be specified multiple times)
    #[arg(short, long = "table", value_name = "TABLE")]
    tables: Vec<String>,

    /// Process every table `dap list` reports for the namespace
    #[arg(long, conflicts_with = "tables")]
    discover: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize logging based on debug flag
    if cli.debug {
        env_logger::Builder::from_env(env_logger::Env::default())
            .filter_level(log::LevelFilter::Debug)
            .filter_module("dapsync_core", log::LevelFilter::Debug)
            .filter_module("dapsync_cli", log::LevelFilter::Debug)
            .format_timestamp_millis()
            .init();
        eprintln!("Debug logging enabled");
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    }

    let debug = cli.debug;
    let code = match run(cli).await {
        Ok(()) => ExitCode::Success,
        Err(error) => {
            eprintln!("{}", error.format_for_user(debug));
            error.exit_code()
        }
    };

    std::process::exit(code.code());
}

async fn run(cli: Cli) -> CliResult<()> {
    let manager = match cli.config {
        Some(path) => ConfigManager::with_path(path),
        None => ConfigManager::new(),
    };
    log::debug!("Loading configuration from {}", manager.get_config_path().display());

    let mut config = manager.load()?;
    config.apply_cli_overrides(&CliOverrides {
        tables: cli.tables,
        max_concurrency: cli.max_concurrency,
        table_timeout_seconds: cli.table_timeout,
    });

    let format = match cli.format {
        Some(format) => format,
        None => OutputFormat::from_string(&config.output.format)
            .map_err(|e| CliError::misuse(&e.to_string()))?,
    };

    // Everything is validated before the first table starts
    let settings = config.resolve(cli.profile)?;
    log::debug!(
        "Profile '{}': {} tables, namespace '{}'",
        cli.profile.as_str(),
        settings.tables.len(),
        settings.session.namespace()
    );

    let options = SyncOptions {
        format,
        colorize: terminal::should_colorize(config.output.color_enabled),
        discover: cli.discover,
    };

    SyncOrchestrator::new(settings, options).execute().await?;
    Ok(())
}
