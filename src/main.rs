use clap::Parser;
use eyre::{Context, Result};
use log::info;
use std::fs;
use std::path::Path;

mod brand;
mod cli;
mod commands;
mod config;
mod plugin;

use brand::registry::BrandRegistry;
use cli::{Cli, Commands, OutputFormat};
use config::{Config, LogLevel};

fn setup_logging(log_level: LogLevel, verbose: bool) -> Result<()> {
    let log_dir = Config::brandkit_dir().join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let log_file = log_dir.join("brandkit.log");

    let target = Box::new(
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .context("Failed to open log file")?,
    );

    // RUST_LOG env var takes precedence, otherwise use config log_level
    let mut builder = env_logger::Builder::new();

    if std::env::var("RUST_LOG").is_ok() {
        builder.parse_default_env();
    } else if verbose {
        builder.filter_level(log_level.to_level_filter().max(log::LevelFilter::Debug));
    } else {
        builder.filter_level(log_level.to_level_filter());
    }

    builder.target(env_logger::Target::Pipe(target)).init();

    info!("Logging initialized, writing to: {}", log_file.display());
    info!(
        "Log level: {} (from {})",
        log_level.as_filter(),
        if std::env::var("RUST_LOG").is_ok() { "RUST_LOG env" } else { "config" }
    );
    Ok(())
}

fn open_registry(brands: Option<&Path>, brand: Option<&str>, config: &Config) -> BrandRegistry {
    let path = brands
        .map(Config::expand_path)
        .unwrap_or_else(|| config.brands.resolved_path());
    let initial = brand.map(str::to_string).unwrap_or_else(|| config.brands.initial_brand());

    let registry = BrandRegistry::load_with_brand(&path, initial);
    info!(
        "Opened brand table {} ({} brands), current brand '{}'",
        path.display(),
        registry.len(),
        registry.get_current_brand_key()
    );
    registry
}

fn run(cli: Cli, config: Config) -> Result<()> {
    let registry = || open_registry(cli.brands.as_deref(), cli.brand.as_deref(), &config);

    match cli.command {
        Commands::List { format } => commands::brand::list(&registry(), OutputFormat::resolve(format)),
        Commands::Show { key, format } => {
            commands::brand::show(&registry(), key.as_deref(), OutputFormat::resolve(format))
        }
        Commands::Personality => commands::brand::personality(&registry()),
        Commands::Name => commands::brand::name(&registry()),
        Commands::Set { key } => commands::brand::set(registry(), &key, cli.quiet),
        Commands::Functions { format } => commands::functions::run(registry(), OutputFormat::resolve(format)),
        Commands::Call { function, args } => commands::call::run(registry(), &function, &args),
        Commands::Session => commands::session::run(registry()),
        Commands::Config { action } => commands::config::run(action, &config),
        Commands::Completions { shell } => commands::completions::run(shell),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration (before logging, so log messages in Config::load are silent)
    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    setup_logging(config.log_level, cli.verbose).context("Failed to setup logging")?;

    info!("Starting brandkit with config from: {:?}", cli.config);

    run(cli, config).context("Command failed")?;

    Ok(())
}
