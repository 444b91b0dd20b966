//! svcman — service manager hook dispatch driver.
//!
//! Loads the plugin registry and fires one lifecycle hook across it.

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt};

use svcman_core::config::AppConfig;
use svcman_core::{AppError, HookKind};
use svcman_plugin::{ExecContext, PluginExecutor, PluginRegistry};

#[derive(Debug, Parser)]
#[command(name = "svcman", about = "Dispatch a lifecycle hook to the loaded plugins")]
struct Cli {
    /// Lifecycle hook to fire (e.g. `service_start_in`).
    hook: HookKind,

    /// Value passed to each plugin, usually the service or runlevel name.
    value: Option<String>,

    /// Override the configured plugin directory.
    #[arg(long)]
    plugin_dir: Option<PathBuf>,
}

fn main() {
    let cli = Cli::parse();

    let config = match load_configuration() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(cli, config) {
        tracing::error!("Hook dispatch error: {e}");
        std::process::exit(1);
    }
}

/// Load configuration from file and environment
fn load_configuration() -> Result<AppConfig, AppError> {
    let env = std::env::var("SVCMAN_ENV").unwrap_or_else(|_| "default".to_string());
    AppConfig::load(&env)
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt().json().with_env_filter(filter).with_target(true).init();
        }
        _ => {
            fmt().pretty().with_env_filter(filter).with_target(true).init();
        }
    }
}

fn run(cli: Cli, config: AppConfig) -> Result<(), AppError> {
    let directory = match cli.plugin_dir {
        Some(dir) => dir,
        None => {
            if !config.plugins.auto_load {
                tracing::info!("Plugin auto-load disabled, nothing to dispatch");
                return Ok(());
            }
            PathBuf::from(&config.plugins.directory)
        }
    };

    let ctx = ExecContext::new();
    let mut registry = PluginRegistry::new(directory);
    registry.load(&ctx)?;

    tracing::info!(
        hook = %cli.hook,
        value = cli.value.as_deref().unwrap_or(""),
        plugins = registry.len(),
        "Dispatching hook"
    );

    PluginExecutor::new().run(&registry, &ctx, cli.hook, cli.value.as_deref())?;

    registry.unload();
    Ok(())
}
