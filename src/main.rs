//! LLMBox CLI - serve the comparison API for free LLMs.

use clap::{Parser, Subcommand};
use llmbox::api::{cors_layer, create_router_with_state, AppState};
use llmbox::catalog::CatalogLoader;
use llmbox::compare::Comparator;
use llmbox::config::{Config, LogVerbosity};
use llmbox::logger::print_catalog;
use std::path::PathBuf;
use tokio::signal;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "llmbox")]
#[command(about = "Compare responses from free LLMs side by side")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the comparison server
    Serve {
        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,

        /// Log verbosity level
        #[arg(short, long, value_enum)]
        log_level: Option<LogLevel>,

        /// Config file path
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Discover free models once and print them
    Models {
        /// Log verbosity level
        #[arg(short, long, value_enum)]
        log_level: Option<LogLevel>,

        /// Config file path
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Show current configuration
    Config {
        /// Show config file path
        #[arg(long)]
        path: bool,

        /// Write a default config file if none exists
        #[arg(long)]
        init: bool,
    },
}

#[derive(Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum LogLevel {
    Minimal,
    Compact,
    Verbose,
}

impl From<LogLevel> for LogVerbosity {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Minimal => LogVerbosity::Minimal,
            LogLevel::Compact => LogVerbosity::Compact,
            LogLevel::Verbose => LogVerbosity::Verbose,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env is normal outside development
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Serve { port, log_level, config }) => {
            run_server(port, log_level, config).await?;
        }
        Some(Commands::Models { log_level, config }) => {
            list_models(log_level, config).await?;
        }
        Some(Commands::Config { path, init }) => {
            show_config(path, init)?;
        }
        None => {
            run_server(None, None, None).await?;
        }
    }

    Ok(())
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();
}

fn load_config(
    config_path: Option<PathBuf>,
    log_level: Option<LogLevel>,
) -> anyhow::Result<Config> {
    let mut config = match config_path {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    }
    .with_env_overrides();

    if let Some(level) = log_level {
        config.app.log_verbosity = level.into();
    }
    Ok(config)
}

async fn run_server(
    port_override: Option<u16>,
    log_level: Option<LogLevel>,
    config_path: Option<PathBuf>,
) -> anyhow::Result<()> {
    init_tracing();

    let mut config = load_config(config_path, log_level)?;
    if let Some(port) = port_override {
        config.server.port = port;
    }

    let addr = format!("{}:{}", config.server.host, config.server.port);

    // Discovery runs once; the result is fixed for the process lifetime
    let catalog = CatalogLoader::from_config(&config)?.load_catalog().await;
    let comparator = Comparator::from_config(&config)?;
    let cors = cors_layer(&config.cors)?;

    let app = create_router_with_state(AppState::new(catalog, comparator), cors);

    match config.app.log_verbosity {
        LogVerbosity::Minimal => {
            println!("llmbox:{}", config.server.port);
        }
        LogVerbosity::Compact => {
            println!("→ LLMBox starting on http://{}", addr);
        }
        LogVerbosity::Verbose => {
            println!("────────────────────────────────────────");
            println!("LLMBox v{}", env!("CARGO_PKG_VERSION"));
            println!("────────────────────────────────────────");
            println!("Server:     http://{}", addr);
            println!("Models:     http://{}/models", addr);
            println!("Compare:    http://{}/compare", addr);
            println!("Upstream:   {}", config.upstream.base());
            println!("CORS:       {}", config.cors.normalized_origin());
            println!("────────────────────────────────────────");
        }
    }

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    println!("\nLLMBox stopped.");
    Ok(())
}

async fn list_models(
    log_level: Option<LogLevel>,
    config_path: Option<PathBuf>,
) -> anyhow::Result<()> {
    init_tracing();

    let config = load_config(config_path, log_level)?;
    let catalog = CatalogLoader::from_config(&config)?.load_catalog().await;

    print_catalog(&mut std::io::stdout().lock(), &catalog, config.app.log_verbosity)?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}

fn show_config(show_path: bool, init: bool) -> anyhow::Result<()> {
    if init {
        let path = Config::default_path();
        if Config::init_at(path.clone())? {
            println!("Created {}", path.display());
        } else {
            println!("Config already exists at {}", path.display());
        }
        return Ok(());
    }

    if show_path {
        println!("{}", Config::default_path().display());
        return Ok(());
    }

    let config = Config::load()?.with_env_overrides();
    println!("{}", toml::to_string_pretty(&config.redacted())?);
    Ok(())
}
