//! # Records server
//!
//! ```bash
//! records-server serve --seed
//! records-server --config ./records-server.toml seed
//! records-server config init
//! ```
use clap::{Args, Parser, Subcommand, ValueEnum};
use env_logger::Env;
use log::{info, warn};
use records::error::RecordsError;
use records::{config, ApplicationRuntime, ApplicationRuntimeBuilder};
use records_server::AppState;
use std::path::{Path, PathBuf};
use std::process::exit;
use tokio::net::TcpListener;

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug)]
enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

#[derive(Parser)]
#[command(author, version, about)]
struct Opts {
    #[command(subcommand)]
    cmd: Command,

    #[arg(global = true, short, long)]
    verbosity: Option<LogLevel>,

    /// Configuration file, defaults to records-server.toml in the platform config directory
    #[arg(global = true, short, long)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the HTTP API
    Serve(Serve),
    /// Insert the administrator and sample records, then exit
    Seed,
    /// Inspect or create the configuration file
    Config {
        #[command(subcommand)]
        cmd: ConfigCommand,
    },
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Print the configuration in effect
    Show,
    /// Write a configuration file holding the defaults
    Init {
        /// Replace an existing file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Args)]
struct Serve {
    /// Seed the database before listening
    #[arg(long)]
    seed: bool,
    /// Overrides server.address of the configuration
    #[arg(short, long)]
    address: Option<String>,
}

#[tokio::main]
async fn main() {
    let opts = Opts::parse();
    configure_logging(opts.verbosity);

    let config_path = opts.config.as_deref();

    match opts.cmd {
        Command::Config { cmd } => {
            if let Err(e) = configuration(cmd, config_path) {
                eprintln!("ERROR: {e}");
                exit(4);
            }
        }
        cmd => {
            if let Err(e) = run(cmd, config_path).await {
                eprintln!("{e}");
                exit(1);
            }
        }
    }
}

fn configuration(cmd: ConfigCommand, path: Option<&Path>) -> anyhow::Result<()> {
    let file = path.map_or_else(config::configuration_file, Path::to_path_buf);
    match cmd {
        ConfigCommand::Show => {
            let cfg = config::load(path)?;
            println!("Configuration file {}:\n", file.to_string_lossy());
            println!("{}", config::to_toml_string(&cfg)?);
        }
        ConfigCommand::Init { force } => {
            config::create(&file, force)?;
            println!("Configuration saved to {}", file.to_string_lossy());
        }
    }
    Ok(())
}

async fn run(cmd: Command, config_path: Option<&Path>) -> Result<(), RecordsError> {
    let runtime = get_runtime(config_path)?;

    match cmd {
        // Needs no database, dispatched in main
        Command::Config { .. } => {}
        Command::Seed => {
            let report = runtime.seed()?;
            println!("Seeded {report}");
        }
        Command::Serve(serve) => {
            if serve.seed {
                runtime.seed()?;
            }
            let purged = runtime.auth_service().purge_expired()?;
            if purged > 0 {
                info!("Removed {purged} expired session(s)");
            }

            let address = serve
                .address
                .unwrap_or_else(|| runtime.config().server.address.clone());
            let listener = TcpListener::bind(&address).await?;
            records_server::serve(listener, AppState::from(&runtime), shutdown_signal()).await?;
        }
    }
    Ok(())
}

fn get_runtime(config_path: Option<&Path>) -> Result<ApplicationRuntime, RecordsError> {
    let config = config::load(config_path)?;
    info!("Using database {}", config.database.path);
    ApplicationRuntimeBuilder::new().with_config(config).build()
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Unable to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}

fn configure_logging(verbosity: Option<LogLevel>) {
    // If nothing else was specified in RUST_LOG, use 'info'
    env_logger::Builder::from_env(Env::default().default_filter_or(verbosity.map_or(
        "info",
        |lvl| match lvl {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        },
    )))
    .init();
}
