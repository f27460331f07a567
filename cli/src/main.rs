//! # The Records Command Line Utility
//!
//! Signs in to a Records server and manages your records from the terminal.
//!
//! ## Configuration
//! Point the tool at your server, the default is `http://localhost:3001/api`:
//! ```bash
//! records config update --url http://records.example.com/api
//! ```
//! `RECORDS_API_URL` overrides the configured url.
//!
//! ## Usage Examples
//! ```bash
//! records register -e ada@example.com -p secret1 -n "Ada Lovelace"
//! records login -e ada@example.com -p secret1
//! records add -t "Quarterly report" -d "Numbers for Q3" --priority high
//! records list --status active -s report
//! records update 6f1c... --status inactive
//! records del 6f1c...
//! records logout
//! ```
//!
//! The token received at sign in is kept in the platform data directory until `logout`.
use clap::Parser;
use cli::{Command, LogLevel, Opts};
use commands::{account, configuration, records as record_commands};
use env_logger::Env;
use log::debug;
use records_api::auth_session::AuthSession;
use records_api::records_store::RecordsStore;
use records_api::token_store::{FileTokenStore, TokenStore};
use records_api::{config, RecordsApi};
use std::env;
use std::fs::File;
use std::process::exit;
use std::sync::Arc;

mod cli;
mod commands;

#[tokio::main]
async fn main() {
    let opts: Opts = Opts::parse();

    configure_logging(&opts); // Handles the -v option

    let outcome = match opts.cmd {
        Command::Config(config) => {
            configuration::execute(config.cmd);
            Ok(())
        }
        Command::Register(args) => account::register(&mut auth_session(), args)
            .await
            .map_err(|e| e.0),
        Command::Login(args) => account::login(&mut auth_session(), args)
            .await
            .map_err(|e| e.0),
        Command::Logout => {
            account::logout(&mut auth_session()).await;
            Ok(())
        }
        Command::Profile(args) => account::profile(&mut auth_session(), args)
            .await
            .map_err(|e| e.0),
        Command::List(args) => record_commands::list(&mut records_store(), args)
            .await
            .map_err(|e| e.0),
        Command::Show(args) => record_commands::show(&records_store(), args)
            .await
            .map_err(|e| e.0),
        Command::Add(args) => record_commands::add(&mut records_store(), args)
            .await
            .map_err(|e| e.0),
        Command::Update(args) => record_commands::update(&mut records_store(), args)
            .await
            .map_err(|e| e.0),
        Command::Del(args) => record_commands::delete(&mut records_store(), args)
            .await
            .map_err(|e| e.0),
        Command::Stats => record_commands::stats(&mut records_store())
            .await
            .map_err(|e| e.0),
    };

    if let Err(message) = outcome {
        eprintln!("ERROR: {message}");
        exit(1);
    }
}

fn token_store() -> Arc<dyn TokenStore> {
    Arc::new(FileTokenStore::new(config::token_file()))
}

/// Creates the client from the configuration file, `RECORDS_API_URL` taking precedence
fn get_client() -> RecordsApi {
    let client_config = match config::load_or_default() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("ERROR: Unable to read the configuration: {e}");
            exit(4);
        }
    };
    match RecordsApi::builder()
        .base_url(client_config.server.url)
        .from_env()
        .token_store(token_store())
        .build()
    {
        Ok(client) => client,
        Err(e) => {
            eprintln!("ERROR: Unable to create the client: {e}");
            exit(4);
        }
    }
}

fn auth_session() -> AuthSession<RecordsApi> {
    AuthSession::new(get_client(), token_store())
}

fn records_store() -> RecordsStore<RecordsApi> {
    RecordsStore::new(get_client())
}

fn configure_logging(opts: &Opts) {
    let mut tmp_dir = env::temp_dir();
    tmp_dir.push("records.log");

    if let Some(level) = opts.verbosity {
        println!("Logging {level} and above to {}", &tmp_dir.to_string_lossy());
    }

    let target = match File::create(&tmp_dir) {
        Ok(file) => Box::new(file),
        Err(e) => {
            eprintln!("Can't create log file {}: {e}", tmp_dir.to_string_lossy());
            return;
        }
    };

    // If nothing else was specified in RUST_LOG, use 'warn'
    env_logger::Builder::from_env(Env::default().default_filter_or(opts.verbosity.map_or(
        "warn",
        |lvl| match lvl {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        },
    )))
    .target(env_logger::Target::Pipe(target))
    .init();
    debug!("Logging started");
}
