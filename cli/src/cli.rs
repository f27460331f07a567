use std::fmt::{self, Formatter};

use clap::{Args, Parser, Subcommand, ValueEnum};
use records_api::models::record::{Priority, RecordStatus};

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug)]
pub(crate) enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Error => write!(f, "error"),
        }
    }
}

#[derive(Parser)]
/// Records utility - sign in to a Records server and list, add, update and delete your records
///
/// Status is one of ACTIVE, INACTIVE or PENDING and priority one of LOW, MEDIUM or HIGH,
/// in any letter case.
#[command(author, version, about)] // Read from Cargo.toml
pub(crate) struct Opts {
    #[command(subcommand)]
    pub cmd: Command,

    #[arg(global = true, short, long)]
    pub verbosity: Option<LogLevel>,
}

#[derive(Subcommand)]
pub(crate) enum Command {
    /// Subcommands for configuration
    Config(Config),
    /// Create an account, signing in if the server allows it
    Register(Register),
    /// Sign in and remember the token
    Login(Login),
    /// Sign out and forget the token
    Logout,
    /// Show your profile, or change your name with --name
    Profile(Profile),
    /// List your records
    List(List),
    /// Show a single record
    Show(Show),
    /// Add a record
    Add(Add),
    /// Change fields of a record
    Update(Update),
    /// Delete a record
    Del(Show),
    /// Count your records by status
    Stats,
}

#[derive(Args)]
pub(crate) struct Config {
    #[command(subcommand)]
    pub cmd: ConfigCommand,
}

/// Create, modify or list the configuration file.
#[derive(Subcommand, Clone)]
pub(crate) enum ConfigCommand {
    /// Update the configuration file
    Update(UpdateConfiguration),
    /// write current configuration to standard output
    List,
    /// Remove the current configuration
    Remove,
}

#[derive(Args, Clone)]
pub(crate) struct UpdateConfiguration {
    /// The base url of the API, typically <http://localhost:3001/api>
    #[arg(long)]
    pub url: String,
}

#[derive(Args)]
pub(crate) struct Register {
    #[arg(short, long)]
    pub email: String,
    #[arg(short, long)]
    pub password: String,
    #[arg(short, long)]
    pub name: String,
}

#[derive(Args)]
pub(crate) struct Login {
    #[arg(short, long)]
    pub email: String,
    #[arg(short, long)]
    pub password: String,
}

#[derive(Args)]
pub(crate) struct Profile {
    /// New display name
    #[arg(short, long)]
    pub name: Option<String>,
}

#[derive(Args)]
pub(crate) struct List {
    #[arg(short, long, default_value_t = 1)]
    pub page: u32,
    #[arg(short, long, default_value_t = 10)]
    pub limit: u32,
    /// Only records whose title or description contains this text
    #[arg(short, long)]
    pub search: Option<String>,
    #[arg(long)]
    pub status: Option<RecordStatus>,
}

#[derive(Args)]
pub(crate) struct Show {
    /// Id of the record
    pub id: String,
}

#[derive(Args)]
pub(crate) struct Add {
    #[arg(short, long)]
    pub title: String,
    #[arg(short, long, default_value = "")]
    pub description: String,
    #[arg(long)]
    pub status: Option<RecordStatus>,
    #[arg(long)]
    pub priority: Option<Priority>,
}

#[derive(Args)]
pub(crate) struct Update {
    /// Id of the record
    pub id: String,
    #[arg(short, long)]
    pub title: Option<String>,
    #[arg(short, long)]
    pub description: Option<String>,
    #[arg(long)]
    pub status: Option<RecordStatus>,
    #[arg(long)]
    pub priority: Option<Priority>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_list_filters() {
        let opts = Opts::try_parse_from(["records", "list", "--status", "pending", "-s", "report"])
            .unwrap();
        match opts.cmd {
            Command::List(list) => {
                assert_eq!(list.status, Some(RecordStatus::Pending));
                assert_eq!(list.search.as_deref(), Some("report"));
                assert_eq!((list.page, list.limit), (1, 10));
            }
            _ => panic!("expected list"),
        }
    }

    #[test]
    fn rejects_unknown_priority() {
        assert!(Opts::try_parse_from(["records", "add", "-t", "x", "--priority", "urgent"]).is_err());
    }
}
