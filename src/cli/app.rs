//! CLI definitions and entry point

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use super::commands;
use idverify::config::{Config, ConfigOverrides};
use idverify::core::models::ApprovalFilter;
use idverify::output::OutputMode;

/// idverify - Identity document verification gateway
#[derive(Parser, Debug)]
#[command(
    name = "idverify",
    version,
    about = "Identity document verification gateway",
    long_about = "Forward identity document uploads to a verification provider.\n\n\
                  Results arrive synchronously from the upload and asynchronously on the\n\
                  callback endpoint; both are reconciled into one record per transaction,\n\
                  which an admin then approves or rejects."
)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output in JSON format (machine-readable)
    #[arg(long, global = true)]
    pub json: bool,

    /// Path to a TOML config file
    #[arg(short, long, global = true, env = "IDVERIFY_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub settings: Settings,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Settings that override the config file
#[derive(Args, Debug, Default)]
pub struct Settings {
    /// Interface to listen on
    #[arg(long, global = true, env = "HOST")]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(long, global = true, env = "PORT")]
    pub port: Option<u16>,

    /// Base URL of the verification provider
    #[arg(long, global = true, env = "BASE_URL")]
    pub base_url: Option<String>,

    /// Record store location: file://<path>, a directory, or memory://
    #[arg(long, global = true, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    /// Directory for uploaded documents
    #[arg(long, global = true, env = "UPLOAD_DIR")]
    pub upload_dir: Option<PathBuf>,

    /// Timeout for one provider call, in seconds
    #[arg(long, global = true, env = "VERIFIER_TIMEOUT_SECS")]
    pub verifier_timeout_secs: Option<u64>,

    /// Number of request worker threads
    #[arg(long, global = true, env = "WORKERS")]
    pub workers: Option<usize>,
}

impl From<Settings> for ConfigOverrides {
    fn from(settings: Settings) -> Self {
        Self {
            host: settings.host,
            port: settings.port,
            base_url: settings.base_url,
            database_url: settings.database_url,
            upload_dir: settings.upload_dir,
            verifier_timeout_secs: settings.verifier_timeout_secs,
            workers: settings.workers,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the HTTP service
    Serve,

    /// List verification records
    Results {
        /// Filter by decision: all, pending, approved, rejected
        #[arg(short, long, default_value = "all")]
        status: ApprovalFilter,
    },

    /// Show one verification record
    Show {
        /// Transaction GUID
        id: String,
    },

    /// Approve a verification record
    Approve {
        /// Transaction GUID
        id: String,
    },

    /// Reject a verification record
    Reject {
        /// Transaction GUID
        id: String,
    },

    /// Show version
    Version,
}

/// Run the CLI
pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    }

    let output_mode = if cli.json {
        OutputMode::Json
    } else {
        OutputMode::Human
    };

    let load_config = || -> anyhow::Result<Config> {
        Ok(Config::load(cli.config.as_deref())?.with_overrides(cli.settings.into()))
    };

    match cli.command {
        Some(Command::Serve) => commands::serve(&load_config()?),
        Some(Command::Results { status }) => commands::results(&load_config()?, status, output_mode),
        Some(Command::Show { id }) => commands::show(&load_config()?, &id, output_mode),
        Some(Command::Approve { id }) => {
            commands::decide(&load_config()?, &id, commands::Decision::Approve, output_mode)
        },
        Some(Command::Reject { id }) => {
            commands::decide(&load_config()?, &id, commands::Decision::Reject, output_mode)
        },
        Some(Command::Version) => {
            if output_mode == OutputMode::Json {
                println!(
                    "{}",
                    serde_json::json!({
                        "version": env!("CARGO_PKG_VERSION")
                    })
                );
            } else {
                println!("idverify v{}", env!("CARGO_PKG_VERSION"));
            }
            Ok(())
        },
        None => {
            if output_mode == OutputMode::Json {
                println!(
                    "{}",
                    serde_json::json!({
                        "version": env!("CARGO_PKG_VERSION"),
                        "hint": "Use --help for usage"
                    })
                );
            } else {
                println!("idverify v{}", env!("CARGO_PKG_VERSION"));
                println!("\nRun 'idverify --help' for usage");
                println!("Run 'idverify serve --base-url <URL>' to start the service");
            }
            Ok(())
        },
    }
}
