use std::path::{Path, PathBuf};

mod convert;
mod init;
mod terminal;

use clap::ArgAction;
use reqif::Config;
use tracing::debug;

/// Configuration file looked up in the working directory.
pub const DEFAULT_CONFIG: &str = "reqif.toml";

#[derive(Debug, clap::Parser)]
#[command(version, about)]
pub struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to a configuration file [default: reqif.toml, if present]
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        Self::setup_logging(self.verbose);

        match self.command {
            Command::Convert(command) => {
                let config = load_config(self.config.as_deref())?;
                command.run(&config)
            }
            Command::Init(command) => command.run(),
        }
    }

    fn setup_logging(verbosity: u8) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let level = match verbosity {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        };

        let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_thread_names(false)
            .with_line_number(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

#[derive(Debug, clap::Subcommand)]
pub enum Command {
    /// Convert a workbook into a ReqIF document
    Convert(convert::Command),

    /// Write a default configuration file
    Init(init::Command),
}

/// Loads the configuration named on the command line, or the default file if
/// it exists, or the built-in defaults.
fn load_config(explicit: Option<&Path>) -> anyhow::Result<Config> {
    match explicit {
        Some(path) => Config::load(path).map_err(|e| anyhow::anyhow!(e)),
        None => {
            let path = Path::new(DEFAULT_CONFIG);
            if path.exists() {
                Config::load(path).map_err(|e| anyhow::anyhow!(e))
            } else {
                debug!("no {DEFAULT_CONFIG} found, using defaults");
                Ok(Config::default())
            }
        }
    }
}
