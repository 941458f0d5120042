use std::path::PathBuf;

use reqif::Config;
use tracing::instrument;

use super::{DEFAULT_CONFIG, terminal::Style};

#[derive(Debug, clap::Parser)]
pub struct Command {
    /// Directory to write the configuration file into
    #[arg(default_value = ".")]
    directory: PathBuf,
}

impl Command {
    #[instrument]
    pub fn run(self) -> anyhow::Result<()> {
        let path = self.directory.join(DEFAULT_CONFIG);
        if path.exists() {
            anyhow::bail!("Configuration already exists: {}", path.display());
        }

        Config::default()
            .save(&path)
            .map_err(|e| anyhow::anyhow!("Failed to create {DEFAULT_CONFIG}: {e}"))?;

        println!("{}", Style::detect().success(&format!("Created: {}", path.display())));
        Ok(())
    }
}
