//! `forestclaim config`: inspect or create the config file.

use std::path::Path;

use anyhow::{bail, Result};
use clap::Subcommand;
use forestclaim_config::{apply_all_defaults, redacted_yaml, write_config, ForestClaimConfig};

use crate::terminal_output::{note_info, note_success};

#[derive(Debug, Default, Subcommand)]
pub enum ConfigAction {
    /// Print the effective config with credentials masked
    #[default]
    Show,
    /// Print the config file path
    Path,
    /// Write a config file populated with defaults
    Init {
        /// Replace an existing file
        #[arg(long)]
        force: bool,
    },
}

pub async fn run(config: &ForestClaimConfig, path: &Path, action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Show => {
            note_info(&format!("Config file: {}", path.display()));
            print!("{}", redacted_yaml(config)?);
        }
        ConfigAction::Path => println!("{}", path.display()),
        ConfigAction::Init { force } => {
            if path.exists() && !force {
                bail!("{} already exists; pass --force to overwrite", path.display());
            }
            write_config(&apply_all_defaults(ForestClaimConfig::default()), path).await?;
            note_success(&format!("Wrote {}", path.display()));
        }
    }
    Ok(())
}
