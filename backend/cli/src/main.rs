mod autofill_cmd;
mod config;
mod config_cmd;
mod extract_cmd;
mod ocr_cmd;
mod serve_cmd;
mod status_cmd;
mod terminal_output;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use forestclaim_config::{config_dir, config_file_path, load_and_prepare};
use forestclaim_logging::init_logger;

use autofill_cmd::AutofillArgs;

#[derive(Parser)]
#[command(name = "forestclaim")]
#[command(about = "ForestClaim: OCR autofill for Forest Rights Act claim forms")]
#[command(version)]
struct Cli {
    /// Config file (default: ~/.forestclaim/config.yaml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log filter used when RUST_LOG is unset, e.g. `debug`
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Recognize the text in a scanned claim document
    Ocr {
        /// Image file (jpg, png, tiff, ...)
        image: PathBuf,
        /// Recognition language, e.g. `eng` or `eng+hin`
        #[arg(short, long)]
        lang: Option<String>,
        /// Write the recognized text to this file instead of stdout
        #[arg(long)]
        save_text: Option<PathBuf>,
        /// Answer with this file's text instead of running an engine
        #[arg(long)]
        text_fixture: Option<PathBuf>,
    },
    /// Extract claim fields from document text as JSON
    Extract {
        /// Text file; reads stdin when omitted
        file: Option<PathBuf>,
    },
    /// Fill a claim form from a scanned image or from document text
    Autofill(AutofillArgs),
    /// Start the HTTP API
    Serve {
        /// Port to bind the HTTP server to
        #[arg(short, long)]
        port: Option<u16>,
        /// Address to bind to
        #[arg(long)]
        bind: Option<String>,
    },
    /// Query the health endpoint of a running server
    Status,
    /// Show or initialize the configuration
    Config {
        #[command(subcommand)]
        action: Option<config_cmd::ConfigAction>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| config_file_path(&config_dir()));
    let config = load_and_prepare(&config_path)
        .await
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;

    init_logger(&config::logger_options(&config, cli.log_level.as_deref()));

    match cli.command {
        Commands::Ocr {
            image,
            lang,
            save_text,
            text_fixture,
        } => {
            ocr_cmd::run(
                &config,
                &image,
                lang.as_deref(),
                save_text.as_deref(),
                text_fixture.as_deref(),
            )
            .await
        }
        Commands::Extract { file } => extract_cmd::run(file.as_deref()).await,
        Commands::Autofill(args) => autofill_cmd::run(&config, args).await,
        Commands::Serve { port, bind } => serve_cmd::run(&config, port, bind.as_deref()).await,
        Commands::Status => status_cmd::run(&config).await,
        Commands::Config { action } => {
            config_cmd::run(&config, &config_path, action.unwrap_or_default()).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn autofill_accepts_text_with_touched_list() {
        let cli = Cli::try_parse_from([
            "forestclaim",
            "autofill",
            "--text",
            "claim.txt",
            "--touched",
            "village,age",
        ])
        .unwrap();
        match cli.command {
            Commands::Autofill(args) => {
                assert_eq!(args.text, Some(PathBuf::from("claim.txt")));
                assert_eq!(args.touched, vec!["village", "age"]);
            }
            _ => panic!("expected autofill"),
        }
    }

    #[test]
    fn text_fixture_needs_an_image() {
        assert!(Cli::try_parse_from(["forestclaim", "autofill", "--text-fixture", "scan.txt"]).is_err());
        let cli = Cli::try_parse_from([
            "forestclaim",
            "autofill",
            "scan.jpg",
            "--text-fixture",
            "scan.txt",
        ])
        .unwrap();
        match cli.command {
            Commands::Autofill(args) => {
                assert_eq!(args.text_fixture, Some(PathBuf::from("scan.txt")));
            }
            _ => panic!("expected autofill"),
        }
    }

    #[test]
    fn autofill_needs_an_input() {
        assert!(Cli::try_parse_from(["forestclaim", "autofill"]).is_err());
        assert!(
            Cli::try_parse_from(["forestclaim", "autofill", "scan.jpg", "--text", "claim.txt"]).is_err()
        );
    }
}
