//! Runtime settings derived from the loaded [`ForestClaimConfig`].

use std::time::Duration;

use forestclaim_config::ForestClaimConfig;
use forestclaim_logging::LoggerOptions;
use forestclaim_understanding::RecognitionSettings;

pub fn recognition_settings(config: &ForestClaimConfig) -> RecognitionSettings {
    RecognitionSettings {
        api_url: config.api_url().map(str::to_string),
        default_language: config.default_language().to_string(),
        tesseract_path: config.tesseract_path(),
        timeout: config.timeout_secs().map(Duration::from_secs),
    }
}

pub fn logger_options(config: &ForestClaimConfig, level: Option<&str>) -> LoggerOptions {
    LoggerOptions {
        level: level.unwrap_or(config.log_level()).to_string(),
        dir: config.log_dir(),
        json: config.log_json(),
    }
}

/// `bind:port`, with command-line overrides taking precedence.
pub fn server_addr(config: &ForestClaimConfig, port: Option<u16>, bind: Option<&str>) -> String {
    format!(
        "{}:{}",
        bind.unwrap_or(config.bind()),
        port.unwrap_or(config.port())
    )
}
