//! `forestclaim-config`: runtime configuration for ForestClaim.
//!
//! Provides:
//! - Typed config schema (OCR backend, gateway, logging)
//! - YAML read/write
//! - `${ENV_VAR}` substitution and `FORESTCLAIM_*` overrides
//! - Default value application
//! - Validation and redaction for safe display

pub mod defaults;
pub mod env;
pub mod io;
pub mod redact;
pub mod schema;
pub mod validation;

pub use defaults::apply_all_defaults;
pub use env::{apply_env_overrides, resolve_env_vars, resolve_env_vars_with, MissingEnvVarError};
pub use io::{config_dir, config_file_path, load_config, write_config};
pub use redact::{redact, redact_url};
pub use schema::{ForestClaimConfig, GatewayConfig, LoggingConfig, OcrConfig};
pub use validation::{validate, ConfigValidationError, ValidationReport};

use anyhow::{bail, Context, Result};
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;

/// Load a config file and run it through the full pipeline using the
/// process environment.
pub async fn load_and_prepare(path: &Path) -> Result<ForestClaimConfig> {
    load_and_prepare_with(path, &env::process_env()).await
}

/// Load, substitute `${VAR}` references, apply env overrides and defaults,
/// then validate. Warnings are logged; errors fail the load.
pub async fn load_and_prepare_with(
    path: &Path,
    env: &HashMap<String, String>,
) -> Result<ForestClaimConfig> {
    let raw_config = load_config(path).await?;

    let value: Value =
        serde_json::to_value(&raw_config).context("Failed to serialize config for processing")?;
    let value = resolve_env_vars_with(&value, env).context("Failed to resolve env vars in config")?;
    let config: ForestClaimConfig =
        serde_json::from_value(value).context("Failed to deserialize config after processing")?;

    let config = apply_env_overrides(config, env);
    let config = apply_all_defaults(config);

    let report = validate(&config);
    for warning in &report.warnings {
        tracing::warn!(path = %warning.path, message = %warning.message, "Config warning");
    }
    for error in &report.errors {
        tracing::error!(path = %error.path, message = %error.message, "Config error");
    }
    if let Some(first) = report.errors.into_iter().next() {
        bail!(first);
    }

    Ok(config)
}

/// Pretty YAML of the config with credentials masked.
pub fn redacted_yaml(config: &ForestClaimConfig) -> Result<String> {
    let value = serde_json::to_value(config).context("Failed to serialize config")?;
    serde_yaml::to_string(&redact(&value)).context("Failed to render config as YAML")
}
