//! Environment handling for config values.
//!
//! Two mechanisms, applied in this order at load time:
//! - `${VAR_NAME}` references inside string values are substituted.
//!   Only uppercase `[A-Z_][A-Z0-9_]*` names match; `$${VAR}` is a literal.
//! - `FORESTCLAIM_*` variables override individual config fields.

use anyhow::{bail, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use std::collections::HashMap;
use tracing::{debug, warn};

use crate::schema::{ForestClaimConfig, GatewayConfig, LoggingConfig, OcrConfig};

pub const ENV_OCR_API_URL: &str = "FORESTCLAIM_OCR_API_URL";
pub const ENV_OCR_LANG: &str = "FORESTCLAIM_OCR_LANG";
pub const ENV_TESSERACT_PATH: &str = "FORESTCLAIM_TESSERACT_PATH";
pub const ENV_PORT: &str = "FORESTCLAIM_PORT";
pub const ENV_BIND: &str = "FORESTCLAIM_BIND";
pub const ENV_LOG_DIR: &str = "FORESTCLAIM_LOG_DIR";
pub const ENV_RUST_LOG: &str = "RUST_LOG";

/// `${VAR}` with an optional leading `$` marking an escaped reference.
static ENV_VAR_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\$?)\$\{([A-Z_][A-Z0-9_]*)\}").unwrap());

/// Error returned for missing env vars.
#[derive(Debug, thiserror::Error)]
#[error("Missing env var \"{var_name}\" referenced at config path: {config_path}")]
pub struct MissingEnvVarError {
    pub var_name: String,
    pub config_path: String,
}

/// Snapshot of the process environment.
pub fn process_env() -> HashMap<String, String> {
    std::env::vars().collect()
}

/// Substitute `${VAR}` references in a config JSON value tree.
pub fn resolve_env_vars(value: &Value) -> Result<Value> {
    resolve_env_vars_with(value, &process_env())
}

/// Substitute env vars using a provided map.
pub fn resolve_env_vars_with(value: &Value, env: &HashMap<String, String>) -> Result<Value> {
    substitute_value(value, env, "")
}

fn substitute_value(value: &Value, env: &HashMap<String, String>, path: &str) -> Result<Value> {
    match value {
        Value::String(s) => Ok(Value::String(substitute_string(s, env, path)?)),
        Value::Array(arr) => arr
            .iter()
            .enumerate()
            .map(|(i, v)| substitute_value(v, env, &format!("{path}[{i}]")))
            .collect::<Result<Vec<_>>>()
            .map(Value::Array),
        Value::Object(map) => {
            let mut result = serde_json::Map::new();
            for (k, v) in map {
                let child_path = if path.is_empty() {
                    k.clone()
                } else {
                    format!("{path}.{k}")
                };
                result.insert(k.clone(), substitute_value(v, env, &child_path)?);
            }
            Ok(Value::Object(result))
        }
        other => Ok(other.clone()),
    }
}

fn substitute_string(s: &str, env: &HashMap<String, String>, path: &str) -> Result<String> {
    if !s.contains('$') {
        return Ok(s.to_string());
    }

    let mut missing: Option<MissingEnvVarError> = None;
    let substituted = ENV_VAR_PATTERN.replace_all(s, |caps: &regex::Captures| {
        let var_name = &caps[2];
        if !caps[1].is_empty() {
            return format!("${{{var_name}}}");
        }
        match env.get(var_name) {
            Some(val) if !val.is_empty() => val.clone(),
            _ => {
                missing.get_or_insert_with(|| MissingEnvVarError {
                    var_name: var_name.to_string(),
                    config_path: path.to_string(),
                });
                String::new()
            }
        }
    });

    if let Some(err) = missing {
        bail!(err);
    }
    Ok(substituted.into_owned())
}

/// Apply `FORESTCLAIM_*` overrides (and `RUST_LOG` as the log level).
/// Empty variables are ignored; an unparseable port is logged and skipped.
pub fn apply_env_overrides(mut config: ForestClaimConfig, env: &HashMap<String, String>) -> ForestClaimConfig {
    let get = |name: &str| {
        env.get(name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    };

    if let Some(url) = get(ENV_OCR_API_URL) {
        debug!(var = ENV_OCR_API_URL, "remote OCR endpoint set from environment");
        config.ocr.get_or_insert_with(OcrConfig::default).api_url = Some(url);
    }
    if let Some(lang) = get(ENV_OCR_LANG) {
        config.ocr.get_or_insert_with(OcrConfig::default).default_language = Some(lang);
    }
    if let Some(path) = get(ENV_TESSERACT_PATH) {
        config.ocr.get_or_insert_with(OcrConfig::default).tesseract_path = Some(path);
    }
    if let Some(bind) = get(ENV_BIND) {
        config.gateway.get_or_insert_with(GatewayConfig::default).bind = Some(bind);
    }
    if let Some(port) = get(ENV_PORT) {
        match port.parse::<u16>() {
            Ok(port) => config.gateway.get_or_insert_with(GatewayConfig::default).port = Some(port),
            Err(e) => warn!(var = ENV_PORT, value = %port, error = %e, "ignoring invalid port override"),
        }
    }
    if let Some(dir) = get(ENV_LOG_DIR) {
        config.logging.get_or_insert_with(LoggingConfig::default).dir = Some(dir);
    }
    if let Some(level) = get(ENV_RUST_LOG) {
        config.logging.get_or_insert_with(LoggingConfig::default).level = Some(level);
    }

    config
}

/// Check whether a string contains any env var references.
pub fn contains_env_var_reference(s: &str) -> bool {
    ENV_VAR_PATTERN
        .captures_iter(s)
        .any(|caps| caps[1].is_empty())
}
