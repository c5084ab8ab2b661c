//! ForestClaim runtime configuration schema.
//!
//! Every leaf is optional so a partial YAML file deserializes cleanly;
//! [`crate::defaults::apply_all_defaults`] fills the gaps and the accessor
//! methods fall back to the same defaults.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::defaults::{
    DEFAULT_BIND, DEFAULT_LANGUAGE, DEFAULT_LOG_LEVEL, DEFAULT_PORT, DEFAULT_TESSERACT_PATH,
};

/// Root configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForestClaimConfig {
    /// Recognition backend settings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ocr: Option<OcrConfig>,

    /// HTTP form gateway
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gateway: Option<GatewayConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OcrConfig {
    /// Remote recognition endpoint. Unset means the local engine is used.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,

    /// Tesseract language code, e.g. `eng` or `eng+hin`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_language: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tesseract_path: Option<String>,

    /// Remote request timeout in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bind: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoggingConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,

    /// Directory for the rolling NDJSON log file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<String>,

    /// JSON console output.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub json: Option<bool>,
}

impl ForestClaimConfig {
    pub fn api_url(&self) -> Option<&str> {
        self.ocr
            .as_ref()
            .and_then(|o| o.api_url.as_deref())
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    pub fn default_language(&self) -> &str {
        self.ocr
            .as_ref()
            .and_then(|o| o.default_language.as_deref())
            .unwrap_or(DEFAULT_LANGUAGE)
    }

    pub fn tesseract_path(&self) -> PathBuf {
        PathBuf::from(
            self.ocr
                .as_ref()
                .and_then(|o| o.tesseract_path.as_deref())
                .unwrap_or(DEFAULT_TESSERACT_PATH),
        )
    }

    pub fn timeout_secs(&self) -> Option<u64> {
        self.ocr.as_ref().and_then(|o| o.timeout_secs)
    }

    pub fn bind(&self) -> &str {
        self.gateway
            .as_ref()
            .and_then(|g| g.bind.as_deref())
            .unwrap_or(DEFAULT_BIND)
    }

    pub fn port(&self) -> u16 {
        self.gateway
            .as_ref()
            .and_then(|g| g.port)
            .unwrap_or(DEFAULT_PORT)
    }

    pub fn log_level(&self) -> &str {
        self.logging
            .as_ref()
            .and_then(|l| l.level.as_deref())
            .unwrap_or(DEFAULT_LOG_LEVEL)
    }

    pub fn log_dir(&self) -> Option<PathBuf> {
        self.logging
            .as_ref()
            .and_then(|l| l.dir.as_deref())
            .map(PathBuf::from)
    }

    pub fn log_json(&self) -> bool {
        self.logging.as_ref().and_then(|l| l.json).unwrap_or(false)
    }
}
