//! Config defaults: applies default values to a parsed config.

use crate::schema::{ForestClaimConfig, GatewayConfig, LoggingConfig, OcrConfig};

pub const DEFAULT_LANGUAGE: &str = "eng";

pub const DEFAULT_TESSERACT_PATH: &str = "tesseract";

/// Remote recognition timeout in seconds.
pub const DEFAULT_OCR_TIMEOUT_SECS: u64 = 60;

pub const DEFAULT_BIND: &str = "127.0.0.1";

pub const DEFAULT_PORT: u16 = 8787;

pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Apply all defaults to a freshly loaded config.
pub fn apply_all_defaults(config: ForestClaimConfig) -> ForestClaimConfig {
    let config = apply_ocr_defaults(config);
    let config = apply_gateway_defaults(config);
    apply_logging_defaults(config)
}

fn apply_ocr_defaults(mut config: ForestClaimConfig) -> ForestClaimConfig {
    let ocr = config.ocr.get_or_insert_with(OcrConfig::default);
    ocr.default_language
        .get_or_insert_with(|| DEFAULT_LANGUAGE.to_string());
    ocr.tesseract_path
        .get_or_insert_with(|| DEFAULT_TESSERACT_PATH.to_string());
    ocr.timeout_secs.get_or_insert(DEFAULT_OCR_TIMEOUT_SECS);
    config
}

fn apply_gateway_defaults(mut config: ForestClaimConfig) -> ForestClaimConfig {
    let gateway = config.gateway.get_or_insert_with(GatewayConfig::default);
    gateway.bind.get_or_insert_with(|| DEFAULT_BIND.to_string());
    gateway.port.get_or_insert(DEFAULT_PORT);
    config
}

fn apply_logging_defaults(mut config: ForestClaimConfig) -> ForestClaimConfig {
    let logging = config.logging.get_or_insert_with(LoggingConfig::default);
    logging
        .level
        .get_or_insert_with(|| DEFAULT_LOG_LEVEL.to_string());
    logging.json.get_or_insert(false);
    config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_empty_config() {
        let config = apply_all_defaults(ForestClaimConfig::default());
        let ocr = config.ocr.as_ref().unwrap();
        assert_eq!(ocr.default_language.as_deref(), Some(DEFAULT_LANGUAGE));
        assert_eq!(ocr.timeout_secs, Some(DEFAULT_OCR_TIMEOUT_SECS));
        assert!(ocr.api_url.is_none());
        assert_eq!(config.port(), DEFAULT_PORT);
        assert_eq!(config.log_level(), DEFAULT_LOG_LEVEL);
    }

    #[test]
    fn defaults_keep_explicit_values() {
        let config = ForestClaimConfig {
            ocr: Some(OcrConfig {
                default_language: Some("hin".into()),
                ..Default::default()
            }),
            ..Default::default()
        };
        let config = apply_all_defaults(config);
        assert_eq!(config.default_language(), "hin");
    }
}
