//! Config validation: schema checks with user-friendly error messages.

use crate::schema::ForestClaimConfig;
use thiserror::Error;

const LOG_LEVELS: [&str; 6] = ["trace", "debug", "info", "warn", "error", "off"];

/// A config validation error with field path and message.
#[derive(Debug, Error)]
#[error("Config validation error at '{path}': {message}")]
pub struct ConfigValidationError {
    pub path: String,
    pub message: String,
}

/// A collection of validation errors found in one pass.
#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }

    fn warn(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }
}

/// Validate the config and return a report of all errors and warnings.
pub fn validate(config: &ForestClaimConfig) -> ValidationReport {
    let mut report = ValidationReport::default();
    validate_ocr(config, &mut report);
    validate_gateway(config, &mut report);
    validate_logging(config, &mut report);
    report
}

fn validate_ocr(config: &ForestClaimConfig, report: &mut ValidationReport) {
    let Some(ocr) = &config.ocr else { return };

    if let Some(url) = config.api_url() {
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            report.error("ocr.apiUrl", "apiUrl must start with http:// or https://");
        } else if url.starts_with("http://")
            && !(url.contains("://localhost") || url.contains("://127.0.0.1"))
        {
            report.warn("ocr.apiUrl", "Images are uploaded over plain HTTP");
        }
    }

    if let Some(lang) = &ocr.default_language {
        if lang.trim().is_empty() {
            report.error("ocr.defaultLanguage", "defaultLanguage cannot be empty");
        } else if lang.chars().any(char::is_whitespace) {
            report.error(
                "ocr.defaultLanguage",
                format!("'{lang}' is not a language code; join several with '+', e.g. eng+hin"),
            );
        }
    }

    if let Some(path) = &ocr.tesseract_path {
        if path.trim().is_empty() {
            report.error("ocr.tesseractPath", "tesseractPath cannot be empty");
        }
    }

    if ocr.timeout_secs == Some(0) {
        report.error("ocr.timeoutSecs", "timeoutSecs must be > 0");
    }
}

fn validate_gateway(config: &ForestClaimConfig, report: &mut ValidationReport) {
    let Some(gw) = &config.gateway else { return };
    if let Some(port) = gw.port {
        if port == 0 {
            report.error("gateway.port", "port must be > 0");
        } else if port < 1024 && port != 80 && port != 443 {
            report.warn(
                "gateway.port",
                format!("Port {port} requires elevated privileges; consider using a port >= 1024"),
            );
        }
    }
    if let Some(bind) = &gw.bind {
        if bind.parse::<std::net::IpAddr>().is_err() && bind != "localhost" {
            report.error("gateway.bind", format!("'{bind}' is not an IP address"));
        }
    }
}

fn validate_logging(config: &ForestClaimConfig, report: &mut ValidationReport) {
    let Some(logging) = &config.logging else { return };
    if let Some(level) = &logging.level {
        // Directive lists like "forestclaim=debug,info" are passed to EnvFilter as-is.
        let simple = !level.contains('=') && !level.contains(',');
        if simple && !LOG_LEVELS.contains(&level.to_ascii_lowercase().as_str()) {
            report.warn("logging.level", format!("Unknown log level '{level}'; falling back to info"));
        }
    }
}
