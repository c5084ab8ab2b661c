//! Structured logging for ForestClaim.
//!
//! Console and rolling NDJSON output, redaction of personal identifiers
//! found in recognized text, and the autofill event trail.

pub mod event_logger;
pub mod logger;
pub mod redact;

pub use event_logger::{ClaimEvent, EventLogEntry, EventLogger};
pub use logger::{init_logger, LoggerOptions};
pub use redact::redact_sensitive_data;
