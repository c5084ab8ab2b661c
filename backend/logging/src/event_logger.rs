//! Autofill Event Logger
//!
//! Structured events (recognition, extraction, merge) for one claim form,
//! written through `tracing` so they land in the rolling NDJSON log.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::redact::redact_sensitive_data;

/// Characters of recognized text kept in a log preview.
pub const PREVIEW_CHARS: usize = 120;

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClaimEvent {
    Recognized {
        engine: String,
        elapsed_ms: u64,
        confidence: Option<f32>,
        preview: String,
    },
    RecognitionFailed {
        error_msg: String,
    },
    Autofilled {
        source: String,
        applied: Vec<String>,
        skipped: Vec<String>,
    },
    Submitted {
        ack_id: String,
    },
}

impl ClaimEvent {
    /// Redacted, shortened preview of recognized text.
    pub fn preview(text: &str) -> String {
        let head: String = text.chars().take(PREVIEW_CHARS).collect();
        redact_sensitive_data(&head)
    }
}

#[derive(Debug, Serialize)]
pub struct EventLogEntry {
    pub form_id: String,
    pub timestamp: DateTime<Utc>,
    pub event: ClaimEvent,
}

pub struct EventLogger;

impl EventLogger {
    /// Scrub free text in the event and emit it on the `claim_events` target.
    pub fn log_event(form_id: &str, event: ClaimEvent) -> EventLogEntry {
        let entry = EventLogEntry {
            form_id: form_id.into(),
            timestamp: Utc::now(),
            event: Self::scrub(event),
        };

        let json = serde_json::to_string(&entry).unwrap_or_default();
        info!(target: "claim_events", form_id = %entry.form_id, event = %json, "claim event");
        entry
    }

    fn scrub(mut event: ClaimEvent) -> ClaimEvent {
        match &mut event {
            ClaimEvent::Recognized { preview, .. } => {
                *preview = redact_sensitive_data(preview);
            }
            ClaimEvent::RecognitionFailed { error_msg } => {
                *error_msg = redact_sensitive_data(error_msg);
            }
            ClaimEvent::Autofilled { .. } | ClaimEvent::Submitted { .. } => {}
        }
        event
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognized_preview_is_redacted() {
        let entry = EventLogger::log_event(
            "form-1",
            ClaimEvent::Recognized {
                engine: "mock".into(),
                elapsed_ms: 12,
                confidence: Some(90.0),
                preview: "Aadhaar: 1234 5678 9012".into(),
            },
        );
        match entry.event {
            ClaimEvent::Recognized { preview, .. } => {
                assert_eq!(preview, "Aadhaar: [REDACTED_AADHAAR]");
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn preview_is_shortened() {
        let text = "x".repeat(PREVIEW_CHARS * 2);
        assert_eq!(ClaimEvent::preview(&text).chars().count(), PREVIEW_CHARS);
    }

    #[test]
    fn events_serialize_with_type_tag() {
        let json = serde_json::to_value(ClaimEvent::Submitted {
            ack_id: "FRA-250309-AB12".into(),
        })
        .unwrap();
        assert_eq!(json["type"], "submitted");
    }
}
