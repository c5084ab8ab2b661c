use thiserror::Error;

use crate::fields::FieldKey;
use crate::types::AttachmentSlot;

/// Top-level error type for claim form handling.
#[derive(Debug, Error)]
pub enum ClaimError {
    #[error("unknown field: {0}")]
    UnknownField(String),

    #[error("unknown attachment slot: {0}")]
    UnknownAttachment(String),

    #[error("invalid value for {field}: {value:?}")]
    InvalidValue { field: FieldKey, value: String },

    #[error("missing mandatory documents: {}", join_slots(.0))]
    MissingDocuments(Vec<AttachmentSlot>),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

fn join_slots(slots: &[AttachmentSlot]) -> String {
    slots
        .iter()
        .map(|s| s.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
