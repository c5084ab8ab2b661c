pub mod error;
pub mod fields;
pub mod submission;
pub mod types;

pub use error::ClaimError;
pub use fields::{ClaimType, EvidenceTag, FieldKey, Gender, LandUseType};
pub use submission::{generate_ack_id, ClaimSubmission};
pub use types::{
    AttachmentRef, AttachmentSlot, Attachments, ExtractedFields, FormState, TouchedFields,
};
