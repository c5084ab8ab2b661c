//! ForestClaim Gateway HTTP API
//!
//! Claim forms live in memory, one OCR session each. Clients upload a
//! scanned page, follow recognition progress over SSE and read back the
//! autofilled form.

pub mod attachments;
pub mod error;
pub mod extract_api;
pub mod forms_api;
pub mod health_api;
pub mod ocr_api;
pub mod server;
pub mod session_registry;
mod upload;

pub use error::ApiError;
pub use server::{build_router, GatewayState, MAX_UPLOAD_BYTES};
pub use session_registry::{FormEntry, FormId, SessionRegistry};

#[cfg(test)]
mod testing;
