//! Autofill for ForestClaim claim forms.
//!
//! [`merge`] decides which extracted values may land on the form,
//! [`ClaimForm`] owns the live form and its touched set, and [`OcrSession`]
//! tracks one recognition run at a time.

pub mod form;
pub mod merge;
pub mod session;

pub use form::{AutofillError, ClaimForm};
pub use merge::{merge, merge_with_report, MergeReport};
pub use session::{OcrSession, RunTicket, SessionError, SessionState};
