//! The live claim form: field values plus the set of fields the user has
//! edited by hand.

use chrono::NaiveDate;
use forestclaim_core::{
    AttachmentRef, AttachmentSlot, ClaimError, ClaimSubmission, ExtractedFields, FieldKey,
    FormState, TouchedFields,
};
use forestclaim_logging::redact_sensitive_data;
use forestclaim_understanding::extract_fields;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::merge::{merge_with_report, MergeReport};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AutofillError {
    #[error("Please paste some text to parse")]
    EmptyText,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimForm {
    state: FormState,
    touched: TouchedFields,
}

impl ClaimForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_parts(state: FormState, touched: TouchedFields) -> Self {
        Self { state, touched }
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn touched(&self) -> &TouchedFields {
        &self.touched
    }

    /// A user edit: sets the field and marks it touched. A rejected value
    /// leaves both the field and the touched set unchanged.
    pub fn edit(&mut self, key: FieldKey, value: &str) -> Result<(), ClaimError> {
        self.state.set_value(key, value)?;
        self.touched.touch(key);
        Ok(())
    }

    /// Select or clear the file for one mandatory document.
    pub fn attach(&mut self, slot: AttachmentSlot, attachment: Option<AttachmentRef>) {
        self.state.attachments.set(slot, attachment);
    }

    /// Merge extracted fields, skipping anything the user has touched.
    pub fn apply_extracted(&mut self, extracted: &ExtractedFields) -> MergeReport {
        let (next, report) = merge_with_report(&self.state, extracted, &self.touched);
        self.state = next;
        info!(
            applied = report.applied.len(),
            skipped = report.skipped_touched.len(),
            "autofill applied"
        );
        report
    }

    /// The paste-text path: extract from `text` and apply, bypassing OCR.
    pub fn autofill_from_text(&mut self, text: &str) -> Result<MergeReport, AutofillError> {
        if text.trim().is_empty() {
            return Err(AutofillError::EmptyText);
        }
        debug!(text = %redact_sensitive_data(text), "autofill from pasted text");
        Ok(self.apply_extracted(&extract_fields(text)))
    }

    /// Clear every field, attachment and touched mark.
    pub fn reset(&mut self) {
        self.state = FormState::default();
        self.touched.clear();
    }

    /// Build the claims-store payload and reset the form on success.
    pub fn submit(&mut self, user_id: &str, today: NaiveDate) -> Result<ClaimSubmission, ClaimError> {
        let submission = ClaimSubmission::from_form(&self.state, user_id, today)?;
        info!(ack_id = %submission.ack_id, "claim submission prepared");
        self.reset();
        Ok(submission)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CLAIM_TEXT: &str = "Name: Ram Singh\nFather's Name: Shyam Singh\nGender: Male\nAge: 45\nVillage: Kalahandi\nArea: 2.5 hectares";

    fn pdf(name: &str) -> AttachmentRef {
        AttachmentRef {
            file_name: name.into(),
            content_type: "application/pdf".into(),
            size_bytes: 2048,
        }
    }

    #[test]
    fn end_to_end_paste_fills_blank_form() {
        let mut form = ClaimForm::new();
        let report = form.autofill_from_text(CLAIM_TEXT).unwrap();

        let state = form.state();
        assert_eq!(state.claimant_name.as_deref(), Some("Ram Singh"));
        assert_eq!(state.guardian_name.as_deref(), Some("Shyam Singh"));
        assert_eq!(state.gender_age.as_deref(), Some("Male 45"));
        assert_eq!(state.village.as_deref(), Some("Kalahandi"));
        assert_eq!(state.land_claimed.as_deref(), Some("2.5"));
        assert!(report.skipped_touched.is_empty());
        assert!(form.touched().is_empty());
    }

    #[test]
    fn user_edits_survive_later_autofills() {
        let mut form = ClaimForm::new();
        form.edit(FieldKey::Village, "Rayagada").unwrap();

        let report = form.autofill_from_text(CLAIM_TEXT).unwrap();
        assert_eq!(form.state().village.as_deref(), Some("Rayagada"));
        assert_eq!(report.skipped_touched, vec![FieldKey::Village]);

        // A second extraction never un-touches the field.
        form.autofill_from_text("Village: Koraput").unwrap();
        assert_eq!(form.state().village.as_deref(), Some("Rayagada"));
        assert!(form.touched().contains(FieldKey::Village));
    }

    #[test]
    fn blank_paste_is_rejected_before_extraction() {
        let mut form = ClaimForm::new();
        form.edit(FieldKey::Caste, "Gond").unwrap();
        let before = form.clone();

        assert_eq!(form.autofill_from_text("  \n\t"), Err(AutofillError::EmptyText));
        assert_eq!(form, before);
    }

    #[test]
    fn rejected_edit_does_not_touch() {
        let mut form = ClaimForm::new();
        assert!(form.edit(FieldKey::Age, "forty").is_err());
        assert!(!form.touched().contains(FieldKey::Age));
    }

    #[test]
    fn reset_clears_values_and_touched_marks() {
        let mut form = ClaimForm::new();
        form.edit(FieldKey::ClaimantName, "Sukru Majhi").unwrap();
        form.attach(AttachmentSlot::FraFormA, Some(pdf("form-a.pdf")));
        form.reset();
        assert_eq!(form, ClaimForm::new());
    }

    #[test]
    fn submit_requires_documents_then_resets() {
        let mut form = ClaimForm::new();
        form.autofill_from_text(CLAIM_TEXT).unwrap();
        let today = NaiveDate::from_ymd_opt(2025, 3, 9).unwrap();

        assert!(matches!(
            form.submit("public-guest", today),
            Err(ClaimError::MissingDocuments(_))
        ));
        assert_eq!(form.state().village.as_deref(), Some("Kalahandi"));

        for slot in AttachmentSlot::ALL {
            form.attach(slot, Some(pdf(&format!("{}.pdf", slot.as_str()))));
        }
        let submission = form.submit("public-guest", today).unwrap();
        assert_eq!(submission.village, "Kalahandi");
        assert_eq!(submission.area, 2.5);
        assert!(submission.ack_id.starts_with("FRA-250309-"));
        assert_eq!(form, ClaimForm::new());
    }
}
