//! Hand-off of a confirmed claim form to the external claims store.
//!
//! The store itself is not part of this workspace; this module only shapes
//! the payload it expects (snake_case keys) and issues the acknowledgment ID
//! the claimant uses to track the claim.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ClaimError;
use crate::types::FormState;

/// Upper bound applied to the claimant's age on submission.
pub const MAX_AGE: u8 = 120;

/// Generate an acknowledgment ID of the form `FRA-YYMMDD-XXXX`.
pub fn generate_ack_id(date: NaiveDate) -> String {
    let suffix: String = Uuid::new_v4()
        .simple()
        .to_string()
        .chars()
        .take(4)
        .collect::<String>()
        .to_uppercase();
    format!("FRA-{}-{}", date.format("%y%m%d"), suffix)
}

/// Payload accepted by the claims store's create endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimSubmission {
    pub ack_id: String,
    pub user_id: String,
    pub village: String,
    pub area: f64,
    pub coordinates: String,
    pub applicant_name: Option<String>,
    pub claim_type: Option<String>,
    pub documents: Vec<String>,
    pub aadhaar: Option<String>,
    pub gender: Option<String>,
    pub age: Option<u8>,
}

impl ClaimSubmission {
    /// Build the store payload from a user-confirmed form.
    ///
    /// All four mandatory documents must be attached.
    pub fn from_form(form: &FormState, user_id: &str, today: NaiveDate) -> Result<Self, ClaimError> {
        let missing = form.attachments.missing();
        if !missing.is_empty() {
            return Err(ClaimError::MissingDocuments(missing));
        }

        Ok(Self {
            ack_id: generate_ack_id(today),
            user_id: user_id.to_string(),
            village: form.village.clone().unwrap_or_default(),
            area: parse_area(form.land_claimed.as_deref().unwrap_or_default()),
            coordinates: form.survey_or_gps.clone().unwrap_or_default(),
            applicant_name: form.claimant_name.clone(),
            claim_type: form.claim_type.map(|c| c.short_code().to_string()),
            documents: form
                .attachments
                .attached()
                .into_iter()
                .map(|slot| slot.as_str().to_string())
                .collect(),
            aadhaar: form.aadhaar.clone(),
            gender: form.gender.clone(),
            age: form.age.as_deref().and_then(clamp_age),
        })
    }
}

/// Keep digits and dots, parse as hectares; anything unparseable is zero.
fn parse_area(raw: &str) -> f64 {
    let numeric: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    numeric.parse().unwrap_or(0.0)
}

fn clamp_age(raw: &str) -> Option<u8> {
    let age: u32 = raw.trim().parse().ok()?;
    Some(age.min(MAX_AGE as u32) as u8)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::ClaimType;
    use crate::types::{AttachmentRef, AttachmentSlot};

    fn complete_form() -> FormState {
        let mut form = FormState {
            claim_type: Some(ClaimType::Individual),
            claimant_name: Some("Ram Singh".into()),
            village: Some("Kalahandi".into()),
            land_claimed: Some("2.5 ha".into()),
            survey_or_gps: Some("123/4".into()),
            age: Some("145".into()),
            ..Default::default()
        };
        for slot in AttachmentSlot::ALL {
            form.attachments.set(
                slot,
                Some(AttachmentRef {
                    file_name: format!("{}.pdf", slot.as_str()),
                    content_type: "application/pdf".into(),
                    size_bytes: 10,
                }),
            );
        }
        form
    }

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 9).unwrap()
    }

    #[test]
    fn ack_id_has_date_and_four_char_suffix() {
        let id = generate_ack_id(day());
        assert!(id.starts_with("FRA-250309-"));
        let suffix = id.rsplit('-').next().unwrap();
        assert_eq!(suffix.len(), 4);
        assert!(suffix.chars().all(|c| c.is_ascii_digit() || c.is_ascii_uppercase()));
    }

    #[test]
    fn submission_maps_form_fields() {
        let submission = ClaimSubmission::from_form(&complete_form(), "public-guest", day()).unwrap();
        assert_eq!(submission.area, 2.5);
        assert_eq!(submission.coordinates, "123/4");
        assert_eq!(submission.claim_type.as_deref(), Some("IFR"));
        assert_eq!(submission.age, Some(MAX_AGE));
        assert_eq!(submission.documents.len(), 4);

        let json = serde_json::to_value(&submission).unwrap();
        assert_eq!(json["applicant_name"], "Ram Singh");
    }

    #[test]
    fn submission_requires_all_documents() {
        let mut form = complete_form();
        form.attachments.set(AttachmentSlot::GramSabhaResolution, None);
        let err = ClaimSubmission::from_form(&form, "u1", day()).unwrap_err();
        match err {
            ClaimError::MissingDocuments(slots) => {
                assert_eq!(slots, vec![AttachmentSlot::GramSabhaResolution]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn unparseable_area_is_zero() {
        assert_eq!(parse_area("unknown"), 0.0);
        assert_eq!(parse_area(""), 0.0);
    }
}
