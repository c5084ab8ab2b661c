//! Touched-aware merge of extracted fields into the live form.

use forestclaim_core::{ExtractedFields, FieldKey, FormState, Gender, TouchedFields};
use serde::{Deserialize, Serialize};

/// Which keys a merge wrote and which it left alone because the user had
/// edited them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeReport {
    pub applied: Vec<FieldKey>,
    pub skipped_touched: Vec<FieldKey>,
}

impl MergeReport {
    pub fn is_empty(&self) -> bool {
        self.applied.is_empty() && self.skipped_touched.is_empty()
    }
}

/// Apply `extracted` onto `current`, leaving touched fields and fields the
/// extractor did not find as they are.
pub fn merge(current: &FormState, extracted: &ExtractedFields, touched: &TouchedFields) -> FormState {
    merge_with_report(current, extracted, touched).0
}

/// [`merge`], also reporting what happened per key.
pub fn merge_with_report(
    current: &FormState,
    extracted: &ExtractedFields,
    touched: &TouchedFields,
) -> (FormState, MergeReport) {
    let mut next = current.clone();
    let mut report = MergeReport::default();

    for key in FieldKey::ALL {
        if extracted.value(key).is_none() {
            continue;
        }
        if touched.contains(key) {
            report.skipped_touched.push(key);
            continue;
        }
        write_field(&mut next, extracted, key);
        report.applied.push(key);
    }

    (next, report)
}

fn write_field(form: &mut FormState, extracted: &ExtractedFields, key: FieldKey) {
    match key {
        FieldKey::ClaimType => form.claim_type = extracted.claim_type,
        FieldKey::ClaimantName => form.claimant_name = extracted.claimant_name.clone(),
        FieldKey::GuardianName => form.guardian_name = extracted.guardian_name.clone(),
        FieldKey::Gender => form.gender = extracted.gender.as_deref().map(gender_option),
        FieldKey::Age => form.age = extracted.age.clone(),
        FieldKey::GenderAge => form.gender_age = extracted.gender_age(),
        FieldKey::Caste => form.caste = extracted.caste.clone(),
        FieldKey::Aadhaar => form.aadhaar = extracted.aadhaar.clone(),
        FieldKey::Village => form.village = extracted.village.clone(),
        FieldKey::Panchayat => form.panchayat = extracted.panchayat.clone(),
        FieldKey::Block => form.block = extracted.block.clone(),
        FieldKey::District => form.district = extracted.district.clone(),
        FieldKey::State => form.state = extracted.state.clone(),
        FieldKey::SurveyOrGps => form.survey_or_gps = extracted.survey_or_gps.clone(),
        FieldKey::LandClaimed => form.land_claimed = extracted.land_claimed.clone(),
        FieldKey::LandUseType => form.land_use_type = extracted.land_use_type,
        FieldKey::Boundaries => form.boundaries = extracted.boundaries.clone(),
        FieldKey::Evidence => form.evidence = extracted.evidence.clone(),
    }
}

/// The gender slot is a select of [`Gender`] options; tokens it does not
/// know are kept as written.
fn gender_option(token: &str) -> String {
    Gender::from_token(token)
        .map(|g| g.as_str().to_string())
        .unwrap_or_else(|| token.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use forestclaim_core::{
        AttachmentRef, AttachmentSlot, ClaimType, EvidenceTag, LandUseType,
    };

    /// Every field filled with a recognizable "user" value.
    fn user_form() -> FormState {
        let mut form = FormState {
            claim_type: Some(ClaimType::CommunityRights),
            land_use_type: Some(LandUseType::Homestead),
            evidence: [EvidenceTag::CommunityRights].into_iter().collect(),
            ..Default::default()
        };
        for key in FieldKey::ALL {
            match key {
                FieldKey::ClaimType | FieldKey::LandUseType | FieldKey::Evidence => {}
                FieldKey::Age => form.set_value(key, "30").unwrap(),
                other => form.set_value(other, &format!("user {other}")).unwrap(),
            }
        }
        form.attachments.set(
            AttachmentSlot::IdentityProof,
            Some(AttachmentRef {
                file_name: "id.pdf".into(),
                content_type: "application/pdf".into(),
                size_bytes: 42,
            }),
        );
        form
    }

    /// Every field extracted with a different value.
    fn full_extraction() -> ExtractedFields {
        ExtractedFields {
            claim_type: Some(ClaimType::Individual),
            claimant_name: Some("Ram Singh".into()),
            guardian_name: Some("Shyam Singh".into()),
            gender: Some("Male".into()),
            age: Some("45".into()),
            caste: Some("Gond".into()),
            aadhaar: Some("123456789012".into()),
            village: Some("Kalahandi".into()),
            panchayat: Some("Lanjigarh".into()),
            block: Some("Lanjigarh".into()),
            district: Some("Kalahandi".into()),
            state: Some("Odisha".into()),
            survey_or_gps: Some("221/3".into()),
            land_claimed: Some("2.5".into()),
            land_use_type: Some(LandUseType::Cultivation),
            boundaries: Some("North - stream".into()),
            evidence: [EvidenceTag::ResidentialProof, EvidenceTag::OccupationProof]
                .into_iter()
                .collect(),
        }
    }

    #[test]
    fn touched_fields_are_never_overwritten() {
        let current = user_form();
        let extracted = full_extraction();
        for key in FieldKey::ALL {
            let touched: TouchedFields = [key].into_iter().collect();
            let merged = merge(&current, &extracted, &touched);
            assert_eq!(merged.value(key), current.value(key), "touched {key} changed");
        }
    }

    #[test]
    fn untouched_fields_take_the_extracted_value() {
        let current = user_form();
        let extracted = full_extraction();
        let merged = merge(&current, &extracted, &TouchedFields::new());
        for key in FieldKey::ALL {
            assert_eq!(merged.value(key), extracted.value(key), "untouched {key} not applied");
        }
    }

    #[test]
    fn absent_extractions_keep_current_values() {
        let current = user_form();
        let all_touched: TouchedFields = FieldKey::ALL.into_iter().collect();
        for touched in [TouchedFields::new(), all_touched] {
            let merged = merge(&current, &ExtractedFields::default(), &touched);
            assert_eq!(merged, current);
        }
    }

    #[test]
    fn partial_autofill_mixes_user_and_extracted_values() {
        let current = user_form();
        let touched: TouchedFields = [FieldKey::Village, FieldKey::Age].into_iter().collect();
        let (merged, report) = merge_with_report(&current, &full_extraction(), &touched);

        assert_eq!(merged.village.as_deref(), Some("user village"));
        assert_eq!(merged.age.as_deref(), Some("30"));
        assert_eq!(merged.claimant_name.as_deref(), Some("Ram Singh"));
        // The combined display key is gated on its own key, not on its parts.
        assert_eq!(merged.gender_age.as_deref(), Some("Male 45"));
        assert_eq!(report.skipped_touched, vec![FieldKey::Age, FieldKey::Village]);
        assert_eq!(report.applied.len(), FieldKey::ALL.len() - 2);
    }

    #[test]
    fn attachments_are_left_alone() {
        let current = user_form();
        let merged = merge(&current, &full_extraction(), &TouchedFields::new());
        assert_eq!(merged.attachments, current.attachments);
    }

    #[test]
    fn empty_evidence_does_not_clear_the_current_set() {
        let current = user_form();
        let extracted = ExtractedFields {
            village: Some("Kalahandi".into()),
            ..Default::default()
        };
        let merged = merge(&current, &extracted, &TouchedFields::new());
        assert_eq!(merged.evidence, current.evidence);
    }

    #[test]
    fn reference_claim_fills_a_blank_form() {
        let extracted = ExtractedFields {
            claimant_name: Some("Ram Singh".into()),
            guardian_name: Some("Shyam Singh".into()),
            gender: Some("Male".into()),
            age: Some("45".into()),
            village: Some("Kalahandi".into()),
            land_claimed: Some("2.5".into()),
            ..Default::default()
        };
        let merged = merge(&FormState::default(), &extracted, &TouchedFields::new());
        assert_eq!(merged.claimant_name.as_deref(), Some("Ram Singh"));
        assert_eq!(merged.guardian_name.as_deref(), Some("Shyam Singh"));
        assert_eq!(merged.gender_age.as_deref(), Some("Male 45"));
        assert_eq!(merged.gender.as_deref(), Some("Male"));
        assert_eq!(merged.age.as_deref(), Some("45"));
        assert_eq!(merged.village.as_deref(), Some("Kalahandi"));
        assert_eq!(merged.land_claimed.as_deref(), Some("2.5"));
    }

    #[test]
    fn gender_slot_takes_the_select_option() {
        let extracted = ExtractedFields {
            gender: Some("F".into()),
            age: Some("32".into()),
            ..Default::default()
        };
        let merged = merge(&FormState::default(), &extracted, &TouchedFields::new());
        assert_eq!(merged.gender.as_deref(), Some("Female"));
        assert_eq!(merged.gender_age.as_deref(), Some("F 32"));

        let extracted = ExtractedFields {
            gender: Some("Kinnar".into()),
            ..Default::default()
        };
        let merged = merge(&FormState::default(), &extracted, &TouchedFields::new());
        assert_eq!(merged.gender.as_deref(), Some("Kinnar"));
    }
}
