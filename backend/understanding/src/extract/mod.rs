//! Field extractor: maps noisy recognized text onto claim form fields.
//!
//! Deterministic and side-effect free. Unparseable or empty text is not an
//! error; it simply yields fewer (or no) fields.

pub mod classify;
pub mod rules;

use forestclaim_core::{ExtractedFields, FieldKey};
use tracing::debug;

pub use classify::{classify_claim_type, classify_land_use, detect_evidence};
pub use rules::{rules, rules_for, PostProcess, Rule, BOUNDARY_MAX_CHARS};

/// Strip carriage returns and surrounding whitespace.
pub fn normalize(raw_text: &str) -> String {
    raw_text.replace('\r', "").trim().to_string()
}

/// Extract every recognizable claim field from raw text.
pub fn extract_fields(raw_text: &str) -> ExtractedFields {
    let text = normalize(raw_text);
    let mut fields = ExtractedFields::default();
    if text.is_empty() {
        return fields;
    }

    for rule in rules() {
        if fields.value(rule.field).is_some() {
            continue;
        }
        if let Some(value) = rule.apply(&text) {
            assign(&mut fields, rule.field, value);
        }
    }
    fields.evidence = detect_evidence(&text);

    debug!(matched = ?fields.present_keys(), "extracted claim fields");
    fields
}

fn assign(fields: &mut ExtractedFields, key: FieldKey, value: String) {
    match key {
        FieldKey::ClaimType => fields.claim_type = value.parse().ok(),
        FieldKey::LandUseType => fields.land_use_type = value.parse().ok(),
        FieldKey::ClaimantName => fields.claimant_name = Some(value),
        FieldKey::GuardianName => fields.guardian_name = Some(value),
        FieldKey::Gender => fields.gender = Some(value),
        FieldKey::Age => fields.age = Some(value),
        FieldKey::Caste => fields.caste = Some(value),
        FieldKey::Aadhaar => fields.aadhaar = Some(value),
        FieldKey::Village => fields.village = Some(value),
        FieldKey::Panchayat => fields.panchayat = Some(value),
        FieldKey::Block => fields.block = Some(value),
        FieldKey::District => fields.district = Some(value),
        FieldKey::State => fields.state = Some(value),
        FieldKey::SurveyOrGps => fields.survey_or_gps = Some(value),
        FieldKey::LandClaimed => fields.land_claimed = Some(value),
        FieldKey::Boundaries => fields.boundaries = Some(value),
        // Derived from other slots, never rule-driven.
        FieldKey::GenderAge | FieldKey::Evidence => {}
    }
}
