//! Keyword classification of captured label values.

use std::collections::BTreeSet;

use forestclaim_core::{ClaimType, EvidenceTag, LandUseType};
use once_cell::sync::Lazy;
use regex::Regex;

/// Map free text after a "claim type" label onto a claim category.
///
/// Checked in priority order: individual, then community forest resource,
/// then plain community rights. The first hit wins.
pub fn classify_claim_type(value: &str) -> Option<ClaimType> {
    let upper = value.to_uppercase();
    if upper.contains("INDIV") {
        Some(ClaimType::Individual)
    } else if upper.contains("COMMUNITY FOREST RESOURCE") || has_token(&upper, "CFR") {
        Some(ClaimType::CommunityForestResource)
    } else if upper.contains("COMMUNITY") || has_token(&upper, "CR") {
        Some(ClaimType::CommunityRights)
    } else {
        None
    }
}

/// Map free text after a "land use" label onto the land-use vocabulary.
/// Anything outside the vocabulary is dropped.
pub fn classify_land_use(value: &str) -> Option<LandUseType> {
    let lower = value.to_lowercase();
    if lower.contains("cult") {
        Some(LandUseType::Cultivation)
    } else if lower.contains("home") {
        Some(LandUseType::Homestead)
    } else if lower.contains("graz") {
        Some(LandUseType::Grazing)
    } else if lower.contains("community forest resource") || has_token(&lower, "cfr") {
        Some(LandUseType::CommunityForestResource)
    } else {
        None
    }
}

fn has_token(text: &str, token: &str) -> bool {
    text.split(|c: char| !c.is_ascii_alphanumeric())
        .any(|t| t == token)
}

// --- Evidence keyword sets ---

static RESIDENTIAL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:ration|aadhaa?r|voter\s*id|residential)\b").unwrap()
});

static OCCUPATION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:occupation|cultivation|cultivators?|kisan|farmers?)\b").unwrap()
});

static COMMUNITY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:community\s*rights|gram\s*sabha|frc)\b").unwrap()
});

/// Every evidence category whose keywords appear anywhere in the text.
pub fn detect_evidence(text: &str) -> BTreeSet<EvidenceTag> {
    let checks: [(&Lazy<Regex>, EvidenceTag); 3] = [
        (&RESIDENTIAL_RE, EvidenceTag::ResidentialProof),
        (&OCCUPATION_RE, EvidenceTag::OccupationProof),
        (&COMMUNITY_RE, EvidenceTag::CommunityRights),
    ];
    checks
        .into_iter()
        .filter(|(re, _)| re.is_match(text))
        .map(|(_, tag)| tag)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn claim_type_priority_prefers_cfr_over_community() {
        assert_eq!(
            classify_claim_type("Community Forest Resource Rights"),
            Some(ClaimType::CommunityForestResource)
        );
        assert_eq!(classify_claim_type("Community Rights"), Some(ClaimType::CommunityRights));
        assert_eq!(classify_claim_type("Individual"), Some(ClaimType::Individual));
        assert_eq!(classify_claim_type("CFR"), Some(ClaimType::CommunityForestResource));
        assert_eq!(classify_claim_type("CR"), Some(ClaimType::CommunityRights));
        assert_eq!(classify_claim_type("Pending"), None);
    }

    #[test]
    fn short_codes_must_be_whole_tokens() {
        // "CRITICAL" contains "CR" but is not the short code.
        assert_eq!(classify_claim_type("Critical"), None);
    }

    #[test]
    fn land_use_outside_vocabulary_is_dropped() {
        assert_eq!(classify_land_use("Cultivation"), Some(LandUseType::Cultivation));
        assert_eq!(classify_land_use("homestead plot"), Some(LandUseType::Homestead));
        assert_eq!(classify_land_use("Grazing land"), Some(LandUseType::Grazing));
        assert_eq!(classify_land_use("CFR"), Some(LandUseType::CommunityForestResource));
        assert_eq!(classify_land_use("Mining"), None);
    }

    #[test]
    fn evidence_collects_every_matching_category() {
        let tags = detect_evidence("Ration card attached. Occupation: farmer. Gram Sabha resolution.");
        assert_eq!(tags.len(), 3);
    }

    #[test]
    fn evidence_keywords_match_whole_words_only() {
        assert!(detect_evidence("Generation of the operation report").is_empty());
    }
}
