use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::ClaimError;
use crate::fields::{ClaimType, EvidenceTag, FieldKey, LandUseType};

/// Sparse set of claim fields recovered from recognized document text.
///
/// Every slot is either `None` (no rule matched) or a trimmed, non-empty
/// value. Evidence is a set because several categories can match at once.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub claim_type: Option<ClaimType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub claimant_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guardian_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caste: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aadhaar: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub village: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub panchayat: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub district: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub survey_or_gps: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub land_claimed: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub land_use_type: Option<LandUseType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub boundaries: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub evidence: BTreeSet<EvidenceTag>,
}

impl ExtractedFields {
    /// Combined "gender age" display value, e.g. `"Male 45"`.
    ///
    /// Present iff at least one of the two parts was extracted.
    pub fn gender_age(&self) -> Option<String> {
        let parts: Vec<&str> = [self.gender.as_deref(), self.age.as_deref()]
            .into_iter()
            .flatten()
            .collect();
        if parts.is_empty() {
            None
        } else {
            Some(parts.join(" "))
        }
    }

    /// Display value of a single field, if it was extracted.
    pub fn value(&self, key: FieldKey) -> Option<String> {
        match key {
            FieldKey::ClaimType => self.claim_type.map(|c| c.short_code().to_string()),
            FieldKey::ClaimantName => self.claimant_name.clone(),
            FieldKey::GuardianName => self.guardian_name.clone(),
            FieldKey::Gender => self.gender.clone(),
            FieldKey::Age => self.age.clone(),
            FieldKey::GenderAge => self.gender_age(),
            FieldKey::Caste => self.caste.clone(),
            FieldKey::Aadhaar => self.aadhaar.clone(),
            FieldKey::Village => self.village.clone(),
            FieldKey::Panchayat => self.panchayat.clone(),
            FieldKey::Block => self.block.clone(),
            FieldKey::District => self.district.clone(),
            FieldKey::State => self.state.clone(),
            FieldKey::SurveyOrGps => self.survey_or_gps.clone(),
            FieldKey::LandClaimed => self.land_claimed.clone(),
            FieldKey::LandUseType => self.land_use_type.map(|l| l.as_str().to_string()),
            FieldKey::Boundaries => self.boundaries.clone(),
            FieldKey::Evidence => {
                if self.evidence.is_empty() {
                    None
                } else {
                    Some(join_evidence(&self.evidence))
                }
            }
        }
    }

    /// Keys of every field that was extracted, in vocabulary order.
    pub fn present_keys(&self) -> Vec<FieldKey> {
        FieldKey::ALL
            .into_iter()
            .filter(|key| self.value(*key).is_some())
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.present_keys().is_empty()
    }
}

/// The live claim form: the superset of both form variants plus the
/// mandatory document attachments.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FormState {
    pub claim_type: Option<ClaimType>,
    pub claimant_name: Option<String>,
    pub guardian_name: Option<String>,
    pub gender: Option<String>,
    pub age: Option<String>,
    pub gender_age: Option<String>,
    pub caste: Option<String>,
    pub aadhaar: Option<String>,
    pub village: Option<String>,
    pub panchayat: Option<String>,
    pub block: Option<String>,
    pub district: Option<String>,
    pub state: Option<String>,
    pub survey_or_gps: Option<String>,
    pub land_claimed: Option<String>,
    pub land_use_type: Option<LandUseType>,
    pub boundaries: Option<String>,
    pub evidence: BTreeSet<EvidenceTag>,
    pub attachments: Attachments,
}

impl FormState {
    /// Display value of a field; `None` when the input is blank.
    pub fn value(&self, key: FieldKey) -> Option<String> {
        match key {
            FieldKey::ClaimType => self.claim_type.map(|c| c.short_code().to_string()),
            FieldKey::ClaimantName => self.claimant_name.clone(),
            FieldKey::GuardianName => self.guardian_name.clone(),
            FieldKey::Gender => self.gender.clone(),
            FieldKey::Age => self.age.clone(),
            FieldKey::GenderAge => self.gender_age.clone(),
            FieldKey::Caste => self.caste.clone(),
            FieldKey::Aadhaar => self.aadhaar.clone(),
            FieldKey::Village => self.village.clone(),
            FieldKey::Panchayat => self.panchayat.clone(),
            FieldKey::Block => self.block.clone(),
            FieldKey::District => self.district.clone(),
            FieldKey::State => self.state.clone(),
            FieldKey::SurveyOrGps => self.survey_or_gps.clone(),
            FieldKey::LandClaimed => self.land_claimed.clone(),
            FieldKey::LandUseType => self.land_use_type.map(|l| l.as_str().to_string()),
            FieldKey::Boundaries => self.boundaries.clone(),
            FieldKey::Evidence => {
                if self.evidence.is_empty() {
                    None
                } else {
                    Some(join_evidence(&self.evidence))
                }
            }
        }
    }

    /// Set a field from user-entered text. Blank text clears the field.
    ///
    /// Enumerated fields accept their short codes (`IFR`, `cultivation`, ...);
    /// evidence accepts a comma-separated list of tags.
    pub fn set_value(&mut self, key: FieldKey, raw: &str) -> Result<(), ClaimError> {
        let value = raw.trim();
        let text = (!value.is_empty()).then(|| value.to_string());
        let invalid = || ClaimError::InvalidValue {
            field: key,
            value: value.to_string(),
        };

        match key {
            FieldKey::ClaimType => {
                self.claim_type = match text {
                    Some(v) => Some(v.parse().map_err(|_| invalid())?),
                    None => None,
                };
            }
            FieldKey::LandUseType => {
                self.land_use_type = match text {
                    Some(v) => Some(v.parse().map_err(|_| invalid())?),
                    None => None,
                };
            }
            FieldKey::Age => {
                if let Some(v) = &text {
                    v.parse::<u16>().map_err(|_| invalid())?;
                }
                self.age = text;
            }
            FieldKey::Evidence => {
                let mut tags = BTreeSet::new();
                for part in value.split(',').map(str::trim).filter(|p| !p.is_empty()) {
                    tags.insert(part.parse::<EvidenceTag>().map_err(|_| invalid())?);
                }
                self.evidence = tags;
            }
            FieldKey::ClaimantName => self.claimant_name = text,
            FieldKey::GuardianName => self.guardian_name = text,
            FieldKey::Gender => self.gender = text,
            FieldKey::GenderAge => self.gender_age = text,
            FieldKey::Caste => self.caste = text,
            FieldKey::Aadhaar => self.aadhaar = text,
            FieldKey::Village => self.village = text,
            FieldKey::Panchayat => self.panchayat = text,
            FieldKey::Block => self.block = text,
            FieldKey::District => self.district = text,
            FieldKey::State => self.state = text,
            FieldKey::SurveyOrGps => self.survey_or_gps = text,
            FieldKey::LandClaimed => self.land_claimed = text,
            FieldKey::Boundaries => self.boundaries = text,
        }
        Ok(())
    }
}

fn join_evidence(tags: &BTreeSet<EvidenceTag>) -> String {
    tags.iter()
        .map(|t| t.as_str())
        .collect::<Vec<_>>()
        .join(",")
}

/// Fields the user has edited by hand since the form was last reset.
///
/// Autofill never overwrites a field in this set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TouchedFields(BTreeSet<FieldKey>);

impl TouchedFields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a field as user-edited. Returns `true` if it was not already.
    pub fn touch(&mut self, key: FieldKey) -> bool {
        self.0.insert(key)
    }

    pub fn contains(&self, key: FieldKey) -> bool {
        self.0.contains(&key)
    }

    pub fn iter(&self) -> impl Iterator<Item = FieldKey> + '_ {
        self.0.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Only a form reset clears the set.
    pub fn clear(&mut self) {
        self.0.clear();
    }
}

impl FromIterator<FieldKey> for TouchedFields {
    fn from_iter<I: IntoIterator<Item = FieldKey>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// One of the four documents a claim must carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AttachmentSlot {
    IdentityProof,
    TribeCertificate,
    FraFormA,
    GramSabhaResolution,
}

impl AttachmentSlot {
    pub const ALL: [AttachmentSlot; 4] = [
        AttachmentSlot::IdentityProof,
        AttachmentSlot::TribeCertificate,
        AttachmentSlot::FraFormA,
        AttachmentSlot::GramSabhaResolution,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::IdentityProof => "identityProof",
            Self::TribeCertificate => "tribeCertificate",
            Self::FraFormA => "fraFormA",
            Self::GramSabhaResolution => "gramSabhaResolution",
        }
    }
}

impl std::str::FromStr for AttachmentSlot {
    type Err = ClaimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let folded: String = s
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .collect::<String>()
            .to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|slot| slot.as_str().to_ascii_lowercase() == folded)
            .ok_or_else(|| ClaimError::UnknownAttachment(s.to_string()))
    }
}

/// Metadata of a selected file. The bytes themselves live with the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachmentRef {
    pub file_name: String,
    pub content_type: String,
    pub size_bytes: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Attachments {
    pub identity_proof: Option<AttachmentRef>,
    pub tribe_certificate: Option<AttachmentRef>,
    pub fra_form_a: Option<AttachmentRef>,
    pub gram_sabha_resolution: Option<AttachmentRef>,
}

impl Attachments {
    pub fn get(&self, slot: AttachmentSlot) -> Option<&AttachmentRef> {
        match slot {
            AttachmentSlot::IdentityProof => self.identity_proof.as_ref(),
            AttachmentSlot::TribeCertificate => self.tribe_certificate.as_ref(),
            AttachmentSlot::FraFormA => self.fra_form_a.as_ref(),
            AttachmentSlot::GramSabhaResolution => self.gram_sabha_resolution.as_ref(),
        }
    }

    pub fn set(&mut self, slot: AttachmentSlot, attachment: Option<AttachmentRef>) {
        let target = match slot {
            AttachmentSlot::IdentityProof => &mut self.identity_proof,
            AttachmentSlot::TribeCertificate => &mut self.tribe_certificate,
            AttachmentSlot::FraFormA => &mut self.fra_form_a,
            AttachmentSlot::GramSabhaResolution => &mut self.gram_sabha_resolution,
        };
        *target = attachment;
    }

    /// Slots that have a file selected.
    pub fn attached(&self) -> Vec<AttachmentSlot> {
        AttachmentSlot::ALL
            .into_iter()
            .filter(|slot| self.get(*slot).is_some())
            .collect()
    }

    /// Slots still missing a file.
    pub fn missing(&self) -> Vec<AttachmentSlot> {
        AttachmentSlot::ALL
            .into_iter()
            .filter(|slot| self.get(*slot).is_none())
            .collect()
    }
}
