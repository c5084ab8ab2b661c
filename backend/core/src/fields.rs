//! Claim form field vocabulary.
//!
//! Every field the claim form knows about, plus the small closed
//! vocabularies (claim type, land use, gender, evidence) that free text
//! gets classified into.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ClaimError;

/// Name of a single claim form field.
///
/// `GenderAge` is the combined display field used by the single-input form
/// variant; `Gender` and `Age` are the split inputs of the other variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldKey {
    ClaimType,
    ClaimantName,
    GuardianName,
    Gender,
    Age,
    GenderAge,
    Caste,
    Aadhaar,
    Village,
    Panchayat,
    Block,
    District,
    State,
    SurveyOrGps,
    LandClaimed,
    LandUseType,
    Boundaries,
    Evidence,
}

impl FieldKey {
    pub const ALL: [FieldKey; 18] = [
        FieldKey::ClaimType,
        FieldKey::ClaimantName,
        FieldKey::GuardianName,
        FieldKey::Gender,
        FieldKey::Age,
        FieldKey::GenderAge,
        FieldKey::Caste,
        FieldKey::Aadhaar,
        FieldKey::Village,
        FieldKey::Panchayat,
        FieldKey::Block,
        FieldKey::District,
        FieldKey::State,
        FieldKey::SurveyOrGps,
        FieldKey::LandClaimed,
        FieldKey::LandUseType,
        FieldKey::Boundaries,
        FieldKey::Evidence,
    ];

    /// The camelCase wire name of the field.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ClaimType => "claimType",
            Self::ClaimantName => "claimantName",
            Self::GuardianName => "guardianName",
            Self::Gender => "gender",
            Self::Age => "age",
            Self::GenderAge => "genderAge",
            Self::Caste => "caste",
            Self::Aadhaar => "aadhaar",
            Self::Village => "village",
            Self::Panchayat => "panchayat",
            Self::Block => "block",
            Self::District => "district",
            Self::State => "state",
            Self::SurveyOrGps => "surveyOrGps",
            Self::LandClaimed => "landClaimed",
            Self::LandUseType => "landUseType",
            Self::Boundaries => "boundaries",
            Self::Evidence => "evidence",
        }
    }
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldKey {
    type Err = ClaimError;

    /// Accepts camelCase, snake_case and kebab-case spellings.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let folded: String = s
            .trim()
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .flat_map(char::to_lowercase)
            .collect();
        FieldKey::ALL
            .iter()
            .copied()
            .find(|key| key.as_str().to_lowercase() == folded)
            .or(match folded.as_str() {
                "surveynumber" | "coordinates" => Some(FieldKey::SurveyOrGps),
                "selectedevidence" => Some(FieldKey::Evidence),
                _ => None,
            })
            .ok_or_else(|| ClaimError::UnknownField(s.to_string()))
    }
}

/// Category of rights being claimed under the Forest Rights Act.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClaimType {
    /// Individual forest rights.
    #[serde(rename = "IFR")]
    Individual,
    /// Community rights.
    #[serde(rename = "CR")]
    CommunityRights,
    /// Community forest resource rights.
    #[serde(rename = "CFR")]
    CommunityForestResource,
}

impl ClaimType {
    pub fn short_code(&self) -> &'static str {
        match self {
            Self::Individual => "IFR",
            Self::CommunityRights => "CR",
            Self::CommunityForestResource => "CFR",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Individual => "Individual Forest Rights",
            Self::CommunityRights => "Community Rights",
            Self::CommunityForestResource => "Community Forest Resource Rights",
        }
    }
}

impl FromStr for ClaimType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "IFR" | "INDIVIDUAL" => Ok(Self::Individual),
            "CR" | "COMMUNITY" => Ok(Self::CommunityRights),
            "CFR" => Ok(Self::CommunityForestResource),
            _ => Err(()),
        }
    }
}

/// How the claimed land is used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LandUseType {
    #[serde(rename = "cultivation")]
    Cultivation,
    #[serde(rename = "homestead")]
    Homestead,
    #[serde(rename = "grazing")]
    Grazing,
    #[serde(rename = "CFR")]
    CommunityForestResource,
}

impl LandUseType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cultivation => "cultivation",
            Self::Homestead => "homestead",
            Self::Grazing => "grazing",
            Self::CommunityForestResource => "CFR",
        }
    }
}

impl FromStr for LandUseType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cultivation" => Ok(Self::Cultivation),
            "homestead" => Ok(Self::Homestead),
            "grazing" => Ok(Self::Grazing),
            "cfr" => Ok(Self::CommunityForestResource),
            _ => Err(()),
        }
    }
}

/// Gender options offered by the split gender/age form variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    /// Normalize a free-text token ("male", "F", "Female,") to a gender.
    pub fn from_token(token: &str) -> Option<Self> {
        let lower = token
            .trim()
            .trim_matches(|c: char| !c.is_alphabetic())
            .to_lowercase();
        match lower.as_str() {
            "m" | "male" | "man" => Some(Self::Male),
            "f" | "female" | "woman" => Some(Self::Female),
            "o" | "other" | "others" | "transgender" => Some(Self::Other),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Male => "Male",
            Self::Female => "Female",
            Self::Other => "Other",
        }
    }
}

/// Supporting-evidence category inferred from keywords in a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EvidenceTag {
    ResidentialProof,
    OccupationProof,
    CommunityRights,
}

impl EvidenceTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ResidentialProof => "residentialProof",
            Self::OccupationProof => "occupationProof",
            Self::CommunityRights => "communityRights",
        }
    }
}

impl FromStr for EvidenceTag {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "residentialProof" | "residential_proof" => Ok(Self::ResidentialProof),
            "occupationProof" | "occupation_proof" => Ok(Self::OccupationProof),
            "communityRights" | "community_rights" => Ok(Self::CommunityRights),
            _ => Err(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_key_parses_any_case_style() {
        assert_eq!("claimantName".parse::<FieldKey>().unwrap(), FieldKey::ClaimantName);
        assert_eq!("claimant_name".parse::<FieldKey>().unwrap(), FieldKey::ClaimantName);
        assert_eq!("survey-or-gps".parse::<FieldKey>().unwrap(), FieldKey::SurveyOrGps);
        assert_eq!("surveyNumber".parse::<FieldKey>().unwrap(), FieldKey::SurveyOrGps);
        assert!("nickname".parse::<FieldKey>().is_err());
    }

    #[test]
    fn field_key_serializes_camel_case() {
        let json = serde_json::to_string(&FieldKey::LandClaimed).unwrap();
        assert_eq!(json, "\"landClaimed\"");
        for key in FieldKey::ALL {
            let json = serde_json::to_string(&key).unwrap();
            assert_eq!(json.trim_matches('"'), key.as_str());
        }
    }

    #[test]
    fn claim_type_uses_short_codes_on_the_wire() {
        let json = serde_json::to_string(&ClaimType::CommunityForestResource).unwrap();
        assert_eq!(json, "\"CFR\"");
        assert_eq!("ifr".parse::<ClaimType>(), Ok(ClaimType::Individual));
    }

    #[test]
    fn gender_token_does_not_confuse_female_with_male() {
        assert_eq!(Gender::from_token("Female"), Some(Gender::Female));
        assert_eq!(Gender::from_token("MALE,"), Some(Gender::Male));
        assert_eq!(Gender::from_token("unknown"), None);
    }
}
