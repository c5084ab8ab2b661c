//! The ordered extraction rule table.
//!
//! Each row pairs a form field with one label-driven pattern and a
//! post-processor. Rows are tried top to bottom; the first row that yields a
//! value for a field wins and later rows for that field are skipped.

use forestclaim_core::FieldKey;
use once_cell::sync::Lazy;
use regex::Regex;

use super::classify::{classify_claim_type, classify_land_use};

/// A label may start a line (after an optional "3." / "3)" / bullet marker),
/// follow a column gap of a tab or two-plus spaces, or follow a `,` / `;`
/// list separator.
const LABEL_START: &str =
    r"(?:^|\t| {2,}|[,;][ \t]*)[ \t]*(?:\d{1,2}[.)][ \t]*)?(?:[-•*][ \t]*)?";

/// Optional separator between label and value. Never crosses a newline.
const SEP: &str = r"[ \t]*[:.=|–\-]*[ \t]*";

/// Letter words separated by single spaces; a column gap ends the value.
const WORDS: &str = r"([a-z][a-z.]*(?: [a-z][a-z.]*)*)";

/// Everything up to the end of the line.
const LINE_SPAN: &str = r"([^\n]*)";

/// Upper bound on the characters kept for a boundary description.
pub const BOUNDARY_MAX_CHARS: usize = 300;

/// How a captured span is turned into a stored value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostProcess {
    /// Trimmed text as captured.
    Text,
    /// Single alphabetic token, kept as written.
    Gender,
    /// First run of up to three digits.
    Integer,
    /// First integer or decimal number; units dropped.
    Decimal,
    /// Digits only; spaces and hyphens removed.
    Digits,
    /// Classified to a claim type short code.
    ClaimType,
    /// Classified to the land-use vocabulary.
    LandUse,
    /// Trimmed and cut to `BOUNDARY_MAX_CHARS` characters.
    Truncate,
}

/// A run of label words closing a captured value, e.g. the " Age" in
/// "Ram Singh Age: 45". Only stripped when a separator follows the capture.
static TRAILING_LABEL_RE: Lazy<Regex> = Lazy::new(|| {
    let word = r"(?:name|of|the|claimant|applicant|father|mother|spouse|husband|guardian|gender|sex|age|caste|tribe|tribal|group|scheduled|community|aadhaa?r|uidai|uid|card|village|gram|panchayat|block|tehsil|district|dist|state|claim|type|survey|khasra|patta|plot|no|number|gps|coordinates|lat|latitude|long|longitude|area|claimed|land|extent|use|boundary|boundaries|description)\.?";
    Regex::new(&format!(r"(?i)(?:^|[ \t,;]+){word}(?:[ \t]+{word})*[ \t]*$")).unwrap()
});

/// Text right after a capture that marks the capture's tail as the next label.
static FOLLOWING_SEP_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?:[/'’][a-z]*|[ \t]+)*(?:name|no\.?|number)?[ \t]*[:=]").unwrap()
});

static INTEGER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\d{1,3}\b").unwrap());
static DECIMAL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+(?:\.\d+)?").unwrap());

impl PostProcess {
    pub fn apply(&self, captured: &str) -> Option<String> {
        let trimmed = captured.trim();
        let value = match self {
            Self::Text => trimmed.trim_end_matches('.').trim_end().to_string(),
            Self::Gender => trimmed.to_string(),
            Self::Integer => INTEGER_RE.find(trimmed)?.as_str().to_string(),
            Self::Decimal => DECIMAL_RE.find(trimmed)?.as_str().to_string(),
            Self::Digits => trimmed.chars().filter(|c| c.is_ascii_digit()).collect(),
            Self::ClaimType => classify_claim_type(trimmed)?.short_code().to_string(),
            Self::LandUse => classify_land_use(trimmed)?.as_str().to_string(),
            Self::Truncate => trimmed
                .chars()
                .take(BOUNDARY_MAX_CHARS)
                .collect::<String>()
                .trim_end()
                .to_string(),
        };
        (!value.is_empty()).then_some(value)
    }
}

/// One row of the extraction table.
#[derive(Debug)]
pub struct Rule {
    pub field: FieldKey,
    pub pattern: Regex,
    pub post: PostProcess,
}

impl Rule {
    /// Run the row against normalized text. Matches are tried in document
    /// order; the first one that survives post-processing is the value.
    pub fn apply(&self, text: &str) -> Option<String> {
        self.pattern.captures_iter(text).find_map(|caps| {
            let value = caps.get(1)?;
            self.post.apply(strip_next_label(value.as_str(), &text[value.end()..]))
        })
    }
}

/// Drop a trailing label that belongs to the next field on a run-on line.
fn strip_next_label<'a>(value: &'a str, rest: &str) -> &'a str {
    if !FOLLOWING_SEP_RE.is_match(rest) {
        return value;
    }
    match TRAILING_LABEL_RE.find(value) {
        Some(m) => &value[..m.start()],
        None => value,
    }
}

/// A label at a line or column start, or anywhere on a line when an explicit
/// `:` / `=` follows it.
fn labelled(label: &str, value: &str) -> String {
    format!(r"(?im)(?:{LABEL_START}(?:{label})\b{SEP}|\b(?:{label})[ \t]*[:=][ \t]*){value}")
}

/// A label that only counts at a line or column start.
fn line_labelled(label: &str, value: &str) -> String {
    format!(r"(?im){LABEL_START}(?:{label})\b{SEP}{value}")
}

fn rule(field: FieldKey, pattern: String, post: PostProcess) -> Rule {
    Rule {
        field,
        pattern: Regex::new(&pattern).unwrap(),
        post,
    }
}

static RULES: Lazy<Vec<Rule>> = Lazy::new(|| {
    use FieldKey::*;
    use PostProcess as P;

    let relation = r"father|mother|spouse|husband|guardian";
    let guardian = format!(
        r"(?:{relation})(?:[ \t]*/[ \t]*(?:{relation}))*(?:['’]s)?(?:[ \t]+name)?"
    );
    let caste_word = r"scheduled[ \t]+tribe|tribal[ \t]+group|caste|tribe|community";
    let caste = format!(r"(?:scheduled[ \t]+tribe|tribal[ \t]+group|caste|tribe)(?:[ \t]*/[ \t]*(?:{caste_word}))*");

    vec![
        rule(
            ClaimType,
            labelled(r"claim[ \t]*type|type[ \t]+of[ \t]+claim", r"([a-z][a-z ()/&]*)"),
            P::ClaimType,
        ),
        rule(
            ClaimantName,
            line_labelled(
                r"name[ \t]+of[ \t]+(?:the[ \t]+)?(?:claimant|applicant)s?|(?:claimant|applicant)(?:['’]s)?[ \t]+name|claimant|applicant|name",
                WORDS,
            ),
            P::Text,
        ),
        rule(GuardianName, labelled(&guardian, WORDS), P::Text),
        rule(Gender, labelled(r"gender|sex", r"([a-z]+)"), P::Gender),
        rule(Age, labelled(r"age", LINE_SPAN), P::Integer),
        rule(Caste, labelled(&caste, WORDS), P::Text),
        rule(
            Aadhaar,
            format!(
                r"(?i)\b(?:aadhaa?r|uidai|uid)(?:[ \t]+(?:card[ \t]+)?(?:no|number))?\b{SEP}(\d{{4}}[ -]?\d{{4}}[ -]?\d{{4}})\b"
            ),
            P::Digits,
        ),
        rule(Aadhaar, r"\b(\d{4} ?\d{4} ?\d{4})\b".to_string(), P::Digits),
        rule(Village, labelled(r"village", WORDS), P::Text),
        rule(Panchayat, labelled(r"(?:gram[ \t]+)?panchayat", WORDS), P::Text),
        rule(Block, labelled(r"block|tehsil", WORDS), P::Text),
        rule(District, labelled(r"district|dist", WORDS), P::Text),
        rule(State, labelled(r"state", WORDS), P::Text),
        rule(
            SurveyOrGps,
            labelled(
                r"survey[ \t]*(?:no|number)|khasra[ \t]*(?:no|number)|patta[ \t]*(?:no|number)|plot[ \t]*(?:no|number)",
                r"([a-z0-9/\-.,°]+(?: [a-z0-9/\-.,°]+)*)",
            ),
            P::Text,
        ),
        rule(
            SurveyOrGps,
            labelled(
                r"gps(?:[ \t]+coordinates)?|coordinates|lat(?:itude)?[ \t]*/[ \t]*long(?:itude)?",
                r"([-+]?\d[0-9.,°nsew +\-]*)",
            ),
            P::Text,
        ),
        rule(
            LandClaimed,
            labelled(
                r"area(?:[ \t]+claimed)?|land[ \t]+claimed|extent(?:[ \t]+of[ \t]+land)?",
                LINE_SPAN,
            ),
            P::Decimal,
        ),
        rule(
            LandUseType,
            labelled(r"land[ \t]*use(?:[ \t]*type)?|use[ \t]*type", WORDS),
            P::LandUse,
        ),
        rule(
            Boundaries,
            format!(
                r"(?im){LABEL_START}(?:description[ \t]+of[ \t]+(?:the[ \t]+)?boundar(?:y|ies)|boundar(?:y|ies)|description)\b{SEP}((?s:.*))"
            ),
            P::Truncate,
        ),
    ]
});

/// The full rule table, in priority order.
pub fn rules() -> &'static [Rule] {
    &RULES
}

/// Rows that target a single field, in priority order.
pub fn rules_for(field: FieldKey) -> impl Iterator<Item = &'static Rule> {
    RULES.iter().filter(move |r| r.field == field)
}
