use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Identifier wrapper for catalog courses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CourseId(pub u64);

impl fmt::Display for CourseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier wrapper for criterion groupings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CriterionTypeId(pub u32);

impl fmt::Display for CriterionTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryId(pub u64);

/// Unique criterion code used to key PFR profiles.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CriterionCode(pub String);

impl CriterionCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }
}

impl fmt::Display for CriterionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Lifecycle flag shared by courses and criteria.
///
/// Accepts `"active"`/`"inactive"` as well as the boolean flags the catalog
/// stores (`true` meaning active).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordStatus {
    Active,
    Inactive,
}

impl RecordStatus {
    pub const fn is_active(self) -> bool {
        matches!(self, RecordStatus::Active)
    }
}

impl<'de> Deserialize<'de> for RecordStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Flag(bool),
            Label(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Flag(true) => Ok(RecordStatus::Active),
            Raw::Flag(false) => Ok(RecordStatus::Inactive),
            Raw::Label(label) => match label.trim().to_ascii_lowercase().as_str() {
                "active" | "1" => Ok(RecordStatus::Active),
                "inactive" | "0" => Ok(RecordStatus::Inactive),
                other => Err(serde::de::Error::custom(format!(
                    "unknown record status '{other}'"
                ))),
            },
        }
    }
}

/// The three picture-fuzzy membership components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MembershipKind {
    Agreement,
    Neutral,
    Disagreement,
}

impl MembershipKind {
    pub const ALL: [MembershipKind; 3] = [
        MembershipKind::Agreement,
        MembershipKind::Neutral,
        MembershipKind::Disagreement,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            MembershipKind::Agreement => "agreement",
            MembershipKind::Neutral => "neutral",
            MembershipKind::Disagreement => "disagreement",
        }
    }
}

/// One criterion's rating expressed as agreement/neutral/disagreement memberships.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FuzzyProfile {
    pub agreement: f64,
    pub neutral: f64,
    pub disagreement: f64,
}

impl FuzzyProfile {
    pub const ZERO: FuzzyProfile = FuzzyProfile {
        agreement: 0.0,
        neutral: 0.0,
        disagreement: 0.0,
    };

    pub const fn new(agreement: f64, neutral: f64, disagreement: f64) -> Self {
        Self {
            agreement,
            neutral,
            disagreement,
        }
    }

    pub const fn membership(&self, kind: MembershipKind) -> f64 {
        match kind {
            MembershipKind::Agreement => self.agreement,
            MembershipKind::Neutral => self.neutral,
            MembershipKind::Disagreement => self.disagreement,
        }
    }
}

/// Criterion code to fuzzy profile mapping attached to every course.
///
/// Codes without an entry read as [`FuzzyProfile::ZERO`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PfrProfile(BTreeMap<CriterionCode, FuzzyProfile>);

impl PfrProfile {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, code: impl Into<String>, profile: FuzzyProfile) -> Self {
        self.insert(CriterionCode::new(code), profile);
        self
    }

    pub fn insert(&mut self, code: CriterionCode, profile: FuzzyProfile) -> Option<FuzzyProfile> {
        self.0.insert(code, profile)
    }

    pub fn profile(&self, code: &CriterionCode) -> FuzzyProfile {
        self.0.get(code).copied().unwrap_or(FuzzyProfile::ZERO)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Weighted rating criterion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Criterion {
    pub code: CriterionCode,
    #[serde(default)]
    pub name: String,
    pub weight: f64,
    pub type_id: CriterionTypeId,
    pub status: RecordStatus,
}

/// Grouping of criteria; only types flagged `is_using` are considered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CriterionType {
    pub id: CriterionTypeId,
    #[serde(default)]
    pub name: String,
    pub is_using: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
}

/// Course as loaded for ranking, including its category association.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub id: CourseId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    pub status: RecordStatus,
    #[serde(default)]
    pub pfr: PfrProfile,
}

/// Evaluation flavour; any label other than `pfr` collapses into `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EvaluationKind {
    Pfr,
    Other,
}

impl EvaluationKind {
    pub fn from_label(label: &str) -> Self {
        if label.trim().eq_ignore_ascii_case("pfr") {
            EvaluationKind::Pfr
        } else {
            EvaluationKind::Other
        }
    }
}

impl<'de> Deserialize<'de> for EvaluationKind {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(EvaluationKind::from_label(&raw))
    }
}

/// A single submitted evaluation; only the fields admission counting needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evaluation {
    pub course_id: CourseId,
    pub criteria_type_id: CriterionTypeId,
    #[serde(rename = "type")]
    pub kind: EvaluationKind,
}
