use std::collections::BTreeMap;

use serde::Serialize;

use super::domain::{Course, Criterion, CriterionCode, FuzzyProfile};
use super::RankingError;

/// Best observed agreement and lowest observed neutral/disagreement per criterion.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct IdealProfile(BTreeMap<CriterionCode, FuzzyProfile>);

impl IdealProfile {
    /// Envelope of `courses` over `criteria`. A course without an entry for a
    /// criterion contributes the zero profile.
    pub fn build(courses: &[Course], criteria: &[Criterion]) -> Result<Self, RankingError> {
        if courses.is_empty() {
            return Err(RankingError::InvalidInput(
                "ideal profile requires at least one course".to_string(),
            ));
        }

        let mut ideal = BTreeMap::new();
        for criterion in criteria {
            let envelope = courses
                .iter()
                .map(|course| course.pfr.profile(&criterion.code))
                .fold(None, |acc: Option<FuzzyProfile>, profile| {
                    Some(match acc {
                        None => profile,
                        Some(best) => FuzzyProfile {
                            agreement: best.agreement.max(profile.agreement),
                            neutral: best.neutral.min(profile.neutral),
                            disagreement: best.disagreement.min(profile.disagreement),
                        },
                    })
                })
                .unwrap_or(FuzzyProfile::ZERO);
            ideal.insert(criterion.code.clone(), envelope);
        }

        Ok(Self(ideal))
    }

    pub fn profile(&self, code: &CriterionCode) -> FuzzyProfile {
        self.0.get(code).copied().unwrap_or(FuzzyProfile::ZERO)
    }
}
