use std::collections::{BTreeMap, HashSet};

use serde::Serialize;

use super::domain::{Criterion, CriterionCode};
use super::RankingError;

/// Criterion weights rescaled so they sum to one over the considered set.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct StandardizedWeights(BTreeMap<CriterionCode, f64>);

impl StandardizedWeights {
    pub fn weight(&self, code: &CriterionCode) -> Option<f64> {
        self.0.get(code).copied()
    }

    pub fn total(&self) -> f64 {
        self.0.values().sum()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Divide each criterion weight by the sum of all weights in `criteria`.
pub fn standardize_weights(criteria: &[Criterion]) -> Result<StandardizedWeights, RankingError> {
    if criteria.is_empty() {
        return Err(RankingError::InvalidInput(
            "no criteria available to standardize".to_string(),
        ));
    }

    if let Some(bad) = criteria
        .iter()
        .find(|criterion| !criterion.weight.is_finite() || criterion.weight <= 0.0)
    {
        return Err(RankingError::InvalidInput(format!(
            "criterion '{}' has non-positive weight {}",
            bad.code, bad.weight
        )));
    }

    let mut codes = HashSet::with_capacity(criteria.len());
    if let Some(duplicate) = criteria.iter().find(|criterion| !codes.insert(&criterion.code)) {
        return Err(RankingError::InvalidInput(format!(
            "criterion '{}' appears more than once",
            duplicate.code
        )));
    }

    // Scaled by the largest weight so the sum stays finite.
    let largest = criteria
        .iter()
        .map(|criterion| criterion.weight)
        .fold(0.0_f64, f64::max);
    let total: f64 = criteria
        .iter()
        .map(|criterion| criterion.weight / largest)
        .sum();

    let weights = criteria
        .iter()
        .map(|criterion| (criterion.code.clone(), criterion.weight / largest / total))
        .collect();

    Ok(StandardizedWeights(weights))
}
