//! Picture-fuzzy cross-entropy between a course's memberships and the ideal.
//!
//! For a membership `m`, its ideal counterpart `best` and a standardized weight
//! `w`, the element entropy is
//!
//! ```text
//! m == 0 : w * (1-m) * ln((1-m) / (1 - (m+best)/2))
//! m == 1 : 0
//! else   : w * (m * ln(m / ((m+best)/2)) + (1-m) * ln((1-m) / (1 - (m+best)/2)))
//! ```

use std::collections::BTreeMap;

use serde::Serialize;

use super::domain::{Criterion, CriterionCode, FuzzyProfile, MembershipKind, PfrProfile};
use super::ideal::IdealProfile;
use super::weights::StandardizedWeights;
use super::RankingError;

/// Per-criterion contributions to a course's total entropy.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct EntropyBreakdown {
    pub total: f64,
    pub criteria: BTreeMap<CriterionCode, f64>,
}

/// `x * ln(x / y)`, with the `x -> 0` limit (and a degenerate `y`) taken as 0.
fn x_ln_ratio(x: f64, y: f64) -> f64 {
    if x == 0.0 || y == 0.0 {
        0.0
    } else {
        x * (x / y).ln()
    }
}

fn check_membership(value: f64, context: impl FnOnce() -> String) -> Result<(), RankingError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(RankingError::NumericDomain {
            value,
            context: context(),
        })
    }
}

/// Cross-entropy of one membership value against its ideal value.
pub fn element_entropy(membership: f64, best: f64, weight: f64) -> Result<f64, RankingError> {
    check_membership(membership, || "course membership".to_string())?;
    check_membership(best, || "ideal membership".to_string())?;
    if !weight.is_finite() || weight < 0.0 {
        return Err(RankingError::NumericDomain {
            value: weight,
            context: "standardized weight".to_string(),
        });
    }

    if membership == 1.0 {
        return Ok(0.0);
    }

    let midpoint = 0.5 * (membership + best);
    let complement = x_ln_ratio(1.0 - membership, 1.0 - midpoint);
    let entropy = if membership == 0.0 {
        weight * complement
    } else {
        weight * (x_ln_ratio(membership, midpoint) + complement)
    };

    Ok(entropy)
}

/// Sum of the element entropies over the three membership components.
pub fn criterion_entropy(
    profile: &FuzzyProfile,
    ideal: &FuzzyProfile,
    weight: f64,
) -> Result<f64, RankingError> {
    MembershipKind::ALL.iter().try_fold(0.0, |acc, kind| {
        element_entropy(profile.membership(*kind), ideal.membership(*kind), weight)
            .map(|entropy| acc + entropy)
            .map_err(|err| match err {
                RankingError::NumericDomain { value, context } => RankingError::NumericDomain {
                    value,
                    context: format!("{context} ({})", kind.label()),
                },
                other => other,
            })
    })
}

/// Total entropy of a course over every criterion; absent entries read as zero.
pub fn course_entropy(
    pfr: &PfrProfile,
    ideal: &IdealProfile,
    weights: &StandardizedWeights,
    criteria: &[Criterion],
) -> Result<EntropyBreakdown, RankingError> {
    let mut breakdown = EntropyBreakdown::default();

    for criterion in criteria {
        let weight = weights.weight(&criterion.code).ok_or_else(|| {
            RankingError::InvalidInput(format!(
                "criterion '{}' has no standardized weight",
                criterion.code
            ))
        })?;

        let entropy = criterion_entropy(
            &pfr.profile(&criterion.code),
            &ideal.profile(&criterion.code),
            weight,
        )
        .map_err(|err| match err {
            RankingError::NumericDomain { value, context } => RankingError::NumericDomain {
                value,
                context: format!("criterion '{}': {context}", criterion.code),
            },
            other => other,
        })?;

        breakdown.total += entropy;
        *breakdown
            .criteria
            .entry(criterion.code.clone())
            .or_insert(0.0) += entropy;
    }

    Ok(breakdown)
}
