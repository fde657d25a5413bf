//! Picture-fuzzy cross-entropy ranking of catalog courses.
//!
//! The engine reads a consistent snapshot through [`CatalogSource`], derives an
//! ideal reference profile from the admitted courses, and orders them by their
//! weighted cross-entropy distance from that ideal (lower is better).

pub mod domain;
mod engine;
pub mod entropy;
mod ideal;
pub mod source;
mod weights;

#[cfg(test)]
mod tests;

pub use domain::{
    Category, CategoryId, Course, CourseId, Criterion, CriterionCode, CriterionType,
    CriterionTypeId, Evaluation, EvaluationKind, FuzzyProfile, MembershipKind, PfrProfile,
    RecordStatus,
};
pub use engine::{RankedCourse, RankingEngine, RankingMode, RankingOutcome};
pub use entropy::EntropyBreakdown;
pub use ideal::IdealProfile;
pub use source::{CatalogSource, SourceError};
pub use weights::{standardize_weights, StandardizedWeights};

/// Error raised by a ranking call. Every variant is terminal for the call.
#[derive(Debug, thiserror::Error)]
pub enum RankingError {
    #[error("ranking limit must be positive (got {0})")]
    InvalidLimit(usize),
    #[error("invalid ranking input: {0}")]
    InvalidInput(String),
    #[error("{context}: value {value} is outside the [0, 1] membership domain")]
    NumericDomain { value: f64, context: String },
    #[error(transparent)]
    DataSource(#[from] SourceError),
}
