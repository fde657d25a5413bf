use super::domain::{Course, CourseId, Criterion, CriterionTypeId};

/// Read-only collaborator the ranking engine pulls its snapshot from.
///
/// Implementations must answer every call of one ranking request from a
/// consistent view of the catalog; ordering of returned sequences must be
/// stable across calls so rankings are reproducible.
pub trait CatalogSource: Send + Sync {
    /// Criterion types flagged as in use, minus `excluded`.
    fn active_criterion_type_ids(
        &self,
        excluded: CriterionTypeId,
    ) -> Result<Vec<CriterionTypeId>, SourceError>;

    /// Courses with at least `minimum_evaluations` PFR evaluations against `type_ids`.
    fn eligible_course_ids(
        &self,
        type_ids: &[CriterionTypeId],
        minimum_evaluations: usize,
    ) -> Result<Vec<CourseId>, SourceError>;

    fn active_criteria(&self, type_ids: &[CriterionTypeId])
        -> Result<Vec<Criterion>, SourceError>;

    /// Active courses among `ids`, with their category attached.
    fn active_courses(&self, ids: &[CourseId]) -> Result<Vec<Course>, SourceError>;

    /// Unranked listing used when no course has enough evaluations.
    fn first_active_courses(&self, limit: usize) -> Result<Vec<Course>, SourceError>;
}

/// Error enumeration for collaborator failures.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("catalog unavailable: {0}")]
    Unavailable(String),
    #[error("course {0} is not present in the catalog")]
    UnknownCourse(CourseId),
    #[error("inconsistent catalog data: {0}")]
    Inconsistent(String),
}
