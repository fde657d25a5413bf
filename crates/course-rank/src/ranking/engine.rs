use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info};

use super::domain::{Course, CourseId};
use super::entropy::{course_entropy, EntropyBreakdown};
use super::ideal::IdealProfile;
use super::source::{CatalogSource, SourceError};
use super::weights::standardize_weights;
use super::RankingError;
use crate::config::RankingConfig;

/// How the courses in an outcome were ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RankingMode {
    /// Ordered by ascending total entropy against the ideal profile.
    Ranked,
    /// Not enough evaluations anywhere; plain listing of active courses.
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedCourse {
    pub rank: usize,
    pub course: Course,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entropy: Option<EntropyBreakdown>,
}

/// Result of one ranking call, carrying the audit trail behind the order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankingOutcome {
    pub mode: RankingMode,
    pub generated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ideal: Option<IdealProfile>,
    pub entries: Vec<RankedCourse>,
}

impl RankingOutcome {
    fn new(mode: RankingMode, ideal: Option<IdealProfile>, entries: Vec<RankedCourse>) -> Self {
        Self {
            mode,
            generated_at: Utc::now(),
            ideal,
            entries,
        }
    }

    pub fn courses(&self) -> impl Iterator<Item = &Course> {
        self.entries.iter().map(|entry| &entry.course)
    }

    pub fn into_courses(self) -> Vec<Course> {
        self.entries.into_iter().map(|entry| entry.course).collect()
    }
}

/// Orders catalog courses best-to-worst by picture-fuzzy cross-entropy.
pub struct RankingEngine<S> {
    source: Arc<S>,
    config: RankingConfig,
}

impl<S> RankingEngine<S>
where
    S: CatalogSource + 'static,
{
    pub fn new(source: Arc<S>, config: RankingConfig) -> Self {
        Self { source, config }
    }

    pub fn config(&self) -> &RankingConfig {
        &self.config
    }

    /// The best `limit` courses, best first.
    pub fn top_courses(&self, limit: usize) -> Result<Vec<Course>, RankingError> {
        self.rank(limit).map(RankingOutcome::into_courses)
    }

    /// Same as [`top_courses`](Self::top_courses) using the configured default limit.
    pub fn default_top_courses(&self) -> Result<Vec<Course>, RankingError> {
        self.top_courses(self.config.default_limit)
    }

    pub fn rank(&self, limit: usize) -> Result<RankingOutcome, RankingError> {
        if limit == 0 {
            return Err(RankingError::InvalidLimit(limit));
        }

        let type_ids = self
            .source
            .active_criterion_type_ids(self.config.excluded_criterion_type_id)?;
        let eligible_ids = self
            .source
            .eligible_course_ids(&type_ids, self.config.minimum_evaluation_count)?;

        debug!(
            types = type_ids.len(),
            eligible = eligible_ids.len(),
            minimum = self.config.minimum_evaluation_count,
            "resolved ranking admission"
        );

        if eligible_ids.is_empty() {
            let courses = self.source.first_active_courses(limit)?;
            ensure_active(&courses)?;
            info!(
                returned = courses.len(),
                "no course meets the evaluation threshold; returning unranked listing"
            );
            let entries = courses
                .into_iter()
                .take(limit)
                .enumerate()
                .map(|(index, course)| RankedCourse {
                    rank: index + 1,
                    course,
                    entropy: None,
                })
                .collect();
            return Ok(RankingOutcome::new(RankingMode::Fallback, None, entries));
        }

        let courses = self.source.active_courses(&eligible_ids)?;
        ensure_requested(&courses, &eligible_ids)?;
        if courses.is_empty() {
            info!("eligible courses are all inactive; nothing to rank");
            return Ok(RankingOutcome::new(RankingMode::Ranked, None, Vec::new()));
        }

        let criteria = self.source.active_criteria(&type_ids)?;
        let weights = standardize_weights(&criteria)?;
        let ideal = IdealProfile::build(&courses, &criteria)?;

        let mut scored = courses
            .into_iter()
            .map(|course| {
                course_entropy(&course.pfr, &ideal, &weights, &criteria)
                    .map(|breakdown| (course, breakdown))
            })
            .collect::<Result<Vec<_>, _>>()?;

        // Stable sort: equal entropies keep the source's fetch order.
        scored.sort_by(|(_, left), (_, right)| left.total.total_cmp(&right.total));
        scored.truncate(limit);

        if let Some((best, breakdown)) = scored.first() {
            info!(
                course_id = %best.id,
                entropy = breakdown.total,
                ranked = scored.len(),
                criteria = criteria.len(),
                "ranked courses against ideal profile"
            );
        }

        let entries = scored
            .into_iter()
            .enumerate()
            .map(|(index, (course, breakdown))| RankedCourse {
                rank: index + 1,
                course,
                entropy: Some(breakdown),
            })
            .collect();

        Ok(RankingOutcome::new(RankingMode::Ranked, Some(ideal), entries))
    }
}

fn ensure_active(courses: &[Course]) -> Result<(), SourceError> {
    match courses.iter().find(|course| !course.status.is_active()) {
        Some(course) => Err(SourceError::Inconsistent(format!(
            "course {} returned as active but is inactive",
            course.id
        ))),
        None => Ok(()),
    }
}

fn ensure_requested(courses: &[Course], requested: &[CourseId]) -> Result<(), SourceError> {
    ensure_active(courses)?;
    let requested: HashSet<CourseId> = requested.iter().copied().collect();
    let mut seen = HashSet::with_capacity(courses.len());
    for course in courses {
        if !requested.contains(&course.id) {
            return Err(SourceError::Inconsistent(format!(
                "course {} was not among the eligible ids",
                course.id
            )));
        }
        if !seen.insert(course.id) {
            return Err(SourceError::Inconsistent(format!(
                "course {} returned more than once",
                course.id
            )));
        }
    }
    Ok(())
}
