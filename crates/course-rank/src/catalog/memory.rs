use std::collections::{BTreeMap, HashMap, HashSet};

use super::snapshot::{CatalogSnapshot, CourseRecord};
use crate::ranking::{
    CatalogSource, Category, CategoryId, Course, CourseId, Criterion, CriterionType,
    CriterionTypeId, Evaluation, EvaluationKind, SourceError,
};

/// Read-only catalog indexed from a [`CatalogSnapshot`].
///
/// Courses are kept ordered by id so every listing is stable across calls.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    categories: HashMap<CategoryId, Category>,
    criterion_types: Vec<CriterionType>,
    criteria: Vec<Criterion>,
    courses: BTreeMap<CourseId, CourseRecord>,
    evaluations: Vec<Evaluation>,
}

impl InMemoryCatalog {
    pub fn from_snapshot(snapshot: CatalogSnapshot) -> Result<Self, SourceError> {
        let categories: HashMap<CategoryId, Category> = snapshot
            .categories
            .into_iter()
            .map(|category| (category.id, category))
            .collect();

        let mut courses = BTreeMap::new();
        for course in snapshot.courses {
            if let Some(category_id) = course.category_id {
                if !categories.contains_key(&category_id) {
                    return Err(SourceError::Inconsistent(format!(
                        "course {} references unknown category {}",
                        course.id, category_id.0
                    )));
                }
            }
            let id = course.id;
            if courses.insert(id, course).is_some() {
                return Err(SourceError::Inconsistent(format!(
                    "course {id} appears more than once"
                )));
            }
        }

        let mut codes = HashSet::new();
        for criterion in &snapshot.criteria {
            if !codes.insert(criterion.code.clone()) {
                return Err(SourceError::Inconsistent(format!(
                    "criterion code '{}' appears more than once",
                    criterion.code
                )));
            }
        }

        Ok(Self {
            categories,
            criterion_types: snapshot.criterion_types,
            criteria: snapshot.criteria,
            courses,
            evaluations: snapshot.evaluations,
        })
    }

    /// Replace the evaluation log, e.g. with a fresher CSV export.
    pub fn with_evaluations(mut self, evaluations: Vec<Evaluation>) -> Self {
        self.evaluations = evaluations;
        self
    }

    fn hydrate(&self, record: &CourseRecord) -> Course {
        Course {
            id: record.id,
            name: record.name.clone(),
            category: record
                .category_id
                .and_then(|id| self.categories.get(&id))
                .cloned(),
            status: record.status,
            pfr: record.pfr.clone(),
        }
    }
}

impl CatalogSource for InMemoryCatalog {
    fn active_criterion_type_ids(
        &self,
        excluded: CriterionTypeId,
    ) -> Result<Vec<CriterionTypeId>, SourceError> {
        let mut ids: Vec<CriterionTypeId> = self
            .criterion_types
            .iter()
            .filter(|criterion_type| criterion_type.is_using && criterion_type.id != excluded)
            .map(|criterion_type| criterion_type.id)
            .collect();
        ids.sort();
        ids.dedup();
        Ok(ids)
    }

    fn eligible_course_ids(
        &self,
        type_ids: &[CriterionTypeId],
        minimum_evaluations: usize,
    ) -> Result<Vec<CourseId>, SourceError> {
        let considered: HashSet<CriterionTypeId> = type_ids.iter().copied().collect();
        let mut counts: BTreeMap<CourseId, usize> = BTreeMap::new();

        for evaluation in &self.evaluations {
            if evaluation.kind == EvaluationKind::Pfr
                && considered.contains(&evaluation.criteria_type_id)
            {
                *counts.entry(evaluation.course_id).or_insert(0) += 1;
            }
        }

        Ok(counts
            .into_iter()
            .filter(|(_, count)| *count >= minimum_evaluations)
            .map(|(course_id, _)| course_id)
            .collect())
    }

    fn active_criteria(
        &self,
        type_ids: &[CriterionTypeId],
    ) -> Result<Vec<Criterion>, SourceError> {
        Ok(self
            .criteria
            .iter()
            .filter(|criterion| {
                criterion.status.is_active() && type_ids.contains(&criterion.type_id)
            })
            .cloned()
            .collect())
    }

    fn active_courses(&self, ids: &[CourseId]) -> Result<Vec<Course>, SourceError> {
        let mut requested = Vec::with_capacity(ids.len());
        for id in ids {
            if !self.courses.contains_key(id) {
                return Err(SourceError::UnknownCourse(*id));
            }
            requested.push(*id);
        }
        requested.sort();
        requested.dedup();

        Ok(requested
            .iter()
            .filter_map(|id| self.courses.get(id))
            .filter(|record| record.status.is_active())
            .map(|record| self.hydrate(record))
            .collect())
    }

    fn first_active_courses(&self, limit: usize) -> Result<Vec<Course>, SourceError> {
        Ok(self
            .courses
            .values()
            .filter(|record| record.status.is_active())
            .take(limit)
            .map(|record| self.hydrate(record))
            .collect())
    }
}
