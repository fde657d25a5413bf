use std::sync::{Arc, Mutex};

use crate::catalog::{CatalogSnapshot, CourseRecord, InMemoryCatalog};
use crate::config::RankingConfig;
use crate::ranking::{
    CatalogSource, Category, CategoryId, Course, CourseId, Criterion, CriterionCode,
    CriterionType, CriterionTypeId, Evaluation, EvaluationKind, FuzzyProfile, PfrProfile,
    RankingEngine, RecordStatus, SourceError,
};

pub(super) const CONTENT: CriterionTypeId = CriterionTypeId(1);
pub(super) const DELIVERY: CriterionTypeId = CriterionTypeId(2);
pub(super) const RESERVED: CriterionTypeId = CriterionTypeId(3);

pub(super) fn ranking_config() -> RankingConfig {
    RankingConfig {
        minimum_evaluation_count: 2,
        excluded_criterion_type_id: RESERVED,
        default_limit: 6,
    }
}

pub(super) fn criterion(code: &str, weight: f64, type_id: CriterionTypeId) -> Criterion {
    Criterion {
        code: CriterionCode::new(code),
        name: code.to_uppercase(),
        weight,
        type_id,
        status: RecordStatus::Active,
    }
}

pub(super) fn course(id: u64, pfr: PfrProfile) -> Course {
    Course {
        id: CourseId(id),
        name: format!("course-{id}"),
        category: Some(programming()),
        status: RecordStatus::Active,
        pfr,
    }
}

pub(super) fn programming() -> Category {
    Category {
        id: CategoryId(1),
        name: "Programming".to_string(),
    }
}

pub(super) fn single(code: &str, agreement: f64, neutral: f64, disagreement: f64) -> PfrProfile {
    PfrProfile::new().with(code, FuzzyProfile::new(agreement, neutral, disagreement))
}

pub(super) fn record(id: u64, status: RecordStatus, pfr: PfrProfile) -> CourseRecord {
    CourseRecord {
        id: CourseId(id),
        name: format!("course-{id}"),
        category_id: Some(CategoryId(1)),
        status,
        pfr,
    }
}

pub(super) fn pfr_evaluations(
    course_id: u64,
    type_id: CriterionTypeId,
    count: usize,
) -> Vec<Evaluation> {
    (0..count)
        .map(|_| Evaluation {
            course_id: CourseId(course_id),
            criteria_type_id: type_id,
            kind: EvaluationKind::Pfr,
        })
        .collect()
}

pub(super) fn criterion_types() -> Vec<CriterionType> {
    vec![
        CriterionType {
            id: CONTENT,
            name: "Content".to_string(),
            is_using: true,
        },
        CriterionType {
            id: DELIVERY,
            name: "Delivery".to_string(),
            is_using: false,
        },
        CriterionType {
            id: RESERVED,
            name: "Reserved".to_string(),
            is_using: true,
        },
    ]
}

/// Courses A=1, B=2, C=3 rated on a single criterion `c1` (weight 2), all admitted.
pub(super) fn three_course_snapshot() -> CatalogSnapshot {
    let mut evaluations = Vec::new();
    for id in 1..=3 {
        evaluations.extend(pfr_evaluations(id, CONTENT, 2));
    }

    CatalogSnapshot {
        categories: vec![programming()],
        criterion_types: criterion_types(),
        criteria: vec![criterion("c1", 2.0, CONTENT)],
        courses: vec![
            record(1, RecordStatus::Active, single("c1", 0.9, 0.05, 0.05)),
            record(2, RecordStatus::Active, single("c1", 0.5, 0.3, 0.2)),
            record(3, RecordStatus::Active, single("c1", 0.2, 0.4, 0.4)),
        ],
        evaluations,
    }
}

/// Five active courses and no admitted evaluations.
pub(super) fn unevaluated_snapshot() -> CatalogSnapshot {
    CatalogSnapshot {
        categories: vec![programming()],
        criterion_types: criterion_types(),
        criteria: vec![criterion("c1", 1.0, CONTENT)],
        courses: (1..=5)
            .map(|id| record(id, RecordStatus::Active, PfrProfile::new()))
            .collect(),
        evaluations: pfr_evaluations(1, CONTENT, 1),
    }
}

pub(super) fn engine_for(snapshot: CatalogSnapshot) -> RankingEngine<InMemoryCatalog> {
    let catalog = InMemoryCatalog::from_snapshot(snapshot).expect("snapshot indexes");
    RankingEngine::new(Arc::new(catalog), ranking_config())
}

/// Scripted collaborator for exercising engine-side consistency checks.
#[derive(Default)]
pub(super) struct ScriptedSource {
    pub(super) eligible: Vec<CourseId>,
    pub(super) courses: Vec<Course>,
    pub(super) criteria: Vec<Criterion>,
    pub(super) fallback: Vec<Course>,
    pub(super) calls: Mutex<Vec<&'static str>>,
}

impl ScriptedSource {
    fn record_call(&self, name: &'static str) {
        self.calls.lock().expect("calls mutex poisoned").push(name);
    }

    pub(super) fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().expect("calls mutex poisoned").clone()
    }
}

impl CatalogSource for ScriptedSource {
    fn active_criterion_type_ids(
        &self,
        _excluded: CriterionTypeId,
    ) -> Result<Vec<CriterionTypeId>, SourceError> {
        self.record_call("types");
        Ok(vec![CONTENT])
    }

    fn eligible_course_ids(
        &self,
        _type_ids: &[CriterionTypeId],
        _minimum_evaluations: usize,
    ) -> Result<Vec<CourseId>, SourceError> {
        self.record_call("eligible");
        Ok(self.eligible.clone())
    }

    fn active_criteria(
        &self,
        _type_ids: &[CriterionTypeId],
    ) -> Result<Vec<Criterion>, SourceError> {
        self.record_call("criteria");
        Ok(self.criteria.clone())
    }

    fn active_courses(&self, _ids: &[CourseId]) -> Result<Vec<Course>, SourceError> {
        self.record_call("courses");
        Ok(self.courses.clone())
    }

    fn first_active_courses(&self, _limit: usize) -> Result<Vec<Course>, SourceError> {
        self.record_call("fallback");
        Ok(self.fallback.clone())
    }
}

pub(super) struct UnavailableSource;

impl CatalogSource for UnavailableSource {
    fn active_criterion_type_ids(
        &self,
        _excluded: CriterionTypeId,
    ) -> Result<Vec<CriterionTypeId>, SourceError> {
        Err(SourceError::Unavailable("database offline".to_string()))
    }

    fn eligible_course_ids(
        &self,
        _type_ids: &[CriterionTypeId],
        _minimum_evaluations: usize,
    ) -> Result<Vec<CourseId>, SourceError> {
        Err(SourceError::Unavailable("database offline".to_string()))
    }

    fn active_criteria(
        &self,
        _type_ids: &[CriterionTypeId],
    ) -> Result<Vec<Criterion>, SourceError> {
        Err(SourceError::Unavailable("database offline".to_string()))
    }

    fn active_courses(&self, _ids: &[CourseId]) -> Result<Vec<Course>, SourceError> {
        Err(SourceError::Unavailable("database offline".to_string()))
    }

    fn first_active_courses(&self, _limit: usize) -> Result<Vec<Course>, SourceError> {
        Err(SourceError::Unavailable("database offline".to_string()))
    }
}

pub(super) fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}
