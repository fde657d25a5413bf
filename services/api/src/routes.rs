use crate::infra::AppState;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Extension, Json, Router};
use chrono::{DateTime, Utc};
use course_rank::error::AppError;
use course_rank::ranking::{CatalogSource, RankingEngine, RankingMode, RankingOutcome};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

#[derive(Debug, Default, Deserialize)]
pub(crate) struct TopCoursesQuery {
    #[serde(default)]
    pub(crate) limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub(crate) struct TopCoursesResponse {
    pub(crate) mode: RankingMode,
    pub(crate) generated_at: DateTime<Utc>,
    pub(crate) limit: usize,
    pub(crate) courses: Vec<RankedCourseView>,
}

#[derive(Debug, Serialize)]
pub(crate) struct RankedCourseView {
    pub(crate) rank: usize,
    pub(crate) id: u64,
    pub(crate) name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) entropy: Option<f64>,
}

impl TopCoursesResponse {
    pub(crate) fn from_outcome(outcome: RankingOutcome, limit: usize) -> Self {
        let courses = outcome
            .entries
            .into_iter()
            .map(|entry| RankedCourseView {
                rank: entry.rank,
                id: entry.course.id.0,
                name: entry.course.name,
                category: entry.course.category.map(|category| category.name),
                entropy: entry.entropy.map(|breakdown| breakdown.total),
            })
            .collect();

        Self {
            mode: outcome.mode,
            generated_at: outcome.generated_at,
            limit,
            courses,
        }
    }
}

/// Ranking endpoints plus health probes; `/ready` and `/metrics` need an
/// [`AppState`] extension layered on by the caller.
pub(crate) fn ranking_router<S>(engine: Arc<RankingEngine<S>>) -> Router
where
    S: CatalogSource + 'static,
{
    Router::new()
        .route("/api/v1/courses/top", get(top_courses_endpoint::<S>))
        .with_state(engine)
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
}

pub(crate) async fn top_courses_endpoint<S>(
    State(engine): State<Arc<RankingEngine<S>>>,
    query: Result<Query<TopCoursesQuery>, QueryRejection>,
) -> Result<Json<TopCoursesResponse>, AppError>
where
    S: CatalogSource + 'static,
{
    let Query(query) = query?;
    let limit = query.limit.unwrap_or(engine.config().default_limit);
    let outcome = engine.rank(limit)?;
    Ok(Json(TopCoursesResponse::from_outcome(outcome, limit)))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use course_rank::catalog::{CatalogSnapshot, InMemoryCatalog};
    use course_rank::config::RankingConfig;
    use serde_json::Value;
    use std::io::Cursor;
    use tower::ServiceExt;

    const SNAPSHOT: &str = r#"{
        "categories": [{ "id": 1, "name": "Programming" }],
        "criterion_types": [{ "id": 1, "name": "Content", "is_using": true }],
        "criteria": [{ "code": "c1", "weight": 2.0, "type_id": 1, "status": true }],
        "courses": [
            { "id": 1, "name": "A", "category_id": 1, "status": true,
              "pfr": { "c1": { "agreement": 0.9, "neutral": 0.05, "disagreement": 0.05 } } },
            { "id": 2, "name": "B", "category_id": 1, "status": true,
              "pfr": { "c1": { "agreement": 0.5, "neutral": 0.3, "disagreement": 0.2 } } },
            { "id": 3, "name": "C", "category_id": 1, "status": true,
              "pfr": { "c1": { "agreement": 0.2, "neutral": 0.4, "disagreement": 0.4 } } }
        ],
        "evaluations": [
            { "course_id": 1, "criteria_type_id": 1, "type": "pfr" },
            { "course_id": 2, "criteria_type_id": 1, "type": "pfr" },
            { "course_id": 3, "criteria_type_id": 1, "type": "pfr" }
        ]
    }"#;

    fn router() -> Router {
        let snapshot = CatalogSnapshot::from_reader(Cursor::new(SNAPSHOT)).expect("snapshot");
        let catalog = InMemoryCatalog::from_snapshot(snapshot).expect("catalog");
        let config = RankingConfig {
            minimum_evaluation_count: 1,
            default_limit: 2,
            ..RankingConfig::default()
        };
        ranking_router(Arc::new(RankingEngine::new(Arc::new(catalog), config)))
    }

    async fn get_json(router: Router, uri: &str) -> (StatusCode, Value) {
        let response = router
            .oneshot(Request::get(uri).body(Body::empty()).expect("request"))
            .await
            .expect("router responds");
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
            .await
            .expect("read body");
        (status, serde_json::from_slice(&body).expect("json payload"))
    }

    #[tokio::test]
    async fn top_courses_returns_ranked_views() {
        let (status, body) = get_json(router(), "/api/v1/courses/top?limit=3").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["mode"], "ranked");
        assert_eq!(body["limit"], 3);
        let names: Vec<&str> = body["courses"]
            .as_array()
            .expect("courses array")
            .iter()
            .map(|course| course["name"].as_str().expect("name"))
            .collect();
        assert_eq!(names, vec!["A", "B", "C"]);
        assert_eq!(body["courses"][0]["category"], "Programming");
        assert_eq!(body["courses"][0]["entropy"], 0.0);
    }

    #[tokio::test]
    async fn top_courses_uses_default_limit() {
        let (status, body) = get_json(router(), "/api/v1/courses/top").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["courses"].as_array().expect("courses array").len(), 2);
    }

    #[tokio::test]
    async fn zero_limit_is_a_bad_request() {
        let (status, body) = get_json(router(), "/api/v1/courses/top?limit=0").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"]
            .as_str()
            .expect("error message")
            .contains("limit"));
    }

    #[tokio::test]
    async fn malformed_limit_returns_json_error() {
        let (status, body) = get_json(router(), "/api/v1/courses/top?limit=abc").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"]
            .as_str()
            .expect("error message")
            .starts_with("invalid query"));
    }

    #[tokio::test]
    async fn bad_catalog_weights_are_a_server_error() {
        let snapshot = CatalogSnapshot::from_reader(Cursor::new(SNAPSHOT.replace("2.0", "0.0")))
            .expect("snapshot");
        let catalog = InMemoryCatalog::from_snapshot(snapshot).expect("catalog");
        let config = RankingConfig {
            minimum_evaluation_count: 1,
            ..RankingConfig::default()
        };
        let router = ranking_router(Arc::new(RankingEngine::new(Arc::new(catalog), config)));

        let (status, body) = get_json(router, "/api/v1/courses/top?limit=3").await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn healthcheck_reports_ok() {
        let (status, body) = get_json(router(), "/health").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }
}
