use crate::cli::ServeArgs;
use crate::infra::{load_catalog, AppState};
use crate::routes::ranking_router;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use course_rank::config::AppConfig;
use course_rank::error::AppError;
use course_rank::ranking::RankingEngine;
use course_rank::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }
    if let Some(snapshot) = args.snapshot.take() {
        config.catalog.snapshot_path = Some(snapshot);
    }

    telemetry::init(&config.telemetry)?;

    let catalog = load_catalog(
        config.catalog.snapshot_path.as_deref(),
        args.evaluations.as_deref(),
    )?;
    let engine = Arc::new(RankingEngine::new(
        Arc::new(catalog),
        config.ranking.clone(),
    ));

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let app = ranking_router(engine)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        minimum_evaluations = config.ranking.minimum_evaluation_count,
        excluded_type = %config.ranking.excluded_criterion_type_id,
        "course ranking service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
