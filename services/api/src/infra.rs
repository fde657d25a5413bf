use course_rank::catalog::{evaluations_from_csv, CatalogSnapshot, InMemoryCatalog};
use course_rank::error::AppError;
use metrics_exporter_prometheus::PrometheusHandle;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Index the snapshot at `snapshot`, optionally swapping in a CSV evaluation log.
pub(crate) fn load_catalog(
    snapshot: Option<&Path>,
    evaluations: Option<&Path>,
) -> Result<InMemoryCatalog, AppError> {
    let snapshot = match snapshot {
        Some(path) => {
            let snapshot = CatalogSnapshot::from_path(path)?;
            info!(
                path = %path.display(),
                courses = snapshot.courses.len(),
                criteria = snapshot.criteria.len(),
                "loaded catalog snapshot"
            );
            snapshot
        }
        None => {
            warn!("no catalog snapshot configured; serving an empty catalog");
            CatalogSnapshot::default()
        }
    };

    let catalog = InMemoryCatalog::from_snapshot(snapshot)
        .map_err(course_rank::catalog::CatalogError::from)?;

    match evaluations {
        Some(path) => {
            let file = std::fs::File::open(path)?;
            let evaluations = evaluations_from_csv(file)?;
            info!(
                path = %path.display(),
                evaluations = evaluations.len(),
                "loaded evaluation log"
            );
            Ok(catalog.with_evaluations(evaluations))
        }
        None => Ok(catalog),
    }
}
