use crate::infra::load_catalog;
use crate::routes::TopCoursesResponse;
use clap::Args;
use course_rank::config::AppConfig;
use course_rank::error::AppError;
use course_rank::ranking::RankingEngine;
use course_rank::telemetry;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct RankArgs {
    /// Catalog snapshot (JSON) to rank
    #[arg(long)]
    pub(crate) snapshot: PathBuf,
    /// Evaluation log (CSV) replacing the snapshot's evaluations
    #[arg(long)]
    pub(crate) evaluations: Option<PathBuf>,
    /// Number of courses to return (defaults to RANKING_DEFAULT_LIMIT)
    #[arg(long)]
    pub(crate) limit: Option<usize>,
    /// Include the ideal profile and per-criterion entropies
    #[arg(long)]
    pub(crate) explain: bool,
}

pub(crate) fn run_rank(args: RankArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let catalog = load_catalog(Some(args.snapshot.as_path()), args.evaluations.as_deref())?;
    let engine = RankingEngine::new(Arc::new(catalog), config.ranking.clone());
    let limit = args.limit.unwrap_or(config.ranking.default_limit);
    let outcome = engine.rank(limit)?;

    let rendered = if args.explain {
        serde_json::to_string_pretty(&outcome)
    } else {
        serde_json::to_string_pretty(&TopCoursesResponse::from_outcome(outcome, limit))
    }
    .map_err(|err| AppError::Io(err.into()))?;

    println!("{rendered}");
    Ok(())
}
