use crate::rank::{run_rank, RankArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use course_rank::error::AppError;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "Course Ranking Service",
    about = "Rank catalog courses by picture-fuzzy cross-entropy",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Rank a catalog snapshot once and print the result as JSON
    Rank(RankArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Catalog snapshot (JSON) to serve; defaults to CATALOG_SNAPSHOT
    #[arg(long)]
    pub(crate) snapshot: Option<PathBuf>,
    /// Evaluation log (CSV) replacing the snapshot's evaluations
    #[arg(long)]
    pub(crate) evaluations: Option<PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Rank(args) => run_rank(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_rank_arguments() {
        let cli = Cli::try_parse_from([
            "course-rank-api",
            "rank",
            "--snapshot",
            "catalog.json",
            "--limit",
            "3",
        ])
        .expect("arguments parse");

        match cli.command {
            Some(Command::Rank(args)) => {
                assert_eq!(args.snapshot, PathBuf::from("catalog.json"));
                assert_eq!(args.limit, Some(3));
                assert!(args.evaluations.is_none());
            }
            other => panic!("expected rank command, got {other:?}"),
        }
    }

    #[test]
    fn serve_is_the_default_command() {
        let cli = Cli::try_parse_from(["course-rank-api"]).expect("arguments parse");
        assert!(cli.command.is_none());
    }
}
