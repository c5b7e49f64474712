use crate::report::{run_rank, RankArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use opportunity_match::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Opportunity Match",
    about = "Rank opportunities against a member profile, over HTTP or from the command line",
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
    /// Rank a catalog file against a profile file and print the result
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
    use opportunity_match::matching::OpportunityCategory;

    #[test]
    fn no_subcommand_defaults_to_serve() {
        let cli = Cli::try_parse_from(["opportunity-match-api"]).expect("parses");
        assert!(cli.command.is_none());
    }

    #[test]
    fn rank_arguments_parse() {
        let cli = Cli::try_parse_from([
            "opportunity-match-api",
            "rank",
            "--profile",
            "member.json",
            "--catalog",
            "catalog.json",
            "--category",
            "sound-design",
            "--min-score",
            "60",
            "--exclusive-only",
            "--json",
        ])
        .expect("parses");

        match cli.command {
            Some(Command::Rank(args)) => {
                assert_eq!(args.category, Some(OpportunityCategory::SoundDesign));
                assert_eq!(args.min_score, Some(60));
                assert!(args.exclusive_only);
                assert!(args.json);
            }
            other => panic!("expected rank command, got {other:?}"),
        }
    }

    #[test]
    fn rank_rejects_scores_above_one_hundred() {
        let result = Cli::try_parse_from([
            "opportunity-match-api",
            "rank",
            "--profile",
            "member.json",
            "--catalog",
            "catalog.json",
            "--min-score",
            "140",
        ]);
        assert!(result.is_err());
    }
}
