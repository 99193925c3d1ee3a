use crate::commands::{
    run_catalog_validate, run_compare, run_import_pricing, run_recommend, CatalogArgs,
    CompareArgs, ImportPricingArgs, RecommendArgs,
};
use crate::server;
use clap::{Args, Parser, Subcommand};
use share_advisor::error::AppError;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "Share Plan Advisor",
    about = "Compare health-sharing plans and recommend the best fit from questionnaire answers",
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
    /// Rank catalog plans for a questionnaire saved as JSON
    Recommend(RecommendArgs),
    /// Print the side-by-side comparison for one age bracket and household type
    Compare(CompareArgs),
    /// Maintain the plan catalog
    Catalog {
        #[command(subcommand)]
        command: CatalogCommand,
    },
}

#[derive(Subcommand, Debug)]
enum CatalogCommand {
    /// Validate every plan record and report catalog coverage
    Validate(CatalogArgs),
    /// Apply a pricing CSV to the catalog and write the updated JSON
    ImportPricing(ImportPricingArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Serve plans from this JSON catalog instead of the configured one
    #[arg(long)]
    pub(crate) catalog: Option<PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Recommend(args) => run_recommend(args),
        Command::Compare(args) => run_compare(args),
        Command::Catalog {
            command: CatalogCommand::Validate(args),
        } => run_catalog_validate(args),
        Command::Catalog {
            command: CatalogCommand::ImportPricing(args),
        } => run_import_pricing(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_serve_without_subcommand() {
        let cli = Cli::try_parse_from(["share-advisor-api"]).expect("parses");
        assert!(cli.command.is_none());
    }

    #[test]
    fn parses_compare_with_repeated_plan_ids() {
        let cli = Cli::try_parse_from([
            "share-advisor-api",
            "compare",
            "--age-bracket",
            "30-39",
            "--household-type",
            "Member & Spouse",
            "--plan-id",
            "harbor-classic",
            "--plan-id",
            "summit-essential",
        ])
        .expect("parses");

        match cli.command {
            Some(Command::Compare(args)) => {
                assert_eq!(args.household_type, "Member & Spouse");
                assert_eq!(args.plan_ids, vec!["harbor-classic", "summit-essential"]);
            }
            other => panic!("expected compare, got {other:?}"),
        }
    }

    #[test]
    fn import_pricing_requires_output() {
        let result = Cli::try_parse_from([
            "share-advisor-api",
            "catalog",
            "import-pricing",
            "--pricing",
            "rates.csv",
        ]);
        assert!(result.is_err());
    }
}
