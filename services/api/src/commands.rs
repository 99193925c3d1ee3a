use crate::infra::{ConfiguredCatalog, InMemoryQuestionnaireStore};
use clap::Args;
use serde::Serialize;
use share_advisor::config::AppConfig;
use share_advisor::error::AppError;
use share_advisor::plans::{
    AgeBracket, HouseholdType, PlanCatalogSource, PlanComparisonRow, PricingMatrixImporter,
    StaticCatalog,
};
use share_advisor::questionnaire::QuestionnaireResponse;
use share_advisor::recommendations::{NoEligiblePlansError, RankedPlan};
use share_advisor::telemetry::{self, LogSink};
use share_advisor::{AdvisorError, PlanAdvisorService};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

type CliAdvisor = PlanAdvisorService<ConfiguredCatalog, InMemoryQuestionnaireStore>;

#[derive(Args, Debug)]
pub(crate) struct RecommendArgs {
    /// Questionnaire answers as JSON
    #[arg(long)]
    pub(crate) questionnaire: PathBuf,
    /// Plan catalog JSON (defaults to APP_CATALOG_PATH or the bundled catalog)
    #[arg(long)]
    pub(crate) catalog: Option<PathBuf>,
    /// Number of plans to list
    #[arg(long, default_value_t = 3)]
    pub(crate) top: usize,
    /// Emit JSON instead of a text summary
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct CompareArgs {
    /// Age bracket label, e.g. "30-39"
    #[arg(long)]
    pub(crate) age_bracket: String,
    /// Household type label, e.g. "Member & Spouse"
    #[arg(long)]
    pub(crate) household_type: String,
    /// Restrict the comparison to these plans (repeatable, order kept)
    #[arg(long = "plan-id")]
    pub(crate) plan_ids: Vec<String>,
    /// Plan catalog JSON (defaults to APP_CATALOG_PATH or the bundled catalog)
    #[arg(long)]
    pub(crate) catalog: Option<PathBuf>,
    /// Emit JSON instead of a text table
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct CatalogArgs {
    /// Plan catalog JSON (defaults to APP_CATALOG_PATH or the bundled catalog)
    #[arg(long)]
    pub(crate) catalog: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub(crate) struct ImportPricingArgs {
    /// CSV with plan_id, age_bracket, household_type, monthly_premium, initial_unshared_amount
    #[arg(long)]
    pub(crate) pricing: PathBuf,
    /// Catalog to update (defaults to APP_CATALOG_PATH or the bundled catalog)
    #[arg(long)]
    pub(crate) catalog: Option<PathBuf>,
    /// Where to write the updated catalog JSON
    #[arg(long)]
    pub(crate) output: PathBuf,
}

#[derive(Debug, Serialize)]
struct RecommendationReport<'a> {
    status: &'static str,
    questionnaire: &'a QuestionnaireResponse,
    plans: &'a [RankedPlan],
    #[serde(skip_serializing_if = "Option::is_none")]
    no_matches: Option<&'a NoEligiblePlansError>,
}

pub(crate) fn run_recommend(args: RecommendArgs) -> Result<(), AppError> {
    let RecommendArgs {
        questionnaire,
        catalog,
        top,
        json,
    } = args;

    let advisor = prepare_advisor(catalog)?;
    let file = File::open(&questionnaire)?;
    let response: QuestionnaireResponse =
        serde_json::from_reader(BufReader::new(file)).map_err(std::io::Error::from)?;

    let (ranked, no_matches) = match advisor.recommend(&response) {
        Ok(ranked) => (ranked, None),
        Err(AdvisorError::NoEligiblePlans(details)) => (Vec::new(), Some(details)),
        Err(other) => return Err(other.into()),
    };
    let shown = &ranked[..ranked.len().min(top)];

    if json {
        let report = RecommendationReport {
            status: if no_matches.is_some() { "no_matches" } else { "ok" },
            questionnaire: &response,
            plans: shown,
            no_matches: no_matches.as_ref(),
        };
        return print_json(&report);
    }

    println!(
        "Recommendations for age {} / {} (zip {})",
        response.age,
        response.household_type(),
        response.zip_code
    );
    if let Some(details) = no_matches {
        println!("No plan fits these answers: {details}");
        for exclusion in &details.exclusions {
            println!("  - {}: {}", exclusion.plan_id, exclusion.reason.summary());
        }
        return Ok(());
    }

    for plan in shown {
        println!(
            "{:>2}. {} - {}  ${:.2}/month, ${:.0} initial unshared  (score {:.4})",
            plan.rank,
            plan.provider_name,
            plan.plan_name,
            plan.cost.monthly_premium,
            plan.cost.initial_unshared_amount,
            plan.score
        );
        for component in &plan.components {
            println!("      {:+.4}  {}", component.points, component.notes);
        }
    }
    if ranked.len() > shown.len() {
        println!("  ... {} more eligible", ranked.len() - shown.len());
    }

    Ok(())
}

pub(crate) fn run_compare(args: CompareArgs) -> Result<(), AppError> {
    let CompareArgs {
        age_bracket,
        household_type,
        plan_ids,
        catalog,
        json,
    } = args;

    let advisor = prepare_advisor(catalog)?;
    let requested = (!plan_ids.is_empty()).then_some(plan_ids);
    let rows = advisor.compare(&age_bracket, &household_type, requested.as_deref())?;

    if json {
        return print_json(&rows);
    }

    println!(
        "Plan comparison for {} / {} ({} plans)",
        age_bracket.trim(),
        household_type.trim(),
        rows.len()
    );
    for row in &rows {
        print_comparison_row(row);
    }

    Ok(())
}

fn print_comparison_row(row: &PlanComparisonRow) {
    println!("\n{} - {} [{}]", row.provider_name, row.plan_name, row.plan_id);
    for cost in &row.costs {
        println!(
            "  ${:.2}/month with ${:.0} initial unshared",
            cost.monthly_premium, cost.initial_unshared_amount
        );
    }
    println!("  Maternity: {}", row.maternity);
    println!("  Pre-existing waiting period: {}", row.pre_existing_waiting_period);
    println!("  Lifetime limit: {}", row.lifetime_limit);
}

pub(crate) fn run_catalog_validate(args: CatalogArgs) -> Result<(), AppError> {
    let (_, catalog) = prepare(args.catalog)?;
    let snapshot = catalog.fetch_catalog()?;
    let cells = AgeBracket::ALL.len() * HouseholdType::ALL.len();

    println!(
        "Catalog {} is valid: {} plans",
        catalog.describe(),
        snapshot.len()
    );
    for plan in snapshot.plans() {
        println!(
            "  {:<24} {:>2}/{} cells priced  maternity: {:<3}  pre-existing: {}",
            plan.id,
            plan.plan_matrix.len(),
            cells,
            if plan.coverage.covers_maternity { "yes" } else { "no" },
            if plan.coverage.accepts_pre_existing_conditions {
                "yes"
            } else {
                "no"
            }
        );
    }

    Ok(())
}

pub(crate) fn run_import_pricing(args: ImportPricingArgs) -> Result<(), AppError> {
    let ImportPricingArgs {
        pricing,
        catalog,
        output,
    } = args;

    let (_, catalog) = prepare(catalog)?;
    let mut plans = catalog.fetch_catalog()?.plans().to_vec();
    let report = PricingMatrixImporter::from_path(&pricing, &mut plans)?;
    StaticCatalog::new(plans.clone())?;

    let mut writer = BufWriter::new(File::create(&output)?);
    serde_json::to_writer_pretty(&mut writer, &plans).map_err(std::io::Error::from)?;
    writer.write_all(b"\n")?;
    writer.flush()?;

    info!(output = %output.display(), "wrote updated catalog");
    println!(
        "Applied {} pricing rows: {} plans updated, {} cells replaced -> {}",
        report.rows,
        report.plans_updated,
        report.cells_replaced,
        output.display()
    );

    Ok(())
}

fn prepare(catalog: Option<PathBuf>) -> Result<(AppConfig, ConfiguredCatalog), AppError> {
    let mut config = AppConfig::load()?;
    if let Some(path) = catalog {
        config.catalog.path = Some(path);
    }

    telemetry::init_with_sink(&config.telemetry, LogSink::Stderr)?;
    let catalog = ConfiguredCatalog::resolve(config.catalog.path.clone())?;
    Ok((config, catalog))
}

fn prepare_advisor(catalog: Option<PathBuf>) -> Result<CliAdvisor, AppError> {
    let (config, catalog) = prepare(catalog)?;
    Ok(PlanAdvisorService::new(
        Arc::new(catalog),
        Arc::new(InMemoryQuestionnaireStore::default()),
        config.recommendation,
    ))
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), AppError> {
    let rendered = serde_json::to_string_pretty(value).map_err(std::io::Error::from)?;
    println!("{rendered}");
    Ok(())
}
