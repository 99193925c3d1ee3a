//! Pricing sheet ingestion.
//!
//! Providers publish their rate tables as spreadsheets; this module applies an
//! exported CSV onto catalog plans and re-validates everything it touches.

use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use tracing::info;

use super::domain::{AgeBracket, HouseholdType, PricingPlan};
use super::validation::{
    validate_plan, CostCandidate, MatrixEntryCandidate, PlanCandidate, ValidationError,
};

#[derive(Debug, thiserror::Error)]
pub enum PricingImportError {
    #[error("failed to read pricing sheet: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid pricing CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("pricing row {row} references unknown plan '{plan_id}'")]
    UnknownPlan { row: usize, plan_id: String },
    #[error("pricing row {row} has an unrecognised {field} '{value}'")]
    UnknownCell {
        row: usize,
        field: &'static str,
        value: String,
    },
    #[error("plan '{plan_id}' is invalid after applying pricing: {source}")]
    InvalidPlan {
        plan_id: String,
        #[source]
        source: ValidationError,
    },
}

#[derive(Debug, Deserialize)]
struct PricingRow {
    plan_id: String,
    age_bracket: String,
    household_type: String,
    monthly_premium: f64,
    initial_unshared_amount: f64,
}

/// Summary of what an import changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricingImportReport {
    pub rows: usize,
    pub plans_updated: usize,
    pub cells_replaced: usize,
}

pub struct PricingMatrixImporter;

impl PricingMatrixImporter {
    pub fn from_path<P: AsRef<Path>>(
        path: P,
        plans: &mut [PricingPlan],
    ) -> Result<PricingImportReport, PricingImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file, plans)
    }

    /// Rows for the same plan and cell accumulate cost options in file order and
    /// replace that cell's costs wholesale. Plans are only modified when the whole
    /// sheet applies cleanly.
    pub fn from_reader<R: Read>(
        reader: R,
        plans: &mut [PricingPlan],
    ) -> Result<PricingImportReport, PricingImportError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut cells: BTreeMap<(String, AgeBracket, HouseholdType), Vec<CostCandidate>> =
            BTreeMap::new();
        let mut rows = 0;

        for (index, record) in csv_reader.deserialize::<PricingRow>().enumerate() {
            let row = record?;
            let row_number = index + 1;
            rows += 1;

            if !plans.iter().any(|plan| plan.id == row.plan_id) {
                return Err(PricingImportError::UnknownPlan {
                    row: row_number,
                    plan_id: row.plan_id,
                });
            }

            let age_bracket = row.age_bracket.parse::<AgeBracket>().map_err(|err| {
                PricingImportError::UnknownCell {
                    row: row_number,
                    field: "age_bracket",
                    value: err.value,
                }
            })?;
            let household_type = row.household_type.parse::<HouseholdType>().map_err(|err| {
                PricingImportError::UnknownCell {
                    row: row_number,
                    field: "household_type",
                    value: err.value,
                }
            })?;

            cells
                .entry((row.plan_id, age_bracket, household_type))
                .or_default()
                .push(CostCandidate {
                    monthly_premium: Some(row.monthly_premium),
                    initial_unshared_amount: Some(row.initial_unshared_amount),
                });
        }

        let mut updated: BTreeMap<String, PricingPlan> = BTreeMap::new();
        for ((plan_id, age_bracket, household_type), costs) in cells {
            let mut candidate = match updated.get(&plan_id) {
                Some(plan) => PlanCandidate::from(plan),
                None => plans
                    .iter()
                    .find(|plan| plan.id == plan_id)
                    .map(PlanCandidate::from)
                    .unwrap_or_default(),
            };

            apply_cell(&mut candidate, age_bracket, household_type, costs);
            let plan = validate_plan(candidate).map_err(|source| {
                PricingImportError::InvalidPlan {
                    plan_id: plan_id.clone(),
                    source,
                }
            })?;
            updated.insert(plan_id, plan);
        }

        let plans_updated = updated.len();
        let mut cells_replaced = 0;
        for plan in plans.iter_mut() {
            if let Some(replacement) = updated.remove(&plan.id) {
                cells_replaced += replacement
                    .plan_matrix
                    .iter()
                    .filter(|entry| {
                        plan.matrix_entry(entry.age_bracket, entry.household_type)
                            .map(|existing| existing.costs != entry.costs)
                            .unwrap_or(true)
                    })
                    .count();
                *plan = replacement;
            }
        }

        info!(rows, plans_updated, cells_replaced, "applied pricing sheet");

        Ok(PricingImportReport {
            rows,
            plans_updated,
            cells_replaced,
        })
    }
}

fn apply_cell(
    candidate: &mut PlanCandidate,
    age_bracket: AgeBracket,
    household_type: HouseholdType,
    costs: Vec<CostCandidate>,
) {
    let matrix = candidate.plan_matrix.get_or_insert_with(Vec::new);
    let existing = matrix.iter().position(|entry| {
        entry.age_bracket.as_deref() == Some(age_bracket.label())
            && entry.household_type.as_deref() == Some(household_type.label())
    });

    match existing {
        Some(index) => matrix[index].costs = Some(costs),
        None => matrix.push(MatrixEntryCandidate {
            age_bracket: Some(age_bracket.label().to_string()),
            household_type: Some(household_type.label().to_string()),
            costs: Some(costs),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plans::catalog::{PlanCatalogSource, StaticCatalog};
    use std::io::Cursor;

    fn plans() -> Vec<PricingPlan> {
        StaticCatalog::bundled()
            .and_then(|catalog| catalog.fetch_catalog())
            .expect("bundled catalog")
            .plans()
            .to_vec()
    }

    const HEADER: &str =
        "plan_id,age_bracket,household_type,monthly_premium,initial_unshared_amount\n";

    #[test]
    fn replaces_existing_cell_costs() {
        let mut plans = plans();
        let csv = format!(
            "{HEADER}harbor-classic,30-39,Member Only,199.0,750.0\nharbor-classic,30-39,Member Only,160.0,1500.0\n"
        );

        let report =
            PricingMatrixImporter::from_reader(Cursor::new(csv), &mut plans).expect("applies");

        assert_eq!(report.rows, 2);
        assert_eq!(report.plans_updated, 1);
        assert_eq!(report.cells_replaced, 1);

        let plan = plans
            .iter()
            .find(|plan| plan.id == "harbor-classic")
            .expect("plan kept");
        let entry = plan
            .matrix_entry(AgeBracket::ThirtyToThirtyNine, HouseholdType::MemberOnly)
            .expect("cell present");
        assert_eq!(entry.costs.len(), 2);
        assert_eq!(entry.costs[0].monthly_premium, 199.0);
        assert_eq!(entry.costs[1].initial_unshared_amount, 1500.0);
    }

    #[test]
    fn adds_cells_a_plan_did_not_price_before() {
        let mut plans = plans();
        let before = plans
            .iter()
            .find(|plan| plan.id == "prairie-young-adult")
            .expect("plan")
            .plan_matrix
            .len();
        let csv = format!("{HEADER}prairie-young-adult,40-49,Member Only,130,2000\n");

        PricingMatrixImporter::from_reader(Cursor::new(csv), &mut plans).expect("applies");

        let plan = plans
            .iter()
            .find(|plan| plan.id == "prairie-young-adult")
            .expect("plan");
        assert_eq!(plan.plan_matrix.len(), before + 1);
    }

    #[test]
    fn unknown_plan_aborts_without_changes() {
        let mut plans = plans();
        let original = plans.clone();
        let csv = format!(
            "{HEADER}harbor-classic,30-39,Member Only,10,10\nghost-plan,30-39,Member Only,100,1000\n"
        );

        let err = PricingMatrixImporter::from_reader(Cursor::new(csv), &mut plans)
            .expect_err("unknown plan");
        assert!(matches!(err, PricingImportError::UnknownPlan { row: 2, .. }));
        assert_eq!(plans, original);
    }

    #[test]
    fn non_positive_premium_is_rejected_by_validation() {
        let mut plans = plans();
        let csv = format!("{HEADER}harbor-classic,30-39,Member Only,0,1000\n");

        let err = PricingMatrixImporter::from_reader(Cursor::new(csv), &mut plans)
            .expect_err("zero premium");
        assert!(matches!(
            err,
            PricingImportError::InvalidPlan {
                source: ValidationError::NonPositiveCost { .. },
                ..
            }
        ));
    }

    #[test]
    fn unknown_bracket_names_the_row() {
        let mut plans = plans();
        let csv = format!("{HEADER}harbor-classic,65+,Member Only,100,1000\n");

        let err = PricingMatrixImporter::from_reader(Cursor::new(csv), &mut plans)
            .expect_err("bad bracket");
        assert!(err.to_string().contains("row 1"));
    }
}
