use serde::{Deserialize, Serialize};
use tracing::debug;

use super::domain::{AgeBracket, HouseholdType, PlanCost, PricingPlan, UnknownVariant};

/// Caller passed a filter value outside the fixed enumerations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid comparison filter `{field}`: {source}")]
pub struct InvalidFilterError {
    pub field: &'static str,
    #[source]
    pub source: UnknownVariant,
}

/// Parsed (age bracket, household type) pair selecting one matrix cell per plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonFilter {
    pub age_bracket: AgeBracket,
    pub household_type: HouseholdType,
}

impl ComparisonFilter {
    pub fn new(age_bracket: AgeBracket, household_type: HouseholdType) -> Self {
        Self {
            age_bracket,
            household_type,
        }
    }

    pub fn parse(age_bracket: &str, household_type: &str) -> Result<Self, InvalidFilterError> {
        let age_bracket = age_bracket
            .parse()
            .map_err(|source| InvalidFilterError {
                field: "age_bracket",
                source,
            })?;
        let household_type = household_type
            .parse()
            .map_err(|source| InvalidFilterError {
                field: "household_type",
                source,
            })?;
        Ok(Self::new(age_bracket, household_type))
    }
}

/// Side-by-side summary of one plan for the chosen filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanComparisonRow {
    pub plan_id: String,
    pub provider_name: String,
    pub plan_name: String,
    pub emergency_services: String,
    pub surgical_procedures: String,
    pub preventative_services: String,
    pub maternity: String,
    pub pregnancy_waiting_period: String,
    pub pre_existing_waiting_period: String,
    pub alternative_medicine: String,
    pub telemedicine: String,
    pub prescription_coverage: String,
    pub lifetime_limit: String,
    pub costs: Vec<PlanCost>,
}

impl PlanComparisonRow {
    fn from_plan(plan: &PricingPlan, costs: &[PlanCost]) -> Self {
        let coverage = &plan.coverage;
        Self {
            plan_id: plan.id.clone(),
            provider_name: plan.provider_name.clone(),
            plan_name: plan.plan_name.display_name(),
            emergency_services: coverage.emergency_services.clone(),
            surgical_procedures: coverage.surgical_procedures.clone(),
            preventative_services: coverage.preventative_services.clone(),
            maternity: coverage.maternity.clone(),
            pregnancy_waiting_period: coverage.pregnancy_waiting_period.clone(),
            pre_existing_waiting_period: coverage.pre_existing_waiting_period.clone(),
            alternative_medicine: coverage.alternative_medicine.clone(),
            telemedicine: coverage.telemedicine.clone(),
            prescription_coverage: coverage.prescription_coverage.clone(),
            lifetime_limit: coverage.lifetime_limit.clone(),
            costs: costs.to_vec(),
        }
    }
}

/// Rows for every plan priced under `filter`, in input order. Plans without a
/// matching matrix entry are left out.
pub fn compare_plans(filter: ComparisonFilter, plans: &[PricingPlan]) -> Vec<PlanComparisonRow> {
    plans
        .iter()
        .filter_map(|plan| match plan.matrix_entry(filter.age_bracket, filter.household_type) {
            Some(entry) => Some(PlanComparisonRow::from_plan(plan, &entry.costs)),
            None => {
                debug!(
                    plan_id = %plan.id,
                    age_bracket = %filter.age_bracket,
                    household_type = %filter.household_type,
                    "plan not priced for comparison filter"
                );
                None
            }
        })
        .collect()
}

/// String-keyed entry point used by callers that receive filters from the outside.
/// `plans` defaults to the whole catalog.
pub fn get_plan_comparison(
    catalog: &[PricingPlan],
    age_bracket: &str,
    household_type: &str,
    plans: Option<&[PricingPlan]>,
) -> Result<Vec<PlanComparisonRow>, InvalidFilterError> {
    let filter = ComparisonFilter::parse(age_bracket, household_type)?;
    Ok(compare_plans(filter, plans.unwrap_or(catalog)))
}
