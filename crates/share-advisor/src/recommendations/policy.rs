use serde::{Deserialize, Serialize};

use crate::plans::{AgeBracket, HouseholdType, PlanMatrixEntry, PricingPlan};
use crate::questionnaire::QuestionnaireResponse;

/// Why a plan was left out of the recommendations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum ExclusionReason {
    AgeOutsideBrackets {
        age: u8,
    },
    NoMatrixEntry {
        age_bracket: AgeBracket,
        household_type: HouseholdType,
    },
    MissingMaternityCoverage,
    NoPreExistingAccommodation,
}

impl ExclusionReason {
    pub fn summary(&self) -> String {
        match self {
            ExclusionReason::AgeOutsideBrackets { age } => {
                format!("age {age} is outside supported brackets")
            }
            ExclusionReason::NoMatrixEntry {
                age_bracket,
                household_type,
            } => format!("not priced for {age_bracket} / {household_type}"),
            ExclusionReason::MissingMaternityCoverage => {
                "maternity coverage required but not shared".to_string()
            }
            ExclusionReason::NoPreExistingAccommodation => {
                "pre-existing conditions are not accommodated".to_string()
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanExclusion {
    pub plan_id: String,
    #[serde(flatten)]
    pub reason: ExclusionReason,
}

/// Valid inputs, but no plan in the catalog qualifies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("no eligible plans for {household_type} aged {age} ({} excluded)", .exclusions.len())]
pub struct NoEligiblePlansError {
    pub age: u8,
    pub age_bracket: Option<AgeBracket>,
    pub household_type: HouseholdType,
    pub exclusions: Vec<PlanExclusion>,
}

/// Matrix cell a plan would be priced from, or the hard constraint it fails.
pub(crate) fn eligible_entry<'a>(
    plan: &'a PricingPlan,
    response: &QuestionnaireResponse,
    age_bracket: Option<AgeBracket>,
    household_type: HouseholdType,
) -> Result<&'a PlanMatrixEntry, ExclusionReason> {
    let age_bracket = age_bracket.ok_or(ExclusionReason::AgeOutsideBrackets { age: response.age })?;

    let entry = plan
        .matrix_entry(age_bracket, household_type)
        .ok_or(ExclusionReason::NoMatrixEntry {
            age_bracket,
            household_type,
        })?;

    if response.requires_maternity() && !plan.coverage.covers_maternity {
        return Err(ExclusionReason::MissingMaternityCoverage);
    }

    if response.pre_existing_conditions && !plan.coverage.accepts_pre_existing_conditions {
        return Err(ExclusionReason::NoPreExistingAccommodation);
    }

    Ok(entry)
}
