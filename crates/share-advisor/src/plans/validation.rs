use std::collections::HashSet;

use serde::Deserialize;

use super::domain::{
    AgeBracket, HouseholdType, PlanCost, PlanCoverage, PlanMatrixEntry, PlanName, PricingPlan,
    UnknownVariant,
};

/// Reasons a catalog record is refused at ingestion.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("plan record could not be read: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("missing required field `{field}`")]
    MissingField { field: String },
    #[error("field `{field}` must not be blank")]
    BlankField { field: String },
    #[error("field `{field}` has an invalid value: {source}")]
    InvalidEnum {
        field: String,
        #[source]
        source: UnknownVariant,
    },
    #[error("field `{field}` must be a positive amount (found {value})")]
    NonPositiveCost { field: String, value: f64 },
    #[error("sourceUrl '{value}' is not an absolute http(s) URL")]
    InvalidUrl { value: String },
    #[error("plan matrix must contain at least one entry")]
    EmptyMatrix,
    #[error("matrix entry {age_bracket} / {household_type} has no costs")]
    EmptyCosts {
        age_bracket: AgeBracket,
        household_type: HouseholdType,
    },
    #[error("matrix entry {age_bracket} / {household_type} appears more than once")]
    DuplicateMatrixEntry {
        age_bracket: AgeBracket,
        household_type: HouseholdType,
    },
    #[error("plan id '{id}' appears more than once in the catalog")]
    DuplicatePlanId { id: String },
}

/// Loosely typed plan record as it arrives from storage, before any checks run.
///
/// Every field is optional so a missing value is reported by name instead of
/// surfacing as an opaque parse failure.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanCandidate {
    pub id: Option<String>,
    pub provider_name: Option<String>,
    pub plan_name: Option<PlanName>,
    pub max_coverage: Option<String>,
    pub annual_unshared_amount: Option<String>,
    pub source_url: Option<String>,
    pub plan_matrix: Option<Vec<MatrixEntryCandidate>>,
    pub coverage: Option<PlanCoverage>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatrixEntryCandidate {
    pub age_bracket: Option<String>,
    pub household_type: Option<String>,
    pub costs: Option<Vec<CostCandidate>>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostCandidate {
    pub monthly_premium: Option<f64>,
    pub initial_unshared_amount: Option<f64>,
}

impl From<&PricingPlan> for PlanCandidate {
    fn from(plan: &PricingPlan) -> Self {
        Self {
            id: Some(plan.id.clone()),
            provider_name: Some(plan.provider_name.clone()),
            plan_name: Some(plan.plan_name.clone()),
            max_coverage: Some(plan.max_coverage.clone()),
            annual_unshared_amount: Some(plan.annual_unshared_amount.clone()),
            source_url: Some(plan.source_url.clone()),
            plan_matrix: Some(
                plan.plan_matrix
                    .iter()
                    .map(|entry| MatrixEntryCandidate {
                        age_bracket: Some(entry.age_bracket.label().to_string()),
                        household_type: Some(entry.household_type.label().to_string()),
                        costs: Some(
                            entry
                                .costs
                                .iter()
                                .map(|cost| CostCandidate {
                                    monthly_premium: Some(cost.monthly_premium),
                                    initial_unshared_amount: Some(cost.initial_unshared_amount),
                                })
                                .collect(),
                        ),
                    })
                    .collect(),
            ),
            coverage: Some(plan.coverage.clone()),
        }
    }
}

/// Check a candidate field by field and produce a catalog-ready plan.
pub fn validate_plan(candidate: PlanCandidate) -> Result<PricingPlan, ValidationError> {
    let id = required_text(candidate.id, "id")?;
    let provider_name = required_text(candidate.provider_name, "providerName")?;
    let plan_name = candidate
        .plan_name
        .ok_or_else(|| missing("planName"))?;
    let variants = plan_name.variants();
    if variants.is_empty() || variants.iter().any(|name| name.trim().is_empty()) {
        return Err(ValidationError::BlankField {
            field: "planName".to_string(),
        });
    }
    let max_coverage = required_text(candidate.max_coverage, "maxCoverage")?;
    let annual_unshared_amount =
        required_text(candidate.annual_unshared_amount, "annualUnsharedAmount")?;

    let source_url = candidate.source_url.ok_or_else(|| missing("sourceUrl"))?;
    if !is_valid_source_url(&source_url) {
        return Err(ValidationError::InvalidUrl { value: source_url });
    }

    let raw_matrix = candidate.plan_matrix.ok_or_else(|| missing("planMatrix"))?;
    if raw_matrix.is_empty() {
        return Err(ValidationError::EmptyMatrix);
    }

    let mut seen = HashSet::new();
    let mut plan_matrix = Vec::with_capacity(raw_matrix.len());
    for (index, raw_entry) in raw_matrix.into_iter().enumerate() {
        let entry = validate_matrix_entry(index, raw_entry)?;
        if !seen.insert((entry.age_bracket, entry.household_type)) {
            return Err(ValidationError::DuplicateMatrixEntry {
                age_bracket: entry.age_bracket,
                household_type: entry.household_type,
            });
        }
        plan_matrix.push(entry);
    }

    Ok(PricingPlan {
        id,
        provider_name,
        plan_name,
        max_coverage,
        annual_unshared_amount,
        source_url,
        plan_matrix,
        coverage: candidate.coverage.unwrap_or_default(),
    })
}

/// Parse and validate a single JSON plan record.
pub fn validate_plan_json(value: serde_json::Value) -> Result<PricingPlan, ValidationError> {
    let candidate: PlanCandidate = serde_json::from_value(value)?;
    validate_plan(candidate)
}

/// Catalog-level checks that span plans.
pub fn ensure_unique_ids(plans: &[PricingPlan]) -> Result<(), ValidationError> {
    let mut seen = HashSet::new();
    for plan in plans {
        if !seen.insert(plan.id.as_str()) {
            return Err(ValidationError::DuplicatePlanId {
                id: plan.id.clone(),
            });
        }
    }
    Ok(())
}

fn validate_matrix_entry(
    index: usize,
    raw: MatrixEntryCandidate,
) -> Result<PlanMatrixEntry, ValidationError> {
    let prefix = format!("planMatrix[{index}]");

    let age_bracket = parse_variant::<AgeBracket>(raw.age_bracket, &prefix, "ageBracket")?;
    let household_type =
        parse_variant::<HouseholdType>(raw.household_type, &prefix, "householdType")?;

    let raw_costs = raw
        .costs
        .ok_or_else(|| missing(&format!("{prefix}.costs")))?;
    if raw_costs.is_empty() {
        return Err(ValidationError::EmptyCosts {
            age_bracket,
            household_type,
        });
    }

    let costs = raw_costs
        .into_iter()
        .enumerate()
        .map(|(cost_index, cost)| {
            let cost_prefix = format!("{prefix}.costs[{cost_index}]");
            Ok(PlanCost {
                monthly_premium: positive_amount(
                    cost.monthly_premium,
                    &format!("{cost_prefix}.monthlyPremium"),
                )?,
                initial_unshared_amount: positive_amount(
                    cost.initial_unshared_amount,
                    &format!("{cost_prefix}.initialUnsharedAmount"),
                )?,
            })
        })
        .collect::<Result<Vec<_>, ValidationError>>()?;

    Ok(PlanMatrixEntry {
        age_bracket,
        household_type,
        costs,
    })
}

fn parse_variant<T>(raw: Option<String>, prefix: &str, name: &str) -> Result<T, ValidationError>
where
    T: std::str::FromStr<Err = UnknownVariant>,
{
    let field = format!("{prefix}.{name}");
    let raw = raw.ok_or_else(|| missing(&field))?;
    raw.parse()
        .map_err(|source| ValidationError::InvalidEnum { field, source })
}

fn positive_amount(value: Option<f64>, field: &str) -> Result<f64, ValidationError> {
    let value = value.ok_or_else(|| missing(field))?;
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(ValidationError::NonPositiveCost {
            field: field.to_string(),
            value,
        })
    }
}

fn required_text(value: Option<String>, field: &str) -> Result<String, ValidationError> {
    let value = value.ok_or_else(|| missing(field))?;
    if value.trim().is_empty() {
        return Err(ValidationError::BlankField {
            field: field.to_string(),
        });
    }
    Ok(value)
}

fn missing(field: &str) -> ValidationError {
    ValidationError::MissingField {
        field: field.to_string(),
    }
}

/// Absolute http(s) URL with a host and no embedded whitespace.
pub(crate) fn is_valid_source_url(raw: &str) -> bool {
    if raw.chars().any(char::is_whitespace) {
        return false;
    }

    let rest = match raw.split_once("://") {
        Some((scheme, rest)) if scheme.eq_ignore_ascii_case("http") => rest,
        Some((scheme, rest)) if scheme.eq_ignore_ascii_case("https") => rest,
        _ => return false,
    };

    let authority = rest.split(['/', '?', '#']).next().unwrap_or_default();
    let host = authority
        .rsplit_once('@')
        .map(|(_, host)| host)
        .unwrap_or(authority);
    let host = match host.rsplit_once(':') {
        Some((name, port)) if !host.ends_with(']') => {
            if port.is_empty() || !port.chars().all(|c| c.is_ascii_digit()) {
                return false;
            }
            name
        }
        _ => host,
    };

    host.chars().any(|c| c.is_ascii_alphanumeric())
        && host
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '[' | ']' | ':'))
}
