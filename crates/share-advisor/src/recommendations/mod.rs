//! Recommendation evaluator: ranks catalog plans against a questionnaire response.

mod config;
mod policy;
mod rules;

pub use config::{RecommendationConfig, SpendMultipliers};
pub use policy::{ExclusionReason, NoEligiblePlansError, PlanExclusion};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::plans::{AgeBracket, HouseholdType, PlanCost, PlanMatrixEntry, PricingPlan};
use crate::questionnaire::QuestionnaireResponse;
use policy::eligible_entry;
use rules::{score_plan, CostBaseline};

/// Stateless evaluator applying the scoring weights to a catalog.
#[derive(Debug, Clone, Default)]
pub struct RecommendationEngine {
    config: RecommendationConfig,
}

impl RecommendationEngine {
    pub fn new(config: RecommendationConfig) -> Self {
        Self {
            config: config.sanitized(),
        }
    }

    pub fn config(&self) -> &RecommendationConfig {
        &self.config
    }

    /// Eligible plans, best first. Identical inputs always produce the same ordering.
    pub fn rank(
        &self,
        catalog: &[PricingPlan],
        response: &QuestionnaireResponse,
    ) -> Result<Vec<RankedPlan>, NoEligiblePlansError> {
        let age_bracket = response.age_bracket();
        let household_type = response.household_type();

        let mut eligible: Vec<(&PricingPlan, &PlanMatrixEntry)> = Vec::new();
        let mut exclusions = Vec::new();
        for plan in catalog {
            match eligible_entry(plan, response, age_bracket, household_type) {
                Ok(entry) => eligible.push((plan, entry)),
                Err(reason) => {
                    debug!(plan_id = %plan.id, reason = %reason.summary(), "plan excluded");
                    exclusions.push(PlanExclusion {
                        plan_id: plan.id.clone(),
                        reason,
                    });
                }
            }
        }

        let baseline = CostBaseline::from_entries(eligible.iter().map(|(_, entry)| *entry));
        let (Some(age_bracket), Some(baseline)) = (age_bracket, baseline) else {
            return Err(NoEligiblePlansError {
                age: response.age,
                age_bracket,
                household_type,
                exclusions,
            });
        };

        let mut ranked: Vec<RankedPlan> = eligible
            .into_iter()
            .filter_map(|(plan, entry)| {
                score_plan(plan, entry, response, &self.config, baseline).map(|scored| RankedPlan {
                    rank: 0,
                    plan_id: plan.id.clone(),
                    provider_name: plan.provider_name.clone(),
                    plan_name: plan.plan_name.display_name(),
                    source_url: plan.source_url.clone(),
                    age_bracket,
                    household_type,
                    score: scored.score,
                    cost: scored.cost,
                    components: scored.components,
                })
            })
            .collect();

        ranked.sort_by(|a, b| {
            b.score
                .total_cmp(&a.score)
                .then_with(|| a.cost.monthly_premium.total_cmp(&b.cost.monthly_premium))
                .then_with(|| a.plan_id.cmp(&b.plan_id))
        });
        for (index, plan) in ranked.iter_mut().enumerate() {
            plan.rank = index + 1;
        }

        Ok(ranked)
    }
}

/// Rank `catalog` for `response` with the default weights.
pub fn get_recommendations(
    catalog: &[PricingPlan],
    response: &QuestionnaireResponse,
) -> Result<Vec<RankedPlan>, NoEligiblePlansError> {
    RecommendationEngine::default().rank(catalog, response)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreFactor {
    MonthlyPremium,
    UnsharedAmount,
    MaternityInterest,
}

/// Discrete contribution to a plan's score, kept for transparent audits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreComponent {
    pub factor: ScoreFactor,
    pub points: f64,
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedPlan {
    pub rank: usize,
    pub plan_id: String,
    pub provider_name: String,
    pub plan_name: String,
    pub source_url: String,
    pub age_bracket: AgeBracket,
    pub household_type: HouseholdType,
    pub score: f64,
    /// Best-scoring cost option of the matched matrix cell.
    pub cost: PlanCost,
    pub components: Vec<ScoreComponent>,
}
