use crate::plans::{PlanCost, PlanMatrixEntry, PricingPlan};
use crate::questionnaire::{PregnancyPlanning, QuestionnaireResponse};

use super::config::{RecommendationConfig, ScoreWeights};
use super::{ScoreComponent, ScoreFactor};

/// Cheapest premium and lowest unshared amount among the eligible cost options.
#[derive(Debug, Clone, Copy)]
pub(crate) struct CostBaseline {
    pub min_premium: f64,
    pub min_unshared: f64,
}

impl CostBaseline {
    pub(crate) fn from_entries<'a, I>(entries: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a PlanMatrixEntry>,
    {
        let mut costs = entries.into_iter().flat_map(|entry| entry.costs.iter());
        let first = costs.next()?;
        let seed = Self {
            min_premium: first.monthly_premium,
            min_unshared: first.initial_unshared_amount,
        };

        Some(costs.fold(seed, |acc, cost| Self {
            min_premium: acc.min_premium.min(cost.monthly_premium),
            min_unshared: acc.min_unshared.min(cost.initial_unshared_amount),
        }))
    }
}

pub(crate) struct ScoredOption {
    pub cost: PlanCost,
    pub score: f64,
    pub components: Vec<ScoreComponent>,
}

/// Best-scoring cost option of the plan's matched cell.
pub(crate) fn score_plan(
    plan: &PricingPlan,
    entry: &PlanMatrixEntry,
    response: &QuestionnaireResponse,
    config: &RecommendationConfig,
    baseline: CostBaseline,
) -> Option<ScoredOption> {
    let weights = config.weights_for(response);
    let maternity_bonus = if response.planning_pregnancy == PregnancyPlanning::Maybe
        && plan.coverage.covers_maternity
    {
        Some(config.maternity_interest_bonus)
    } else {
        None
    };

    entry
        .costs
        .iter()
        .map(|cost| score_cost(*cost, weights, baseline, maternity_bonus))
        .reduce(|best, candidate| {
            let better = candidate.score > best.score
                || (candidate.score == best.score
                    && candidate.cost.monthly_premium < best.cost.monthly_premium);
            if better {
                candidate
            } else {
                best
            }
        })
}

fn score_cost(
    cost: PlanCost,
    weights: ScoreWeights,
    baseline: CostBaseline,
    maternity_bonus: Option<f64>,
) -> ScoredOption {
    let mut components = Vec::with_capacity(3);

    let premium_points = weights.premium * (baseline.min_premium / cost.monthly_premium);
    components.push(ScoreComponent {
        factor: ScoreFactor::MonthlyPremium,
        points: round_points(premium_points),
        notes: format!(
            "${:.2}/month against lowest eligible ${:.2}",
            cost.monthly_premium, baseline.min_premium
        ),
    });

    let unshared_points =
        weights.unshared * (baseline.min_unshared / cost.initial_unshared_amount);
    components.push(ScoreComponent {
        factor: ScoreFactor::UnsharedAmount,
        points: round_points(unshared_points),
        notes: format!(
            "${:.0} unshared against lowest eligible ${:.0}",
            cost.initial_unshared_amount, baseline.min_unshared
        ),
    });

    let mut total = premium_points + unshared_points;

    if let Some(bonus) = maternity_bonus {
        components.push(ScoreComponent {
            factor: ScoreFactor::MaternityInterest,
            points: round_points(bonus),
            notes: "shares maternity costs for a possible pregnancy".to_string(),
        });
        total += bonus;
    }

    ScoredOption {
        cost,
        score: round_points(total),
        components,
    }
}

/// Fixed precision keeps equal-looking scores equal so tie-breaks apply.
pub(crate) fn round_points(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}
