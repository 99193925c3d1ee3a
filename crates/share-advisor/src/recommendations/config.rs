use serde::{Deserialize, Serialize};

use crate::questionnaire::{AnnualSpend, ExpensePreference, QuestionnaireResponse};

const DEFAULT_PREFERRED_WEIGHT: f64 = 3.0;
const DEFAULT_SECONDARY_WEIGHT: f64 = 1.0;
const DEFAULT_MATERNITY_INTEREST_BONUS: f64 = 0.1;

/// Tunable scoring weights. The member's preferred cost dimension gets
/// `preferred_weight`, the other gets `secondary_weight`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationConfig {
    pub preferred_weight: f64,
    pub secondary_weight: f64,
    pub spend_multipliers: SpendMultipliers,
    pub maternity_interest_bonus: f64,
}

/// Scales the unshared-amount weight by expected annual spend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpendMultipliers {
    pub under_one_thousand: f64,
    pub one_to_five_thousand: f64,
    pub over_five_thousand: f64,
}

impl Default for SpendMultipliers {
    fn default() -> Self {
        Self {
            under_one_thousand: 0.75,
            one_to_five_thousand: 1.0,
            over_five_thousand: 1.25,
        }
    }
}

impl SpendMultipliers {
    pub fn for_spend(&self, spend: AnnualSpend) -> f64 {
        match spend {
            AnnualSpend::UnderOneThousand => self.under_one_thousand,
            AnnualSpend::OneToFiveThousand => self.one_to_five_thousand,
            AnnualSpend::OverFiveThousand => self.over_five_thousand,
        }
    }
}

impl Default for RecommendationConfig {
    fn default() -> Self {
        Self {
            preferred_weight: DEFAULT_PREFERRED_WEIGHT,
            secondary_weight: DEFAULT_SECONDARY_WEIGHT,
            spend_multipliers: SpendMultipliers::default(),
            maternity_interest_bonus: DEFAULT_MATERNITY_INTEREST_BONUS,
        }
    }
}

/// Effective weights for one questionnaire response.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct ScoreWeights {
    pub premium: f64,
    pub unshared: f64,
}

impl RecommendationConfig {
    /// Replace unusable values (non-finite or non-positive) with defaults.
    pub fn sanitized(self) -> Self {
        let defaults = SpendMultipliers::default();
        Self {
            preferred_weight: positive_or(self.preferred_weight, DEFAULT_PREFERRED_WEIGHT),
            secondary_weight: positive_or(self.secondary_weight, DEFAULT_SECONDARY_WEIGHT),
            spend_multipliers: SpendMultipliers {
                under_one_thousand: positive_or(
                    self.spend_multipliers.under_one_thousand,
                    defaults.under_one_thousand,
                ),
                one_to_five_thousand: positive_or(
                    self.spend_multipliers.one_to_five_thousand,
                    defaults.one_to_five_thousand,
                ),
                over_five_thousand: positive_or(
                    self.spend_multipliers.over_five_thousand,
                    defaults.over_five_thousand,
                ),
            },
            maternity_interest_bonus: if self.maternity_interest_bonus.is_finite()
                && self.maternity_interest_bonus >= 0.0
            {
                self.maternity_interest_bonus
            } else {
                DEFAULT_MATERNITY_INTEREST_BONUS
            },
        }
    }

    pub(crate) fn weights_for(&self, response: &QuestionnaireResponse) -> ScoreWeights {
        let (premium, unshared) = match response.expense_preference {
            ExpensePreference::LowerMonthly => (self.preferred_weight, self.secondary_weight),
            ExpensePreference::HigherMonthly => (self.secondary_weight, self.preferred_weight),
        };
        let spend = self
            .spend_multipliers
            .for_spend(response.annual_healthcare_spend);

        ScoreWeights {
            premium,
            unshared: unshared * spend,
        }
    }
}

fn positive_or(value: f64, fallback: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        fallback
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitized_replaces_unusable_weights() {
        let config = RecommendationConfig {
            preferred_weight: f64::NAN,
            secondary_weight: -1.0,
            spend_multipliers: SpendMultipliers {
                under_one_thousand: 0.0,
                ..SpendMultipliers::default()
            },
            maternity_interest_bonus: f64::INFINITY,
        }
        .sanitized();

        assert_eq!(config, RecommendationConfig::default());
    }
}
