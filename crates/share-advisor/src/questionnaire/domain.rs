use serde::{Deserialize, Serialize};

use crate::plans::{AgeBracket, HouseholdType};

const MIN_AGE: u8 = 18;
const MAX_AGE: u8 = 100;
const MAX_HOUSEHOLD_SIZE: u8 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PregnancyPlanning {
    Yes,
    No,
    Maybe,
}

/// Which side of the premium / unshared-amount trade-off the member leans towards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpensePreference {
    LowerMonthly,
    HigherMonthly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnnualSpend {
    #[serde(rename = "<1000")]
    UnderOneThousand,
    #[serde(rename = "1000-5000")]
    OneToFiveThousand,
    #[serde(rename = ">5000")]
    OverFiveThousand,
}

impl AnnualSpend {
    pub const fn label(self) -> &'static str {
        match self {
            AnnualSpend::UnderOneThousand => "<1000",
            AnnualSpend::OneToFiveThousand => "1000-5000",
            AnnualSpend::OverFiveThousand => ">5000",
        }
    }
}

/// Answers collected by the multi-step questionnaire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionnaireResponse {
    pub zip_code: String,
    pub household_size: u8,
    pub age: u8,
    pub pregnant: bool,
    pub planning_pregnancy: PregnancyPlanning,
    pub pre_existing_conditions: bool,
    pub expense_preference: ExpensePreference,
    pub annual_healthcare_spend: AnnualSpend,
    /// Explicit composition; when absent it is derived from `household_size`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub household_type: Option<HouseholdType>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QuestionnaireError {
    #[error("zip_code must be exactly five digits (found '{value}')")]
    InvalidZipCode { value: String },
    #[error("household_size must be between 1 and 10 (found {value})")]
    HouseholdSizeOutOfRange { value: u8 },
    #[error("age must be between 18 and 100 (found {value})")]
    AgeOutOfRange { value: u8 },
    #[error("household_type '{household_type}' does not fit a household of {household_size}")]
    InconsistentHousehold {
        household_type: HouseholdType,
        household_size: u8,
    },
}

impl QuestionnaireError {
    pub fn field(&self) -> &'static str {
        match self {
            QuestionnaireError::InvalidZipCode { .. } => "zip_code",
            QuestionnaireError::HouseholdSizeOutOfRange { .. } => "household_size",
            QuestionnaireError::AgeOutOfRange { .. } => "age",
            QuestionnaireError::InconsistentHousehold { .. } => "household_type",
        }
    }
}

impl QuestionnaireResponse {
    pub fn validate(&self) -> Result<(), QuestionnaireError> {
        if self.zip_code.len() != 5 || !self.zip_code.bytes().all(|b| b.is_ascii_digit()) {
            return Err(QuestionnaireError::InvalidZipCode {
                value: self.zip_code.clone(),
            });
        }

        if !(1..=MAX_HOUSEHOLD_SIZE).contains(&self.household_size) {
            return Err(QuestionnaireError::HouseholdSizeOutOfRange {
                value: self.household_size,
            });
        }

        if !(MIN_AGE..=MAX_AGE).contains(&self.age) {
            return Err(QuestionnaireError::AgeOutOfRange { value: self.age });
        }

        if let Some(household_type) = self.household_type {
            let solo = household_type == HouseholdType::MemberOnly;
            if solo != (self.household_size == 1) {
                return Err(QuestionnaireError::InconsistentHousehold {
                    household_type,
                    household_size: self.household_size,
                });
            }
        }

        Ok(())
    }

    /// `None` once the member is past the oldest priced bracket.
    pub fn age_bracket(&self) -> Option<AgeBracket> {
        AgeBracket::for_age(self.age)
    }

    pub fn household_type(&self) -> HouseholdType {
        self.household_type
            .unwrap_or_else(|| HouseholdType::for_household_size(self.household_size))
    }

    pub fn requires_maternity(&self) -> bool {
        self.pregnant || self.planning_pregnancy == PregnancyPlanning::Yes
    }
}
