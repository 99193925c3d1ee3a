use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Age range used to key plan pricing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AgeBracket {
    EighteenToTwentyNine,
    ThirtyToThirtyNine,
    FortyToFortyNine,
    FiftyToSixtyFour,
}

impl AgeBracket {
    pub const ALL: [AgeBracket; 4] = [
        AgeBracket::EighteenToTwentyNine,
        AgeBracket::ThirtyToThirtyNine,
        AgeBracket::FortyToFortyNine,
        AgeBracket::FiftyToSixtyFour,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            AgeBracket::EighteenToTwentyNine => "18-29",
            AgeBracket::ThirtyToThirtyNine => "30-39",
            AgeBracket::FortyToFortyNine => "40-49",
            AgeBracket::FiftyToSixtyFour => "50-64",
        }
    }

    /// Bracket covering `age`, or `None` once a member ages out of every priced range.
    pub fn for_age(age: u8) -> Option<Self> {
        match age {
            18..=29 => Some(AgeBracket::EighteenToTwentyNine),
            30..=39 => Some(AgeBracket::ThirtyToThirtyNine),
            40..=49 => Some(AgeBracket::FortyToFortyNine),
            50..=64 => Some(AgeBracket::FiftyToSixtyFour),
            _ => None,
        }
    }
}

/// Membership composition used to key plan pricing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum HouseholdType {
    MemberOnly,
    MemberAndSpouse,
    MemberAndChildren,
    MemberAndFamily,
}

impl HouseholdType {
    pub const ALL: [HouseholdType; 4] = [
        HouseholdType::MemberOnly,
        HouseholdType::MemberAndSpouse,
        HouseholdType::MemberAndChildren,
        HouseholdType::MemberAndFamily,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            HouseholdType::MemberOnly => "Member Only",
            HouseholdType::MemberAndSpouse => "Member & Spouse",
            HouseholdType::MemberAndChildren => "Member & Child(ren)",
            HouseholdType::MemberAndFamily => "Member & Family",
        }
    }

    /// Household type implied by a head count when the member gave no explicit composition.
    pub fn for_household_size(size: u8) -> Self {
        match size {
            0 | 1 => HouseholdType::MemberOnly,
            2 => HouseholdType::MemberAndSpouse,
            _ => HouseholdType::MemberAndFamily,
        }
    }
}

/// Raised when a string is not one of the fixed enumeration spellings.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{value}' is not a recognised {kind}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

macro_rules! labelled_enum {
    ($ty:ident, $kind:literal) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }

        impl FromStr for $ty {
            type Err = UnknownVariant;

            fn from_str(raw: &str) -> Result<Self, Self::Err> {
                let trimmed = raw.trim();
                $ty::ALL
                    .into_iter()
                    .find(|variant| variant.label() == trimmed)
                    .ok_or_else(|| UnknownVariant {
                        kind: $kind,
                        value: raw.to_string(),
                    })
            }
        }

        impl Serialize for $ty {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.label())
            }
        }

        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = String::deserialize(deserializer)?;
                raw.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

labelled_enum!(AgeBracket, "age bracket");
labelled_enum!(HouseholdType, "household type");

/// A plan may be marketed under regional name variants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PlanName {
    Single(String),
    Variants(Vec<String>),
}

impl PlanName {
    pub fn variants(&self) -> Vec<&str> {
        match self {
            PlanName::Single(name) => vec![name.as_str()],
            PlanName::Variants(names) => names.iter().map(String::as_str).collect(),
        }
    }

    pub fn display_name(&self) -> String {
        self.variants().join(" / ")
    }
}

/// One priced option within a matrix cell.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanCost {
    pub monthly_premium: f64,
    pub initial_unshared_amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanMatrixEntry {
    pub age_bracket: AgeBracket,
    pub household_type: HouseholdType,
    pub costs: Vec<PlanCost>,
}

impl PlanMatrixEntry {
    pub fn matches(&self, age_bracket: AgeBracket, household_type: HouseholdType) -> bool {
        self.age_bracket == age_bracket && self.household_type == household_type
    }
}

const NOT_DISCLOSED: &str = "Not disclosed";

/// Display copy for the comparison view plus the flags that gate eligibility.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlanCoverage {
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
    pub covers_maternity: bool,
    pub accepts_pre_existing_conditions: bool,
}

impl Default for PlanCoverage {
    fn default() -> Self {
        Self {
            emergency_services: NOT_DISCLOSED.to_string(),
            surgical_procedures: NOT_DISCLOSED.to_string(),
            preventative_services: NOT_DISCLOSED.to_string(),
            maternity: NOT_DISCLOSED.to_string(),
            pregnancy_waiting_period: NOT_DISCLOSED.to_string(),
            pre_existing_waiting_period: NOT_DISCLOSED.to_string(),
            alternative_medicine: NOT_DISCLOSED.to_string(),
            telemedicine: NOT_DISCLOSED.to_string(),
            prescription_coverage: NOT_DISCLOSED.to_string(),
            lifetime_limit: NOT_DISCLOSED.to_string(),
            covers_maternity: false,
            accepts_pre_existing_conditions: false,
        }
    }
}

/// Validated catalog record. Construct through [`super::validate_plan`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingPlan {
    pub id: String,
    pub provider_name: String,
    pub plan_name: PlanName,
    pub max_coverage: String,
    pub annual_unshared_amount: String,
    pub source_url: String,
    pub plan_matrix: Vec<PlanMatrixEntry>,
    #[serde(default)]
    pub coverage: PlanCoverage,
}

impl PricingPlan {
    pub fn matrix_entry(
        &self,
        age_bracket: AgeBracket,
        household_type: HouseholdType,
    ) -> Option<&PlanMatrixEntry> {
        self.plan_matrix
            .iter()
            .find(|entry| entry.matches(age_bracket, household_type))
    }
}
