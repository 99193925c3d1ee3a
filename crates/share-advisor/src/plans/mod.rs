//! Plan catalog: the data model, ingestion checks, catalog sources, and the
//! side-by-side comparison view.

pub mod catalog;
pub mod comparison;
pub mod domain;
pub mod import;
pub mod validation;

pub use catalog::{
    parse_catalog, CatalogError, CatalogSnapshot, JsonFileCatalog, PlanCatalogSource,
    StaticCatalog,
};
pub use comparison::{
    compare_plans, get_plan_comparison, ComparisonFilter, InvalidFilterError, PlanComparisonRow,
};
pub use domain::{
    AgeBracket, HouseholdType, PlanCost, PlanCoverage, PlanMatrixEntry, PlanName, PricingPlan,
    UnknownVariant,
};
pub use import::{PricingImportError, PricingImportReport, PricingMatrixImporter};
pub use validation::{validate_plan, validate_plan_json, PlanCandidate, ValidationError};
