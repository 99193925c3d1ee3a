use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use super::domain::PricingPlan;
use super::validation::{ensure_unique_ids, validate_plan, PlanCandidate, ValidationError};

const BUNDLED_CATALOG: &str = include_str!("../../data/plans.json");

/// Read-only view of the catalog taken at a point in time.
#[derive(Debug, Clone)]
pub struct CatalogSnapshot {
    pub plans: Arc<Vec<PricingPlan>>,
    pub fetched_at: DateTime<Utc>,
}

impl CatalogSnapshot {
    pub fn new(plans: Vec<PricingPlan>) -> Self {
        Self {
            plans: Arc::new(plans),
            fetched_at: Utc::now(),
        }
    }

    pub fn plans(&self) -> &[PricingPlan] {
        &self.plans
    }

    pub fn len(&self) -> usize {
        self.plans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plans.is_empty()
    }

    /// Plans matching `ids` in the requested order; unknown ids are skipped.
    pub fn select(&self, ids: &[String]) -> Vec<PricingPlan> {
        ids.iter()
            .filter_map(|id| {
                let found = self.plans.iter().find(|plan| &plan.id == id);
                if found.is_none() {
                    debug!(plan_id = %id, "requested plan not present in catalog");
                }
                found.cloned()
            })
            .collect()
    }
}

/// Capability to fetch the current plan catalog.
pub trait PlanCatalogSource: Send + Sync {
    fn fetch_catalog(&self) -> Result<CatalogSnapshot, CatalogError>;
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to read plan catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("plan catalog is not a JSON array of plans: {0}")]
    Format(#[from] serde_json::Error),
    #[error("catalog plan #{index} is invalid: {source}")]
    InvalidPlan {
        index: usize,
        #[source]
        source: ValidationError,
    },
    #[error(transparent)]
    Inconsistent(ValidationError),
}

/// Parse a JSON array of plan records, validating each before it joins the catalog.
pub fn parse_catalog<R: Read>(reader: R) -> Result<Vec<PricingPlan>, CatalogError> {
    let candidates: Vec<PlanCandidate> = serde_json::from_reader(reader)?;
    validate_candidates(candidates)
}

pub fn validate_candidates(
    candidates: Vec<PlanCandidate>,
) -> Result<Vec<PricingPlan>, CatalogError> {
    let plans = candidates
        .into_iter()
        .enumerate()
        .map(|(index, candidate)| {
            validate_plan(candidate).map_err(|source| CatalogError::InvalidPlan { index, source })
        })
        .collect::<Result<Vec<_>, _>>()?;

    ensure_unique_ids(&plans).map_err(CatalogError::Inconsistent)?;
    Ok(plans)
}

/// In-memory catalog that hands out the same snapshot on every fetch.
#[derive(Debug, Clone)]
pub struct StaticCatalog {
    plans: Arc<Vec<PricingPlan>>,
}

impl StaticCatalog {
    pub fn new(plans: Vec<PricingPlan>) -> Result<Self, CatalogError> {
        ensure_unique_ids(&plans).map_err(CatalogError::Inconsistent)?;
        Ok(Self {
            plans: Arc::new(plans),
        })
    }

    /// The catalog compiled into the library.
    pub fn bundled() -> Result<Self, CatalogError> {
        let plans = parse_catalog(BUNDLED_CATALOG.as_bytes())?;
        Self::new(plans)
    }
}

impl PlanCatalogSource for StaticCatalog {
    fn fetch_catalog(&self) -> Result<CatalogSnapshot, CatalogError> {
        Ok(CatalogSnapshot {
            plans: Arc::clone(&self.plans),
            fetched_at: Utc::now(),
        })
    }
}

/// Catalog backed by a JSON file, re-read on every fetch so edits show up as a fresh snapshot.
#[derive(Debug, Clone)]
pub struct JsonFileCatalog {
    path: PathBuf,
}

impl JsonFileCatalog {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PlanCatalogSource for JsonFileCatalog {
    fn fetch_catalog(&self) -> Result<CatalogSnapshot, CatalogError> {
        let file = std::fs::File::open(&self.path).map_err(|source| CatalogError::Io {
            path: self.path.clone(),
            source,
        })?;
        let plans = parse_catalog(std::io::BufReader::new(file))?;
        info!(path = %self.path.display(), plans = plans.len(), "loaded plan catalog");
        Ok(CatalogSnapshot::new(plans))
    }
}
