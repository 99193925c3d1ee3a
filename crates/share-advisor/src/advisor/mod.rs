//! Service facade and HTTP routes composing the catalog, questionnaire storage,
//! and recommendation engine.

pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use router::advisor_router;
pub use service::{AdvisorError, PlanAdvisorService};
