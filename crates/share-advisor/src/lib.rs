//! Health-sharing plan advisor: catalog validation, side-by-side comparison, and
//! questionnaire-driven recommendations.

pub mod advisor;
pub mod config;
pub mod error;
pub mod plans;
pub mod questionnaire;
pub mod recommendations;
pub mod telemetry;

pub use advisor::{advisor_router, AdvisorError, PlanAdvisorService};
pub use error::AppError;
