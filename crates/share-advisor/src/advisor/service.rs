use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use crate::plans::{
    get_plan_comparison, CatalogError, CatalogSnapshot, InvalidFilterError, PlanCatalogSource,
    PlanComparisonRow,
};
use crate::questionnaire::{
    QuestionnaireError, QuestionnaireResponse, QuestionnaireStore, SessionId, StoreError,
    StoredQuestionnaire,
};
use crate::recommendations::{
    NoEligiblePlansError, RankedPlan, RecommendationConfig, RecommendationEngine,
};

/// Service composing the catalog source, questionnaire store, and recommendation engine.
pub struct PlanAdvisorService<C, S> {
    catalog: Arc<C>,
    store: Arc<S>,
    engine: Arc<RecommendationEngine>,
}

impl<C, S> PlanAdvisorService<C, S>
where
    C: PlanCatalogSource + 'static,
    S: QuestionnaireStore + 'static,
{
    pub fn new(catalog: Arc<C>, store: Arc<S>, config: RecommendationConfig) -> Self {
        Self {
            catalog,
            store,
            engine: Arc::new(RecommendationEngine::new(config)),
        }
    }

    /// Current catalog snapshot.
    pub fn catalog(&self) -> Result<CatalogSnapshot, AdvisorError> {
        Ok(self.catalog.fetch_catalog()?)
    }

    /// Comparison rows for the requested plans (the whole catalog when `plan_ids` is `None`).
    pub fn compare(
        &self,
        age_bracket: &str,
        household_type: &str,
        plan_ids: Option<&[String]>,
    ) -> Result<Vec<PlanComparisonRow>, AdvisorError> {
        let snapshot = self.catalog.fetch_catalog()?;
        let selected = plan_ids.map(|ids| snapshot.select(ids));
        let rows = get_plan_comparison(
            snapshot.plans(),
            age_bracket,
            household_type,
            selected.as_deref(),
        )?;
        Ok(rows)
    }

    /// Validate a response and rank the current catalog against it.
    pub fn recommend(
        &self,
        response: &QuestionnaireResponse,
    ) -> Result<Vec<RankedPlan>, AdvisorError> {
        response.validate()?;
        let snapshot = self.catalog.fetch_catalog()?;
        let ranked = self.engine.rank(snapshot.plans(), response)?;
        info!(
            plans = ranked.len(),
            catalog = snapshot.len(),
            "ranked plans for questionnaire"
        );
        Ok(ranked)
    }

    pub fn submit_questionnaire(
        &self,
        session_id: SessionId,
        response: QuestionnaireResponse,
    ) -> Result<StoredQuestionnaire, AdvisorError> {
        response.validate()?;
        let stored = self.store.save(StoredQuestionnaire {
            session_id,
            response,
            saved_at: Utc::now(),
        })?;
        info!(session_id = %stored.session_id, "questionnaire saved");
        Ok(stored)
    }

    pub fn questionnaire(&self, session_id: &SessionId) -> Result<StoredQuestionnaire, AdvisorError> {
        match self.store.load(session_id)? {
            Some(stored) => Ok(stored),
            None => {
                warn!(%session_id, "no questionnaire stored for session");
                Err(AdvisorError::QuestionnaireMissing {
                    session_id: session_id.clone(),
                })
            }
        }
    }

    pub fn recommend_for_session(
        &self,
        session_id: &SessionId,
    ) -> Result<Vec<RankedPlan>, AdvisorError> {
        let stored = self.questionnaire(session_id)?;
        self.recommend(&stored.response)
    }

    /// Drop the stored response; `true` when one existed.
    pub fn clear_questionnaire(&self, session_id: &SessionId) -> Result<bool, AdvisorError> {
        let cleared = self.store.clear(session_id)?;
        info!(%session_id, cleared, "questionnaire cleared");
        Ok(cleared)
    }
}

/// Error raised by the advisor service.
#[derive(Debug, thiserror::Error)]
pub enum AdvisorError {
    #[error(transparent)]
    Questionnaire(#[from] QuestionnaireError),
    #[error(transparent)]
    InvalidFilter(#[from] InvalidFilterError),
    #[error(transparent)]
    NoEligiblePlans(#[from] NoEligiblePlansError),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("no questionnaire stored for session {session_id}")]
    QuestionnaireMissing { session_id: SessionId },
}
