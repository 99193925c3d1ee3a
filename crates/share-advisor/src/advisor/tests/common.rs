use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::Value;

use crate::advisor::{advisor_router, PlanAdvisorService};
use crate::plans::{CatalogError, CatalogSnapshot, PlanCatalogSource, StaticCatalog};
use crate::questionnaire::{
    AnnualSpend, ExpensePreference, PregnancyPlanning, QuestionnaireResponse, QuestionnaireStore,
    SessionId, StoreError, StoredQuestionnaire,
};
use crate::recommendations::RecommendationConfig;

pub(super) fn response() -> QuestionnaireResponse {
    QuestionnaireResponse {
        zip_code: "50309".to_string(),
        household_size: 1,
        age: 35,
        pregnant: false,
        planning_pregnancy: PregnancyPlanning::No,
        pre_existing_conditions: false,
        expense_preference: ExpensePreference::LowerMonthly,
        annual_healthcare_spend: AnnualSpend::OneToFiveThousand,
        household_type: None,
    }
}

pub(super) fn bundled_catalog() -> Arc<StaticCatalog> {
    Arc::new(StaticCatalog::bundled().expect("bundled catalog is valid"))
}

pub(super) fn build_service() -> (
    PlanAdvisorService<StaticCatalog, MemoryStore>,
    Arc<MemoryStore>,
) {
    let store = Arc::new(MemoryStore::default());
    let service = PlanAdvisorService::new(
        bundled_catalog(),
        store.clone(),
        RecommendationConfig::default(),
    );
    (service, store)
}

#[derive(Default, Clone)]
pub(super) struct MemoryStore {
    pub(super) records: Arc<Mutex<HashMap<SessionId, StoredQuestionnaire>>>,
}

impl QuestionnaireStore for MemoryStore {
    fn save(&self, record: StoredQuestionnaire) -> Result<StoredQuestionnaire, StoreError> {
        let mut guard = self.records.lock().expect("store mutex poisoned");
        guard.insert(record.session_id.clone(), record.clone());
        Ok(record)
    }

    fn load(&self, session_id: &SessionId) -> Result<Option<StoredQuestionnaire>, StoreError> {
        let guard = self.records.lock().expect("store mutex poisoned");
        Ok(guard.get(session_id).cloned())
    }

    fn clear(&self, session_id: &SessionId) -> Result<bool, StoreError> {
        let mut guard = self.records.lock().expect("store mutex poisoned");
        Ok(guard.remove(session_id).is_some())
    }
}

pub(super) struct UnavailableStore;

impl QuestionnaireStore for UnavailableStore {
    fn save(&self, _record: StoredQuestionnaire) -> Result<StoredQuestionnaire, StoreError> {
        Err(StoreError::Unavailable("session cache offline".to_string()))
    }

    fn load(&self, _session_id: &SessionId) -> Result<Option<StoredQuestionnaire>, StoreError> {
        Err(StoreError::Unavailable("session cache offline".to_string()))
    }

    fn clear(&self, _session_id: &SessionId) -> Result<bool, StoreError> {
        Err(StoreError::Unavailable("session cache offline".to_string()))
    }
}

pub(super) struct MissingCatalog;

impl PlanCatalogSource for MissingCatalog {
    fn fetch_catalog(&self) -> Result<CatalogSnapshot, CatalogError> {
        Err(CatalogError::Io {
            path: PathBuf::from("/missing/plans.json"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        })
    }
}

pub(super) fn advisor_router_with_service(
    service: PlanAdvisorService<StaticCatalog, MemoryStore>,
) -> axum::Router {
    advisor_router(Arc::new(service))
}

pub(super) fn plan_ids(value: &Value) -> Vec<String> {
    value
        .as_array()
        .expect("array of plans")
        .iter()
        .map(|plan| plan["plan_id"].as_str().expect("plan_id").to_string())
        .collect()
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 1 << 20)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
