use metrics_exporter_prometheus::PrometheusHandle;
use share_advisor::plans::{
    CatalogError, CatalogSnapshot, JsonFileCatalog, PlanCatalogSource, StaticCatalog,
};
use share_advisor::questionnaire::{
    QuestionnaireStore, SessionId, StoreError, StoredQuestionnaire,
};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Catalog source picked at startup: the bundled plans or a JSON file on disk.
#[derive(Debug, Clone)]
pub(crate) enum ConfiguredCatalog {
    Bundled(StaticCatalog),
    File(JsonFileCatalog),
}

impl ConfiguredCatalog {
    pub(crate) fn resolve(path: Option<PathBuf>) -> Result<Self, CatalogError> {
        match path {
            Some(path) => Ok(Self::File(JsonFileCatalog::new(path))),
            None => StaticCatalog::bundled().map(Self::Bundled),
        }
    }

    pub(crate) fn describe(&self) -> String {
        match self {
            ConfiguredCatalog::Bundled(_) => "bundled".to_string(),
            ConfiguredCatalog::File(source) => source.path().display().to_string(),
        }
    }
}

impl PlanCatalogSource for ConfiguredCatalog {
    fn fetch_catalog(&self) -> Result<CatalogSnapshot, CatalogError> {
        match self {
            ConfiguredCatalog::Bundled(source) => source.fetch_catalog(),
            ConfiguredCatalog::File(source) => source.fetch_catalog(),
        }
    }
}

/// Process-local session storage; answers are lost on restart.
#[derive(Default, Clone)]
pub(crate) struct InMemoryQuestionnaireStore {
    records: Arc<Mutex<HashMap<SessionId, StoredQuestionnaire>>>,
}

impl InMemoryQuestionnaireStore {
    fn records(&self) -> Result<MutexGuard<'_, HashMap<SessionId, StoredQuestionnaire>>, StoreError> {
        self.records
            .lock()
            .map_err(|_| StoreError::Unavailable("session store lock poisoned".to_string()))
    }
}

impl QuestionnaireStore for InMemoryQuestionnaireStore {
    fn save(&self, record: StoredQuestionnaire) -> Result<StoredQuestionnaire, StoreError> {
        let mut guard = self.records()?;
        guard.insert(record.session_id.clone(), record.clone());
        Ok(record)
    }

    fn load(&self, session_id: &SessionId) -> Result<Option<StoredQuestionnaire>, StoreError> {
        let guard = self.records()?;
        Ok(guard.get(session_id).cloned())
    }

    fn clear(&self, session_id: &SessionId) -> Result<bool, StoreError> {
        let mut guard = self.records()?;
        Ok(guard.remove(session_id).is_some())
    }
}
