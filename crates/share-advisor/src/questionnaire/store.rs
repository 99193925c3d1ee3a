use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::QuestionnaireResponse;

/// Opaque key for a visitor's questionnaire session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub String);

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Questionnaire answers as held by session storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredQuestionnaire {
    pub session_id: SessionId,
    pub response: QuestionnaireResponse,
    pub saved_at: DateTime<Utc>,
}

/// Session storage abstraction so the advisor never depends on a concrete mechanism.
pub trait QuestionnaireStore: Send + Sync {
    fn save(&self, record: StoredQuestionnaire) -> Result<StoredQuestionnaire, StoreError>;
    fn load(&self, session_id: &SessionId) -> Result<Option<StoredQuestionnaire>, StoreError>;
    /// Returns `true` when a stored response was removed.
    fn clear(&self, session_id: &SessionId) -> Result<bool, StoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("questionnaire storage unavailable: {0}")]
    Unavailable(String),
}
