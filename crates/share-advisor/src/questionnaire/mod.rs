//! Member questionnaire answers and the session storage seam they live behind.

pub mod domain;
pub mod store;

pub use domain::{
    AnnualSpend, ExpensePreference, PregnancyPlanning, QuestionnaireError, QuestionnaireResponse,
};
pub use store::{QuestionnaireStore, SessionId, StoreError, StoredQuestionnaire};
