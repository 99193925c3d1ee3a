use super::common::*;
use std::sync::Arc;

use crate::advisor::{AdvisorError, PlanAdvisorService};
use crate::questionnaire::{QuestionnaireError, QuestionnaireStore, SessionId, StoreError};
use crate::recommendations::{ExclusionReason, RecommendationConfig};

#[test]
fn compare_returns_priced_plans_in_catalog_order() {
    let (service, _) = build_service();

    let rows = service
        .compare("30-39", "Member Only", None)
        .expect("valid filter");
    let ids: Vec<_> = rows.iter().map(|row| row.plan_id.as_str()).collect();

    assert_eq!(
        ids,
        vec![
            "harbor-classic",
            "summit-essential",
            "meridian-complete",
            "prairie-young-adult",
            "keystone-catastrophic",
        ]
    );
    assert_eq!(rows[0].costs[0].monthly_premium, 190.0);
    assert_eq!(rows[0].costs[1].initial_unshared_amount, 2500.0);
}

#[test]
fn compare_honours_requested_subset_and_skips_unknown_ids() {
    let (service, _) = build_service();
    let requested = vec![
        "keystone-catastrophic".to_string(),
        "not-a-plan".to_string(),
        "harbor-classic".to_string(),
    ];

    let rows = service
        .compare("30-39", "Member Only", Some(requested.as_slice()))
        .expect("valid filter");
    let ids: Vec<_> = rows.iter().map(|row| row.plan_id.as_str()).collect();

    assert_eq!(ids, vec!["keystone-catastrophic", "harbor-classic"]);
}

#[test]
fn compare_rejects_unknown_filters() {
    let (service, _) = build_service();

    let err = service
        .compare("99-120", "Member Only", None)
        .expect_err("bad bracket");
    assert!(matches!(
        err,
        AdvisorError::InvalidFilter(ref filter) if filter.field == "age_bracket"
    ));
}

#[test]
fn recommend_validates_before_ranking() {
    let (service, _) = build_service();
    let mut answers = response();
    answers.zip_code = "ABCDE".to_string();

    let err = service.recommend(&answers).expect_err("invalid zip");
    assert!(matches!(
        err,
        AdvisorError::Questionnaire(QuestionnaireError::InvalidZipCode { .. })
    ));
}

#[test]
fn recommend_ranks_only_eligible_plans() {
    let (service, _) = build_service();

    let ranked = service.recommend(&response()).expect("plans qualify");
    assert_eq!(ranked.len(), 5);
    assert!(ranked.iter().all(|plan| plan.plan_id != "lighthouse-family"));
    assert_eq!(
        ranked.iter().map(|plan| plan.rank).collect::<Vec<_>>(),
        vec![1, 2, 3, 4, 5]
    );

    let mut expecting = response();
    expecting.pregnant = true;
    let ranked = service.recommend(&expecting).expect("maternity plans qualify");
    let mut ids: Vec<_> = ranked.iter().map(|plan| plan.plan_id.as_str()).collect();
    ids.sort_unstable();
    assert_eq!(ids, vec!["harbor-classic", "meridian-complete"]);
}

#[test]
fn recommend_reports_exclusions_when_nothing_qualifies() {
    let (service, _) = build_service();
    let mut answers = response();
    answers.age = 70;

    match service.recommend(&answers) {
        Err(AdvisorError::NoEligiblePlans(details)) => {
            assert_eq!(details.exclusions.len(), 6);
            assert!(details
                .exclusions
                .iter()
                .all(|exclusion| exclusion.reason == ExclusionReason::AgeOutsideBrackets { age: 70 }));
        }
        other => panic!("expected no eligible plans, got {other:?}"),
    }
}

#[test]
fn session_round_trip_drives_recommendations() {
    let (service, store) = build_service();
    let session = SessionId("visitor-1".to_string());

    let stored = service
        .submit_questionnaire(session.clone(), response())
        .expect("saved");
    assert_eq!(stored.session_id, session);
    assert!(store.load(&session).expect("load").is_some());

    let from_session = service
        .recommend_for_session(&session)
        .expect("recommendations");
    let direct = service.recommend(&response()).expect("recommendations");
    assert_eq!(from_session, direct);

    assert!(service.clear_questionnaire(&session).expect("cleared"));
    assert!(!service.clear_questionnaire(&session).expect("already gone"));
    assert!(matches!(
        service.recommend_for_session(&session),
        Err(AdvisorError::QuestionnaireMissing { .. })
    ));
}

#[test]
fn invalid_questionnaire_is_not_stored() {
    let (service, store) = build_service();
    let session = SessionId("visitor-2".to_string());
    let mut answers = response();
    answers.household_size = 0;

    let err = service
        .submit_questionnaire(session.clone(), answers)
        .expect_err("invalid household");
    assert!(matches!(err, AdvisorError::Questionnaire(_)));
    assert!(store.load(&session).expect("load").is_none());
}

#[test]
fn store_failures_surface_as_store_errors() {
    let service = PlanAdvisorService::new(
        bundled_catalog(),
        Arc::new(UnavailableStore),
        RecommendationConfig::default(),
    );

    let err = service
        .submit_questionnaire(SessionId("visitor-3".to_string()), response())
        .expect_err("store offline");
    assert!(matches!(err, AdvisorError::Store(StoreError::Unavailable(_))));
}

#[test]
fn catalog_failures_surface_as_catalog_errors() {
    let service = PlanAdvisorService::new(
        Arc::new(MissingCatalog),
        Arc::new(MemoryStore::default()),
        RecommendationConfig::default(),
    );

    assert!(matches!(service.catalog(), Err(AdvisorError::Catalog(_))));
    assert!(matches!(
        service.recommend(&response()),
        Err(AdvisorError::Catalog(_))
    ));
}
