use serde_json::json;
use share_advisor::plans::{validate_plan_json, PlanCatalogSource, PricingPlan, StaticCatalog};
use share_advisor::questionnaire::{
    AnnualSpend, ExpensePreference, PregnancyPlanning, QuestionnaireResponse,
};
use share_advisor::recommendations::{
    get_recommendations, ExclusionReason, RecommendationConfig, RecommendationEngine,
};

fn plan(id: &str, premium: f64, unshared: f64, maternity: bool) -> PricingPlan {
    validate_plan_json(json!({
        "id": id,
        "providerName": format!("{id} sharing"),
        "planName": id,
        "maxCoverage": "Unlimited",
        "annualUnsharedAmount": "$500 per member",
        "sourceUrl": format!("https://plans.example.org/{id}"),
        "planMatrix": [{
            "ageBracket": "40-49",
            "householdType": "Member & Spouse",
            "costs": [{ "monthlyPremium": premium, "initialUnsharedAmount": unshared }]
        }],
        "coverage": {
            "maternity": if maternity { "Shared after 10 months" } else { "Not shared" },
            "coversMaternity": maternity,
            "acceptsPreExistingConditions": true
        }
    }))
    .expect("fixture plan is valid")
}

fn couple(preference: ExpensePreference) -> QuestionnaireResponse {
    QuestionnaireResponse {
        zip_code: "73301".to_string(),
        household_size: 2,
        age: 44,
        pregnant: false,
        planning_pregnancy: PregnancyPlanning::No,
        pre_existing_conditions: false,
        expense_preference: preference,
        annual_healthcare_spend: AnnualSpend::OverFiveThousand,
        household_type: None,
    }
}

#[test]
fn premium_tolerance_decides_between_plan_a_and_plan_b() {
    let catalog = vec![
        plan("plan-a", 200.0, 1000.0, false),
        plan("plan-b", 150.0, 2000.0, false),
    ];

    let tolerant =
        get_recommendations(&catalog, &couple(ExpensePreference::HigherMonthly)).expect("ranked");
    assert_eq!(tolerant[0].plan_id, "plan-a");

    let frugal =
        get_recommendations(&catalog, &couple(ExpensePreference::LowerMonthly)).expect("ranked");
    assert_eq!(frugal[0].plan_id, "plan-b");
}

#[test]
fn expecting_couple_is_steered_to_maternity_sharing() {
    let catalog = vec![
        plan("budget", 120.0, 1000.0, false),
        plan("family-ready", 260.0, 2500.0, true),
    ];
    let mut answers = couple(ExpensePreference::LowerMonthly);
    answers.planning_pregnancy = PregnancyPlanning::Yes;

    let ranked = get_recommendations(&catalog, &answers).expect("one plan qualifies");
    assert_eq!(ranked.len(), 1);
    assert_eq!(ranked[0].plan_id, "family-ready");
}

#[test]
fn bundled_catalog_has_nothing_for_retirees() {
    let catalog = StaticCatalog::bundled()
        .and_then(|source| source.fetch_catalog())
        .expect("bundled catalog");
    let mut answers = couple(ExpensePreference::HigherMonthly);
    answers.age = 66;

    let err = get_recommendations(catalog.plans(), &answers).expect_err("past 64");
    assert_eq!(err.exclusions.len(), catalog.len());
    assert!(err
        .exclusions
        .iter()
        .all(|exclusion| matches!(exclusion.reason, ExclusionReason::AgeOutsideBrackets { .. })));
}

#[test]
fn components_explain_each_score() {
    let catalog = vec![plan("plan-a", 200.0, 1000.0, true)];
    let engine = RecommendationEngine::new(RecommendationConfig::default());
    let mut answers = couple(ExpensePreference::HigherMonthly);
    answers.planning_pregnancy = PregnancyPlanning::Maybe;

    let ranked = engine.rank(&catalog, &answers).expect("ranked");
    let total: f64 = ranked[0]
        .components
        .iter()
        .map(|component| component.points)
        .sum();
    assert!((ranked[0].score - total).abs() < 1e-3);
    assert_eq!(ranked[0].components.len(), 3);
}
