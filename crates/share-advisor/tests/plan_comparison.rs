use std::time::{Duration, Instant};

use share_advisor::plans::{
    get_plan_comparison, AgeBracket, HouseholdType, PlanCatalogSource, PricingPlan,
    StaticCatalog,
};

fn catalog() -> Vec<PricingPlan> {
    StaticCatalog::bundled()
        .and_then(|source| source.fetch_catalog())
        .expect("bundled catalog")
        .plans()
        .to_vec()
}

#[test]
fn every_row_carries_the_requested_cell_costs() {
    let catalog = catalog();

    for age_bracket in AgeBracket::ALL {
        for household_type in HouseholdType::ALL {
            let rows = get_plan_comparison(
                &catalog,
                age_bracket.label(),
                household_type.label(),
                None,
            )
            .expect("fixed enumerations are valid filters");

            for row in &rows {
                let plan = catalog
                    .iter()
                    .find(|plan| plan.id == row.plan_id)
                    .expect("row references a catalog plan");
                let entry = plan
                    .matrix_entry(age_bracket, household_type)
                    .expect("rows only exist for priced cells");
                assert_eq!(row.costs, entry.costs);
            }
        }
    }
}

#[test]
fn family_plan_is_absent_from_member_only_comparison() {
    let catalog = catalog();
    let rows = get_plan_comparison(&catalog, "30-39", "Member Only", None).expect("valid");

    assert_eq!(rows.len(), catalog.len() - 1);
    assert!(rows.iter().all(|row| row.plan_id != "lighthouse-family"));
}

#[test]
fn summit_variants_are_joined_for_display() {
    let catalog = catalog();
    let rows = get_plan_comparison(&catalog, "18-29", "Member Only", None).expect("valid");
    let summit = rows
        .iter()
        .find(|row| row.plan_id == "summit-essential")
        .expect("summit priced");
    assert_eq!(summit.plan_name, "Essential / Essential Plus");
}

#[test]
fn comparison_is_idempotent_and_leaves_catalog_untouched() {
    let catalog = catalog();
    let before = catalog.clone();

    let first = get_plan_comparison(&catalog, "40-49", "Member & Family", None).expect("valid");
    let second = get_plan_comparison(&catalog, "40-49", "Member & Family", None).expect("valid");

    assert_eq!(first, second);
    assert_eq!(catalog, before);
}

#[test]
fn comparison_stays_cheap() {
    let catalog = catalog();

    let started = Instant::now();
    let rows = get_plan_comparison(&catalog, "30-39", "Member Only", None).expect("valid");
    assert!(!rows.is_empty());
    assert!(started.elapsed() < Duration::from_millis(100));

    let iterations = 1000;
    let started = Instant::now();
    for _ in 0..iterations {
        let rows = get_plan_comparison(&catalog, "30-39", "Member Only", None).expect("valid");
        assert!(!rows.is_empty());
    }
    let average = started.elapsed() / iterations;
    assert!(
        average < Duration::from_millis(1),
        "average comparison took {average:?}"
    );
}
