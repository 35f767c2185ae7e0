use serde_json::{json, Map, Value};

use super::common::*;
use crate::evaluation::EvaluationResult;
use crate::schema::FormPath;
use crate::service::{BenefitUpdate, NewBenefit, ServiceError};

fn screener_with_benefit(harness: &Harness) -> (String, String) {
    let owner = owner();
    let screener = harness
        .screeners
        .create_screener(&owner, "Household screener")
        .expect("screener created");
    let benefit = harness
        .screeners
        .create_benefit(
            &owner,
            &screener.id,
            NewBenefit {
                name: "Senior freeze".to_string(),
                description: "Freezes assessed value".to_string(),
            },
        )
        .expect("benefit created");
    (screener.id, benefit.id)
}

fn inputs(value: Value) -> Map<String, Value> {
    value.as_object().cloned().expect("object inputs")
}

#[test]
fn created_benefit_is_listed_on_screener() {
    let harness = harness();
    let (screener_id, benefit_id) = screener_with_benefit(&harness);

    let screener = harness.screeners.get_screener(&owner(), &screener_id).unwrap();
    assert_eq!(screener.benefits.len(), 1);
    assert_eq!(screener.benefits[0].id, benefit_id);
    assert_eq!(screener.benefits[0].name, "Senior freeze");

    let benefit = harness
        .screeners
        .get_benefit(&owner(), &screener_id, &benefit_id)
        .unwrap();
    assert_eq!(benefit.owner_id, "owner-1");
    assert!(!benefit.is_public);
    assert!(benefit.checks.is_empty());
}

#[test]
fn renaming_a_benefit_refreshes_the_screener_summary() {
    let harness = harness();
    let (screener_id, benefit_id) = screener_with_benefit(&harness);

    let updated = harness
        .screeners
        .update_benefit(
            &owner(),
            &screener_id,
            &benefit_id,
            BenefitUpdate {
                name: Some("Senior citizen freeze".to_string()),
                description: None,
            },
        )
        .expect("update succeeds");
    assert_eq!(updated.name, "Senior citizen freeze");
    assert_eq!(updated.description, "Freezes assessed value");

    let screener = harness.screeners.get_screener(&owner(), &screener_id).unwrap();
    let detail = screener
        .benefits
        .iter()
        .find(|detail| detail.id == benefit_id)
        .expect("summary present");
    assert_eq!(detail.name, "Senior citizen freeze");
    assert_eq!(detail.description, "Freezes assessed value");
}

#[test]
fn empty_benefit_update_is_rejected() {
    let harness = harness();
    let (screener_id, benefit_id) = screener_with_benefit(&harness);

    assert!(matches!(
        harness.screeners.update_benefit(
            &owner(),
            &screener_id,
            &benefit_id,
            BenefitUpdate::default()
        ),
        Err(ServiceError::InvalidRequest(_))
    ));
}

#[test]
fn deleting_a_benefit_drops_its_summary() {
    let harness = harness();
    let (screener_id, benefit_id) = screener_with_benefit(&harness);

    harness
        .screeners
        .delete_benefit(&owner(), &screener_id, &benefit_id)
        .expect("delete succeeds");

    let screener = harness.screeners.get_screener(&owner(), &screener_id).unwrap();
    assert!(screener.benefits.is_empty());
    assert!(matches!(
        harness.screeners.get_benefit(&owner(), &screener_id, &benefit_id),
        Err(ServiceError::NotFound { entity: "benefit", .. })
    ));
}

#[test]
fn strangers_cannot_touch_benefits() {
    let harness = harness();
    let (screener_id, benefit_id) = screener_with_benefit(&harness);

    assert!(matches!(
        harness.screeners.get_benefit(&stranger(), &screener_id, &benefit_id),
        Err(ServiceError::Unauthorized { .. })
    ));
    assert!(matches!(
        harness.screeners.list_benefits(&stranger(), &screener_id),
        Err(ServiceError::Unauthorized { .. })
    ));
}

#[test]
fn library_check_is_snapshotted_into_benefit() {
    let harness = harness();
    let (screener_id, benefit_id) = screener_with_benefit(&harness);

    let benefit = harness
        .screeners
        .add_check(&owner(), &screener_id, &benefit_id, "lib-age-over")
        .expect("library check attaches");
    let config = benefit.check("lib-age-over").expect("config embedded");
    assert_eq!(config.check_version, "2");
    assert_eq!(config.evaluation_url.as_deref(), Some("/api/v1/age/over"));
    assert!(config.parameters.is_empty());

    assert!(matches!(
        harness
            .screeners
            .add_check(&owner(), &screener_id, &benefit_id, "unknown"),
        Err(ServiceError::NotFound { entity: "check", .. })
    ));
}

#[test]
fn custom_check_snapshot_ignores_later_edits() {
    let harness = harness();
    let owner = owner();
    let (screener_id, benefit_id) = screener_with_benefit(&harness);

    let working = harness
        .checks
        .create_check(&owner, new_check("below-threshold"))
        .unwrap();
    let published = harness.checks.publish_check(&owner, &working.id).unwrap();
    harness
        .screeners
        .add_check(&owner, &screener_id, &benefit_id, &published.id)
        .expect("published custom check attaches");

    harness
        .checks
        .update_check(
            &owner,
            &working.id,
            crate::service::UpdateCheck {
                input_definition: Some(json!({ "properties": { "assets": { "type": "number" } } })),
                ..Default::default()
            },
        )
        .unwrap();
    harness.checks.publish_check(&owner, &working.id).unwrap();

    let benefit = harness
        .screeners
        .get_benefit(&owner, &screener_id, &benefit_id)
        .unwrap();
    let config = benefit.check(&published.id).expect("config kept");
    assert_eq!(config.check_version, "0.1.0");
    assert_eq!(
        config.input_definition,
        json!({ "properties": { "income": { "type": "number" } } })
    );
}

#[test]
fn parameters_drive_form_paths() {
    let harness = harness();
    let owner = owner();
    let (screener_id, benefit_id) = screener_with_benefit(&harness);
    harness
        .screeners
        .add_check(&owner, &screener_id, &benefit_id, "lib-age-over")
        .unwrap();

    let before = harness.screeners.form_paths(&owner, &screener_id).unwrap();
    assert_eq!(
        before,
        vec![
            FormPath::new("income", "number"),
            FormPath::new("people.dateOfBirth", "date"),
        ]
    );

    harness
        .screeners
        .update_check_parameters(
            &owner,
            &screener_id,
            &benefit_id,
            "lib-age-over",
            inputs(json!({ "personId": "applicant", "minAge": 65 })),
        )
        .expect("parameters update");

    let after = harness.screeners.form_paths(&owner, &screener_id).unwrap();
    assert_eq!(
        after,
        vec![
            FormPath::new("income", "number"),
            FormPath::new("people.applicant.dateOfBirth", "date"),
        ]
    );
}

#[test]
fn removing_an_unattached_check_is_not_found() {
    let harness = harness();
    let (screener_id, benefit_id) = screener_with_benefit(&harness);
    harness
        .screeners
        .add_check(&owner(), &screener_id, &benefit_id, "lib-age-over")
        .unwrap();

    let benefit = harness
        .screeners
        .remove_check(&owner(), &screener_id, &benefit_id, "lib-age-over")
        .unwrap();
    assert!(benefit.checks.is_empty());
    assert!(matches!(
        harness
            .screeners
            .remove_check(&owner(), &screener_id, &benefit_id, "lib-age-over"),
        Err(ServiceError::NotFound { .. })
    ));
}

#[test]
fn evaluation_combines_check_results() {
    let harness = harness_with_engine(EvaluationResult::False);
    let (screener_id, benefit_id) = screener_with_benefit(&harness);

    let empty = harness
        .screeners
        .evaluate_benefit(&owner(), &screener_id, &benefit_id, &inputs(json!({ "income": 10 })))
        .unwrap();
    assert_eq!(empty.result, EvaluationResult::Undetermined);

    harness
        .screeners
        .add_check(&owner(), &screener_id, &benefit_id, "lib-age-over")
        .unwrap();
    let evaluated = harness
        .screeners
        .evaluate_benefit(&owner(), &screener_id, &benefit_id, &inputs(json!({ "income": 10 })))
        .unwrap();
    assert_eq!(evaluated.result, EvaluationResult::False);
    assert_eq!(evaluated.checks.len(), 1);

    assert!(matches!(
        harness
            .screeners
            .evaluate_benefit(&owner(), &screener_id, &benefit_id, &Map::new()),
        Err(ServiceError::InvalidRequest(_))
    ));
}
